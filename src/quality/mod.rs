//! Quality Assessment Engine
//!
//! Multi-dimensional scoring of a produced report against the input it was
//! generated from:
//! - relevance: keyword overlap between input and output
//! - completeness: expected sections present as headings
//! - clarity: sentence-length distribution
//! - helpfulness: actionable markers
//! - accuracy: expected facts present verbatim
//! - structure: headings, lists and tables
//! - personalization: mentions of the company and its industry
//! - responsiveness: elapsed time against a budget
//!
//! Every dimension is bounded to [0, 100]; the composite is a fixed weighted
//! sum used by the pipeline as a gate.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::quality::{
    CLARITY_SATURATION, DEFAULT_RESPONSIVENESS_BUDGET_MS, HELPFULNESS_POINTS_PER_MARKER,
    INDUSTRY_MENTIONS_SATURATION, NAME_MENTIONS_SATURATION, RESPONSIVENESS_ZERO_FACTOR,
    SENTENCE_WORDS_MAX, SENTENCE_WORDS_MIN, WEIGHT_TOLERANCE,
};
use crate::types::{DiagnosisError, Result};

/// Phrases that signal concrete, actionable guidance
const ACTIONABLE_MARKERS: &[&str] = &[
    "recommend",
    "should",
    "next step",
    "action",
    "priority",
    "plan",
    "start",
    "implement",
    "consider",
    "pilot",
    "train",
    "invest",
];

/// Words ignored by the relevance heuristic
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "that", "this", "into", "within", "our", "are",
];

/// Dimension score below which a recommendation is raised
const WEAK_DIMENSION_THRESHOLD: f64 = 70.0;

// =============================================================================
// Weights
// =============================================================================

/// Composite weights per dimension (must sum to 1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityWeights {
    pub relevance: f64,
    pub completeness: f64,
    pub clarity: f64,
    pub helpfulness: f64,
    pub accuracy: f64,
    pub structure: f64,
    pub personalization: f64,
    pub responsiveness: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            relevance: 0.20,
            completeness: 0.15,
            clarity: 0.10,
            helpfulness: 0.15,
            accuracy: 0.15,
            structure: 0.10,
            personalization: 0.10,
            responsiveness: 0.05,
        }
    }
}

impl QualityWeights {
    pub fn sum(&self) -> f64 {
        self.relevance
            + self.completeness
            + self.clarity
            + self.helpfulness
            + self.accuracy
            + self.structure
            + self.personalization
            + self.responsiveness
    }

    pub fn validate(&self) -> Result<()> {
        let all = [
            self.relevance,
            self.completeness,
            self.clarity,
            self.helpfulness,
            self.accuracy,
            self.structure,
            self.personalization,
            self.responsiveness,
        ];
        if all.iter().any(|w| *w < 0.0) {
            return Err(DiagnosisError::Config(
                "quality weights must not be negative".to_string(),
            ));
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(DiagnosisError::Config(format!(
                "quality weights must sum to 1.0, got {:.3}",
                sum
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Metrics
// =============================================================================

/// Individual dimension scores (0-100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QualityDimensions {
    pub relevance: f64,
    pub completeness: f64,
    pub clarity: f64,
    pub helpfulness: f64,
    pub accuracy: f64,
    pub structure: f64,
    pub personalization: f64,
    pub responsiveness: f64,
}

impl QualityDimensions {
    pub fn weighted_average(&self, weights: &QualityWeights) -> f64 {
        self.relevance * weights.relevance
            + self.completeness * weights.completeness
            + self.clarity * weights.clarity
            + self.helpfulness * weights.helpfulness
            + self.accuracy * weights.accuracy
            + self.structure * weights.structure
            + self.personalization * weights.personalization
            + self.responsiveness * weights.responsiveness
    }

    /// Named scores in a fixed order
    pub fn named(&self) -> [(&'static str, f64); 8] {
        [
            ("relevance", self.relevance),
            ("completeness", self.completeness),
            ("clarity", self.clarity),
            ("helpfulness", self.helpfulness),
            ("accuracy", self.accuracy),
            ("structure", self.structure),
            ("personalization", self.personalization),
            ("responsiveness", self.responsiveness),
        ]
    }

    /// Dimensions below threshold, weakest first
    pub fn weak_dimensions(&self, threshold: f64) -> Vec<(&'static str, f64)> {
        let mut weak: Vec<_> = self
            .named()
            .into_iter()
            .filter(|(_, score)| *score < threshold)
            .collect();
        weak.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        weak
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for RecommendationPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationPriority::High => write!(f, "HIGH"),
            RecommendationPriority::Medium => write!(f, "MEDIUM"),
            RecommendationPriority::Low => write!(f, "LOW"),
        }
    }
}

/// Actionable note for one weak dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRecommendation {
    pub dimension: String,
    pub priority: RecommendationPriority,
    pub current: f64,
    pub action: String,
}

/// Quality scores of one produced report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Weighted composite (0-100)
    pub overall: f64,
    pub dimensions: QualityDimensions,
    pub recommendations: Vec<QualityRecommendation>,
}

impl QualityMetrics {
    pub fn passes(&self, threshold: f64) -> bool {
        self.overall >= threshold
    }

    pub fn summary(&self) -> String {
        format!(
            "Quality: {:.1} | Relevance: {:.0} | Completeness: {:.0} | Accuracy: {:.0} | Helpfulness: {:.0}",
            self.overall,
            self.dimensions.relevance,
            self.dimensions.completeness,
            self.dimensions.accuracy,
            self.dimensions.helpfulness
        )
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("## Quality Metrics\n\n");
        md.push_str(&format!("**Overall Score:** {:.1}\n\n", self.overall));
        md.push_str("| Dimension | Score | Status |\n");
        md.push_str("|-----------|-------|--------|\n");

        let status = |score: f64| {
            if score >= 80.0 {
                "Good"
            } else if score >= 60.0 {
                "Fair"
            } else {
                "Needs Work"
            }
        };

        for (name, score) in self.dimensions.named() {
            md.push_str(&format!("| {} | {:.1} | {} |\n", name, score, status(score)));
        }

        if !self.recommendations.is_empty() {
            md.push_str("\n### Recommendations\n\n");
            for rec in &self.recommendations {
                md.push_str(&format!(
                    "- **[{}]** {} ({:.0}): {}\n",
                    rec.priority, rec.dimension, rec.current, rec.action
                ));
            }
        }
        md
    }
}

// =============================================================================
// Assessor
// =============================================================================

/// What the output is expected to contain
#[derive(Debug, Clone, Default)]
pub struct AssessmentContext {
    pub expected_sections: Vec<String>,
    pub expected_facts: Vec<String>,
    pub company_name: String,
    pub industry_name: String,
}

#[derive(Debug, Clone)]
pub struct QualityAssessor {
    weights: QualityWeights,
    responsiveness_budget_ms: u64,
}

impl Default for QualityAssessor {
    fn default() -> Self {
        Self::new(QualityWeights::default(), DEFAULT_RESPONSIVENESS_BUDGET_MS)
    }
}

impl QualityAssessor {
    pub fn new(weights: QualityWeights, responsiveness_budget_ms: u64) -> Self {
        Self {
            weights,
            responsiveness_budget_ms,
        }
    }

    /// Score `output` as a response to `input`
    pub fn assess(
        &self,
        input: &str,
        output: &str,
        context: &AssessmentContext,
        elapsed_ms: u64,
    ) -> QualityMetrics {
        let lowered = output.to_lowercase();

        let dimensions = QualityDimensions {
            relevance: relevance(input, &lowered),
            completeness: completeness(output, &context.expected_sections),
            clarity: clarity(output),
            helpfulness: helpfulness(&lowered),
            accuracy: accuracy(output, &context.expected_facts),
            structure: structure(output, context.expected_sections.len()),
            personalization: personalization(
                &lowered,
                &context.company_name,
                &context.industry_name,
            ),
            responsiveness: responsiveness(elapsed_ms, self.responsiveness_budget_ms),
        };

        QualityMetrics {
            overall: dimensions.weighted_average(&self.weights).clamp(0.0, 100.0),
            recommendations: recommendations(&dimensions),
            dimensions,
        }
    }
}

// =============================================================================
// Dimension Heuristics
// =============================================================================

fn keywords(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3)
        .map(str::to_lowercase)
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect()
}

fn relevance(input: &str, lowered_output: &str) -> f64 {
    let wanted = keywords(input);
    if wanted.is_empty() {
        return 100.0;
    }
    let produced = keywords(lowered_output);
    let hits = wanted.iter().filter(|w| produced.contains(*w)).count();
    hits as f64 / wanted.len() as f64 * 100.0
}

fn headings(output: &str) -> Vec<&str> {
    output
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            trimmed
                .starts_with('#')
                .then(|| trimmed.trim_start_matches('#').trim())
        })
        .collect()
}

fn completeness(output: &str, expected_sections: &[String]) -> f64 {
    if expected_sections.is_empty() {
        return if output.trim().is_empty() { 0.0 } else { 100.0 };
    }
    let found = headings(output);
    let present = expected_sections
        .iter()
        .filter(|s| found.iter().any(|h| h.eq_ignore_ascii_case(s)))
        .count();
    present as f64 / expected_sections.len() as f64 * 100.0
}

fn strip_list_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return rest;
    }
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0
        && let Some(rest) = line[digits..].strip_prefix(". ")
    {
        return rest;
    }
    line
}

/// Split on terminal punctuation followed by whitespace, so "72.5%" stays whole
fn sentences(line: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in line.char_indices() {
        if matches!(c, '.' | '!' | '?')
            && line[i + 1..].chars().next().is_none_or(char::is_whitespace)
        {
            out.push(&line[start..i]);
            start = i + 1;
        }
    }
    out.push(&line[start..]);
    out
}

fn clarity(output: &str) -> f64 {
    let sentences: Vec<usize> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('|'))
        .map(strip_list_marker)
        .flat_map(sentences)
        .map(|s| s.split_whitespace().count())
        .filter(|&n| n > 0)
        .collect();
    if sentences.is_empty() {
        return 0.0;
    }
    let readable = sentences
        .iter()
        .filter(|&&n| (SENTENCE_WORDS_MIN..=SENTENCE_WORDS_MAX).contains(&n))
        .count();
    let share = readable as f64 / sentences.len() as f64;
    (share / CLARITY_SATURATION).min(1.0) * 100.0
}

fn helpfulness(lowered_output: &str) -> f64 {
    let hits: usize = ACTIONABLE_MARKERS
        .iter()
        .map(|m| lowered_output.matches(m).count())
        .sum();
    (hits as f64 * HELPFULNESS_POINTS_PER_MARKER).min(100.0)
}

fn accuracy(output: &str, expected_facts: &[String]) -> f64 {
    if expected_facts.is_empty() {
        return 100.0;
    }
    let present = expected_facts
        .iter()
        .filter(|f| output.contains(f.as_str()))
        .count();
    present as f64 / expected_facts.len() as f64 * 100.0
}

fn structure(output: &str, expected_sections: usize) -> f64 {
    if output.trim().is_empty() {
        return 0.0;
    }
    let heading_count = output
        .lines()
        .filter(|l| l.trim_start().starts_with("## "))
        .count();
    let target = expected_sections.max(1);
    let mut score = (heading_count as f64 / target as f64).min(1.0) * 40.0;
    if output.lines().any(|l| l.starts_with("# ")) {
        score += 20.0;
    }
    if output
        .lines()
        .any(|l| l.trim_start().starts_with("- ") || l.trim_start().starts_with("1. "))
    {
        score += 20.0;
    }
    if output.lines().any(|l| l.trim_start().starts_with('|')) {
        score += 20.0;
    }
    score
}

fn personalization(lowered_output: &str, company_name: &str, industry_name: &str) -> f64 {
    let mentions = |needle: &str| {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            0
        } else {
            lowered_output.matches(needle.as_str()).count()
        }
    };
    let name = mentions(company_name).min(NAME_MENTIONS_SATURATION) as f64
        / NAME_MENTIONS_SATURATION as f64;
    let industry = mentions(industry_name).min(INDUSTRY_MENTIONS_SATURATION) as f64
        / INDUSTRY_MENTIONS_SATURATION as f64;
    name * 60.0 + industry * 40.0
}

fn responsiveness(elapsed_ms: u64, budget_ms: u64) -> f64 {
    let budget = budget_ms.max(1);
    if elapsed_ms <= budget {
        return 100.0;
    }
    let zero_at = budget.saturating_mul(RESPONSIVENESS_ZERO_FACTOR);
    if elapsed_ms >= zero_at {
        return 0.0;
    }
    (zero_at - elapsed_ms) as f64 / (zero_at - budget) as f64 * 100.0
}

fn recommendations(dimensions: &QualityDimensions) -> Vec<QualityRecommendation> {
    let mut recs: Vec<QualityRecommendation> = dimensions
        .weak_dimensions(WEAK_DIMENSION_THRESHOLD)
        .into_iter()
        .map(|(dimension, current)| {
            let priority = if current < 40.0 {
                RecommendationPriority::High
            } else if current < 55.0 {
                RecommendationPriority::Medium
            } else {
                RecommendationPriority::Low
            };
            let action = match dimension {
                "relevance" => "Reflect more of the submitted goals and context in the report",
                "completeness" => "Restore the missing report sections",
                "clarity" => "Shorten long sentences and avoid fragments",
                "helpfulness" => "Add concrete next steps and recommendations",
                "accuracy" => "Check that scores and labels match the calculated results",
                "structure" => "Use headings, lists and tables consistently",
                "personalization" => "Reference the company and its industry more directly",
                _ => "Reduce report generation time",
            };
            QualityRecommendation {
                dimension: dimension.to_string(),
                priority,
                current,
                action: action.to_string(),
            }
        })
        .collect();
    recs.sort_by_key(|r| r.priority);
    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> AssessmentContext {
        AssessmentContext {
            expected_sections: vec!["Overview".to_string(), "Next Steps".to_string()],
            expected_facts: vec!["72.5%".to_string(), "Grade C".to_string()],
            company_name: "Acme".to_string(),
            industry_name: "Retail".to_string(),
        }
    }

    fn good_output() -> String {
        "# Acme Report\n\n\
         ## Overview\n\n\
         Acme scored 72.5% and received Grade C in this assessment. \
         Acme operates in Retail and competes with other Retail firms. \
         Acme should start a pilot for demand forecasting soon.\n\n\
         | Item | Value |\n|---|---|\n| Score | 72.5% |\n\n\
         ## Next Steps\n\n\
         - We recommend that Acme implement a training plan this quarter.\n\
         - Acme should consider a Retail analytics pilot with clear targets.\n\
         - Start the first action item within four weeks of this report.\n"
            .to_string()
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!(QualityWeights::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = QualityWeights {
            relevance: 0.5,
            ..Default::default()
        };
        assert!(matches!(weights.validate(), Err(DiagnosisError::Config(_))));
    }

    #[test]
    fn test_dimensions_are_bounded() {
        let assessor = QualityAssessor::default();
        let metrics = assessor.assess(
            "Acme retail demand forecasting",
            &good_output(),
            &context(),
            100,
        );
        for (name, score) in metrics.dimensions.named() {
            assert!((0.0..=100.0).contains(&score), "{} = {}", name, score);
        }
        assert!((0.0..=100.0).contains(&metrics.overall));
    }

    #[test]
    fn test_good_output_scores_high() {
        let metrics = QualityAssessor::default().assess(
            "Acme. Retail. demand forecasting",
            &good_output(),
            &context(),
            100,
        );
        assert_eq!(metrics.dimensions.completeness, 100.0);
        assert_eq!(metrics.dimensions.accuracy, 100.0);
        assert_eq!(metrics.dimensions.relevance, 100.0);
        assert_eq!(metrics.dimensions.responsiveness, 100.0);
        assert!(metrics.passes(80.0), "{}", metrics.summary());
    }

    #[test]
    fn test_empty_output_scores_low() {
        let metrics = QualityAssessor::default().assess("Acme retail", "", &context(), 100);
        assert!(metrics.overall < 20.0);
        assert!(!metrics.recommendations.is_empty());
        assert_eq!(
            metrics.recommendations[0].priority,
            RecommendationPriority::High
        );
    }

    #[test]
    fn test_completeness_counts_headings_only() {
        let output = "Overview is mentioned but not as a heading.\n## Next Steps\n";
        assert_eq!(completeness(output, &context().expected_sections), 50.0);
    }

    #[test]
    fn test_sentences_keep_decimals_whole() {
        let parts = sentences("Score was 72.5% today. Next one! Done");
        assert_eq!(parts, vec!["Score was 72.5% today", " Next one", " Done"]);
    }

    #[test]
    fn test_list_markers_do_not_count_as_sentences() {
        assert_eq!(strip_list_marker("12. Map the process"), "Map the process");
        assert_eq!(strip_list_marker("- Draft a policy"), "Draft a policy");
        assert_eq!(strip_list_marker("2024 was a year"), "2024 was a year");
    }

    #[test]
    fn test_responsiveness_decays_linearly() {
        assert_eq!(responsiveness(3_000, 3_000), 100.0);
        assert_eq!(responsiveness(30_000, 3_000), 0.0);
        let mid = responsiveness(16_500, 3_000);
        assert!((mid - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_personalization_saturates() {
        let text = "acme ".repeat(10) + &"retail ".repeat(10);
        assert_eq!(personalization(&text, "Acme", "Retail"), 100.0);
        assert_eq!(personalization("nothing here", "Acme", "Retail"), 0.0);
    }

    #[test]
    fn test_markdown_lists_every_dimension() {
        let metrics = QualityAssessor::default().assess("x", "", &context(), 0);
        let md = metrics.to_markdown();
        for (name, _) in metrics.dimensions.named() {
            assert!(md.contains(name));
        }
        assert!(md.contains("### Recommendations"));
    }
}
