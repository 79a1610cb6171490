//! Industry Analysis Engine
//!
//! Read-only lookup of industry reference data plus the benchmark-relative
//! recommendation rule.
//!
//! The table is constructed once (built-in catalog or file) and injected into
//! the engine; nothing here is mutated after construction.

mod catalog;

pub use catalog::builtin_industries;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::IndustryConfig;
use crate::constants::recommendation::{ADVANCED_RATIO, DEFAULT_INDUSTRY, FOUNDATIONAL_RATIO};
use crate::scoring::MaturityLevel;
use crate::types::{DiagnosisError, Result};

// =============================================================================
// Reference Data
// =============================================================================

/// Benchmark triple on the 0-100 percentage scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmarks {
    pub peer_average: f64,
    pub top_decile: f64,
    /// Expected annual growth of AI adoption in the industry (%)
    pub growth_trend: f64,
}

/// Static reference record for one industry classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryInsight {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub characteristics: Vec<String>,
    pub automation_opportunities: Vec<String>,
    pub benchmarks: Benchmarks,
    /// Share of the roadmap devoted to AI tooling versus practical process work (0-1)
    pub ai_practical_ratio: f64,
    #[serde(default)]
    pub success_stories: Vec<String>,
    #[serde(default)]
    pub trends: Vec<String>,
    #[serde(default)]
    pub support_programs: Vec<String>,
}

/// On-disk layout of an industry table file
#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    default_code: Option<String>,
    industries: Vec<IndustryInsight>,
}

/// Industry classification → insight lookup table
#[derive(Debug, Clone)]
pub struct IndustryTable {
    entries: BTreeMap<String, IndustryInsight>,
    aliases: BTreeMap<String, String>,
    default_code: String,
}

impl IndustryTable {
    /// Table backed by the built-in catalog
    pub fn builtin() -> Self {
        // The built-in catalog always contains the default entry.
        Self::index(builtin_industries(), DEFAULT_INDUSTRY.to_string())
    }

    /// Build a table from explicit entries
    pub fn from_entries(entries: Vec<IndustryInsight>, default_code: &str) -> Result<Self> {
        let table = Self::index(entries, normalize(default_code));
        table.validate()?;
        Ok(table)
    }

    /// Load a table from a TOML, YAML or JSON file (by extension)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: TableFile = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            other => {
                return Err(DiagnosisError::IndustryTable(format!(
                    "unsupported table format {:?} for {}",
                    other,
                    path.display()
                )));
            }
        };

        let default_code = file
            .default_code
            .unwrap_or_else(|| DEFAULT_INDUSTRY.to_string());
        debug!(
            "Loaded {} industries from {}",
            file.industries.len(),
            path.display()
        );
        Self::from_entries(file.industries, &default_code)
    }

    /// Table selected by configuration: the override file, else the catalog
    pub fn from_config(config: &IndustryConfig) -> Result<Self> {
        match &config.table_path {
            Some(path) => Self::load(path),
            None => Self::from_entries(builtin_industries(), &config.default_code),
        }
    }

    fn index(entries: Vec<IndustryInsight>, default_code: String) -> Self {
        let mut aliases = BTreeMap::new();
        let mut indexed = BTreeMap::new();
        for entry in entries {
            let code = normalize(&entry.code);
            for alias in &entry.aliases {
                aliases.insert(normalize(alias), code.clone());
            }
            indexed.insert(code, entry);
        }
        Self {
            entries: indexed,
            aliases,
            default_code,
        }
    }

    /// Check structural invariants of the table
    pub fn validate(&self) -> Result<()> {
        if !self.entries.contains_key(&self.default_code) {
            return Err(DiagnosisError::IndustryTable(format!(
                "default entry '{}' is missing",
                self.default_code
            )));
        }
        for insight in self.entries.values() {
            let b = &insight.benchmarks;
            if b.peer_average <= 0.0 || b.top_decile < b.peer_average || b.top_decile > 100.0 {
                return Err(DiagnosisError::IndustryTable(format!(
                    "benchmarks for '{}' must satisfy 0 < peer_average <= top_decile <= 100",
                    insight.code
                )));
            }
            if !(0.0..=1.0).contains(&insight.ai_practical_ratio) {
                return Err(DiagnosisError::IndustryTable(format!(
                    "ai_practical_ratio for '{}' must be within 0.0-1.0",
                    insight.code
                )));
            }
        }
        Ok(())
    }

    /// Exact match on code or alias, without fallback
    pub fn get(&self, classification: &str) -> Option<&IndustryInsight> {
        let key = normalize(classification);
        self.entries.get(&key).or_else(|| {
            self.aliases
                .get(&key)
                .and_then(|code| self.entries.get(code))
        })
    }

    pub fn default_entry(&self) -> &IndustryInsight {
        // validate()/builtin() guarantee presence; fall back to any entry otherwise.
        self.entries
            .get(&self.default_code)
            .or_else(|| self.entries.values().next())
            .unwrap_or_else(|| unreachable!("industry table is never empty"))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by code
    pub fn iter(&self) -> impl Iterator<Item = &IndustryInsight> {
        self.entries.values()
    }
}

fn normalize(classification: &str) -> String {
    classification.trim().to_lowercase()
}

// =============================================================================
// Recommendation
// =============================================================================

/// Bucket a company falls into relative to its industry peers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevelopmentBand {
    Foundational,
    Developing,
    Advanced,
}

impl DevelopmentBand {
    /// Band from the ratio of the company's percentage to the peer average
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < FOUNDATIONAL_RATIO {
            Self::Foundational
        } else if ratio <= ADVANCED_RATIO {
            Self::Developing
        } else {
            Self::Advanced
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Foundational => "Foundational",
            Self::Developing => "Developing",
            Self::Advanced => "Advanced",
        }
    }
}

/// One roadmap phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapMilestone {
    pub phase: u8,
    pub horizon: String,
    pub title: String,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub band: DevelopmentBand,
    pub priorities: Vec<String>,
    pub roadmap_milestones: Vec<RoadmapMilestone>,
    pub automation_opportunities: Vec<String>,
    pub expected_impact: String,
    /// Company percentage divided by the peer average
    pub ratio_to_average: f64,
    /// Percentage points between the company and the top decile (never negative)
    pub gap_to_top_decile: f64,
}

// =============================================================================
// Engine
// =============================================================================

/// Industry lookups and benchmark-relative recommendations
#[derive(Debug, Clone)]
pub struct IndustryAnalysisEngine {
    table: Arc<IndustryTable>,
}

impl IndustryAnalysisEngine {
    pub fn new(table: Arc<IndustryTable>) -> Self {
        Self { table }
    }

    /// Engine over the built-in catalog
    pub fn builtin() -> Self {
        Self::new(Arc::new(IndustryTable::builtin()))
    }

    pub fn table(&self) -> &IndustryTable {
        &self.table
    }

    /// Whether the classification resolves without falling back
    pub fn is_known(&self, industry: &str) -> bool {
        self.table.get(industry).is_some()
    }

    /// Resolve a classification, falling back to the default entry
    pub fn lookup(&self, industry: &str) -> &IndustryInsight {
        match self.table.get(industry) {
            Some(insight) => insight,
            None => {
                let fallback = self.table.default_entry();
                debug!(
                    "Industry '{}' not in table, using default '{}'",
                    industry, fallback.code
                );
                fallback
            }
        }
    }

    /// Recommendation for a classification, resolved with fallback
    pub fn recommend(
        &self,
        industry: &str,
        percentage: f64,
        maturity: MaturityLevel,
    ) -> Recommendation {
        recommend_for(self.lookup(industry), percentage, maturity)
    }
}

/// Recommendation bucketed purely on `percentage` versus the peer average
pub fn recommend_for(
    insight: &IndustryInsight,
    percentage: f64,
    maturity: MaturityLevel,
) -> Recommendation {
    let benchmarks = &insight.benchmarks;
    let ratio = if benchmarks.peer_average > 0.0 {
        percentage / benchmarks.peer_average
    } else {
        f64::INFINITY
    };
    let band = DevelopmentBand::from_ratio(ratio);

    let opportunity_count = match band {
        DevelopmentBand::Foundational => 2,
        DevelopmentBand::Developing => 4,
        DevelopmentBand::Advanced => insight.automation_opportunities.len(),
    };

    let mut priorities = band_priorities(band);
    priorities.push(maturity_focus(maturity).to_string());

    Recommendation {
        band,
        priorities,
        roadmap_milestones: band_roadmap(band, insight),
        automation_opportunities: insight
            .automation_opportunities
            .iter()
            .take(opportunity_count)
            .cloned()
            .collect(),
        expected_impact: band_impact(band).to_string(),
        ratio_to_average: ratio,
        gap_to_top_decile: (benchmarks.top_decile - percentage).max(0.0),
    }
}

fn band_priorities(band: DevelopmentBand) -> Vec<String> {
    let items: &[&str] = match band {
        DevelopmentBand::Foundational => &[
            "Secure executive sponsorship and name an AI owner",
            "Digitize and centralize the core operational data",
            "Run AI literacy training for all staff",
            "Pick one low-risk pilot with a measurable outcome",
        ],
        DevelopmentBand::Developing => &[
            "Scale the most successful pilot to a full department",
            "Standardize data collection across teams",
            "Define AI usage and data security guidelines",
            "Build a small internal champion network",
        ],
        DevelopmentBand::Advanced => &[
            "Integrate AI into end-to-end core processes",
            "Establish model monitoring and governance",
            "Develop proprietary data assets for differentiation",
            "Explore AI-enabled products and new revenue",
        ],
    };
    items.iter().map(|s| s.to_string()).collect()
}

fn maturity_focus(maturity: MaturityLevel) -> &'static str {
    match maturity {
        MaturityLevel::Unaware => "Build a shared vocabulary for AI across leadership",
        MaturityLevel::Aware => "Turn AI interest into a concrete, budgeted plan",
        MaturityLevel::Adopting => "Measure pilot results and reinvest in what works",
        MaturityLevel::Leading => "Share practices externally and mentor partners",
    }
}

fn band_impact(band: DevelopmentBand) -> &'static str {
    match band {
        DevelopmentBand::Foundational => {
            "10-20% time savings on targeted administrative tasks within 6 months"
        }
        DevelopmentBand::Developing => {
            "20-30% productivity gain in scaled processes within 12 months"
        }
        DevelopmentBand::Advanced => {
            "30%+ productivity gain and new AI-enabled revenue within 18 months"
        }
    }
}

fn band_roadmap(band: DevelopmentBand, insight: &IndustryInsight) -> Vec<RoadmapMilestone> {
    let first_opportunity = insight
        .automation_opportunities
        .first()
        .cloned()
        .unwrap_or_else(|| "document automation".to_string());

    let (titles, horizons): ([&str; 3], [&str; 3]) = match band {
        DevelopmentBand::Foundational => (
            ["Prepare the ground", "First pilot", "Expand carefully"],
            ["0-3 months", "3-6 months", "6-12 months"],
        ),
        DevelopmentBand::Developing => (
            ["Consolidate pilots", "Scale across teams", "Optimize and govern"],
            ["0-3 months", "3-9 months", "9-18 months"],
        ),
        DevelopmentBand::Advanced => (
            ["Integrate core processes", "Differentiate with data", "Innovate offerings"],
            ["0-6 months", "6-12 months", "12-24 months"],
        ),
    };

    let actions: [Vec<String>; 3] = match band {
        DevelopmentBand::Foundational => [
            vec![
                "Inventory repetitive tasks and available data".to_string(),
                "Complete basic AI training for key staff".to_string(),
            ],
            vec![
                format!("Pilot {}", first_opportunity.to_lowercase()),
                "Track time saved against a baseline".to_string(),
            ],
            vec![
                "Roll the pilot out to a second team".to_string(),
                "Draft an AI usage policy".to_string(),
            ],
        ],
        DevelopmentBand::Developing => [
            vec![
                "Review pilot results and retire weak ones".to_string(),
                "Assign process owners for AI workflows".to_string(),
            ],
            vec![
                format!("Scale {} to all relevant teams", first_opportunity.to_lowercase()),
                "Connect data sources into a shared store".to_string(),
            ],
            vec![
                "Introduce quarterly AI performance reviews".to_string(),
                "Formalize data security controls".to_string(),
            ],
        ],
        DevelopmentBand::Advanced => [
            vec![
                "Embed AI decisions into core systems".to_string(),
                "Set up model monitoring dashboards".to_string(),
            ],
            vec![
                "Curate proprietary training data".to_string(),
                "Automate feedback loops from operations".to_string(),
            ],
            vec![
                "Prototype AI-enabled customer offerings".to_string(),
                "Partner with peers on shared data initiatives".to_string(),
            ],
        ],
    };

    titles
        .iter()
        .zip(horizons.iter())
        .zip(actions)
        .enumerate()
        .map(|(i, ((title, horizon), actions))| RoadmapMilestone {
            phase: i as u8 + 1,
            horizon: horizon.to_string(),
            title: title.to_string(),
            actions,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> IndustryAnalysisEngine {
        IndustryAnalysisEngine::builtin()
    }

    #[test]
    fn test_lookup_known_and_alias() {
        let engine = engine();
        assert_eq!(engine.lookup("manufacturing").code, "manufacturing");
        assert_eq!(engine.lookup("  Software ").code, "it-software");
        assert!(engine.is_known("IT"));
    }

    #[test]
    fn test_lookup_unknown_falls_back_to_default() {
        let engine = engine();
        assert!(!engine.is_known("unknown-code"));
        assert_eq!(engine.lookup("unknown-code").code, DEFAULT_INDUSTRY);
        assert_eq!(engine.lookup("").code, DEFAULT_INDUSTRY);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(DevelopmentBand::from_ratio(0.69), DevelopmentBand::Foundational);
        assert_eq!(DevelopmentBand::from_ratio(0.7), DevelopmentBand::Developing);
        assert_eq!(DevelopmentBand::from_ratio(1.0), DevelopmentBand::Developing);
        assert_eq!(DevelopmentBand::from_ratio(1.01), DevelopmentBand::Advanced);
    }

    #[test]
    fn test_recommend_bands_against_peer_average() {
        let engine = engine();
        // manufacturing peer average is 58
        let low = engine.recommend("manufacturing", 30.0, MaturityLevel::Unaware);
        assert_eq!(low.band, DevelopmentBand::Foundational);
        assert_eq!(low.automation_opportunities.len(), 2);

        let mid = engine.recommend("manufacturing", 58.0, MaturityLevel::Aware);
        assert_eq!(mid.band, DevelopmentBand::Developing);
        assert_eq!(mid.automation_opportunities.len(), 4);

        let high = engine.recommend("manufacturing", 70.0, MaturityLevel::Adopting);
        assert_eq!(high.band, DevelopmentBand::Advanced);
        assert_eq!(high.automation_opportunities.len(), 5);
        assert!((high.gap_to_top_decile - 12.0).abs() < 1e-9);

        assert_ne!(low.expected_impact, mid.expected_impact);
        assert_ne!(mid.expected_impact, high.expected_impact);
    }

    #[test]
    fn test_recommend_roadmap_has_three_phases() {
        let rec = engine().recommend("retail", 40.0, MaturityLevel::Aware);
        assert_eq!(rec.roadmap_milestones.len(), 3);
        assert_eq!(rec.roadmap_milestones[0].phase, 1);
        assert_eq!(rec.roadmap_milestones[2].phase, 3);
        assert_eq!(
            rec.priorities.last().map(String::as_str),
            Some(maturity_focus(MaturityLevel::Aware))
        );
    }

    #[test]
    fn test_gap_to_top_decile_never_negative() {
        let rec = engine().recommend("construction", 99.0, MaturityLevel::Leading);
        assert_eq!(rec.gap_to_top_decile, 0.0);
    }

    #[test]
    fn test_from_entries_requires_default() {
        let entries: Vec<IndustryInsight> = builtin_industries()
            .into_iter()
            .filter(|i| i.code != DEFAULT_INDUSTRY)
            .collect();
        let err = IndustryTable::from_entries(entries, DEFAULT_INDUSTRY).unwrap_err();
        assert!(matches!(err, DiagnosisError::IndustryTable(_)));
    }

    #[test]
    fn test_load_table_from_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("industries.toml");
        std::fs::write(
            &path,
            r#"
default_code = "fallback"

[[industries]]
code = "fallback"
name = "Fallback"
characteristics = ["generic"]
automation_opportunities = ["drafting"]
ai_practical_ratio = 0.5
benchmarks = { peer_average = 50.0, top_decile = 75.0, growth_trend = 10.0 }

[[industries]]
code = "bakery"
name = "Bakery"
aliases = ["bread"]
characteristics = ["early mornings"]
automation_opportunities = ["demand forecasting", "order intake"]
ai_practical_ratio = 0.3
benchmarks = { peer_average = 40.0, top_decile = 60.0, growth_trend = 8.0 }
"#,
        )
        .unwrap();

        let table = IndustryTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        let engine = IndustryAnalysisEngine::new(Arc::new(table));
        assert_eq!(engine.lookup("bread").code, "bakery");
        assert_eq!(engine.lookup("shipbuilding").code, "fallback");
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("industries.csv");
        std::fs::write(&path, "code,name").unwrap();
        assert!(matches!(
            IndustryTable::load(&path),
            Err(DiagnosisError::IndustryTable(_))
        ));
    }
}
