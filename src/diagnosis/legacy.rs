//! Legacy ("simple") pipeline
//!
//! Short-form report with the score table and the top recommendations. No
//! orchestration and no quality gate; it is the fallback branch of the
//! parallel coordinator.

use std::time::Instant;

use tracing::{debug, instrument};

use super::{check_consent, guarded, validate_submission};
use crate::constants::pipeline::LEGACY_PIPELINE_VERSION;
use crate::industry::{IndustryAnalysisEngine, recommend_for};
use crate::report::ComposedReport;
use crate::scoring::compute_scores;
use crate::types::{ProcessResult, ReportMetadata, Result, Submission};

const TOP_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone)]
pub struct LegacyPipeline {
    industry: IndustryAnalysisEngine,
}

impl LegacyPipeline {
    pub fn new(industry: IndustryAnalysisEngine) -> Self {
        Self { industry }
    }

    #[instrument(skip_all, fields(company = %submission.company.name))]
    pub fn run(&self, submission: &Submission) -> ProcessResult {
        let start = Instant::now();
        match guarded("simple-report", || self.generate(submission)) {
            Ok((metadata, body)) => ProcessResult {
                success: true,
                message: format!("Simple report generated for {}", submission.company.name),
                report: Some(body),
                metadata: Some(metadata),
                quality_metrics: None,
                processing_time_ms: start.elapsed().as_millis() as u64,
                error: None,
                failure: None,
                steps: Vec::new(),
            },
            Err(err) => ProcessResult::from_error(&err, start.elapsed().as_millis() as u64),
        }
    }

    fn generate(&self, submission: &Submission) -> Result<(ReportMetadata, String)> {
        check_consent(submission)?;
        validate_submission(submission)?;

        let insight = self.industry.lookup(&submission.company.industry);
        let scores = compute_scores(&submission.ratings);
        let recommendation = recommend_for(insight, scores.percentage, scores.maturity);
        let company = submission.company.name.trim();

        let mut body = format!("# AI Capability Summary: {}\n\n", company);
        body.push_str("## Scores\n\n");
        body.push_str("| Category | Score | Percentage |\n");
        body.push_str("|----------|-------|------------|\n");
        for c in &scores.categories {
            body.push_str(&format!(
                "| {} | {} / {} | {:.1}% |\n",
                c.category.title(),
                c.total,
                c.max,
                c.percentage
            ));
        }
        body.push_str(&format!(
            "\nTotal: {} ({}), Grade {}, {}.\n\n",
            scores.total_label(),
            scores.percentage_label(),
            scores.grade,
            scores.maturity.title()
        ));

        body.push_str("## Recommendations\n\n");
        for priority in recommendation.priorities.iter().take(TOP_RECOMMENDATIONS) {
            body.push_str(&format!("- {}\n", priority));
        }
        body.push_str(&format!(
            "\nIndustry reference: {} (peer average {:.1}%).\n",
            insight.name, insight.benchmarks.peer_average
        ));

        let report = ComposedReport {
            word_count: body.split_whitespace().count(),
            byte_size: body.len(),
            section_titles: vec!["Scores".to_string(), "Recommendations".to_string()],
            warnings: Vec::new(),
            body,
        };
        debug!("Simple report: {} bytes", report.byte_size);

        let metadata = ReportMetadata::describe(
            submission,
            &scores,
            insight,
            &report,
            LEGACY_PIPELINE_VERSION,
        );
        Ok((metadata, report.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FailureKind;
    use crate::types::fixtures::sample_submission;

    #[test]
    fn test_simple_report_contains_scores_and_recommendations() {
        let pipeline = LegacyPipeline::new(IndustryAnalysisEngine::builtin());
        let result = pipeline.run(&sample_submission());

        assert!(result.success);
        let body = result.report.unwrap();
        assert!(body.contains("## Scores"));
        assert!(body.contains("## Recommendations"));
        assert!(body.contains("Grade D"));
        let metadata = result.metadata.unwrap();
        assert_eq!(metadata.pipeline_version, LEGACY_PIPELINE_VERSION);
        assert_eq!(metadata.section_count, 2);
    }

    #[test]
    fn test_simple_pipeline_still_requires_consent() {
        let mut submission = sample_submission();
        submission.consent = false;
        let result = LegacyPipeline::new(IndustryAnalysisEngine::builtin()).run(&submission);

        assert!(!result.success);
        assert_eq!(result.failure, Some(FailureKind::Validation));
    }
}
