//! Diagnosis Controller
//!
//! Wires the scoring, industry, report and quality engines into the named
//! five-step pipeline:
//!
//! ```text
//! data-validation → data-retrieval → score-calculation → report-generation → quality-check
//! ```
//!
//! The full run goes through the [`StepOrchestrator`] and is gated on report
//! quality. [`DiagnosisController::quick_diagnosis`] skips both the orchestrator
//! and the gate for callers that prefer latency over the quality guarantee.

pub mod bridge;
pub mod legacy;
pub mod parallel;

pub use bridge::{CompatibilityBridge, LegacyRecord};
pub use legacy::LegacyPipeline;
pub use parallel::{
    DeliveryPipeline, ParallelWorkflowCoordinator, ParallelWorkflowResult, RichPipeline,
    SimplePipeline,
};

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use tracing::{info, instrument, warn};

use crate::config::{Config, PipelineConfig};
use crate::constants::pipeline::steps;
use crate::industry::{IndustryAnalysisEngine, IndustryInsight, IndustryTable};
use crate::pipeline::{PipelineStep, StepOrchestrator, StepOutcome};
use crate::quality::{AssessmentContext, QualityAssessor, QualityMetrics};
use crate::report::{ComposedReport, ReportComposer, expected_facts};
use crate::scoring::{Grade, ScoringResult, compute_scores};
use crate::types::{
    DiagnosisError, FailureKind, ProcessResult, ReportMetadata, Result, Submission,
    ValidationError, ValidationErrorKind,
};

// =============================================================================
// Options
// =============================================================================

/// Per-call overrides of the configured pipeline settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosisOptions {
    /// Quality gate threshold; not range-checked so callers can force a gate
    pub quality_threshold: Option<f64>,
}

impl DiagnosisOptions {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            quality_threshold: Some(threshold),
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Consent must be given before any step runs
pub fn check_consent(submission: &Submission) -> Result<()> {
    if submission.consent {
        Ok(())
    } else {
        Err(ValidationError::new(
            ValidationErrorKind::Consent,
            "consent must be given before the diagnosis runs",
        )
        .with_field("consent")
        .with_comparison("true", "false")
        .into())
    }
}

/// Structural completeness check.
///
/// Returns soft warnings for ratings the score calculator will substitute;
/// missing required descriptors are hard errors.
pub fn validate_submission(submission: &Submission) -> Result<Vec<String>> {
    if submission.company.name.trim().is_empty() {
        return Err(ValidationError::missing("company.name").into());
    }
    if submission.company.industry.trim().is_empty() {
        return Err(ValidationError::missing("company.industry").into());
    }

    let mut warnings = Vec::new();
    for (category, ratings) in submission.ratings.iter() {
        if ratings.is_empty() {
            warnings.push(format!(
                "{} has no ratings; mid-scale values will be used",
                category.key()
            ));
        }
    }
    for (category, index, value) in submission.ratings.out_of_range() {
        warnings.push(format!(
            "{}[{}] = {} is outside 1-5; mid-scale value will be used",
            category.key(),
            index,
            value
        ));
    }
    Ok(warnings)
}

// =============================================================================
// Controller
// =============================================================================

/// Working state threaded through the orchestrated steps
struct DiagnosisState<'s> {
    submission: &'s Submission,
    insight: Option<IndustryInsight>,
    scores: Option<ScoringResult>,
    report: Option<ComposedReport>,
    quality: Option<QualityMetrics>,
}

#[derive(Debug, Clone)]
pub struct DiagnosisController {
    industry: IndustryAnalysisEngine,
    composer: ReportComposer,
    assessor: QualityAssessor,
    settings: PipelineConfig,
}

impl Default for DiagnosisController {
    fn default() -> Self {
        Self::new(IndustryAnalysisEngine::builtin(), &Config::default())
    }
}

impl DiagnosisController {
    pub fn new(industry: IndustryAnalysisEngine, config: &Config) -> Self {
        Self {
            industry,
            composer: ReportComposer::new(config.pipeline.min_report_sections),
            assessor: QualityAssessor::new(
                config.quality.weights.clone(),
                config.quality.responsiveness_budget_ms,
            ),
            settings: config.pipeline.clone(),
        }
    }

    /// Controller with the industry table the configuration points at
    pub fn from_config(config: &Config) -> Result<Self> {
        let table = IndustryTable::from_config(&config.industry)?;
        Ok(Self::new(
            IndustryAnalysisEngine::new(Arc::new(table)),
            config,
        ))
    }

    pub fn industry(&self) -> &IndustryAnalysisEngine {
        &self.industry
    }

    pub fn settings(&self) -> &PipelineConfig {
        &self.settings
    }

    /// Full gated pipeline
    #[instrument(skip_all, fields(company = %submission.company.name))]
    pub fn process_complete_diagnosis(
        &self,
        submission: &Submission,
        options: &DiagnosisOptions,
    ) -> ProcessResult {
        let start = Instant::now();
        let threshold = options
            .quality_threshold
            .unwrap_or(self.settings.quality_threshold);
        info!("Starting full diagnosis (quality threshold {:.1})", threshold);

        let orchestrator = StepOrchestrator::new("diagnosis")
            .step(
                PipelineStep::new(steps::DATA_VALIDATION, |s: &mut DiagnosisState<'_>| {
                    let warnings = validate_submission(s.submission)?;
                    Ok(StepOutcome::with_output(json!({
                        "ratingItems": s.submission.ratings.item_count(),
                        "warnings": warnings.len(),
                    }))
                    .warnings(warnings))
                })
                .with_pre(|s: &DiagnosisState<'_>| check_consent(s.submission)),
            )
            .step(
                PipelineStep::new(steps::DATA_RETRIEVAL, |s: &mut DiagnosisState<'_>| {
                    let classification = &s.submission.company.industry;
                    let insight = self.industry.lookup(classification).clone();
                    let mut outcome = StepOutcome::with_output(json!({
                        "industry": insight.code,
                        "fallback": !self.industry.is_known(classification),
                    }));
                    if !self.industry.is_known(classification) {
                        outcome.warnings.push(format!(
                            "industry '{}' not recognized; using '{}'",
                            classification, insight.code
                        ));
                    }
                    s.insight = Some(insight);
                    Ok(outcome)
                })
                .with_post(|s: &DiagnosisState<'_>| {
                    require(s.insight.is_some(), "industry insight")
                }),
            )
            .step(
                PipelineStep::new(steps::SCORE_CALCULATION, |s: &mut DiagnosisState<'_>| {
                    let scores = compute_scores(&s.submission.ratings);
                    let outcome = StepOutcome::with_output(json!({
                        "total": scores.total,
                        "percentage": scores.percentage,
                        "grade": scores.grade,
                        "maturity": scores.maturity,
                        "substitutions": scores.substitutions,
                    }));
                    s.scores = Some(scores);
                    Ok(outcome)
                })
                .with_post(|s: &DiagnosisState<'_>| check_scores(s.scores.as_ref())),
            )
            .step(
                PipelineStep::new(steps::REPORT_GENERATION, |s: &mut DiagnosisState<'_>| {
                    let (Some(scores), Some(insight)) = (&s.scores, &s.insight) else {
                        return Err(ValidationError::missing("scores").into());
                    };
                    let report = self.composer.compose(s.submission, scores, insight);
                    let outcome = StepOutcome::with_output(json!({
                        "sections": report.section_count(),
                        "words": report.word_count,
                        "bytes": report.byte_size,
                    }))
                    .warnings(report.warnings.clone());
                    s.report = Some(report);
                    Ok(outcome)
                })
                .with_pre(|s: &DiagnosisState<'_>| {
                    require(s.scores.is_some(), "scores")?;
                    require(s.insight.is_some(), "industry insight")
                })
                .with_post(|s: &DiagnosisState<'_>| check_report(s.report.as_ref())),
            )
            .step(
                PipelineStep::new(steps::QUALITY_CHECK, |s: &mut DiagnosisState<'_>| {
                    let (Some(scores), Some(insight), Some(report)) =
                        (&s.scores, &s.insight, &s.report)
                    else {
                        return Err(ValidationError::missing("report").into());
                    };
                    let context = AssessmentContext {
                        expected_sections: report.section_titles.clone(),
                        expected_facts: expected_facts(scores, insight),
                        company_name: s.submission.company.name.clone(),
                        industry_name: insight.name.clone(),
                    };
                    let metrics = self.assessor.assess(
                        &s.submission.summary_text(),
                        &report.body,
                        &context,
                        start.elapsed().as_millis() as u64,
                    );
                    let outcome = StepOutcome::with_output(json!({
                        "overall": metrics.overall,
                        "threshold": threshold,
                    }))
                    .quality(metrics.overall);
                    s.quality = Some(metrics);
                    Ok(outcome)
                })
                .with_pre(|s: &DiagnosisState<'_>| require(s.report.is_some(), "report"))
                .with_post(move |s: &DiagnosisState<'_>| {
                    check_quality_gate(s.quality.as_ref(), threshold)
                }),
            );

        let state = DiagnosisState {
            submission,
            insight: None,
            scores: None,
            report: None,
            quality: None,
        };
        let run = orchestrator.execute(state);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if !run.success {
            let error = run
                .error
                .unwrap_or_else(|| "diagnosis failed".to_string());
            let kind = run.failure_kind.unwrap_or(FailureKind::Unexpected);
            warn!("Diagnosis failed after {} steps: {}", run.completed_steps, error);
            let mut result = ProcessResult::failed(error, kind, elapsed_ms);
            result.steps = run.records;
            return result;
        }

        let DiagnosisState {
            insight,
            scores,
            report,
            quality,
            ..
        } = run.final_state;
        let (Some(insight), Some(scores), Some(report)) = (insight, scores, report) else {
            let err = DiagnosisError::step(steps::QUALITY_CHECK, "pipeline state incomplete");
            let mut result = ProcessResult::from_error(&err, elapsed_ms);
            result.steps = run.records;
            return result;
        };

        info!(
            "Diagnosis completed: {} ({}), {} sections in {}ms",
            scores.percentage_label(),
            scores.grade,
            report.section_count(),
            elapsed_ms
        );

        let metadata = ReportMetadata::describe(
            submission,
            &scores,
            &insight,
            &report,
            &self.settings.version,
        );
        ProcessResult {
            success: true,
            message: format!("Diagnosis completed for {}", submission.company.name),
            report: Some(report.body),
            metadata: Some(metadata),
            quality_metrics: quality,
            processing_time_ms: elapsed_ms,
            error: None,
            failure: None,
            steps: run.records,
        }
    }

    /// Ungated fast path: validate → score → compose
    #[instrument(skip_all, fields(company = %submission.company.name))]
    pub fn quick_diagnosis(&self, submission: &Submission) -> ProcessResult {
        let start = Instant::now();
        match guarded("quick-diagnosis", || self.quick_compose(submission)) {
            Ok((scores, insight, report)) => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                info!("Quick diagnosis completed in {}ms", elapsed_ms);
                let metadata = ReportMetadata::describe(
                    submission,
                    &scores,
                    &insight,
                    &report,
                    &self.settings.version,
                );
                ProcessResult {
                    success: true,
                    message: format!(
                        "Quick diagnosis completed for {} (quality gate skipped)",
                        submission.company.name
                    ),
                    report: Some(report.body),
                    metadata: Some(metadata),
                    quality_metrics: None,
                    processing_time_ms: elapsed_ms,
                    error: None,
                    failure: None,
                    steps: Vec::new(),
                }
            }
            Err(err) => {
                warn!("Quick diagnosis failed: {}", err);
                ProcessResult::from_error(&err, start.elapsed().as_millis() as u64)
            }
        }
    }

    fn quick_compose(
        &self,
        submission: &Submission,
    ) -> Result<(ScoringResult, IndustryInsight, ComposedReport)> {
        check_consent(submission)?;
        validate_submission(submission)?;
        let insight = self.industry.lookup(&submission.company.industry).clone();
        let scores = compute_scores(&submission.ratings);
        let report = self.composer.compose(submission, &scores, &insight);
        Ok((scores, insight, report))
    }
}

// =============================================================================
// Step Checks
// =============================================================================

/// Run an unorchestrated stage, turning a panic into a step error
pub(crate) fn guarded<T>(stage: &str, run: impl FnOnce() -> Result<T>) -> Result<T> {
    catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| {
        Err(DiagnosisError::StepPanicked {
            step: stage.to_string(),
            message: crate::types::panic_message(payload.as_ref()),
        })
    })
}

fn require(present: bool, what: &str) -> Result<()> {
    if present {
        Ok(())
    } else {
        Err(ValidationError::missing(what).into())
    }
}

fn check_scores(scores: Option<&ScoringResult>) -> Result<()> {
    let Some(scores) = scores else {
        return Err(ValidationError::missing("scores").into());
    };
    if !(0.0..=100.0).contains(&scores.percentage) {
        return Err(ValidationError::new(ValidationErrorKind::Range, "percentage out of range")
            .with_field("percentage")
            .with_comparison("0-100", format!("{:.1}", scores.percentage))
            .into());
    }
    let expected = Grade::from_percentage(scores.percentage);
    if scores.grade != expected {
        return Err(ValidationError::new(
            ValidationErrorKind::Consistency,
            "grade does not match percentage",
        )
        .with_field("grade")
        .with_comparison(expected.as_str(), scores.grade.as_str())
        .into());
    }
    Ok(())
}

fn check_report(report: Option<&ComposedReport>) -> Result<()> {
    match report {
        Some(report) if report.is_well_formed() => Ok(()),
        Some(report) => Err(ValidationError::new(
            ValidationErrorKind::Format,
            "generated report is not a well-formed document",
        )
        .with_field("report")
        .with_comparison(
            format!(">= {} bytes", crate::constants::pipeline::MIN_REPORT_BYTES),
            format!("{} bytes", report.byte_size),
        )
        .into()),
        None => Err(ValidationError::missing("report").into()),
    }
}

fn check_quality_gate(metrics: Option<&QualityMetrics>, threshold: f64) -> Result<()> {
    let Some(metrics) = metrics else {
        return Err(ValidationError::missing("quality metrics").into());
    };
    if metrics.passes(threshold) {
        Ok(())
    } else {
        Err(DiagnosisError::QualityGate {
            score: metrics.overall,
            threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::pipeline::TARGET_SECTION_COUNT;
    use crate::scoring::MaturityLevel;
    use crate::types::fixtures::{sample_submission, submission_with};

    fn controller() -> DiagnosisController {
        DiagnosisController::default()
    }

    #[test]
    fn test_mid_scale_unknown_industry_scenario() {
        let submission = submission_with("unknown-code", 3);
        let result = controller().process_complete_diagnosis(&submission, &Default::default());

        assert!(result.success, "{:?}", result.error);
        let metadata = result.metadata.unwrap();
        assert_eq!(metadata.percentage, 60.0);
        assert_eq!(metadata.grade, Grade::D);
        assert_eq!(metadata.maturity, MaturityLevel::Aware);
        assert_eq!(metadata.industry, "general");
        assert_eq!(metadata.section_count, TARGET_SECTION_COUNT);
        assert_eq!(metadata.total_score, 144);
        assert_eq!(metadata.submission_id, "session-001");
        assert_eq!(metadata.pipeline_version, "2.0");
        assert_eq!(result.steps.len(), 5);
        assert!(result.steps.iter().all(|r| r.valid));
        assert!(!result.steps[1].warnings.is_empty());
        assert!(result.quality_metrics.unwrap().overall >= 80.0);
        assert!(result.report.unwrap().contains("General Business"));
    }

    #[test]
    fn test_gate_rejection_carries_no_report() {
        let submission = sample_submission();
        let controller = controller();
        let baseline =
            controller.process_complete_diagnosis(&submission, &DiagnosisOptions::with_threshold(0.0));
        let overall = baseline.quality_metrics.unwrap().overall;

        let result = controller
            .process_complete_diagnosis(&submission, &DiagnosisOptions::with_threshold(overall + 1.0));

        assert!(!result.success);
        assert!(result.report.is_none());
        assert!(result.metadata.is_none());
        assert_eq!(result.failure, Some(FailureKind::QualityGate));
        assert!(result.is_retryable_with_relaxed_options());
        assert_eq!(result.steps.len(), 5);
        assert!(!result.steps[4].valid);
    }

    #[test]
    fn test_missing_consent_stops_before_any_step() {
        let mut submission = sample_submission();
        submission.consent = false;
        let result = controller().process_complete_diagnosis(&submission, &Default::default());

        assert!(!result.success);
        assert_eq!(result.failure, Some(FailureKind::Validation));
        assert_eq!(result.steps.len(), 1);
        assert!(result.steps[0].output.is_none());
        assert!(!result.is_retryable_with_relaxed_options());
    }

    #[test]
    fn test_missing_company_name_is_validation_failure() {
        let mut submission = sample_submission();
        submission.company.name = "  ".to_string();
        let result = controller().process_complete_diagnosis(&submission, &Default::default());

        assert!(!result.success);
        assert!(result.error.unwrap().contains("company.name"));
        assert_eq!(result.failure, Some(FailureKind::Validation));
    }

    #[test]
    fn test_out_of_range_ratings_warn_but_succeed() {
        let mut submission = sample_submission();
        submission.ratings.goal_clarity[0] = 9;
        submission.ratings.execution_capability.clear();

        let warnings = validate_submission(&submission).unwrap();
        assert_eq!(warnings.len(), 2);

        let result = controller().process_complete_diagnosis(&submission, &Default::default());
        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.steps[0].warnings.len(), 2);
    }

    #[test]
    fn test_quick_diagnosis_skips_gate() {
        let result = controller().quick_diagnosis(&sample_submission());
        assert!(result.success);
        assert!(result.quality_metrics.is_none());
        assert!(result.steps.is_empty());
        assert!(result.report.is_some());
    }

    #[test]
    fn test_quick_and_full_produce_same_body() {
        let controller = controller();
        let submission = sample_submission();
        let quick = controller.quick_diagnosis(&submission);
        let full = controller.process_complete_diagnosis(&submission, &Default::default());
        assert_eq!(quick.report, full.report);
        assert_eq!(
            quick.metadata.unwrap().checksum,
            full.metadata.unwrap().checksum
        );
    }

    #[test]
    fn test_quick_diagnosis_requires_consent() {
        let mut submission = sample_submission();
        submission.consent = false;
        let result = controller().quick_diagnosis(&submission);
        assert!(!result.success);
        assert!(result.report.is_none());
    }

    #[test]
    fn test_from_config_rejects_missing_default_code() {
        let mut config = Config::default();
        config.industry.default_code = "does-not-exist".to_string();
        assert!(matches!(
            DiagnosisController::from_config(&config),
            Err(DiagnosisError::IndustryTable(_))
        ));
    }

    #[test]
    fn test_quick_diagnosis_handles_very_long_category() {
        let mut submission = sample_submission();
        submission.ratings.goal_clarity = vec![5; 9_000_000];

        let result = controller().quick_diagnosis(&submission);
        assert!(result.success, "{:?}", result.error);
        let metadata = result.metadata.unwrap();
        assert_eq!(metadata.grade, Grade::A);
        assert_eq!(metadata.max_score, 45_000_000 + 5 * 8 * 5);
    }

    #[test]
    fn test_guarded_stage_turns_panic_into_error() {
        let result: Result<()> = guarded("quick-diagnosis", || panic!("scoring blew up"));
        match result {
            Err(DiagnosisError::StepPanicked { step, message }) => {
                assert_eq!(step, "quick-diagnosis");
                assert!(message.contains("scoring blew up"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
