//! Process Result
//!
//! The externally visible outcome of one diagnosis run. This is the only value
//! handed to the storage/notification collaborator, so it is `Serialize` and
//! carries no borrowed data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::error::{DiagnosisError, FailureKind};
use super::submission::Submission;
use crate::industry::IndustryInsight;
use crate::pipeline::StepValidationRecord;
use crate::quality::QualityMetrics;
use crate::report::ComposedReport;
use crate::scoring::{Grade, MaturityLevel, ScoringResult};

/// Descriptive record handed over alongside a report body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub submission_id: String,
    pub company_name: String,
    /// Resolved industry code (the default entry for unknown classifications)
    pub industry: String,
    pub total_score: u64,
    pub max_score: u64,
    pub percentage: f64,
    pub grade: Grade,
    pub maturity: MaturityLevel,
    pub generated_at: DateTime<Utc>,
    pub byte_size: usize,
    pub section_count: usize,
    pub pipeline_version: String,
    /// SHA-256 of the report body, hex encoded
    pub checksum: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ReportMetadata {
    pub fn describe(
        submission: &Submission,
        scores: &ScoringResult,
        insight: &IndustryInsight,
        report: &ComposedReport,
        pipeline_version: &str,
    ) -> Self {
        Self {
            submission_id: submission_id(submission),
            company_name: submission.company.name.clone(),
            industry: insight.code.clone(),
            total_score: scores.total,
            max_score: scores.max_possible,
            percentage: scores.percentage,
            grade: scores.grade,
            maturity: scores.maturity,
            generated_at: Utc::now(),
            byte_size: report.byte_size,
            section_count: report.section_count(),
            pipeline_version: pipeline_version.to_string(),
            checksum: checksum(&report.body),
            warnings: report.warnings.clone(),
        }
    }
}

/// Session id from the submission, or a fresh UUID
pub fn submission_id(submission: &Submission) -> String {
    submission
        .session_id()
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub fn checksum(body: &str) -> String {
    format!("{:x}", Sha256::digest(body.as_bytes()))
}

/// Outcome of one diagnosis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ReportMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_metrics: Option<QualityMetrics>,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Audit trail of the orchestrated steps (empty for quick runs)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepValidationRecord>,
}

impl ProcessResult {
    /// Failed result; never carries a report body
    pub fn failed(error: impl Into<String>, kind: FailureKind, processing_time_ms: u64) -> Self {
        let error = error.into();
        Self {
            success: false,
            message: format!("Diagnosis failed: {}", error),
            report: None,
            metadata: None,
            quality_metrics: None,
            processing_time_ms,
            error: Some(error),
            failure: Some(kind),
            steps: Vec::new(),
        }
    }

    pub fn from_error(err: &DiagnosisError, processing_time_ms: u64) -> Self {
        Self::failed(err.to_string(), err.failure_kind(), processing_time_ms)
    }

    pub fn is_retryable_with_relaxed_options(&self) -> bool {
        self.failure
            .is_some_and(|kind| kind.is_retryable_with_relaxed_options())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::submission::fixtures::sample_submission;

    #[test]
    fn test_failed_result_has_no_report() {
        let err = DiagnosisError::QualityGate {
            score: 71.0,
            threshold: 80.0,
        };
        let result = ProcessResult::from_error(&err, 12);
        assert!(!result.success);
        assert!(result.report.is_none());
        assert_eq!(result.failure, Some(FailureKind::QualityGate));
        assert!(result.is_retryable_with_relaxed_options());
    }

    #[test]
    fn test_submission_id_prefers_session() {
        let mut submission = sample_submission();
        assert_eq!(submission_id(&submission), "session-001");

        submission.metadata.session_id = None;
        let generated = submission_id(&submission);
        assert!(Uuid::parse_str(&generated).is_ok());
    }

    #[test]
    fn test_checksum_is_stable_hex() {
        let a = checksum("report body");
        assert_eq!(a.len(), 64);
        assert_eq!(a, checksum("report body"));
        assert_ne!(a, checksum("report body."));
    }

    #[test]
    fn test_serializes_camel_case_and_skips_empty() {
        let result = ProcessResult::failed("missing company.name", FailureKind::Validation, 3);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["processingTimeMs"], 3);
        assert_eq!(json["failure"], "validation");
        assert!(json.get("report").is_none());
        assert!(json.get("steps").is_none());
    }
}
