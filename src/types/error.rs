//! Unified Error Type System
//!
//! Centralized error types for the diagnosis pipeline.
//! Every failure that reaches a caller is classified into a [`FailureKind`]
//! so that callers can decide whether a retry with relaxed options makes sense.
//!
//! ## Failure Kinds
//!
//! - **Validation**: structural problems with the submission (never retried)
//! - **QualityGate**: the report was produced but scored under the threshold
//! - **Unexpected**: a step failed or panicked
//! - **Branch**: one branch of a parallel run failed

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Failure Kinds
// =============================================================================

/// Classification of a failed run, carried on every unsuccessful result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Submission is structurally incomplete
    Validation,
    /// Report quality fell under the configured threshold
    QualityGate,
    /// A step returned an error or panicked
    Unexpected,
    /// A parallel branch failed
    Branch,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::QualityGate => write!(f, "QUALITY_GATE"),
            Self::Unexpected => write!(f, "UNEXPECTED"),
            Self::Branch => write!(f, "BRANCH"),
        }
    }
}

impl FailureKind {
    /// Only a quality-gate rejection can reasonably succeed on a retry with a
    /// lower threshold; structural and unexpected failures cannot.
    pub fn is_retryable_with_relaxed_options(&self) -> bool {
        matches!(self, Self::QualityGate)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// What validation failed
    pub kind: ValidationErrorKind,
    /// Field or component that failed validation
    pub field: Option<String>,
    /// Detailed message
    pub message: String,
    /// Expected value or format
    pub expected: Option<String>,
    /// Actual value received
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Validation failed for '{}': {}", field, self.message)
        } else {
            write!(f, "Validation failed: {}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// Create a new validation error
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add expected/actual values
    pub fn with_comparison(
        mut self,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    /// Shorthand for a missing required field
    pub fn missing(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            ValidationErrorKind::MissingField,
            format!("required field '{}' is missing or empty", field),
        )
        .with_field(field)
    }

    /// Create from simple message
    pub fn from_message(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::General, message)
    }

    /// Failure kind this validation error maps to when it aborts a run
    pub fn failure_kind(&self) -> FailureKind {
        FailureKind::Validation
    }
}

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Required field missing
    MissingField,
    /// Value out of range
    Range,
    /// Consent flag not given
    Consent,
    /// Invalid format
    Format,
    /// Consistency check failed (e.g. step output not well-formed)
    Consistency,
    /// General validation error
    General,
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DiagnosisError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    // -------------------------------------------------------------------------
    // Pipeline Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Validation(ValidationError),

    #[error("Quality gate rejected report: score {score:.1} below threshold {threshold:.1}")]
    QualityGate { score: f64, threshold: f64 },

    #[error("Step '{step}' failed: {message}")]
    Step { step: String, message: String },

    #[error("Step '{step}' panicked: {message}")]
    StepPanicked { step: String, message: String },

    #[error("Branch '{branch}' failed: {message}")]
    Branch { branch: String, message: String },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Legacy record adaptation failed: {0}")]
    Adaptation(String),

    #[error("Industry table error: {0}")]
    IndustryTable(String),
}

impl From<ValidationError> for DiagnosisError {
    fn from(err: ValidationError) -> Self {
        DiagnosisError::Validation(err)
    }
}

pub type Result<T> = std::result::Result<T, DiagnosisError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl DiagnosisError {
    /// Create a step error
    pub fn step(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Step {
            step: step.into(),
            message: message.into(),
        }
    }

    /// Create a branch error
    pub fn branch(branch: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Branch {
            branch: branch.into(),
            message: message.into(),
        }
    }

    /// Classify this error for the result record
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Validation(v) => v.failure_kind(),
            Self::QualityGate { .. } => FailureKind::QualityGate,
            Self::Branch { .. } => FailureKind::Branch,
            _ => FailureKind::Unexpected,
        }
    }
}

/// Render a panic payload as text
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::Validation.to_string(), "VALIDATION");
        assert_eq!(FailureKind::QualityGate.to_string(), "QUALITY_GATE");
        assert_eq!(FailureKind::Branch.to_string(), "BRANCH");
    }

    #[test]
    fn test_only_quality_gate_is_retryable() {
        assert!(FailureKind::QualityGate.is_retryable_with_relaxed_options());
        assert!(!FailureKind::Validation.is_retryable_with_relaxed_options());
        assert!(!FailureKind::Unexpected.is_retryable_with_relaxed_options());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::missing("company.name");
        assert_eq!(
            err.to_string(),
            "Validation failed for 'company.name': required field 'company.name' is missing or empty"
        );

        let plain = ValidationError::from_message("bad input");
        assert_eq!(plain.to_string(), "Validation failed: bad input");
    }

    #[test]
    fn test_error_classification() {
        let gate = DiagnosisError::QualityGate {
            score: 70.0,
            threshold: 80.0,
        };
        assert_eq!(gate.failure_kind(), FailureKind::QualityGate);

        let validation: DiagnosisError = ValidationError::missing("consent").into();
        assert_eq!(validation.failure_kind(), FailureKind::Validation);

        assert_eq!(
            DiagnosisError::step("score-calculation", "boom").failure_kind(),
            FailureKind::Unexpected
        );
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");

        let payload: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
