//! aidiag - AI-Capability Diagnosis Pipeline
//!
//! Turns a company's self-assessment into a scored, benchmarked and
//! quality-gated Markdown diagnosis report.
//!
//! ## Core Features
//!
//! - **Scoring**: six capability categories, letter grade and maturity tier
//! - **Industry Analysis**: benchmark catalog with banded recommendations
//! - **Step Orchestration**: named steps with pre/post checks and an audit trail
//! - **Quality Gate**: eight-dimension heuristic assessment of the report
//! - **Parallel Delivery**: rich and legacy pipelines with settle-all semantics
//! - **Compatibility Bridge**: historic records adapted with a guaranteed fallback
//!
//! ## Quick Start
//!
//! ```ignore
//! use aidiag::{DiagnosisController, DiagnosisOptions};
//!
//! let controller = DiagnosisController::default();
//! let result = controller.process_complete_diagnosis(&submission, &DiagnosisOptions::default());
//! if result.success {
//!     println!("{}", result.report.unwrap_or_default());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`scoring`]: rating normalization, grade and maturity bands
//! - [`industry`]: industry table, lookup and recommendations
//! - [`pipeline`]: generic step orchestrator
//! - [`quality`]: report quality assessment
//! - [`report`]: 24-section report composer
//! - [`diagnosis`]: controller, legacy pipeline, parallel coordinator, bridge
//! - [`config`]: layered configuration

pub mod cli;
pub mod config;
pub mod constants;
pub mod diagnosis;
pub mod industry;
pub mod pipeline;
pub mod quality;
pub mod report;
pub mod scoring;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, IndustryConfig, PipelineConfig, QualityConfig};

// Error Types
pub use types::{DiagnosisError, FailureKind, Result, ValidationError, ValidationErrorKind};

// Data Model
pub use types::{
    Category, CategoryRatings, CompanyProfile, ProcessResult, ReportMetadata, Submission,
};

// =============================================================================
// Engine Re-exports
// =============================================================================

pub use industry::{IndustryAnalysisEngine, IndustryInsight, IndustryTable, Recommendation};
pub use pipeline::{ExecutionReport, PipelineStep, StepOrchestrator, StepValidationRecord};
pub use quality::{QualityAssessor, QualityMetrics};
pub use report::{ComposedReport, ReportComposer};
pub use scoring::{Grade, MaturityLevel, ScoringResult, compute_scores};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use diagnosis::{
    CompatibilityBridge, DiagnosisController, DiagnosisOptions, LegacyPipeline, LegacyRecord,
    ParallelWorkflowCoordinator, ParallelWorkflowResult,
};
