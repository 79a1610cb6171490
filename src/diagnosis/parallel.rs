//! Parallel Workflow Coordinator
//!
//! Runs the rich pipeline and the legacy pipeline concurrently and merges their
//! outcomes. Both branches always run to completion: an error, a failed result
//! or a panic in one branch is captured as that branch's failed result and
//! never cancels the other. The combined result succeeds when either branch
//! does.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;
use tracing::{debug, info, instrument, warn};

use super::{DiagnosisController, DiagnosisOptions, LegacyPipeline};
use crate::types::{
    DiagnosisError, FailureKind, ProcessResult, Result, Submission, panic_message,
};

// =============================================================================
// Delivery Pipelines
// =============================================================================

/// One independently executed branch of a parallel run
#[async_trait]
pub trait DeliveryPipeline: Send + Sync {
    /// Branch name for logging and warnings
    fn name(&self) -> &str;

    /// Produce a result for the submission.
    ///
    /// An `Err` and an unsuccessful `ProcessResult` are both treated as a
    /// failed branch by the coordinator.
    async fn deliver(&self, submission: &Submission) -> Result<ProcessResult>;
}

/// Full gated diagnosis
pub struct RichPipeline {
    controller: Arc<DiagnosisController>,
    options: DiagnosisOptions,
}

impl RichPipeline {
    pub fn new(controller: Arc<DiagnosisController>, options: DiagnosisOptions) -> Self {
        Self {
            controller,
            options,
        }
    }
}

#[async_trait]
impl DeliveryPipeline for RichPipeline {
    fn name(&self) -> &str {
        "rich"
    }

    async fn deliver(&self, submission: &Submission) -> Result<ProcessResult> {
        let controller = self.controller.clone();
        let options = self.options.clone();
        let submission = submission.clone();
        run_blocking(self.name(), move || {
            controller.process_complete_diagnosis(&submission, &options)
        })
        .await
    }
}

/// Short-form legacy report
pub struct SimplePipeline {
    pipeline: Arc<LegacyPipeline>,
}

impl SimplePipeline {
    pub fn new(pipeline: LegacyPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

#[async_trait]
impl DeliveryPipeline for SimplePipeline {
    fn name(&self) -> &str {
        "legacy"
    }

    async fn deliver(&self, submission: &Submission) -> Result<ProcessResult> {
        let pipeline = self.pipeline.clone();
        let submission = submission.clone();
        run_blocking(self.name(), move || pipeline.run(&submission)).await
    }
}

/// Run a synchronous pipeline on the blocking pool so branches do not share a worker
async fn run_blocking<F>(branch: &str, run: F) -> Result<ProcessResult>
where
    F: FnOnce() -> ProcessResult + Send + 'static,
{
    tokio::task::spawn_blocking(run).await.map_err(|join_err| {
        let message = if join_err.is_panic() {
            panic_message(join_err.into_panic().as_ref())
        } else {
            "task was cancelled".to_string()
        };
        DiagnosisError::StepPanicked {
            step: branch.to_string(),
            message,
        }
    })
}

// =============================================================================
// Result
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallelWorkflowResult {
    /// True when either branch succeeded
    pub success: bool,
    pub rich_result: ProcessResult,
    /// Absent when the legacy branch is disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_result: Option<ProcessResult>,
    pub total_time_ms: u64,
    /// Error messages of the failed branches
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ParallelWorkflowResult {
    /// Richer result when available, otherwise the legacy one
    pub fn preferred(&self) -> &ProcessResult {
        if self.rich_result.success {
            return &self.rich_result;
        }
        match &self.legacy_result {
            Some(legacy) if legacy.success => legacy,
            _ => &self.rich_result,
        }
    }
}

// =============================================================================
// Coordinator
// =============================================================================

pub struct ParallelWorkflowCoordinator {
    rich: Arc<dyn DeliveryPipeline>,
    legacy: Option<Arc<dyn DeliveryPipeline>>,
}

impl ParallelWorkflowCoordinator {
    pub fn new(rich: Arc<dyn DeliveryPipeline>, legacy: Option<Arc<dyn DeliveryPipeline>>) -> Self {
        Self { rich, legacy }
    }

    /// Coordinator over the standard rich and legacy pipelines
    pub fn standard(controller: Arc<DiagnosisController>, options: DiagnosisOptions) -> Self {
        let legacy: Option<Arc<dyn DeliveryPipeline>> =
            controller.settings().legacy_branch_enabled.then(|| {
                Arc::new(SimplePipeline::new(LegacyPipeline::new(
                    controller.industry().clone(),
                ))) as Arc<dyn DeliveryPipeline>
            });
        let rich: Arc<dyn DeliveryPipeline> = Arc::new(RichPipeline::new(controller, options));
        Self::new(rich, legacy)
    }

    /// Run both branches and wait for both, whatever either of them does
    #[instrument(skip_all, fields(company = %submission.company.name))]
    pub async fn execute_parallel(&self, submission: Submission) -> ParallelWorkflowResult {
        let start = Instant::now();
        let submission = Arc::new(submission);
        info!(
            "Starting parallel delivery ({} branches)",
            if self.legacy.is_some() { 2 } else { 1 }
        );

        let rich_handle = spawn_branch(self.rich.clone(), submission.clone());
        let legacy_handle = self
            .legacy
            .as_ref()
            .map(|pipeline| spawn_branch(pipeline.clone(), submission.clone()));

        let (rich_joined, legacy_joined) = tokio::join!(rich_handle, async {
            match legacy_handle {
                Some(handle) => Some(handle.await),
                None => None,
            }
        });

        let mut warnings = Vec::new();
        let rich_result = settle(self.rich.name(), rich_joined, &mut warnings);
        let legacy_result = match (&self.legacy, legacy_joined) {
            (Some(pipeline), Some(joined)) => Some(settle(pipeline.name(), joined, &mut warnings)),
            _ => None,
        };

        let success =
            rich_result.success || legacy_result.as_ref().is_some_and(|r| r.success);
        let total_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Parallel delivery finished in {}ms (success: {}, warnings: {})",
            total_time_ms,
            success,
            warnings.len()
        );

        ParallelWorkflowResult {
            success,
            rich_result,
            legacy_result,
            total_time_ms,
            warnings,
        }
    }
}

type BranchHandle = tokio::task::JoinHandle<(Result<ProcessResult>, u64)>;

fn spawn_branch(pipeline: Arc<dyn DeliveryPipeline>, submission: Arc<Submission>) -> BranchHandle {
    tokio::spawn(async move {
        let start = Instant::now();
        let outcome = pipeline.deliver(&submission).await;
        (outcome, start.elapsed().as_millis() as u64)
    })
}

/// Turn whatever a branch produced into a result value, recording failures
fn settle(
    branch: &str,
    joined: std::result::Result<(Result<ProcessResult>, u64), JoinError>,
    warnings: &mut Vec<String>,
) -> ProcessResult {
    let result = match joined {
        Ok((Ok(result), _)) => result,
        Ok((Err(err), elapsed_ms)) => {
            let err = DiagnosisError::branch(branch, err.to_string());
            ProcessResult::failed(err.to_string(), FailureKind::Branch, elapsed_ms)
        }
        Err(join_err) => {
            let message = if join_err.is_panic() {
                format!("panicked: {}", panic_message(join_err.into_panic().as_ref()))
            } else {
                "task was cancelled".to_string()
            };
            let err = DiagnosisError::branch(branch, message);
            ProcessResult::failed(err.to_string(), FailureKind::Branch, 0)
        }
    };

    if result.success {
        debug!("Branch '{}' succeeded", branch);
    } else {
        let error = result.error.as_deref().unwrap_or("unknown error");
        warn!("Branch '{}' failed: {}", branch, error);
        warnings.push(format!("{} branch failed: {}", branch, error));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::sample_submission;

    struct Failing;

    #[async_trait]
    impl DeliveryPipeline for Failing {
        fn name(&self) -> &str {
            "rich"
        }

        async fn deliver(&self, _submission: &Submission) -> Result<ProcessResult> {
            Err(DiagnosisError::step("industry-lookup", "table unavailable"))
        }
    }

    struct Panicking;

    #[async_trait]
    impl DeliveryPipeline for Panicking {
        fn name(&self) -> &str {
            "rich"
        }

        async fn deliver(&self, _submission: &Submission) -> Result<ProcessResult> {
            panic!("rich pipeline exploded")
        }
    }

    #[tokio::test]
    async fn test_blocking_work_leaves_the_async_thread() {
        let caller = std::thread::current().id();
        let result = run_blocking("rich", move || {
            assert_ne!(std::thread::current().id(), caller);
            ProcessResult::failed("checked", FailureKind::Unexpected, 0)
        })
        .await
        .unwrap();
        assert_eq!(result.error.as_deref(), Some("checked"));
    }

    #[tokio::test]
    async fn test_blocking_panic_becomes_error() {
        let err = run_blocking("legacy", || panic!("legacy renderer exploded"))
            .await
            .unwrap_err();
        assert!(matches!(err, DiagnosisError::StepPanicked { ref step, .. } if step == "legacy"));
        assert!(err.to_string().contains("legacy renderer exploded"));
    }

    fn legacy() -> Arc<dyn DeliveryPipeline> {
        Arc::new(SimplePipeline::new(LegacyPipeline::new(
            crate::industry::IndustryAnalysisEngine::builtin(),
        )))
    }

    #[tokio::test]
    async fn test_both_branches_succeed() {
        let coordinator = ParallelWorkflowCoordinator::standard(
            Arc::new(DiagnosisController::default()),
            DiagnosisOptions::default(),
        );
        let result = coordinator.execute_parallel(sample_submission()).await;

        assert!(result.success);
        assert!(result.warnings.is_empty());
        assert!(result.rich_result.success);
        assert!(result.legacy_result.as_ref().unwrap().success);
        assert_eq!(result.preferred(), &result.rich_result);
    }

    #[tokio::test]
    async fn test_rich_error_is_tolerated() {
        let coordinator = ParallelWorkflowCoordinator::new(Arc::new(Failing), Some(legacy()));
        let result = coordinator.execute_parallel(sample_submission()).await;

        assert!(result.success);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("table unavailable"));
        assert_eq!(result.rich_result.failure, Some(FailureKind::Branch));
        assert!(result.preferred().success);
        assert_eq!(
            result.preferred().metadata.as_ref().unwrap().pipeline_version,
            "1.0-simple"
        );
    }

    #[tokio::test]
    async fn test_rich_panic_is_tolerated() {
        let coordinator = ParallelWorkflowCoordinator::new(Arc::new(Panicking), Some(legacy()));
        let result = coordinator.execute_parallel(sample_submission()).await;

        assert!(result.success);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("rich pipeline exploded"));
        assert!(result.legacy_result.unwrap().success);
    }

    #[tokio::test]
    async fn test_gate_rejection_falls_back_to_legacy() {
        let coordinator = ParallelWorkflowCoordinator::standard(
            Arc::new(DiagnosisController::default()),
            DiagnosisOptions::with_threshold(101.0),
        );
        let result = coordinator.execute_parallel(sample_submission()).await;

        assert!(result.success);
        assert!(!result.rich_result.success);
        assert_eq!(result.rich_result.failure, Some(FailureKind::QualityGate));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.preferred().report.is_some());
    }

    #[tokio::test]
    async fn test_both_branches_fail() {
        let mut submission = sample_submission();
        submission.consent = false;
        let coordinator = ParallelWorkflowCoordinator::standard(
            Arc::new(DiagnosisController::default()),
            DiagnosisOptions::default(),
        );
        let result = coordinator.execute_parallel(submission).await;

        assert!(!result.success);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.preferred().report.is_none());
    }

    #[tokio::test]
    async fn test_disabled_legacy_branch() {
        let coordinator = ParallelWorkflowCoordinator::new(Arc::new(Failing), None);
        let result = coordinator.execute_parallel(sample_submission()).await;

        assert!(!result.success);
        assert!(result.legacy_result.is_none());
        assert_eq!(result.warnings.len(), 1);
    }
}
