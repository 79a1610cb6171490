//! Step Orchestrator
//!
//! Generic engine that runs an ordered set of named steps over a working state.
//! Each step may carry a pre-condition and a post-condition check. The run
//! aborts on the first failure (check failure, step error or panic) and reports
//! how many steps completed before it.
//!
//! ## State Machine
//!
//! ```text
//! Idle → Running(0) → Running(1) → … → Succeeded
//!           │            │
//!           └────────────┴──→ Failed
//! ```
//!
//! The orchestrator owns no business logic; the diagnosis controller builds the
//! full and quick step sets on top of it.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::types::{DiagnosisError, FailureKind, Result, panic_message};

/// Pre- or post-condition check over the working state
pub type StepCheck<'a, S> = Box<dyn Fn(&S) -> Result<()> + 'a>;

/// Step body; mutates the working state and reports what it produced
pub type StepFn<'a, S> = Box<dyn FnMut(&mut S) -> Result<StepOutcome> + 'a>;

// =============================================================================
// Step Definition
// =============================================================================

/// What a successful step reports back for the audit trail
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    pub quality_score: Option<f64>,
    pub warnings: Vec<String>,
    pub output: Option<serde_json::Value>,
}

impl StepOutcome {
    pub fn with_output(output: serde_json::Value) -> Self {
        Self {
            output: Some(output),
            ..Default::default()
        }
    }

    pub fn quality(mut self, score: f64) -> Self {
        self.quality_score = Some(score);
        self
    }

    pub fn warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

pub struct PipelineStep<'a, S> {
    name: String,
    pre: Option<StepCheck<'a, S>>,
    run: StepFn<'a, S>,
    post: Option<StepCheck<'a, S>>,
}

impl<'a, S> PipelineStep<'a, S> {
    pub fn new(
        name: impl Into<String>,
        run: impl FnMut(&mut S) -> Result<StepOutcome> + 'a,
    ) -> Self {
        Self {
            name: name.into(),
            pre: None,
            run: Box::new(run),
            post: None,
        }
    }

    pub fn with_pre(mut self, check: impl Fn(&S) -> Result<()> + 'a) -> Self {
        self.pre = Some(Box::new(check));
        self
    }

    pub fn with_post(mut self, check: impl Fn(&S) -> Result<()> + 'a) -> Self {
        self.post = Some(Box::new(check));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Run Records
// =============================================================================

/// Audit record for one executed step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepValidationRecord {
    pub step_name: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Share of the run completed once this step finished (0-100)
    pub completion_pct: f64,
    pub ready_for_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    pub elapsed_ms: u64,
}

impl StepValidationRecord {
    fn begin(step_name: &str) -> Self {
        Self {
            step_name: step_name.to_string(),
            valid: false,
            error: None,
            completion_pct: 0.0,
            ready_for_next: false,
            quality_score: None,
            warnings: Vec::new(),
            output: None,
            elapsed_ms: 0,
        }
    }
}

/// Outcome of one orchestrated run
#[derive(Debug)]
pub struct ExecutionReport<S> {
    pub success: bool,
    pub completed_steps: usize,
    pub total_steps: usize,
    pub records: Vec<StepValidationRecord>,
    pub final_state: S,
    /// Mean of the step quality scores, on success
    pub quality_score: Option<f64>,
    pub error: Option<String>,
    pub failure_kind: Option<FailureKind>,
    pub elapsed_ms: u64,
}

// =============================================================================
// Orchestrator
// =============================================================================

pub struct StepOrchestrator<'a, S> {
    name: String,
    steps: Vec<PipelineStep<'a, S>>,
}

impl<'a, S> StepOrchestrator<'a, S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: PipelineStep<'a, S>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order, stopping at the first failure
    pub fn execute(self, mut state: S) -> ExecutionReport<S> {
        let start = Instant::now();
        let total = self.steps.len();
        let mut records = Vec::with_capacity(total);
        let mut failure: Option<DiagnosisError> = None;

        info!("[{}] Starting run with {} steps", self.name, total);

        for (index, mut step) in self.steps.into_iter().enumerate() {
            let step_start = Instant::now();
            let mut record = StepValidationRecord::begin(&step.name);
            debug!("[{}] Step {}/{}: {}", self.name, index + 1, total, step.name);

            let result = run_step(&mut step, &mut state);
            record.elapsed_ms = step_start.elapsed().as_millis() as u64;

            match result {
                Ok(outcome) => {
                    record.valid = true;
                    record.ready_for_next = index + 1 < total;
                    record.completion_pct = (index + 1) as f64 / total as f64 * 100.0;
                    record.quality_score = outcome.quality_score;
                    record.warnings = outcome.warnings;
                    record.output = outcome.output;
                    records.push(record);
                }
                Err(err) => {
                    warn!("[{}] Step '{}' failed: {}", self.name, step.name, err);
                    record.error = Some(err.to_string());
                    record.completion_pct = index as f64 / total as f64 * 100.0;
                    records.push(record);
                    failure = Some(err);
                    break;
                }
            }
        }

        let completed_steps = records.iter().filter(|r| r.valid).count();
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match failure {
            Some(err) => ExecutionReport {
                success: false,
                completed_steps,
                total_steps: total,
                records,
                final_state: state,
                quality_score: None,
                error: Some(err.to_string()),
                failure_kind: Some(err.failure_kind()),
                elapsed_ms,
            },
            None => {
                let scores: Vec<f64> = records.iter().filter_map(|r| r.quality_score).collect();
                let quality_score =
                    (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64);
                info!(
                    "[{}] Completed {} steps in {}ms",
                    self.name, completed_steps, elapsed_ms
                );
                ExecutionReport {
                    success: true,
                    completed_steps,
                    total_steps: total,
                    records,
                    final_state: state,
                    quality_score,
                    error: None,
                    failure_kind: None,
                    elapsed_ms,
                }
            }
        }
    }
}

/// Pre-check, body and post-check of one step, with panics converted to errors
fn run_step<S>(step: &mut PipelineStep<'_, S>, state: &mut S) -> Result<StepOutcome> {
    let name = step.name.clone();
    let guarded = catch_unwind(AssertUnwindSafe(|| -> Result<StepOutcome> {
        if let Some(pre) = &step.pre {
            pre(state)?;
        }
        let outcome = (step.run)(state)?;
        if let Some(post) = &step.post {
            post(state)?;
        }
        Ok(outcome)
    }));

    match guarded {
        Ok(result) => result,
        Err(payload) => Err(DiagnosisError::StepPanicked {
            step: name,
            message: panic_message(payload.as_ref()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidationError;
    use std::cell::RefCell;

    fn spy_step<'a>(
        name: &'static str,
        calls: &'a RefCell<Vec<&'static str>>,
        fail: bool,
    ) -> PipelineStep<'a, u32> {
        PipelineStep::new(name, move |state: &mut u32| {
            calls.borrow_mut().push(name);
            *state += 1;
            if fail {
                Err(ValidationError::from_message(format!("{} rejected", name)).into())
            } else {
                Ok(StepOutcome::default())
            }
        })
    }

    #[test]
    fn test_all_steps_succeed() {
        let calls = RefCell::new(Vec::new());
        let report = StepOrchestrator::new("test")
            .step(spy_step("a", &calls, false))
            .step(spy_step("b", &calls, false))
            .execute(0);

        assert!(report.success);
        assert_eq!(report.completed_steps, 2);
        assert_eq!(report.final_state, 2);
        assert_eq!(report.records[1].completion_pct, 100.0);
        assert!(report.records[0].ready_for_next);
        assert!(!report.records[1].ready_for_next);
        assert_eq!(*calls.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_abort_on_third_of_five() {
        let calls = RefCell::new(Vec::new());
        let report = StepOrchestrator::new("test")
            .step(spy_step("one", &calls, false))
            .step(spy_step("two", &calls, false))
            .step(spy_step("three", &calls, true))
            .step(spy_step("four", &calls, false))
            .step(spy_step("five", &calls, false))
            .execute(0);

        assert!(!report.success);
        assert_eq!(report.completed_steps, 2);
        assert_eq!(report.total_steps, 5);
        assert_eq!(*calls.borrow(), vec!["one", "two", "three"]);
        assert_eq!(report.final_state, 3);
        assert_eq!(report.records.len(), 3);
        assert!(!report.records[2].valid);
        assert!(report.error.as_deref().unwrap().contains("three rejected"));
        assert_eq!(report.failure_kind, Some(FailureKind::Validation));
    }

    #[test]
    fn test_pre_check_fails_before_body_runs() {
        let calls = RefCell::new(Vec::new());
        let report = StepOrchestrator::new("test")
            .step(spy_step("guarded", &calls, false).with_pre(|_: &u32| {
                Err(ValidationError::missing("company.name").into())
            }))
            .execute(0);

        assert!(!report.success);
        assert_eq!(report.completed_steps, 0);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_post_check_can_reject_quality() {
        let report = StepOrchestrator::new("test")
            .step(
                PipelineStep::new("quality-check", |_: &mut u32| {
                    Ok(StepOutcome::default().quality(42.0))
                })
                .with_post(|_: &u32| {
                    Err(DiagnosisError::QualityGate {
                        score: 42.0,
                        threshold: 80.0,
                    })
                }),
            )
            .execute(0);

        assert!(!report.success);
        assert_eq!(report.failure_kind, Some(FailureKind::QualityGate));
    }

    #[test]
    fn test_panicking_step_becomes_failure() {
        let report = StepOrchestrator::new("test")
            .step(PipelineStep::new("boom", |_: &mut u32| -> Result<StepOutcome> {
                panic!("exploded")
            }))
            .execute(0);

        assert!(!report.success);
        assert_eq!(report.failure_kind, Some(FailureKind::Unexpected));
        assert!(report.error.as_deref().unwrap().contains("exploded"));
    }

    #[test]
    fn test_quality_score_is_mean_of_steps() {
        let report = StepOrchestrator::new("test")
            .step(PipelineStep::new("a", |_: &mut u32| {
                Ok(StepOutcome::default().quality(80.0))
            }))
            .step(PipelineStep::new("b", |_: &mut u32| Ok(StepOutcome::default())))
            .step(PipelineStep::new("c", |_: &mut u32| {
                Ok(StepOutcome::default().quality(100.0))
            }))
            .execute(0);

        assert_eq!(report.quality_score, Some(90.0));
    }

    #[test]
    fn test_empty_run_succeeds() {
        let report = StepOrchestrator::<u32>::new("empty").execute(7);
        assert!(report.success);
        assert_eq!(report.total_steps, 0);
        assert_eq!(report.quality_score, None);
        assert_eq!(report.final_state, 7);
    }
}
