//! Diagnose Command
//!
//! Run the full (gated) or quick diagnosis on a submission file.
//!
//! Usage:
//!   aidiag diagnose <file> [--quick] [--threshold N] [--format markdown|json]
//!                          [--output PATH] [--timeout-secs N]

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::cli::ui::Output;
use crate::cli::util::{OutputFormat, build_controller, load_submission, write_output};
use crate::config::ConfigLoader;
use crate::diagnosis::DiagnosisOptions;
use crate::types::{DiagnosisError, ProcessResult, Result};

pub struct DiagnoseOptions {
    pub input: PathBuf,
    pub quick: bool,
    pub threshold: Option<f64>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Returns whether the diagnosis succeeded
pub async fn run(options: DiagnoseOptions) -> Result<bool> {
    let out = Output::new();
    let config = ConfigLoader::load()?;
    let controller = build_controller(&config)?;
    let submission = load_submission(&options.input)?;
    info!("Loaded submission for {}", submission.company.name);

    let diagnosis_options = DiagnosisOptions {
        quality_threshold: options.threshold,
    };
    let quick = options.quick;
    let task = tokio::task::spawn_blocking(move || {
        if quick {
            controller.quick_diagnosis(&submission)
        } else {
            controller.process_complete_diagnosis(&submission, &diagnosis_options)
        }
    });

    let joined = match options.timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), task)
            .await
            .map_err(|_| DiagnosisError::step("diagnosis", format!("timed out after {}s", secs)))?,
        None => task.await,
    };
    let result = joined.map_err(|e| DiagnosisError::step("diagnosis", e.to_string()))?;

    emit(&result, options.format, options.output.as_deref())?;
    out.result_summary(&result);
    Ok(result.success)
}

/// Write the report (markdown) or the whole result (json)
pub(crate) fn emit(
    result: &ProcessResult,
    format: OutputFormat,
    path: Option<&std::path::Path>,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_output(&serde_json::to_string_pretty(result)?, path),
        OutputFormat::Markdown => match markdown_document(result) {
            Some(document) => write_output(&document, path),
            None => Ok(()),
        },
    }
}

/// Report body followed by the quality assessment, when one was made
pub(crate) fn markdown_document(result: &ProcessResult) -> Option<String> {
    let body = result.report.as_ref()?;
    Some(match &result.quality_metrics {
        Some(metrics) => format!("{}\n---\n\n{}", body.trim_end(), metrics.to_markdown()),
        None => body.clone(),
    })
}
