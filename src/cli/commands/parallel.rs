//! Parallel Command
//!
//! Run the rich and legacy pipelines side by side and emit the preferred result.
//!
//! Usage:
//!   aidiag parallel <file> [--format markdown|json] [--output PATH]

use std::path::{Path, PathBuf};

use super::diagnose::markdown_document;
use crate::cli::ui::Output;
use crate::cli::util::{OutputFormat, build_controller, load_submission, write_output};
use crate::config::ConfigLoader;
use crate::diagnosis::{DiagnosisOptions, ParallelWorkflowCoordinator};
use crate::types::Result;

pub async fn run(input: &Path, format: OutputFormat, output: Option<PathBuf>) -> Result<bool> {
    let out = Output::new();
    let config = ConfigLoader::load()?;
    let controller = build_controller(&config)?;
    let submission = load_submission(input)?;

    let coordinator = ParallelWorkflowCoordinator::standard(controller, DiagnosisOptions::default());
    let result = coordinator.execute_parallel(submission).await;

    match format {
        OutputFormat::Json => {
            write_output(&serde_json::to_string_pretty(&result)?, output.as_deref())?
        }
        OutputFormat::Markdown => {
            if let Some(document) = markdown_document(result.preferred()) {
                write_output(&document, output.as_deref())?;
            }
        }
    }

    for warning in &result.warnings {
        out.warning(warning);
    }
    out.result_summary(result.preferred());
    out.info(&format!("Both branches settled in {}ms", result.total_time_ms));
    Ok(result.success)
}
