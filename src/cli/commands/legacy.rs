//! Legacy Command
//!
//! Process a historic submission record through the compatibility bridge.
//! A document is always written; the exit status reflects whether the full
//! pipeline or the fallback produced it.
//!
//! Usage:
//!   aidiag legacy <file> [--format markdown|json] [--output PATH]

use std::path::{Path, PathBuf};

use super::diagnose::emit;
use crate::cli::ui::Output;
use crate::cli::util::{OutputFormat, build_controller, load_record};
use crate::config::ConfigLoader;
use crate::diagnosis::{CompatibilityBridge, DiagnosisOptions};
use crate::types::Result;

pub fn run(input: &Path, format: OutputFormat, output: Option<PathBuf>) -> Result<bool> {
    let out = Output::new();
    let config = ConfigLoader::load()?;
    let bridge = CompatibilityBridge::new(build_controller(&config)?, DiagnosisOptions::default());

    let record = load_record(input)?;
    let result = bridge.process(&record);

    emit(&result, format, output.as_deref())?;
    out.result_summary(&result);
    if !result.success {
        out.warning("Fallback summary written instead of the full report");
    }
    Ok(result.success)
}
