//! CLI Common Utilities
//!
//! Input loading, controller construction and output writing shared by the
//! command handlers.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::diagnosis::DiagnosisController;
use crate::types::{DiagnosisError, Result, Submission};

/// Output format of the report commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Report body only
    #[default]
    Markdown,
    /// Full result as JSON
    Json,
}

/// Output format of the listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DisplayFormat {
    /// Styled text for the terminal
    #[default]
    Text,
    /// JSON
    Json,
}

/// Parse a JSON or YAML file, chosen by extension
fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    debug!("Loading {} ({:?})", path.display(), extension);

    match extension.as_deref() {
        Some("yaml" | "yml") => Ok(serde_yaml::from_str(&content)?),
        Some("json") | None => Ok(serde_json::from_str(&content)?),
        Some(other) => Err(DiagnosisError::Config(format!(
            "unsupported input extension '.{}' (expected .json, .yaml or .yml)",
            other
        ))),
    }
}

/// Load a submission file
pub fn load_submission(path: &Path) -> Result<Submission> {
    load_document(path)
}

/// Load a legacy record as a raw JSON value
pub fn load_record(path: &Path) -> Result<serde_json::Value> {
    load_document(path)
}

/// Controller with the configured industry table
pub fn build_controller(config: &Config) -> Result<Arc<DiagnosisController>> {
    DiagnosisController::from_config(config).map(Arc::new)
}

/// Write to a file, or to stdout when no path is given
pub fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        None => println!("{}", content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::sample_submission;
    use tempfile::TempDir;

    #[test]
    fn test_load_submission_json_and_yaml() {
        let dir = TempDir::new().unwrap();
        let submission = sample_submission();

        let json_path = dir.path().join("submission.json");
        std::fs::write(&json_path, serde_json::to_string(&submission).unwrap()).unwrap();
        assert_eq!(load_submission(&json_path).unwrap(), submission);

        let yaml_path = dir.path().join("submission.YML");
        std::fs::write(&yaml_path, serde_yaml::to_string(&submission).unwrap()).unwrap();
        assert_eq!(load_submission(&yaml_path).unwrap(), submission);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("submission.csv");
        std::fs::write(&path, "a,b").unwrap();
        assert!(matches!(
            load_submission(&path),
            Err(DiagnosisError::Config(_))
        ));
    }

    #[test]
    fn test_display_format_rejects_unknown_values() {
        use clap::ValueEnum;
        assert_eq!(DisplayFormat::from_str("json", true), Ok(DisplayFormat::Json));
        assert_eq!(DisplayFormat::from_str("TEXT", true), Ok(DisplayFormat::Text));
        assert!(DisplayFormat::from_str("xml", true).is_err());
        assert!(OutputFormat::from_str("yaml", true).is_err());
    }

    #[test]
    fn test_write_output_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/report.md");
        write_output("# Report", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Report");
    }
}
