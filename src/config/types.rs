//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/aidiag/) and project (.aidiag/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{pipeline, quality, recommendation};
use crate::quality::QualityWeights;
use crate::types::{DiagnosisError, Result};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Diagnosis pipeline settings
    pub pipeline: PipelineConfig,

    /// Quality assessment settings
    pub quality: QualityConfig,

    /// Industry reference data settings
    pub industry: IndustryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            pipeline: PipelineConfig::default(),
            quality: QualityConfig::default(),
            industry: IndustryConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DiagnosisError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.pipeline.quality_threshold) {
            return Err(DiagnosisError::Config(format!(
                "pipeline.quality_threshold must be between 0 and 100, got {}",
                self.pipeline.quality_threshold
            )));
        }

        if self.pipeline.min_report_sections == 0 {
            return Err(DiagnosisError::Config(
                "pipeline.min_report_sections must be greater than 0".to_string(),
            ));
        }

        if self.quality.responsiveness_budget_ms == 0 {
            return Err(DiagnosisError::Config(
                "quality.responsiveness_budget_ms must be greater than 0".to_string(),
            ));
        }

        self.quality.weights.validate()?;

        if self.industry.default_code.trim().is_empty() {
            return Err(DiagnosisError::Config(
                "industry.default_code must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Pipeline Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Composite quality score a report must reach (0-100)
    pub quality_threshold: f64,

    /// Section count under which the composer logs a warning
    pub min_report_sections: usize,

    /// Version stamped into report metadata
    pub version: String,

    /// Run the legacy branch alongside the rich pipeline
    pub legacy_branch_enabled: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            quality_threshold: pipeline::DEFAULT_QUALITY_THRESHOLD,
            min_report_sections: pipeline::TARGET_SECTION_COUNT,
            version: pipeline::PIPELINE_VERSION.to_string(),
            legacy_branch_enabled: true,
        }
    }
}

// =============================================================================
// Quality Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Elapsed time at or under which responsiveness scores 100
    pub responsiveness_budget_ms: u64,

    /// Dimension weights for the composite score
    pub weights: QualityWeights,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            responsiveness_budget_ms: quality::DEFAULT_RESPONSIVENESS_BUDGET_MS,
            weights: QualityWeights::default(),
        }
    }
}

// =============================================================================
// Industry Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndustryConfig {
    /// Replacement industry table (TOML, YAML or JSON); built-in catalog when unset
    pub table_path: Option<PathBuf>,

    /// Entry used for unrecognized classifications
    pub default_code: String,
}

impl Default for IndustryConfig {
    fn default() -> Self {
        Self {
            table_path: None,
            default_code: recommendation::DEFAULT_INDUSTRY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pipeline.quality_threshold, 80.0);
        assert_eq!(config.pipeline.min_report_sections, 24);
        assert!(config.pipeline.legacy_branch_enabled);
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut config = Config::default();
        config.pipeline.quality_threshold = 120.0;
        assert!(matches!(config.validate(), Err(DiagnosisError::Config(_))));
    }

    #[test]
    fn test_zero_section_target_rejected() {
        let mut config = Config::default();
        config.pipeline.min_report_sections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = Config::default();
        config.quality.weights.accuracy = 0.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_toml_round_trip_keeps_sections() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(text.contains("[pipeline]"));
        assert!(text.contains("[quality.weights]"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
