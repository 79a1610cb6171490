use console::style;

use crate::types::ProcessResult;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        eprintln!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        eprintln!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {:<14} {}", style(label).dim(), value);
    }

    /// One-screen status of a pipeline result, on stderr so stdout stays the report
    pub fn result_summary(&self, result: &ProcessResult) {
        if result.success {
            self.success(&result.message);
        } else {
            self.error(result.error.as_deref().unwrap_or(&result.message));
            if result.is_retryable_with_relaxed_options() {
                self.info("Retry with a lower --threshold or with --quick");
            }
        }

        if let Some(metadata) = &result.metadata {
            eprintln!(
                "  {} {} | {:.1}% | Grade {} | {} | {} sections",
                style("→").dim(),
                metadata.company_name,
                metadata.percentage,
                metadata.grade,
                metadata.maturity.title(),
                metadata.section_count
            );
            for warning in &metadata.warnings {
                self.warning(warning);
            }
        }
        if let Some(metrics) = &result.quality_metrics {
            eprintln!("  {} {}", style("→").dim(), metrics.summary());
        }
        for record in result.steps.iter().filter(|r| !r.valid) {
            eprintln!(
                "  {} step '{}': {}",
                style("✗").red(),
                record.step_name,
                record.error.as_deref().unwrap_or("failed")
            );
        }
        eprintln!(
            "  {} {}ms",
            style("⏱").dim(),
            result.processing_time_ms
        );
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
