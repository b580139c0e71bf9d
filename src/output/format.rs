//! Output formatting for multiple formats
//!
//! Formatters for JSON, YAML and human-readable text renderings of a
//! [`ProbeReport`].

use super::report::ProbeReport;
use crate::engine::Outcome;
use anyhow::{Context, Result};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-friendly, version-control friendly)
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Output formatter for probe reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &ProbeReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_json(report),
            OutputFormat::Yaml => self.format_yaml(report),
            OutputFormat::Human => Ok(self.format_human(report)),
        }
    }

    fn format_json(&self, report: &ProbeReport) -> Result<String> {
        serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
    }

    fn format_yaml(&self, report: &ProbeReport) -> Result<String> {
        serde_yaml::to_string(report).context("Failed to serialize report to YAML")
    }

    fn format_human(&self, report: &ProbeReport) -> String {
        let width = report
            .results
            .iter()
            .map(|r| r.id.as_str().len())
            .max()
            .unwrap_or(0);

        let mut out = format!("Probed at {}\n", report.probed_at.to_rfc3339());
        for record in &report.results {
            let (status, note) = match &record.outcome {
                Outcome::Succeeded { value } => (
                    if value.supported { "yes" } else { "no " },
                    value.detail.clone().unwrap_or_default(),
                ),
                Outcome::Failed { error } => ("err", error.clone()),
                Outcome::FailedByDependency { dependency } => {
                    ("err", format!("dependency {} did not succeed", dependency))
                }
            };
            out.push_str(&format!(
                "  {:width$}  {}  {}\n",
                record.id.as_str(),
                status,
                note,
                width = width
            ));
        }
        out
    }
}
