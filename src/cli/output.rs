//! Output formatting for multiple formats
//!
//! Formatters for JSON, YAML, and human-readable text. Reports print to
//! stdout; everything diagnostic goes through `tracing` to stderr, so the
//! machine-readable formats stay pipeable.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::codegen::{GenerationReport, StaleReason, Staleness};

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

/// Tool diagnostics produced by the `doctor` command
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    /// Name the tool was requested as
    pub tool: String,

    /// Whether the name came from the ION_CLI override
    pub from_env: bool,

    /// Resolved executable path, when found
    pub path: Option<String>,

    /// Reported tool version, when it could be parsed
    pub version: Option<String>,

    /// Resolution or probing failure, when any
    pub error: Option<String>,
}

impl DoctorReport {
    pub fn is_healthy(&self) -> bool {
        self.path.is_some() && self.error.is_none()
    }
}

/// Staleness result in a serializable shape
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub fresh: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<StaleReason>,
}

impl From<&Staleness> for CheckReport {
    fn from(staleness: &Staleness) -> Self {
        match staleness {
            Staleness::Fresh => Self {
                fresh: true,
                reason: None,
            },
            Staleness::Stale(reason) => Self {
                fresh: false,
                reason: Some(*reason),
            },
        }
    }
}

/// Output formatter for islgen reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a generation report
    pub fn format_report(&self, report: &GenerationReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Yaml => to_yaml(report),
            OutputFormat::Human => Ok(self.format_report_human(report)),
        }
    }

    /// Formats a staleness check result
    pub fn format_check(&self, staleness: &Staleness) -> Result<String> {
        let report = CheckReport::from(staleness);
        match self.format {
            OutputFormat::Json => to_json(&report),
            OutputFormat::Yaml => to_yaml(&report),
            OutputFormat::Human => Ok(match staleness {
                Staleness::Fresh => "Generated sources are up to date".to_string(),
                Staleness::Stale(reason) => {
                    format!("Generation is stale: {}", stale_reason_text(*reason))
                }
            }),
        }
    }

    /// Formats tool diagnostics
    pub fn format_doctor(&self, report: &DoctorReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Yaml => to_yaml(report),
            OutputFormat::Human => Ok(self.format_doctor_human(report)),
        }
    }

    fn format_report_human(&self, report: &GenerationReport) -> String {
        let mut out = String::new();

        if report.skipped {
            out.push_str("Generation skipped - sources are up to date\n");
        } else {
            out.push_str("Generation complete\n");
        }
        out.push_str(&format!("  Language:    {}\n", report.language));
        out.push_str(&format!("  Tool:        {}\n", report.tool));
        out.push_str(&format!("  Schemas:     {}\n", report.schemas.join(", ")));
        out.push_str(&format!(
            "  Source root: {}\n",
            report.source_set.source_root.display()
        ));
        out.push_str(&format!(
            "  Files:       {} generated\n",
            report.source_set.len()
        ));
        for file in &report.source_set.files {
            out.push_str(&format!("    {}\n", file.display()));
        }
        out.push_str(&format!("  Elapsed:     {} ms\n", report.duration_ms));

        out
    }

    fn format_doctor_human(&self, report: &DoctorReport) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "Tool: {} ({})\n",
            report.tool,
            if report.from_env {
                "from ION_CLI"
            } else {
                "default"
            }
        ));
        match &report.path {
            Some(path) => out.push_str(&format!("  Found:   {}\n", path)),
            None => out.push_str("  Found:   no\n"),
        }
        if let Some(version) = &report.version {
            out.push_str(&format!("  Version: {}\n", version));
        }
        if let Some(error) = &report.error {
            out.push_str(&format!("  Error:   {}\n", error));
        }

        out
    }
}

fn stale_reason_text(reason: StaleReason) -> &'static str {
    match reason {
        StaleReason::OutputMissing => "output directory does not exist",
        StaleReason::OutputEmpty => "output directory holds no generated sources",
        StaleReason::NoFingerprint => "no fingerprint from a previous run",
        StaleReason::FingerprintingDisabled => "fingerprinting is disabled",
        StaleReason::ParametersChanged => "invocation parameters changed",
        StaleReason::InputsChanged => "schema inputs changed",
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize to JSON")
}

fn to_yaml<T: Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).context("Failed to serialize to YAML")
}
