//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the run summary with its start timestamp
//! - Every package report, plus failures with their kind

use crate::domain::{BatchSummary, PackageFailure, UpdateReport};
use crate::output::{OutputFormatter, Verbosity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level; quiet mode drops reports without updates
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// When the run started
    started_at: DateTime<Utc>,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-package reports, ordered by name
    packages: Vec<&'a UpdateReport>,
    /// Packages that could not be checked
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<&'a PackageFailure>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    checked: usize,
    updated: usize,
    failed: usize,
}

impl JsonSummary {
    fn of(summary: &BatchSummary) -> Self {
        Self {
            checked: summary.checked(),
            updated: summary.updated(),
            failed: summary.failed(),
        }
    }
}

fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    writeln!(writer, "{}", json)
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, summary: &BatchSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let packages: Vec<&UpdateReport> = if self.verbosity == Verbosity::Quiet {
            summary.updates().collect()
        } else {
            summary.reports.iter().collect()
        };

        let output = JsonOutput {
            started_at: summary.started_at,
            summary: JsonSummary::of(summary),
            packages,
            failures: summary.failures.iter().collect(),
        };
        write_json(&output, writer)
    }

    fn format_report(&self, report: &UpdateReport, writer: &mut dyn Write) -> std::io::Result<()> {
        write_json(report, writer)
    }
}
