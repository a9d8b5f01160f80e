//! Text output formatter for human-readable display
//!
//! This module provides:
//! - One line per package with an update: installed, available and latest
//! - Up-to-date packages in verbose mode
//! - Failed packages with their failure kind
//! - A closing summary line with counts

use crate::domain::{BatchSummary, PackageFailure, UpdateReport};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Placeholder for a regime without an update
const NONE: &str = "-";

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Calculate the maximum package name length for alignment
    fn max_name_length<'a>(names: impl Iterator<Item = &'a str>) -> usize {
        names.map(str::len).max().unwrap_or(0).max(20)
    }

    fn format_report_line(
        &self,
        report: &UpdateReport,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let available = report.available_version.as_deref().unwrap_or(NONE);
        let latest = report.latest_version.as_deref().unwrap_or(NONE);

        if !self.color {
            return writeln!(
                writer,
                "  {:width$} {} ({}) available: {} latest: {}",
                report.name,
                report.installed_version,
                report.constraint,
                available,
                latest,
                width = width
            );
        }

        let name = format!("{:width$}", report.name, width = width);
        if !report.has_update() {
            return writeln!(
                writer,
                "  {} {} {}",
                name.dimmed(),
                report.installed_version.dimmed(),
                "up to date".dimmed()
            );
        }

        // an update outside the constraint is the notable one
        let latest_display = if report.latest_version.is_some()
            && report.latest_version != report.available_version
        {
            latest.yellow().bold().to_string()
        } else {
            latest.normal().to_string()
        };

        writeln!(
            writer,
            "  {} {} {} available: {} latest: {}",
            name,
            report.installed_version.dimmed(),
            format!("({})", report.constraint).dimmed(),
            available.green(),
            latest_display
        )
    }

    fn format_failure_line(
        &self,
        failure: &PackageFailure,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.color {
            let name = format!("{:width$}", failure.name, width = width);
            writeln!(
                writer,
                "  {} {} {}",
                name.red(),
                format!("[{}]", failure.kind).red(),
                failure.message.dimmed()
            )
        } else {
            writeln!(
                writer,
                "  {:width$} [{}] {}",
                failure.name,
                failure.kind,
                failure.message,
                width = width
            )
        }
    }

    fn format_summary_line(
        &self,
        summary: &BatchSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let updated = summary.updated();
        let failed = summary.failed();
        let noun = if summary.total() == 1 {
            "package"
        } else {
            "packages"
        };

        if self.color {
            let updated_display = if updated > 0 {
                updated.to_string().green().bold().to_string()
            } else {
                updated.to_string()
            };
            let failed_display = if failed > 0 {
                failed.to_string().red().bold().to_string()
            } else {
                failed.to_string()
            };
            writeln!(
                writer,
                "{} {} checked, {} with updates, {} failed",
                summary.total().to_string().bold(),
                noun,
                updated_display,
                failed_display
            )
        } else {
            writeln!(
                writer,
                "{} {} checked, {} with updates, {} failed",
                summary.total(),
                noun,
                updated,
                failed
            )
        }
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(Verbosity::Normal)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, summary: &BatchSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let shown: Vec<&UpdateReport> = if self.verbosity == Verbosity::Verbose {
            summary.reports.iter().collect()
        } else {
            summary.updates().collect()
        };
        let width = Self::max_name_length(
            shown
                .iter()
                .map(|r| r.name.as_str())
                .chain(summary.failures.iter().map(|f| f.name.as_str())),
        );

        for report in &shown {
            self.format_report_line(report, width, writer)?;
        }

        if !summary.failures.is_empty() {
            if !shown.is_empty() {
                writeln!(writer)?;
            }
            if self.color {
                writeln!(writer, "{}", "Failed:".red().bold())?;
            } else {
                writeln!(writer, "Failed:")?;
            }
            for failure in &summary.failures {
                self.format_failure_line(failure, width, writer)?;
            }
        }

        if self.verbosity != Verbosity::Quiet {
            if !shown.is_empty() || !summary.failures.is_empty() {
                writeln!(writer)?;
            }
            self.format_summary_line(summary, writer)?;
        }

        Ok(())
    }

    fn format_report(&self, report: &UpdateReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let width = Self::max_name_length(std::iter::once(report.name.as_str()));
        self.format_report_line(report, width, writer)
    }
}
