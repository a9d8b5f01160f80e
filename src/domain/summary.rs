//! Batch run summary types
//!
//! Provides structures for tracking per-package reports and failures across a
//! whole check run.

use super::UpdateReport;
use crate::error::{AppError, ResolveError, SourceError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a per-package failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnknownStability,
    PackageNotFound,
    SourceUnavailable,
    Other,
}

impl FailureKind {
    /// Classify an application error
    pub fn of(error: &AppError) -> Self {
        match error {
            AppError::Resolve(ResolveError::UnknownStability { .. }) => FailureKind::UnknownStability,
            AppError::Resolve(ResolveError::PackageNotFound { .. }) => FailureKind::PackageNotFound,
            AppError::Source(SourceError::PackageNotFound { .. }) => FailureKind::PackageNotFound,
            AppError::Source(_) => FailureKind::SourceUnavailable,
            _ => FailureKind::Other,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::UnknownStability => "unknown stability",
            FailureKind::PackageNotFound => "package not found",
            FailureKind::SourceUnavailable => "source unavailable",
            FailureKind::Other => "error",
        };
        write!(f, "{}", label)
    }
}

/// A package that could not be checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFailure {
    pub name: String,
    pub kind: FailureKind,
    pub message: String,
}

impl PackageFailure {
    pub fn new(name: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            message: message.into(),
        }
    }

    /// Creates a failure record from an error
    pub fn from_error(name: impl Into<String>, error: &AppError) -> Self {
        Self::new(name, FailureKind::of(error), error.to_string())
    }
}

impl fmt::Display for PackageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.name, self.kind, self.message)
    }
}

/// Overall summary of one check run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Reports for every successfully checked package, ordered by name
    pub reports: Vec<UpdateReport>,
    /// Packages that could not be checked, ordered by name
    pub failures: Vec<PackageFailure>,
}

impl BatchSummary {
    /// Creates an empty summary
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            reports: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Adds a report, keeping reports ordered by package name
    pub fn add_report(&mut self, report: UpdateReport) {
        let index = self.reports.partition_point(|r| r.name < report.name);
        self.reports.insert(index, report);
    }

    /// Adds a failure, keeping failures ordered by package name
    pub fn add_failure(&mut self, failure: PackageFailure) {
        let index = self.failures.partition_point(|f| f.name < failure.name);
        self.failures.insert(index, failure);
    }

    /// Looks up the report for a package
    pub fn report(&self, name: &str) -> Option<&UpdateReport> {
        self.reports.iter().find(|r| r.name == name)
    }

    /// Returns the number of packages checked successfully
    pub fn checked(&self) -> usize {
        self.reports.len()
    }

    /// Returns the number of packages with an update in either regime
    pub fn updated(&self) -> usize {
        self.updates().count()
    }

    /// Returns the number of packages that failed
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Returns the total number of packages processed
    pub fn total(&self) -> usize {
        self.checked() + self.failed()
    }

    /// Returns true if any package failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Returns all reports with an update
    pub fn updates(&self) -> impl Iterator<Item = &UpdateReport> {
        self.reports.iter().filter(|r| r.has_update())
    }
}

impl Default for BatchSummary {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InstalledPackage;

    fn report(name: &str, latest: Option<&str>) -> UpdateReport {
        let base = UpdateReport::for_installed(&InstalledPackage::new(name, "1.0.0", "^1.0"));
        match latest {
            Some(v) => base.with_latest(v, None),
            None => base,
        }
    }

    #[test]
    fn test_failure_kind_of() {
        let unknown: AppError = ResolveError::unknown_stability("x").into();
        assert_eq!(FailureKind::of(&unknown), FailureKind::UnknownStability);

        let missing: AppError = ResolveError::package_not_found("a/b", "gone").into();
        assert_eq!(FailureKind::of(&missing), FailureKind::PackageNotFound);

        let not_known: AppError = SourceError::package_not_found("a/b", "packagist").into();
        assert_eq!(FailureKind::of(&not_known), FailureKind::PackageNotFound);

        let down: AppError = SourceError::timeout("a/b", "packagist").into();
        assert_eq!(FailureKind::of(&down), FailureKind::SourceUnavailable);
    }

    #[test]
    fn test_package_failure_from_error() {
        let err: AppError = SourceError::unavailable("a/b", "packagist", "HTTP 500").into();
        let failure = PackageFailure::from_error("a/b", &err);
        assert_eq!(failure.kind, FailureKind::SourceUnavailable);
        assert!(failure.message.contains("HTTP 500"));
        assert!(failure.to_string().starts_with("a/b [source unavailable]"));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = BatchSummary::default();
        summary.add_report(report("b/pkg", Some("2.0.0")));
        summary.add_report(report("a/pkg", None));
        summary.add_failure(PackageFailure::new("c/pkg", FailureKind::Other, "boom"));

        assert_eq!(summary.checked(), 2);
        assert_eq!(summary.updated(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.total(), 3);
        assert!(summary.has_failures());
    }

    #[test]
    fn test_summary_keeps_name_order() {
        let mut summary = BatchSummary::default();
        summary.add_report(report("z/last", None));
        summary.add_report(report("a/first", None));
        summary.add_report(report("m/middle", None));

        let names: Vec<_> = summary.reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a/first", "m/middle", "z/last"]);
        assert!(summary.report("m/middle").is_some());
        assert!(summary.report("x/none").is_none());
    }

    #[test]
    fn test_serde_summary() {
        let mut summary = BatchSummary::default();
        summary.add_failure(PackageFailure::new(
            "a/b",
            FailureKind::PackageNotFound,
            "not found",
        ));
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"kind\":\"package_not_found\""));
        let parsed: BatchSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
    }
}
