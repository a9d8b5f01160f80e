//! Core domain models for update-checker
//!
//! This module contains the fundamental types used throughout the application:
//! - Installed and available package records
//! - Stability policy
//! - Per-package update reports
//! - Batch summary and failure records

mod package;
mod policy;
mod report;
mod summary;

pub use package::{is_branch_version, AvailablePackage, InstalledPackage, BRANCH_PREFIX};
pub use policy::StabilityPolicy;
pub use report::UpdateReport;
pub use summary::{BatchSummary, FailureKind, PackageFailure};
