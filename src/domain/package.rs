//! Installed and available package structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marking a branch-tracking pseudo-version
pub const BRANCH_PREFIX: &str = "dev-";

/// Returns true if the version tracks the tip of a branch (`dev-master`)
///
/// The prefix is matched case-insensitively.
pub fn is_branch_version(version: &str) -> bool {
    version
        .get(..BRANCH_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(BRANCH_PREFIX))
}

/// A package as recorded by the project's lock file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    /// Package name (`vendor/package`)
    pub name: String,
    /// Installed version or branch marker
    pub current_version: String,
    /// Strictest constraint declared by any dependent
    pub constraint: String,
    /// Locally recorded commit/content reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    /// Composer package type (`library`, `silverstripe-vendormodule`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,
}

impl InstalledPackage {
    /// Creates a new installed package
    pub fn new(
        name: impl Into<String>,
        current_version: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            current_version: current_version.into(),
            constraint: constraint.into(),
            content_hash: None,
            package_type: None,
        }
    }

    /// Sets the content hash (builder pattern)
    pub fn with_content_hash(mut self, hash: impl Into<String>) -> Self {
        self.content_hash = Some(hash.into());
        self
    }

    /// Sets the package type (builder pattern)
    pub fn with_package_type(mut self, package_type: impl Into<String>) -> Self {
        self.package_type = Some(package_type.into());
        self
    }

    /// Returns true if this package tracks a moving branch
    pub fn is_branch_tracking(&self) -> bool {
        is_branch_version(&self.current_version)
    }
}

impl fmt::Display for InstalledPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.name, self.current_version, self.constraint)
    }
}

/// One upstream-known version of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailablePackage {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl AvailablePackage {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            content_hash: None,
        }
    }

    pub fn with_content_hash(mut self, hash: impl Into<String>) -> Self {
        self.content_hash = Some(hash.into());
        self
    }
}
