//! Package filter configuration
//!
//! This module provides the PackageFilter struct that decides which installed
//! packages take part in a check run.

use crate::domain::InstalledPackage;

/// Filter configuration for a check run
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
    /// Package types to process (empty means all)
    pub types: Vec<String>,
    /// Packages to exclude
    pub exclude: Vec<String>,
    /// If non-empty, only check these packages
    pub only: Vec<String>,
}

impl PackageFilter {
    /// Create a new PackageFilter with default settings (process all)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set package types to process
    pub fn with_types(mut self, types: Vec<String>) -> Self {
        self.types = types;
        self
    }

    /// Set packages to exclude
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Set packages to include (only list)
    pub fn with_only(mut self, only: Vec<String>) -> Self {
        self.only = only;
        self
    }

    /// Check if a package type should be processed
    ///
    /// Packages without a recorded type count as `library`.
    pub fn should_process_type(&self, package_type: Option<&str>) -> bool {
        if self.types.is_empty() {
            return true;
        }
        let package_type = package_type.unwrap_or("library");
        self.types.iter().any(|t| t == package_type)
    }

    /// Check if a package should be processed based on name filters
    pub fn should_process_package(&self, name: &str) -> bool {
        // --only wins over --exclude
        if !self.only.is_empty() {
            return self.only.iter().any(|p| p == name);
        }
        !self.exclude.iter().any(|p| p == name)
    }

    /// Check both the type and name filters
    pub fn accepts(&self, package: &InstalledPackage) -> bool {
        self.should_process_type(package.package_type.as_deref())
            && self.should_process_package(&package.name)
    }
}
