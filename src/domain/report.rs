//! Per-package update report

use super::InstalledPackage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of resolving one package
///
/// `available_*` is the best candidate honoring the installed constraint,
/// `latest_*` the best candidate ignoring it. Either may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReport {
    pub name: String,
    pub installed_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_hash: Option<String>,
    pub constraint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_hash: Option<String>,
}

impl UpdateReport {
    /// Creates a report with no updates for the installed package
    pub fn for_installed(installed: &InstalledPackage) -> Self {
        Self {
            name: installed.name.clone(),
            installed_version: installed.current_version.clone(),
            installed_hash: installed.content_hash.clone(),
            constraint: installed.constraint.clone(),
            available_version: None,
            available_hash: None,
            latest_version: None,
            latest_hash: None,
        }
    }

    /// Sets the constrained-regime result (builder pattern)
    pub fn with_available(mut self, version: impl Into<String>, hash: Option<String>) -> Self {
        self.available_version = Some(version.into());
        self.available_hash = hash;
        self
    }

    /// Sets the unconstrained-regime result (builder pattern)
    pub fn with_latest(mut self, version: impl Into<String>, hash: Option<String>) -> Self {
        self.latest_version = Some(version.into());
        self.latest_hash = hash;
        self
    }

    /// Returns true if an update exists in either regime
    pub fn has_update(&self) -> bool {
        self.available_version.is_some() || self.latest_version.is_some()
    }
}

impl fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let available = self.available_version.as_deref().unwrap_or("-");
        let latest = self.latest_version.as_deref().unwrap_or("-");
        write!(
            f,
            "{}: {} (available: {}, latest: {})",
            self.name, self.installed_version, available, latest
        )
    }
}
