//! Project manifest loading
//!
//! This module provides functionality to:
//! - Read composer.json and composer.lock from a project directory
//! - Build the list of installed packages from the lock file
//! - Determine the strictest constraint each package is installed under

mod composer_json;
mod composer_lock;

pub use composer_json::{ComposerJson, RepositoryConfig, RepositoryEntry};
pub use composer_lock::{ComposerLock, LockedPackage, LockedReference};

use crate::domain::InstalledPackage;
use crate::error::ManifestError;
use crate::update::compare_numeric_prefix;
use serde::de::DeserializeOwned;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Project manifest file name
pub const COMPOSER_JSON: &str = "composer.json";

/// Lock file name
pub const COMPOSER_LOCK: &str = "composer.lock";

/// Constraint used for packages no one requires directly
pub const ANY_CONSTRAINT: &str = "*";

/// Read and deserialize a JSON manifest file
pub fn read_manifest<T: DeserializeOwned>(path: &Path) -> Result<T, ManifestError> {
    if !path.is_file() {
        return Err(ManifestError::not_found(path));
    }
    let content =
        std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
    serde_json::from_str(&content).map_err(|e| ManifestError::json_parse_error(path, e.to_string()))
}

/// A Composer project: root manifest plus lock file
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub manifest: ComposerJson,
    pub lock: ComposerLock,
}

impl Project {
    pub fn new(manifest: ComposerJson, lock: ComposerLock) -> Self {
        Self { manifest, lock }
    }

    /// Load composer.json and composer.lock from `dir`
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let manifest: ComposerJson = read_manifest(&dir.join(COMPOSER_JSON))?;
        let lock: ComposerLock = read_manifest(&dir.join(COMPOSER_LOCK))?;
        debug!(
            dir = %dir.display(),
            packages = lock.packages.len(),
            dev_packages = lock.packages_dev.len(),
            "project loaded"
        );
        Ok(Self { manifest, lock })
    }

    /// Build installed package records from the lock file
    pub fn installed_packages(&self, include_dev: bool) -> Vec<InstalledPackage> {
        let constraints = self.dependent_constraints();

        self.lock
            .locked_packages(include_dev)
            .map(|locked| {
                let constraint = constraints
                    .get(locked.name.as_str())
                    .map(|list| strictest_constraint(list))
                    .unwrap_or_else(|| ANY_CONSTRAINT.to_string());

                let mut installed =
                    InstalledPackage::new(&locked.name, &locked.version, constraint);
                if let Some(hash) = locked.content_hash() {
                    installed = installed.with_content_hash(hash);
                }
                if let Some(package_type) = &locked.package_type {
                    installed = installed.with_package_type(package_type);
                }
                installed
            })
            .collect()
    }

    /// Every constraint placed on each package by the root or a locked package
    fn dependent_constraints(&self) -> HashMap<&str, Vec<&str>> {
        let mut constraints: HashMap<&str, Vec<&str>> = HashMap::new();

        let locked_requirements = self
            .lock
            .locked_packages(true)
            .flat_map(|p| p.require.iter().map(|(n, c)| (n.as_str(), c.as_str())));

        for (name, constraint) in self.manifest.requirements().chain(locked_requirements) {
            constraints.entry(name).or_default().push(constraint);
        }
        constraints
    }
}

/// Pick the constraint with the highest version among several
///
/// Constraints are ordered by the numeric part that follows their operator.
/// On a tie the later constraint wins. An empty list gives `*`.
pub fn strictest_constraint(constraints: &[&str]) -> String {
    constraints
        .iter()
        .copied()
        .max_by(|a, b| compare_constraints(a, b))
        .map(str::to_string)
        .unwrap_or_else(|| ANY_CONSTRAINT.to_string())
}

fn compare_constraints(a: &str, b: &str) -> Ordering {
    let operand = |c: &str| {
        c.trim_start_matches(|ch: char| !ch.is_ascii_alphanumeric())
            .to_string()
    };
    compare_numeric_prefix(&operand(a), &operand(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(manifest: &str, lock: &str) -> Project {
        Project::new(
            serde_json::from_str(manifest).unwrap(),
            serde_json::from_str(lock).unwrap(),
        )
    }

    #[test]
    fn test_strictest_constraint() {
        assert_eq!(strictest_constraint(&["^4.0", "^4.11", "~4.2"]), "^4.11");
        assert_eq!(strictest_constraint(&[">=1.0", "^2.1"]), "^2.1");
        assert_eq!(strictest_constraint(&[]), "*");
    }

    #[test]
    fn test_strictest_constraint_tie_takes_last() {
        assert_eq!(strictest_constraint(&["^1.0", "~1.0"]), "~1.0");
        assert_eq!(strictest_constraint(&["*", "dev-master"]), "dev-master");
    }

    #[test]
    fn test_installed_packages() {
        let p = project(
            r#"{"require": {"a/one": "^1.0"}, "require-dev": {"c/three": "^3.0"}}"#,
            r#"{
                "packages": [
                    {"name": "a/one", "version": "1.2.0", "type": "library",
                     "source": {"reference": "111"}, "require": {"b/two": "^2.1"}},
                    {"name": "b/two", "version": "2.3.0", "dist": {"reference": "222"}}
                ],
                "packages-dev": [
                    {"name": "c/three", "version": "dev-main", "source": {"reference": "333"}}
                ]
            }"#,
        );

        let all = p.installed_packages(true);
        assert_eq!(all.len(), 3);

        assert_eq!(all[0].name, "a/one");
        assert_eq!(all[0].constraint, "^1.0");
        assert_eq!(all[0].content_hash.as_deref(), Some("111"));
        assert_eq!(all[0].package_type.as_deref(), Some("library"));

        assert_eq!(all[1].constraint, "^2.1");
        assert_eq!(all[1].content_hash.as_deref(), Some("222"));

        assert_eq!(all[2].current_version, "dev-main");
        assert!(all[2].is_branch_tracking());

        let prod = p.installed_packages(false);
        assert_eq!(prod.len(), 2);
    }

    #[test]
    fn test_constraint_merges_root_and_dependents() {
        let p = project(
            r#"{"require": {"b/two": "^2.0"}}"#,
            r#"{"packages": [
                {"name": "a/one", "version": "1.0.0", "require": {"b/two": "^2.4"}},
                {"name": "b/two", "version": "2.5.0"},
                {"name": "d/orphan", "version": "0.1.0"}
            ]}"#,
        );

        let installed = p.installed_packages(true);
        let two = installed.iter().find(|p| p.name == "b/two").unwrap();
        assert_eq!(two.constraint, "^2.4");
        let orphan = installed.iter().find(|p| p.name == "d/orphan").unwrap();
        assert_eq!(orphan.constraint, "*");
    }
}
