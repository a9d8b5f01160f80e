//! Update detection for packages tracking a moving branch
//!
//! A `dev-<branch>` install has no version to compare, only the commit it was
//! locked at. An update is a different commit on the same branch upstream.

use crate::domain::{AvailablePackage, InstalledPackage};
use crate::error::ResolveError;
use tracing::{debug, warn};

/// Compares content hashes for branch-tracking installs
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchTrackingResolver;

impl BranchTrackingResolver {
    pub fn new() -> Self {
        Self
    }

    /// Returns the remote hash when the branch moved, `None` when it did not
    ///
    /// Fails with `PackageNotFound` when upstream data exists but lacks the
    /// installed branch.
    pub fn resolve(
        &self,
        installed: &InstalledPackage,
        available: &[AvailablePackage],
    ) -> Result<Option<String>, ResolveError> {
        if available.is_empty() {
            return Ok(None);
        }

        let branch = &installed.current_version;
        let entry = available
            .iter()
            .find(|candidate| candidate.version.eq_ignore_ascii_case(branch))
            .ok_or_else(|| {
                ResolveError::package_not_found(
                    &installed.name,
                    format!("branch '{}' is not published upstream", branch),
                )
            })?;

        match (&installed.content_hash, &entry.content_hash) {
            (local, Some(remote)) if local.as_ref() != Some(remote) => {
                debug!(package = %installed.name, %branch, %remote, "branch moved");
                Ok(Some(remote.clone()))
            }
            (Some(_), None) => {
                warn!(package = %installed.name, %branch, "upstream branch has no reference");
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}
