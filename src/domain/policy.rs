//! Project stability policy

use crate::error::ResolveError;
use crate::update::{split_stability_flag, StabilityLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stability rules applied while resolving updates
///
/// Per-package flags are kept as raw text. They come from untrusted
/// configuration, so an unknown value fails resolution of that package only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilityPolicy {
    pub minimum_stability: StabilityLevel,
    pub prefer_stable: bool,
    /// Package name to stability override
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stability_flags: BTreeMap<String, String>,
}

impl Default for StabilityPolicy {
    fn default() -> Self {
        Self {
            minimum_stability: StabilityLevel::Stable,
            prefer_stable: true,
            stability_flags: BTreeMap::new(),
        }
    }
}

impl StabilityPolicy {
    pub fn new(minimum_stability: StabilityLevel, prefer_stable: bool) -> Self {
        Self {
            minimum_stability,
            prefer_stable,
            stability_flags: BTreeMap::new(),
        }
    }

    /// Adds a per-package stability override (builder pattern)
    pub fn with_flag(mut self, package: impl Into<String>, stability: impl Into<String>) -> Self {
        self.stability_flags.insert(package.into(), stability.into());
        self
    }

    /// Effective minimum stability for one package
    ///
    /// Precedence: explicit override, then an inline `@flag` on the
    /// constraint, then the project minimum.
    pub fn minimum_for(&self, package: &str, constraint: &str) -> Result<StabilityLevel, ResolveError> {
        if let Some(raw) = self.stability_flags.get(package) {
            return raw.parse();
        }
        if let (_, Some(flag)) = split_stability_flag(constraint) {
            return flag.parse();
        }
        Ok(self.minimum_stability)
    }

    /// Whether dev versions could be selected for this package
    pub fn may_accept_dev(&self, package: &str, constraint: &str) -> bool {
        matches!(self.minimum_for(package, constraint), Ok(StabilityLevel::Dev))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = StabilityPolicy::default();
        assert_eq!(policy.minimum_stability, StabilityLevel::Stable);
        assert!(policy.prefer_stable);
        assert!(policy.stability_flags.is_empty());
    }

    #[test]
    fn test_minimum_for_project_default() {
        let policy = StabilityPolicy::new(StabilityLevel::Beta, false);
        assert_eq!(policy.minimum_for("foo/bar", "^1.0"), Ok(StabilityLevel::Beta));
    }

    #[test]
    fn test_minimum_for_inline_flag() {
        let policy = StabilityPolicy::default();
        assert_eq!(policy.minimum_for("foo/bar", "^1.0@RC"), Ok(StabilityLevel::Rc));
    }

    #[test]
    fn test_minimum_for_override_beats_inline_flag() {
        let policy = StabilityPolicy::default().with_flag("foo/bar", "alpha");
        assert_eq!(
            policy.minimum_for("foo/bar", "^1.0@beta"),
            Ok(StabilityLevel::Alpha)
        );
        assert_eq!(policy.minimum_for("other/pkg", "^1.0"), Ok(StabilityLevel::Stable));
    }

    #[test]
    fn test_minimum_for_unknown_value() {
        let policy = StabilityPolicy::default().with_flag("foo/bar", "nightly");
        assert_eq!(
            policy.minimum_for("foo/bar", "^1.0"),
            Err(ResolveError::unknown_stability("nightly"))
        );
        assert!(StabilityPolicy::default()
            .minimum_for("foo/bar", "^1.0@gamma")
            .is_err());
    }

    #[test]
    fn test_may_accept_dev() {
        let policy = StabilityPolicy::default().with_flag("foo/bar", "dev");
        assert!(policy.may_accept_dev("foo/bar", "^1.0"));
        assert!(!policy.may_accept_dev("baz/qux", "^1.0"));
        assert!(policy.may_accept_dev("baz/qux", "^1.0@dev"));
        assert!(StabilityPolicy::new(StabilityLevel::Dev, true).may_accept_dev("a/b", "*"));
    }
}
