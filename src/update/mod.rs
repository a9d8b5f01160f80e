//! Update resolution for installed packages
//!
//! This module provides:
//! - Stability classification and ranking
//! - Version precedence and pure-prefix comparison
//! - Composer constraint matching
//! - Branch-tracking (content hash) update detection
//! - Package filter configuration from CLI args
//! - The resolver that picks the available and latest candidates

mod branch;
mod constraint;
mod filter;
mod stability;
mod version;

pub use branch::BranchTrackingResolver;
pub use constraint::{split_stability_flag, ComposerConstraintMatcher, ConstraintMatcher};
pub use filter::PackageFilter;
pub use stability::{classify, StabilityClassifier, StabilityLevel, DEFAULT_ORDERING};
pub use version::{compare_numeric_prefix, compare_versions, pure_numeric_prefix};

use crate::domain::{AvailablePackage, InstalledPackage, StabilityPolicy, UpdateReport};
use crate::error::ResolveError;
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, trace};

/// Which candidates a selection pass may consider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Regime {
    /// Only candidates satisfying the installed constraint
    Constrained,
    /// Every candidate
    Unconstrained,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Constrained => write!(f, "available"),
            Regime::Unconstrained => write!(f, "latest"),
        }
    }
}

/// Winner of a selection pass
struct Selection<'a> {
    candidate: &'a AvailablePackage,
    stability: StabilityLevel,
}

/// Resolves the available and latest updates for one package
///
/// The resolver holds no state between calls, so one instance can be shared
/// across a whole batch.
#[derive(Debug, Clone, Default)]
pub struct UpdateResolver<M = ComposerConstraintMatcher> {
    classifier: StabilityClassifier,
    branches: BranchTrackingResolver,
    matcher: M,
}

impl UpdateResolver {
    /// Create a resolver with the default classifier and Composer matcher
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: ConstraintMatcher> UpdateResolver<M> {
    /// Create a resolver with a custom constraint matcher
    pub fn with_matcher(matcher: M) -> Self {
        Self {
            classifier: StabilityClassifier::default(),
            branches: BranchTrackingResolver,
            matcher,
        }
    }

    /// Replace the stability classifier (builder pattern)
    pub fn with_classifier(mut self, classifier: StabilityClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Resolve updates for one installed package
    ///
    /// `available` may be in any order. An empty set yields a report with no
    /// updates.
    pub fn resolve(
        &self,
        installed: &InstalledPackage,
        available: &[AvailablePackage],
        policy: &StabilityPolicy,
    ) -> Result<UpdateReport, ResolveError> {
        let mut report = UpdateReport::for_installed(installed);

        if available.is_empty() {
            debug!(package = %installed.name, "no upstream versions");
            return Ok(report);
        }

        if installed.is_branch_tracking() {
            if let Some(hash) = self.branches.resolve(installed, available)? {
                report = report
                    .with_available(hash.clone(), Some(hash.clone()))
                    .with_latest(hash.clone(), Some(hash));
            }
            return Ok(report);
        }

        let minimum = policy.minimum_for(&installed.name, &installed.constraint)?;
        let candidates = canonical_order(available);

        for regime in [Regime::Constrained, Regime::Unconstrained] {
            let Some(selection) =
                self.select(installed, &candidates, minimum, policy.prefer_stable, regime)?
            else {
                continue;
            };

            let version = report_version(&selection.candidate.version, selection.stability);
            let hash = selection.candidate.content_hash.clone();
            debug!(package = %installed.name, %regime, %version, "update found");
            report = match regime {
                Regime::Constrained => report.with_available(version, hash),
                Regime::Unconstrained => report.with_latest(version, hash),
            };
        }

        Ok(report)
    }

    /// Scan candidates and return the one that beats the installed version
    fn select<'a>(
        &self,
        installed: &InstalledPackage,
        candidates: &[&'a AvailablePackage],
        minimum: StabilityLevel,
        prefer_stable: bool,
        regime: Regime,
    ) -> Result<Option<Selection<'a>>, ResolveError> {
        let mut best: Option<Selection<'a>> = None;
        let mut best_version = installed.current_version.as_str();
        let mut best_stability = self.classifier.classify(best_version);

        for &candidate in candidates {
            let version = candidate.version.as_str();

            if regime == Regime::Constrained
                && !self.matcher.matches(&installed.constraint, version)
            {
                continue;
            }

            let stability = self.classifier.classify(version);
            if !self.classifier.meets_minimum(minimum, stability)? {
                trace!(%version, %stability, %minimum, "below minimum stability");
                continue;
            }

            let wins = if prefer_stable {
                compare_versions(best_version, version) == Ordering::Less
            } else {
                match compare_numeric_prefix(best_version, version) {
                    Ordering::Less => true,
                    Ordering::Greater => false,
                    // Equal release: only a same-stability successor may replace it
                    Ordering::Equal => {
                        best_stability == stability
                            && compare_versions(best_version, version) == Ordering::Less
                    }
                }
            };

            if wins {
                trace!(%regime, from = best_version, to = version, "candidate wins");
                best_version = version;
                best_stability = stability;
                best = Some(Selection {
                    candidate,
                    stability,
                });
            }
        }

        Ok(best)
    }
}

/// Sort candidates by descending precedence, breaking ties on the raw string
fn canonical_order(available: &[AvailablePackage]) -> Vec<&AvailablePackage> {
    let mut ordered: Vec<&AvailablePackage> = available.iter().collect();
    ordered.sort_by(|a, b| {
        compare_versions(&b.version, &a.version)
            .then_with(|| a.version.cmp(&b.version))
            .then_with(|| a.content_hash.cmp(&b.content_hash))
    });
    ordered
}

/// Version string to report for a winning candidate
///
/// Unstable winners always show their stability token.
fn report_version(version: &str, stability: StabilityLevel) -> String {
    if stability.is_stable() || version.to_lowercase().contains(stability.as_str()) {
        version.to_string()
    } else {
        format!("{}-{}", version, stability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(version: &str, constraint: &str) -> InstalledPackage {
        InstalledPackage::new("vendor/pkg", version, constraint)
    }

    fn available(versions: &[&str]) -> Vec<AvailablePackage> {
        versions
            .iter()
            .map(|v| AvailablePackage::new(*v).with_content_hash(format!("hash-{}", v)))
            .collect()
    }

    fn stable_policy() -> StabilityPolicy {
        StabilityPolicy::default()
    }

    #[test]
    fn test_resolve_constrained_and_latest() {
        let resolver = UpdateResolver::new();
        let report = resolver
            .resolve(
                &pkg("1.2.0", "~1.2.0"),
                &available(&["1.2.0", "1.2.1", "1.3.0", "2.0.0"]),
                &stable_policy(),
            )
            .unwrap();

        assert_eq!(report.available_version.as_deref(), Some("1.2.1"));
        assert_eq!(report.available_hash.as_deref(), Some("hash-1.2.1"));
        assert_eq!(report.latest_version.as_deref(), Some("2.0.0"));
        assert_eq!(report.latest_hash.as_deref(), Some("hash-2.0.0"));
    }

    #[test]
    fn test_resolve_caret_allows_minor() {
        let report = UpdateResolver::new()
            .resolve(
                &pkg("1.2.0", "^1.2"),
                &available(&["1.2.0", "1.2.1", "1.3.0", "2.0.0"]),
                &stable_policy(),
            )
            .unwrap();

        assert_eq!(report.available_version.as_deref(), Some("1.3.0"));
        assert_eq!(report.latest_version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_resolve_beta_filtered_by_stable_minimum() {
        let report = UpdateResolver::new()
            .resolve(&pkg("1.0.0", "^1.0"), &available(&["1.1.0-beta"]), &stable_policy())
            .unwrap();

        assert!(report.available_version.is_none());
        assert!(report.latest_version.is_none());
        assert!(!report.has_update());
    }

    #[test]
    fn test_resolve_beta_allowed_without_prefer_stable() {
        let policy = StabilityPolicy::new(StabilityLevel::Beta, false);
        let report = UpdateResolver::new()
            .resolve(&pkg("1.0.0", "^1.0"), &available(&["1.1.0-beta"]), &policy)
            .unwrap();

        assert_eq!(report.available_version.as_deref(), Some("1.1.0-beta"));
        assert_eq!(report.latest_version.as_deref(), Some("1.1.0-beta"));
    }

    #[test]
    fn test_resolve_empty_available() {
        let report = UpdateResolver::new()
            .resolve(&pkg("1.0.0", "^1.0"), &[], &stable_policy())
            .unwrap();
        assert_eq!(report, UpdateReport::for_installed(&pkg("1.0.0", "^1.0")));
    }

    #[test]
    fn test_resolve_already_latest() {
        let report = UpdateResolver::new()
            .resolve(
                &pkg("2.0.0", "^2.0"),
                &available(&["1.0.0", "1.9.0", "2.0.0"]),
                &stable_policy(),
            )
            .unwrap();
        assert!(!report.has_update());
    }

    #[test]
    fn test_resolve_never_downgrades() {
        let report = UpdateResolver::new()
            .resolve(
                &pkg("0.13.0", "*"),
                &available(&["0.9.1", "0.10.0", "0.12.0"]),
                &stable_policy(),
            )
            .unwrap();
        assert!(!report.has_update());
    }

    #[test]
    fn test_resolve_prefer_stable_picks_stable_over_prerelease_of_same_release() {
        let policy = StabilityPolicy::new(StabilityLevel::Beta, true);
        let report = UpdateResolver::new()
            .resolve(
                &pkg("1.0.0-beta", "*"),
                &available(&["1.0.0-rc1", "1.0.0"]),
                &policy,
            )
            .unwrap();
        assert_eq!(report.latest_version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_resolve_without_prefer_stable_takes_newest_release() {
        let policy = StabilityPolicy::new(StabilityLevel::Alpha, false);
        let report = UpdateResolver::new()
            .resolve(
                &pkg("1.0.0", "*"),
                &available(&["1.5.0", "2.0.0-alpha1", "1.9.0"]),
                &policy,
            )
            .unwrap();
        assert_eq!(report.latest_version.as_deref(), Some("2.0.0-alpha1"));
    }

    #[test]
    fn test_resolve_without_prefer_stable_same_stability_tie_break() {
        let policy = StabilityPolicy::new(StabilityLevel::Rc, false);
        let report = UpdateResolver::new()
            .resolve(
                &pkg("1.0.0-rc1", "*"),
                &available(&["1.0.0-rc2", "1.0.0-rc10"]),
                &policy,
            )
            .unwrap();
        assert_eq!(report.latest_version.as_deref(), Some("1.0.0-rc10"));
    }

    /// Equal release numbers with different stabilities never replace the
    /// installed version when prefer-stable is off. This keeps the historical
    /// behavior even though `1.0.0-rc1` outranks `1.0.0-beta`.
    #[test]
    fn test_resolve_without_prefer_stable_keeps_equal_release_of_other_stability() {
        let policy = StabilityPolicy::new(StabilityLevel::Beta, false);
        let report = UpdateResolver::new()
            .resolve(
                &pkg("1.0.0-beta", "*"),
                &available(&["1.0.0-rc1", "1.0.0"]),
                &policy,
            )
            .unwrap();
        assert!(!report.has_update());
    }

    #[test]
    fn test_resolve_inline_flag_lowers_minimum() {
        let report = UpdateResolver::new()
            .resolve(
                &pkg("1.0.0", "^1.0@beta"),
                &available(&["1.1.0-beta2"]),
                &stable_policy(),
            )
            .unwrap();
        assert_eq!(report.available_version.as_deref(), Some("1.1.0-beta2"));
    }

    #[test]
    fn test_resolve_unknown_policy_stability() {
        let policy = StabilityPolicy::default().with_flag("vendor/pkg", "nightly");
        let result =
            UpdateResolver::new().resolve(&pkg("1.0.0", "^1.0"), &available(&["1.1.0"]), &policy);
        assert_eq!(result, Err(ResolveError::unknown_stability("nightly")));
    }

    #[test]
    fn test_resolve_unknown_stability_from_custom_ordering() {
        let resolver = UpdateResolver::new().with_classifier(StabilityClassifier::with_ordering(
            vec![StabilityLevel::Rc, StabilityLevel::Stable],
        ));
        let result = resolver.resolve(
            &pkg("1.0.0", "^1.0"),
            &available(&["1.1.0-beta"]),
            &stable_policy(),
        );
        assert!(matches!(result, Err(ResolveError::UnknownStability { .. })));
    }

    #[test]
    fn test_resolve_branch_tracking_reports_hash() {
        let installed = InstalledPackage::new("vendor/pkg", "dev-master", "dev-master")
            .with_content_hash("abc123");
        let upstream = vec![
            AvailablePackage::new("dev-master").with_content_hash("def456"),
            AvailablePackage::new("3.0.0").with_content_hash("333"),
        ];
        let report = UpdateResolver::new()
            .resolve(&installed, &upstream, &stable_policy())
            .unwrap();

        assert_eq!(report.available_version.as_deref(), Some("def456"));
        assert_eq!(report.latest_version.as_deref(), Some("def456"));
        assert_eq!(report.available_hash, report.latest_hash);
        assert_eq!(report.installed_hash.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_resolve_branch_tracking_same_hash() {
        let installed = InstalledPackage::new("vendor/pkg", "dev-master", "dev-master")
            .with_content_hash("abc123");
        let upstream = vec![AvailablePackage::new("dev-master").with_content_hash("abc123")];
        let report = UpdateResolver::new()
            .resolve(&installed, &upstream, &stable_policy())
            .unwrap();
        assert!(!report.has_update());
    }

    #[test]
    fn test_resolve_branch_tracking_missing_branch() {
        let installed = InstalledPackage::new("vendor/pkg", "dev-feature", "dev-feature")
            .with_content_hash("abc123");
        let result = UpdateResolver::new().resolve(
            &installed,
            &available(&["1.0.0"]),
            &stable_policy(),
        );
        assert!(matches!(result, Err(ResolveError::PackageNotFound { .. })));
    }

    #[test]
    fn test_resolve_is_order_independent() {
        let policy = StabilityPolicy::new(StabilityLevel::Beta, false);
        let installed = pkg("1.0.0", "^1.0");
        let mut versions = available(&["1.1.0-beta", "1.0.5", "1.1.0", "2.0.0-beta1", "1.0"]);
        let resolver = UpdateResolver::new();

        let expected = resolver.resolve(&installed, &versions, &policy).unwrap();
        for _ in 0..versions.len() {
            versions.rotate_left(1);
            assert_eq!(resolver.resolve(&installed, &versions, &policy).unwrap(), expected);
        }
        versions.reverse();
        assert_eq!(resolver.resolve(&installed, &versions, &policy).unwrap(), expected);
    }

    #[test]
    fn test_resolve_never_selects_below_minimum() {
        let policy = StabilityPolicy::new(StabilityLevel::Rc, false);
        let report = UpdateResolver::new()
            .resolve(
                &pkg("1.0.0", "*"),
                &available(&["3.0.0-alpha", "2.5.0-beta", "2.0.0-RC1", "1.5.0"]),
                &policy,
            )
            .unwrap();
        assert_eq!(report.latest_version.as_deref(), Some("2.0.0-RC1"));
    }

    #[test]
    fn test_canonical_order() {
        let versions = available(&["1.0.0", "2.0.0-beta", "1.0", "2.0.0"]);
        let ordered: Vec<_> = canonical_order(&versions)
            .into_iter()
            .map(|p| p.version.as_str())
            .collect();
        assert_eq!(ordered, vec!["2.0.0", "2.0.0-beta", "1.0", "1.0.0"]);
    }

    #[test]
    fn test_report_version() {
        assert_eq!(report_version("2.0.0", StabilityLevel::Stable), "2.0.0");
        assert_eq!(report_version("1.1.0-beta", StabilityLevel::Beta), "1.1.0-beta");
        assert_eq!(report_version("1.1.0-BETA2", StabilityLevel::Beta), "1.1.0-BETA2");
        assert_eq!(report_version("2.0.0", StabilityLevel::Beta), "2.0.0-beta");
    }

    #[test]
    fn test_custom_matcher() {
        struct NothingMatches;
        impl ConstraintMatcher for NothingMatches {
            fn matches(&self, _constraint: &str, _version: &str) -> bool {
                false
            }
        }

        let report = UpdateResolver::with_matcher(NothingMatches)
            .resolve(&pkg("1.0.0", "^1.0"), &available(&["1.1.0"]), &stable_policy())
            .unwrap();
        assert!(report.available_version.is_none());
        assert_eq!(report.latest_version.as_deref(), Some("1.1.0"));
    }
}
