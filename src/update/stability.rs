//! Stability levels and classification of version strings
//!
//! A version's stability is derived purely from its string form: the
//! lower-cased string is searched for the unstable keywords `dev`, `alpha`,
//! `beta` and `rc`, in that order, and the first hit wins.

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Release maturity of a version, least mature first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilityLevel {
    Dev,
    Alpha,
    Beta,
    Rc,
    Stable,
}

impl StabilityLevel {
    /// All levels in declaration order
    pub const ALL: [StabilityLevel; 5] = [
        StabilityLevel::Dev,
        StabilityLevel::Alpha,
        StabilityLevel::Beta,
        StabilityLevel::Rc,
        StabilityLevel::Stable,
    ];

    /// Returns the keyword used in version strings and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            StabilityLevel::Dev => "dev",
            StabilityLevel::Alpha => "alpha",
            StabilityLevel::Beta => "beta",
            StabilityLevel::Rc => "rc",
            StabilityLevel::Stable => "stable",
        }
    }

    pub fn is_stable(&self) -> bool {
        *self == StabilityLevel::Stable
    }
}

impl fmt::Display for StabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StabilityLevel {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        StabilityLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| ResolveError::unknown_stability(s.trim()))
    }
}

/// Unstable keywords in the order they are tested
const UNSTABLE_KEYWORDS: [StabilityLevel; 4] = [
    StabilityLevel::Dev,
    StabilityLevel::Alpha,
    StabilityLevel::Beta,
    StabilityLevel::Rc,
];

/// Default ranking order, least mature first
pub const DEFAULT_ORDERING: [StabilityLevel; 5] = StabilityLevel::ALL;

/// Derive the stability of a version string
pub fn classify(version: &str) -> StabilityLevel {
    let lower = version.to_lowercase();
    UNSTABLE_KEYWORDS
        .into_iter()
        .find(|level| lower.contains(level.as_str()))
        .unwrap_or(StabilityLevel::Stable)
}

/// Classifies versions and ranks stability levels against an explicit ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StabilityClassifier {
    ordering: Vec<StabilityLevel>,
}

impl Default for StabilityClassifier {
    fn default() -> Self {
        Self {
            ordering: DEFAULT_ORDERING.to_vec(),
        }
    }
}

impl StabilityClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier that ranks levels by a custom ordering
    pub fn with_ordering(ordering: impl Into<Vec<StabilityLevel>>) -> Self {
        Self {
            ordering: ordering.into(),
        }
    }

    pub fn classify(&self, version: &str) -> StabilityLevel {
        classify(version)
    }

    /// Position of `level` in the ordering
    pub fn rank(&self, level: StabilityLevel) -> Result<usize, ResolveError> {
        self.ordering
            .iter()
            .position(|l| *l == level)
            .ok_or_else(|| ResolveError::unknown_stability(level.as_str()))
    }

    /// Whether `candidate` is at least as mature as `minimum`
    pub fn meets_minimum(
        &self,
        minimum: StabilityLevel,
        candidate: StabilityLevel,
    ) -> Result<bool, ResolveError> {
        Ok(self.rank(candidate)? >= self.rank(minimum)?)
    }
}
