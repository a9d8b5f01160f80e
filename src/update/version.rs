//! Version string ordering
//!
//! Versions are compared by their dotted numeric release part first, then by
//! the stability of the suffix, then by any numbers inside the suffix
//! (`rc1 < rc2 < rc10`). Strings without a numeric release part, such as
//! branch names, sort below every release.

use super::stability::{classify, StabilityLevel};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

// Leading release segments, any count (`1`, `1.2`, `2.3.0.1`, `1.2.*`)
static RELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[vV]?(\d+(?:\.(?:\d+|\*))*)").unwrap());

// Pure numeric prefix: major, optional minor, optional patch or wildcard
static PURE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[vV]?(\d+(?:\.(?:\d+|\*))?(?:\.(?:\d+|\*))?)").unwrap());

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// A version string split into the parts that decide precedence
#[derive(Debug)]
struct ParsedVersion<'a> {
    release: Option<Vec<u64>>,
    stability: StabilityLevel,
    qualifier: Vec<u64>,
    raw: &'a str,
}

impl<'a> ParsedVersion<'a> {
    fn parse(version: &'a str) -> Self {
        let raw = version.trim();
        let (release, rest) = match RELEASE_RE.captures(raw) {
            Some(caps) => {
                let segments = caps[1]
                    .split('.')
                    .map(|s| s.parse::<u64>().unwrap_or(u64::MAX))
                    .collect();
                (Some(segments), &raw[caps[0].len()..])
            }
            None => (None, raw),
        };

        let qualifier = DIGITS_RE
            .find_iter(rest)
            .filter_map(|m| m.as_str().parse().ok())
            .collect();

        Self {
            release,
            stability: classify(raw),
            qualifier,
            raw,
        }
    }
}

fn compare_release(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let pa = a.get(i).copied().unwrap_or(0);
            let pb = b.get(i).copied().unwrap_or(0);
            pa.cmp(&pb)
        })
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Compare two version strings by precedence
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let pa = ParsedVersion::parse(a);
    let pb = ParsedVersion::parse(b);

    match (&pa.release, &pb.release) {
        (Some(ra), Some(rb)) => compare_release(ra, rb)
            .then(pa.stability.cmp(&pb.stability))
            .then_with(|| pa.qualifier.cmp(&pb.qualifier)),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => pa.raw.cmp(pb.raw),
    }
}

/// Extract the leading `major(.minor)?(.patch|.*)?` run, without any suffix
pub fn pure_numeric_prefix(version: &str) -> Option<String> {
    PURE_PREFIX_RE
        .captures(version.trim())
        .map(|caps| caps[1].to_string())
}

/// Compare two versions by their pure numeric prefix only
///
/// A version without a numeric prefix orders below one that has it.
pub fn compare_numeric_prefix(a: &str, b: &str) -> Ordering {
    match (pure_numeric_prefix(a), pure_numeric_prefix(b)) {
        (Some(pa), Some(pb)) => compare_versions(&pa, &pb),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
