//! Composer constraint matching
//!
//! This module provides:
//! - The `ConstraintMatcher` capability used by the resolver's constrained regime
//! - A Composer-flavoured matcher that delegates range semantics to `semver`
//! - Extraction of inline stability flags (`^1.0@beta`)
//!
//! Candidates are matched on their pure numeric prefix, so a pre-release such
//! as `1.3.0-beta1` satisfies `^1.2`. Stability is decided by policy alone.

use super::version::pure_numeric_prefix;
use regex::Regex;
use semver::{Version, VersionReq};
use std::sync::LazyLock;

// Operator followed by whitespace, e.g. ">= 1.0"
static SPACED_OPERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(>=|<=|!=|==|<>|>|<|=|\^|~)\s+").unwrap());

// Hyphenated range, e.g. "1.0 - 2.0"
static HYPHEN_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap());

static STABILITY_FLAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z]+)").unwrap());

// Commit pin on a branch constraint, e.g. "dev-main#abc123"
static REFERENCE_PIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\S*").unwrap());

const OPERATORS: [&str; 10] = [">=", "<=", "==", "<>", "!=", ">", "<", "=", "^", "~"];

/// Answers whether a version satisfies a constraint string
pub trait ConstraintMatcher: Send + Sync {
    fn matches(&self, constraint: &str, version: &str) -> bool;
}

/// Matcher for Composer constraint syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposerConstraintMatcher;

impl ComposerConstraintMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintMatcher for ComposerConstraintMatcher {
    fn matches(&self, constraint: &str, version: &str) -> bool {
        let (constraint, _) = split_stability_flag(constraint);
        let constraint = REFERENCE_PIN_RE.replace_all(&constraint, "");

        constraint
            .split('|')
            .map(str::trim)
            .filter(|alternative| !alternative.is_empty())
            .any(|alternative| alternative_matches(alternative, version))
            || constraint.trim().is_empty()
    }
}

/// Strip inline stability flags from a constraint
///
/// Returns the bare constraint and the first flag found. A constraint that is
/// only a flag (`@dev`) becomes `*`.
pub fn split_stability_flag(constraint: &str) -> (String, Option<String>) {
    let flag = STABILITY_FLAG_RE
        .captures(constraint)
        .map(|caps| caps[1].to_string());
    let stripped = STABILITY_FLAG_RE.replace_all(constraint, "");
    let stripped = stripped.trim();

    let bare = if stripped.is_empty() && flag.is_some() {
        "*".to_string()
    } else {
        stripped.to_string()
    };
    (bare, flag)
}

fn alternative_matches(alternative: &str, version: &str) -> bool {
    let normalized = SPACED_OPERATOR_RE.replace_all(alternative, "$1");

    if let Some(caps) = HYPHEN_RANGE_RE.captures(&normalized) {
        let lower = format!(">={}", &caps[1]);
        let upper = hyphen_upper_bound(&caps[2]);
        return term_matches(&lower, version) && term_matches(&upper, version);
    }

    normalized
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|term| !term.is_empty())
        .all(|term| term_matches(term, version))
}

/// Upper bound of a hyphen range; a partial operand acts as a wildcard
fn hyphen_upper_bound(operand: &str) -> String {
    let bare = operand.trim_start_matches(['v', 'V']);
    let segments: Vec<u64> = bare
        .split('.')
        .map_while(|part| part.parse().ok())
        .collect();

    match segments.len() {
        1 => format!("<{}.0.0", segments[0] + 1),
        2 => format!("<{}.{}.0", segments[0], segments[1] + 1),
        _ => format!("<={}", operand),
    }
}

fn term_matches(term: &str, version: &str) -> bool {
    if term == "*" {
        return true;
    }
    if term.starts_with("dev-") || version.starts_with("dev-") {
        return term == version.trim();
    }

    let Some(candidate) = to_semver(version) else {
        return false;
    };

    if let Some(excluded) = term.strip_prefix("!=").or_else(|| term.strip_prefix("<>")) {
        return to_semver(excluded).is_some_and(|excluded| excluded != candidate);
    }

    translate(term)
        .and_then(|req| VersionReq::parse(&req).ok())
        .is_some_and(|req| req.matches(&candidate))
}

/// Turn one Composer term into a `semver` requirement string
fn translate(term: &str) -> Option<String> {
    let (op, rest) = split_operator(term);
    let rest = rest.trim_start_matches(['v', 'V']).replace(['x', 'X'], "*");
    let operand = pure_numeric_prefix(&rest)?;
    let wildcard = operand.contains('*');

    let req = match op {
        "~" => tilde_range(&operand)?,
        "^" => format!("^{}", operand),
        "" | "=" | "==" if wildcard => operand,
        "" | "=" | "==" => format!("={}", pad_release(&operand)),
        _ if wildcard => operand,
        op => format!("{}{}", op, pad_release(&operand)),
    };
    Some(req)
}

fn split_operator(term: &str) -> (&str, &str) {
    OPERATORS
        .iter()
        .find_map(|op| term.strip_prefix(op).map(|rest| (*op, rest)))
        .unwrap_or(("", term))
}

/// Composer tilde: `~1.2` allows `<2.0`, `~1.2.3` allows `<1.3`
fn tilde_range(operand: &str) -> Option<String> {
    let parts: Vec<u64> = operand
        .split('.')
        .map(|s| s.parse().ok())
        .collect::<Option<_>>()?;

    match parts.as_slice() {
        [major] | [major, _] => Some(format!(">={}, <{}.0.0", pad_release(operand), major + 1)),
        [major, minor, _] => Some(format!(">={}, <{}.{}.0", operand, major, minor + 1)),
        _ => None,
    }
}

fn pad_release(release: &str) -> String {
    let mut padded = release.to_string();
    for _ in release.split('.').count()..3 {
        padded.push_str(".0");
    }
    padded
}

fn to_semver(version: &str) -> Option<Version> {
    let prefix = pure_numeric_prefix(version.trim())?;
    if prefix.contains('*') {
        return None;
    }
    Version::parse(&pad_release(&prefix)).ok()
}
