//! Run configuration
//!
//! Merges command line options with the project's composer.json. CLI values
//! win; composer.json fills the gaps; built-in defaults cover the rest.

use crate::cli::CliArgs;
use crate::domain::StabilityPolicy;
use crate::error::ConfigError;
use crate::manifest::{ComposerJson, RepositoryConfig, RepositoryEntry};
use crate::registry::DEFAULT_TIMEOUT;
use crate::update::{PackageFilter, StabilityLevel};
use std::time::Duration;
use tracing::debug;

/// Fully resolved settings for one check run
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub policy: StabilityPolicy,
    pub filter: PackageFilter,
    /// Repositories in lookup order, Packagist excluded
    pub repositories: RepositoryConfig,
    pub skip_hosts: Vec<String>,
    /// Include packages-dev from composer.lock
    pub include_dev: bool,
    pub concurrency: usize,
    pub timeout: Duration,
    pub show_progress: bool,
}

impl CheckConfig {
    /// Build the run configuration from CLI arguments and composer.json
    pub fn resolve(args: &CliArgs, manifest: &ComposerJson) -> Result<Self, ConfigError> {
        if args.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency { value: 0 });
        }

        let policy = build_policy(args, manifest)?;
        debug!(
            minimum_stability = %policy.minimum_stability,
            prefer_stable = policy.prefer_stable,
            overrides = policy.stability_flags.len(),
            "stability policy"
        );

        let filter = PackageFilter::new()
            .with_types(args.types.clone())
            .with_exclude(args.exclude.clone())
            .with_only(args.only.clone());

        let mut repositories = manifest.repository_config();
        let mut entries: Vec<RepositoryEntry> = args
            .repository
            .iter()
            .map(|url| RepositoryEntry::new(None, url.as_str()))
            .collect();
        entries.append(&mut repositories.entries);
        repositories.entries = entries;
        repositories.packagist_enabled &= !args.no_packagist;

        Ok(Self {
            policy,
            filter,
            repositories,
            skip_hosts: args.skip_host.clone(),
            include_dev: !args.no_dev,
            concurrency: args.concurrency,
            timeout: args.timeout.unwrap_or(DEFAULT_TIMEOUT),
            show_progress: !args.quiet && !args.json,
        })
    }
}

fn build_policy(args: &CliArgs, manifest: &ComposerJson) -> Result<StabilityPolicy, ConfigError> {
    let minimum_stability = match args
        .minimum_stability
        .as_deref()
        .or(manifest.minimum_stability.as_deref())
    {
        Some(raw) => raw
            .parse::<StabilityLevel>()
            .map_err(|_| ConfigError::InvalidStability {
                value: raw.to_string(),
            })?,
        None => StabilityLevel::Stable,
    };
    let prefer_stable = args.prefer_stable.or(manifest.prefer_stable).unwrap_or(true);

    let mut policy = StabilityPolicy::new(minimum_stability, prefer_stable);
    for flag in &args.stability_flag {
        let (name, level) = parse_stability_flag(flag)?;
        policy = policy.with_flag(name, level);
    }
    Ok(policy)
}

/// Split a `vendor/package=level` override
///
/// The level is not validated here; unknown levels fail that package alone.
fn parse_stability_flag(raw: &str) -> Result<(&str, &str), ConfigError> {
    match raw.split_once('=') {
        Some((name, level)) if !name.trim().is_empty() && !level.trim().is_empty() => {
            Ok((name.trim(), level.trim()))
        }
        _ => Err(ConfigError::InvalidStabilityFlag {
            value: raw.to_string(),
        }),
    }
}
