//! CLI argument parsing module for update-checker

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Default number of packages fetched concurrently
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Parse a timeout in seconds, optionally suffixed with `s`
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let num_str = s.strip_suffix('s').unwrap_or(s);
    let secs: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid timeout: {}", s))?;
    if secs == 0 {
        return Err("timeout must be at least 1 second".to_string());
    }
    Ok(Duration::from_secs(secs))
}

/// Composer package update checker
#[derive(Parser, Debug, Clone)]
#[command(
    name = "update-checker",
    version,
    about = "Report available and latest updates for Composer packages"
)]
pub struct CliArgs {
    /// Project directory containing composer.json and composer.lock
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // General options
    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Package filters
    /// Skip packages from packages-dev in composer.lock
    #[arg(long)]
    pub no_dev: bool,

    /// Only check packages of this type (can be specified multiple times)
    #[arg(long = "type", value_name = "TYPE", action = ArgAction::Append)]
    pub types: Vec<String>,

    /// Exclude specific packages from the check (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Check only specific packages (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    // Stability policy
    /// Override the project's minimum-stability
    #[arg(long, value_name = "LEVEL")]
    pub minimum_stability: Option<String>,

    /// Override the project's prefer-stable setting
    #[arg(long, value_name = "BOOL")]
    pub prefer_stable: Option<bool>,

    /// Per-package stability override, e.g. acme/lib=beta (can be specified multiple times)
    #[arg(long, value_name = "NAME=LEVEL", action = ArgAction::Append)]
    pub stability_flag: Vec<String>,

    // Repositories
    /// Extra repository URL or index path, consulted before composer.json repositories
    #[arg(long, value_name = "URL", action = ArgAction::Append)]
    pub repository: Vec<String>,

    /// Do not consult Packagist
    #[arg(long)]
    pub no_packagist: bool,

    /// Treat repositories on this host as inaccessible (can be specified multiple times)
    #[arg(long, value_name = "HOST", action = ArgAction::Append)]
    pub skip_host: Vec<String>,

    // Network
    /// Number of packages fetched concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// HTTP timeout per request, in seconds
    #[arg(long, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}
