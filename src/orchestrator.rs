//! Check orchestrator for coordinating a whole run
//!
//! This module provides:
//! - Workflow coordination: load project → configure → fetch → resolve → summarize
//! - Concurrent metadata fetching with a bounded number of requests in flight
//! - Package filter application
//! - Error handling with partial continuation: one failing package never
//!   stops the batch

use crate::cli::CliArgs;
use crate::config::CheckConfig;
use crate::domain::{BatchSummary, InstalledPackage, PackageFailure, StabilityPolicy};
use crate::error::{AppError, SourceError};
use crate::manifest::Project;
use crate::progress::Progress;
use crate::registry::{HttpClient, PackageSource, SourceSelector, DEFAULT_USER_AGENT};
use crate::update::UpdateResolver;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrator for a check run
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Source override; built from repository configuration when absent
    source: Option<Arc<dyn PackageSource>>,
    resolver: UpdateResolver,
}

impl Orchestrator {
    /// Create a new orchestrator with the given CLI arguments
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            source: None,
            resolver: UpdateResolver::new(),
        }
    }

    /// Create an orchestrator that reads metadata from `source` only
    pub fn with_source(args: CliArgs, source: Arc<dyn PackageSource>) -> Self {
        Self {
            args,
            source: Some(source),
            resolver: UpdateResolver::new(),
        }
    }

    /// Run the check workflow
    ///
    /// Project and configuration errors abort the run. Package-level errors
    /// are recorded in the returned summary.
    pub async fn run(&self) -> Result<BatchSummary, AppError> {
        let started_at = Utc::now();

        let project = Project::load(&self.args.path)?;
        let config = CheckConfig::resolve(&self.args, &project.manifest)?;
        let source = match &self.source {
            Some(source) => Arc::clone(source),
            None => self.build_source(&config)?,
        };

        let packages: Vec<InstalledPackage> = project
            .installed_packages(config.include_dev)
            .into_iter()
            .filter(|p| config.filter.accepts(p))
            .collect();
        info!(
            packages = packages.len(),
            path = %self.args.path.display(),
            "checking packages"
        );

        let mut progress = Progress::new(config.show_progress);
        let mut summary = check_packages(
            &self.resolver,
            packages,
            &config.policy,
            source.as_ref(),
            config.concurrency,
            &mut progress,
        )
        .await;
        summary.started_at = started_at;

        info!(
            checked = summary.checked(),
            updated = summary.updated(),
            failed = summary.failed(),
            "check finished"
        );
        Ok(summary)
    }

    /// Build the repository chain from configuration
    fn build_source(&self, config: &CheckConfig) -> Result<Arc<dyn PackageSource>, SourceError> {
        let client = HttpClient::with_config(config.timeout, DEFAULT_USER_AGENT)?;
        let composite = SourceSelector::new(client)
            .with_skip_hosts(config.skip_hosts.clone())
            .build(&config.repositories, config.repositories.packagist_enabled);

        debug!(sources = ?composite.source_names(), "repositories");
        if composite.is_empty() {
            warn!("no repositories configured; every package will be reported as not found");
        }
        Ok(Arc::new(composite))
    }
}

/// Fetch and resolve every package, collecting reports and failures
///
/// Up to `concurrency` fetches run at once. Dev metadata is requested only
/// for branch installs and packages whose minimum stability admits dev.
pub async fn check_packages(
    resolver: &UpdateResolver,
    packages: Vec<InstalledPackage>,
    policy: &StabilityPolicy,
    source: &dyn PackageSource,
    concurrency: usize,
    progress: &mut Progress,
) -> BatchSummary {
    let mut summary = BatchSummary::new(Utc::now());
    progress.start(packages.len() as u64, "Checking packages");

    let mut fetches = stream::iter(packages)
        .map(|package| async move {
            let include_dev = package.is_branch_tracking()
                || policy.may_accept_dev(&package.name, &package.constraint);
            let fetched = source.fetch_versions(&package.name, include_dev).await;
            (package, fetched)
        })
        .buffered(concurrency.max(1));

    while let Some((package, fetched)) = fetches.next().await {
        progress.set_message(&package.name);

        let outcome = fetched
            .map_err(AppError::from)
            .and_then(|available| {
                resolver
                    .resolve(&package, &available, policy)
                    .map_err(AppError::from)
            });

        match outcome {
            Ok(report) => {
                debug!(package = %package.name, update = report.has_update(), "resolved");
                summary.add_report(report);
            }
            Err(e) => {
                warn!(package = %package.name, error = %e, "package check failed");
                summary.add_failure(PackageFailure::from_error(&package.name, &e));
            }
        }
        progress.inc();
    }

    progress.finish_and_clear();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AvailablePackage, FailureKind};
    use crate::update::StabilityLevel;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory source recording which packages asked for dev metadata
    #[derive(Default)]
    struct MemorySource {
        packages: HashMap<String, Vec<AvailablePackage>>,
        dev_requests: Mutex<Vec<String>>,
    }

    impl MemorySource {
        fn with(mut self, name: &str, versions: &[&str]) -> Self {
            self.packages.insert(
                name.to_string(),
                versions.iter().map(|v| AvailablePackage::new(*v)).collect(),
            );
            self
        }
    }

    #[async_trait]
    impl PackageSource for MemorySource {
        fn source_name(&self) -> &str {
            "memory"
        }

        async fn fetch_versions(
            &self,
            package: &str,
            include_dev: bool,
        ) -> Result<Vec<AvailablePackage>, SourceError> {
            if include_dev {
                self.dev_requests.lock().unwrap().push(package.to_string());
            }
            match package {
                "down/pkg" => Err(SourceError::unavailable(package, "memory", "HTTP 503")),
                _ => self
                    .packages
                    .get(package)
                    .cloned()
                    .ok_or_else(|| SourceError::package_not_found(package, "memory")),
            }
        }
    }

    async fn run(
        packages: Vec<InstalledPackage>,
        policy: &StabilityPolicy,
        source: &MemorySource,
    ) -> BatchSummary {
        check_packages(
            &UpdateResolver::new(),
            packages,
            policy,
            source,
            4,
            &mut Progress::disabled(),
        )
        .await
    }

    #[tokio::test]
    async fn test_batch_collects_reports_and_failures() {
        let source = MemorySource::default()
            .with("acme/lib", &["1.0.0", "1.1.0", "2.0.0"])
            .with("acme/current", &["3.0.0"]);
        let packages = vec![
            InstalledPackage::new("acme/lib", "1.0.0", "^1.0"),
            InstalledPackage::new("acme/current", "3.0.0", "^3.0"),
            InstalledPackage::new("acme/missing", "1.0.0", "^1.0"),
            InstalledPackage::new("down/pkg", "1.0.0", "^1.0"),
        ];

        let summary = run(packages, &StabilityPolicy::default(), &source).await;

        assert_eq!(summary.total(), 4);
        assert_eq!(summary.checked(), 2);
        assert_eq!(summary.updated(), 1);
        assert_eq!(summary.failed(), 2);

        let lib = summary.report("acme/lib").unwrap();
        assert_eq!(lib.available_version.as_deref(), Some("1.1.0"));
        assert_eq!(lib.latest_version.as_deref(), Some("2.0.0"));

        let kinds: Vec<_> = summary.failures.iter().map(|f| (f.name.as_str(), f.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("acme/missing", FailureKind::PackageNotFound),
                ("down/pkg", FailureKind::SourceUnavailable),
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_stability_fails_only_that_package() {
        let source = MemorySource::default()
            .with("acme/a", &["1.0.0", "1.1.0"])
            .with("acme/b", &["1.0.0", "1.1.0"]);
        let policy = StabilityPolicy::default().with_flag("acme/b", "nightly");
        let packages = vec![
            InstalledPackage::new("acme/a", "1.0.0", "^1.0"),
            InstalledPackage::new("acme/b", "1.0.0", "^1.0"),
        ];

        let summary = run(packages, &policy, &source).await;

        assert_eq!(summary.updated(), 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].kind, FailureKind::UnknownStability);
    }

    #[tokio::test]
    async fn test_dev_metadata_only_when_needed() {
        let source = MemorySource::default()
            .with("acme/stable", &["1.0.0"])
            .with("acme/branch", &["dev-main"])
            .with("acme/flagged", &["1.0.0"]);
        let packages = vec![
            InstalledPackage::new("acme/stable", "1.0.0", "^1.0"),
            InstalledPackage::new("acme/branch", "dev-main", "dev-main"),
            InstalledPackage::new("acme/flagged", "1.0.0", "^1.0@dev"),
        ];

        run(packages, &StabilityPolicy::default(), &source).await;

        let mut requested = source.dev_requests.lock().unwrap().clone();
        requested.sort();
        assert_eq!(requested, vec!["acme/branch", "acme/flagged"]);
    }

    #[tokio::test]
    async fn test_project_minimum_dev_requests_dev_metadata() {
        let source = MemorySource::default().with("acme/lib", &["1.0.0"]);
        let policy = StabilityPolicy::new(StabilityLevel::Dev, true);

        run(
            vec![InstalledPackage::new("acme/lib", "1.0.0", "^1.0")],
            &policy,
            &source,
        )
        .await;

        assert_eq!(*source.dev_requests.lock().unwrap(), vec!["acme/lib"]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let summary = run(Vec::new(), &StabilityPolicy::default(), &MemorySource::default()).await;
        assert_eq!(summary.total(), 0);
        assert!(!summary.has_failures());
    }
}
