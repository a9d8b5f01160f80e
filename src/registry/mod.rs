//! Package metadata sources
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - Composer v2 metadata parsing (plain and minified)
//! - Composer repository source (Packagist by default)
//! - Local file index source
//! - Capability-based selection of sources from repository configuration
//! - A composite source that consults repositories in order

mod client;
mod file_index;
mod metadata;
mod packagist;
mod selector;

pub use client::{HttpClient, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use file_index::FileIndexSource;
pub use metadata::MetadataDocument;
pub use packagist::{ComposerRepositorySource, PACKAGIST_URL};
pub use selector::{
    repository_host, ComposerFactory, FileIndexFactory, SourceFactory, SourceSelector,
};

use crate::domain::AvailablePackage;
use crate::error::SourceError;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Trait for package metadata sources
#[async_trait]
pub trait PackageSource: Send + Sync {
    /// Human-readable name (usually the repository URL)
    fn source_name(&self) -> &str;

    /// Fetch every known version of a package
    ///
    /// Dev branches are only requested when `include_dev` is set.
    async fn fetch_versions(
        &self,
        package: &str,
        include_dev: bool,
    ) -> Result<Vec<AvailablePackage>, SourceError>;
}

/// Consults several sources in order; the first that knows a package wins
pub struct CompositeSource {
    sources: Vec<Box<dyn PackageSource>>,
}

impl CompositeSource {
    pub fn new(sources: Vec<Box<dyn PackageSource>>) -> Self {
        Self { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Names of the wrapped sources in lookup order
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.source_name()).collect()
    }
}

#[async_trait]
impl PackageSource for CompositeSource {
    fn source_name(&self) -> &str {
        "repositories"
    }

    async fn fetch_versions(
        &self,
        package: &str,
        include_dev: bool,
    ) -> Result<Vec<AvailablePackage>, SourceError> {
        let mut failure = None;

        for source in &self.sources {
            match source.fetch_versions(package, include_dev).await {
                Ok(versions) => return Ok(versions),
                Err(e) if e.is_not_found() => {
                    debug!(%package, source = source.source_name(), "package not in repository");
                }
                Err(e) => {
                    warn!(%package, source = source.source_name(), error = %e, "repository failed");
                    failure.get_or_insert(e);
                }
            }
        }

        Err(failure.unwrap_or_else(|| SourceError::package_not_found(package, self.source_name())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        name: &'static str,
        result: Result<Vec<AvailablePackage>, SourceError>,
    }

    #[async_trait]
    impl PackageSource for Fixed {
        fn source_name(&self) -> &str {
            self.name
        }

        async fn fetch_versions(
            &self,
            _package: &str,
            _include_dev: bool,
        ) -> Result<Vec<AvailablePackage>, SourceError> {
            self.result.clone()
        }
    }

    fn found(name: &'static str, version: &str) -> Box<dyn PackageSource> {
        Box::new(Fixed {
            name,
            result: Ok(vec![AvailablePackage::new(version)]),
        })
    }

    fn not_found(name: &'static str) -> Box<dyn PackageSource> {
        Box::new(Fixed {
            name,
            result: Err(SourceError::package_not_found("a/b", name)),
        })
    }

    fn broken(name: &'static str) -> Box<dyn PackageSource> {
        Box::new(Fixed {
            name,
            result: Err(SourceError::unavailable("a/b", name, "HTTP 500")),
        })
    }

    #[tokio::test]
    async fn test_first_repository_that_knows_package_wins() {
        let composite =
            CompositeSource::new(vec![not_found("one"), found("two", "2.0.0"), found("three", "3.0.0")]);
        let versions = composite.fetch_versions("a/b", false).await.unwrap();
        assert_eq!(versions, vec![AvailablePackage::new("2.0.0")]);
    }

    #[tokio::test]
    async fn test_failure_does_not_hide_later_repository() {
        let composite = CompositeSource::new(vec![broken("one"), found("two", "2.0.0")]);
        assert!(composite.fetch_versions("a/b", false).await.is_ok());
    }

    #[tokio::test]
    async fn test_all_not_found() {
        let composite = CompositeSource::new(vec![not_found("one"), not_found("two")]);
        let err = composite.fetch_versions("a/b", false).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_not_found_with_failure_is_unavailable() {
        let composite = CompositeSource::new(vec![not_found("one"), broken("two")]);
        let err = composite.fetch_versions("a/b", false).await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_empty_composite_is_not_found() {
        let composite = CompositeSource::new(Vec::new());
        assert!(composite.is_empty());
        let err = composite.fetch_versions("a/b", false).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
