//! Composer repository source (Packagist and compatible mirrors)
//!
//! Fetches package metadata from a Composer v2 repository.
//! API endpoints:
//! - `{base}/p2/{vendor}/{package}.json` for tagged releases
//! - `{base}/p2/{vendor}/{package}~dev.json` for dev branches

use crate::domain::AvailablePackage;
use crate::error::SourceError;
use crate::registry::{HttpClient, MetadataDocument, PackageSource};
use async_trait::async_trait;
use tracing::debug;

/// Packagist base URL
pub const PACKAGIST_URL: &str = "https://repo.packagist.org";

/// Composer repository source
#[derive(Debug, Clone)]
pub struct ComposerRepositorySource {
    client: HttpClient,
    base_url: String,
}

impl ComposerRepositorySource {
    /// Create a source for the repository at `base_url`
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Create a source for the public Packagist repository
    pub fn packagist(client: HttpClient) -> Self {
        Self::new(client, PACKAGIST_URL)
    }

    /// Build the metadata URL for a package
    fn build_url(&self, package: &str, dev: bool) -> String {
        let suffix = if dev { "~dev" } else { "" };
        format!("{}/p2/{}{}.json", self.base_url, package, suffix)
    }

    async fn fetch_document(
        &self,
        package: &str,
        dev: bool,
    ) -> Result<Vec<AvailablePackage>, SourceError> {
        let url = self.build_url(package, dev);
        let document: MetadataDocument = self
            .client
            .get_json(&url, package, self.source_name())
            .await?;

        document
            .versions(package)
            .ok_or_else(|| SourceError::package_not_found(package, self.source_name()))
    }
}

#[async_trait]
impl PackageSource for ComposerRepositorySource {
    fn source_name(&self) -> &str {
        &self.base_url
    }

    async fn fetch_versions(
        &self,
        package: &str,
        include_dev: bool,
    ) -> Result<Vec<AvailablePackage>, SourceError> {
        let mut versions = self.fetch_document(package, false).await?;

        if include_dev {
            match self.fetch_document(package, true).await {
                Ok(dev_versions) => versions.extend(dev_versions),
                Err(e) if e.is_not_found() => {
                    debug!(%package, source = %self.base_url, "no dev metadata");
                }
                Err(e) => return Err(e),
            }
        }

        debug!(%package, source = %self.base_url, count = versions.len(), "fetched versions");
        Ok(versions)
    }
}
