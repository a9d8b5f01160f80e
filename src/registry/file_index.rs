//! Local metadata index source
//!
//! Reads a JSON file in the Composer v2 metadata layout holding any number of
//! packages. Useful for offline checks and mirrored metadata.

use crate::domain::AvailablePackage;
use crate::error::SourceError;
use crate::registry::{MetadataDocument, PackageSource};
use crate::update::{classify, StabilityLevel};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tracing::debug;

/// Package source backed by a local index file
#[derive(Debug)]
pub struct FileIndexSource {
    path: PathBuf,
    name: String,
    document: OnceCell<MetadataDocument>,
}

impl FileIndexSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self {
            path,
            name,
            document: OnceCell::new(),
        }
    }

    /// Create a source from a `file://` URL or plain path
    pub fn from_url(url: &str) -> Self {
        Self::new(url.strip_prefix("file://").unwrap_or(url))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index once; later calls reuse it
    async fn document(&self, package: &str) -> Result<&MetadataDocument, SourceError> {
        self.document
            .get_or_try_init(|| async {
                let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
                    SourceError::unavailable(package, &self.name, format!("failed to read index: {}", e))
                })?;
                let document: MetadataDocument = serde_json::from_str(&content)
                    .map_err(|e| SourceError::invalid_response(package, &self.name, e.to_string()))?;
                debug!(path = %self.path.display(), "index loaded");
                Ok::<_, SourceError>(document)
            })
            .await
    }
}

#[async_trait]
impl PackageSource for FileIndexSource {
    fn source_name(&self) -> &str {
        &self.name
    }

    async fn fetch_versions(
        &self,
        package: &str,
        include_dev: bool,
    ) -> Result<Vec<AvailablePackage>, SourceError> {
        let versions = self
            .document(package)
            .await?
            .versions(package)
            .ok_or_else(|| SourceError::package_not_found(package, &self.name))?;

        Ok(versions
            .into_iter()
            .filter(|v| include_dev || classify(&v.version) != StabilityLevel::Dev)
            .collect())
    }
}
