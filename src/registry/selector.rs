//! Repository source selection
//!
//! Each declared repository is turned into a source by an ordered list of
//! factories. Resolution order:
//! 1. A factory whose kind equals the declared type
//! 2. The first factory whose strict probe accepts the URL
//! 3. The first factory whose relaxed probe accepts the URL
//!
//! Probing only applies to entries without a declared type.

use crate::error::SourceError;
use crate::manifest::{RepositoryConfig, RepositoryEntry};
use crate::registry::{
    ComposerRepositorySource, CompositeSource, FileIndexSource, HttpClient, PackageSource,
    PACKAGIST_URL,
};
use regex::Regex;
use reqwest::Url;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

// scp-like SSH remote, e.g. "git@github.com:acme/repo.git"
static SSH_REMOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[^@/]+@)?([^:/]+):").unwrap());

/// Builds package sources for one kind of repository
pub trait SourceFactory: Send + Sync {
    /// Repository type this factory handles
    fn kind(&self) -> &'static str;

    /// Whether the URL looks like this kind of repository
    fn probe(&self, url: &str, relaxed: bool) -> bool;

    fn create(&self, url: &str) -> Box<dyn PackageSource>;
}

/// Factory for Composer HTTP repositories
pub struct ComposerFactory {
    client: HttpClient,
}

impl ComposerFactory {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

impl SourceFactory for ComposerFactory {
    fn kind(&self) -> &'static str {
        "composer"
    }

    fn probe(&self, url: &str, relaxed: bool) -> bool {
        url.starts_with("https://") || (relaxed && url.starts_with("http://"))
    }

    fn create(&self, url: &str) -> Box<dyn PackageSource> {
        Box::new(ComposerRepositorySource::new(self.client.clone(), url))
    }
}

/// Factory for local metadata index files
pub struct FileIndexFactory;

impl SourceFactory for FileIndexFactory {
    fn kind(&self) -> &'static str {
        "file"
    }

    fn probe(&self, url: &str, relaxed: bool) -> bool {
        url.starts_with("file://")
            || (relaxed && !url.contains("://") && !SSH_REMOTE_RE.is_match(url))
    }

    fn create(&self, url: &str) -> Box<dyn PackageSource> {
        Box::new(FileIndexSource::from_url(url))
    }
}

/// Turns repository configuration into a composite package source
pub struct SourceSelector {
    client: HttpClient,
    factories: Vec<Box<dyn SourceFactory>>,
    skip_hosts: Vec<String>,
}

impl SourceSelector {
    /// Create a selector with the built-in Composer and file factories
    pub fn new(client: HttpClient) -> Self {
        let factories: Vec<Box<dyn SourceFactory>> = vec![
            Box::new(ComposerFactory::new(client.clone())),
            Box::new(FileIndexFactory),
        ];
        Self {
            client,
            factories,
            skip_hosts: Vec::new(),
        }
    }

    /// Replace the factory list (builder pattern)
    pub fn with_factories(mut self, factories: Vec<Box<dyn SourceFactory>>) -> Self {
        self.factories = factories;
        self
    }

    /// Drop repositories hosted on these hosts (builder pattern)
    pub fn with_skip_hosts(mut self, hosts: Vec<String>) -> Self {
        self.skip_hosts = hosts;
        self
    }

    /// Pick the factory for one repository entry
    pub fn factory_for(&self, entry: &RepositoryEntry) -> Result<&dyn SourceFactory, SourceError> {
        let unsupported = || SourceError::UnsupportedRepository {
            kind: entry.kind.clone().unwrap_or_else(|| "untyped".to_string()),
            url: entry.url.clone(),
        };

        if let Some(kind) = &entry.kind {
            return self
                .factories
                .iter()
                .find(|f| f.kind() == kind.as_str())
                .map(|f| f.as_ref())
                .ok_or_else(unsupported);
        }

        [false, true]
            .into_iter()
            .find_map(|relaxed| self.factories.iter().find(|f| f.probe(&entry.url, relaxed)))
            .map(|f| f.as_ref())
            .ok_or_else(unsupported)
    }

    /// Returns true if the URL's host was marked inaccessible
    pub fn is_skipped(&self, url: &str) -> bool {
        repository_host(url).is_some_and(|host| self.skip_hosts.iter().any(|h| *h == host))
    }

    /// Build the source chain: declared repositories in order, then Packagist
    pub fn build(&self, config: &RepositoryConfig, include_packagist: bool) -> CompositeSource {
        let mut sources: Vec<Box<dyn PackageSource>> = Vec::new();

        for entry in &config.entries {
            if self.is_skipped(&entry.url) {
                info!(url = %entry.url, "skipping inaccessible repository");
                continue;
            }
            match self.factory_for(entry) {
                Ok(factory) => {
                    debug!(url = %entry.url, kind = factory.kind(), "repository selected");
                    sources.push(factory.create(&entry.url));
                }
                Err(e) => warn!("{}", e),
            }
        }

        if include_packagist && !self.is_skipped(PACKAGIST_URL) {
            sources.push(Box::new(ComposerRepositorySource::packagist(self.client.clone())));
        }

        CompositeSource::new(sources)
    }
}

/// Host part of a repository URL, including scp-like SSH remotes
pub fn repository_host(url: &str) -> Option<String> {
    match Url::parse(url) {
        Ok(parsed) => parsed.host_str().map(str::to_string),
        Err(_) => SSH_REMOTE_RE
            .captures(url)
            .map(|caps| caps[1].to_string()),
    }
}
