//! composer.json model for PHP projects
//!
//! Handles:
//! - require / require-dev sections
//! - minimum-stability and prefer-stable
//! - repositories, in both list and keyed-object form, including the
//!   `"packagist.org": false` switch

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Root project manifest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ComposerJson {
    pub name: Option<String>,
    pub minimum_stability: Option<String>,
    pub prefer_stable: Option<bool>,
    pub require: BTreeMap<String, String>,
    pub require_dev: BTreeMap<String, String>,
    repositories: Value,
}

/// One custom repository declared by the project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryEntry {
    /// Declared type (`composer`, `vcs`, ...), if any
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: String,
}

impl RepositoryEntry {
    pub fn new(kind: Option<&str>, url: impl Into<String>) -> Self {
        Self {
            kind: kind.map(str::to_string),
            url: url.into(),
        }
    }
}

/// Repository settings extracted from composer.json
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub entries: Vec<RepositoryEntry>,
    pub packagist_enabled: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            packagist_enabled: true,
        }
    }
}

impl ComposerJson {
    /// Iterates over every root requirement, production first
    pub fn requirements(&self) -> impl Iterator<Item = (&str, &str)> {
        self.require
            .iter()
            .chain(self.require_dev.iter())
            .map(|(name, constraint)| (name.as_str(), constraint.as_str()))
    }

    /// Extract declared repositories in declaration order
    pub fn repository_config(&self) -> RepositoryConfig {
        let mut config = RepositoryConfig::default();

        let items: Vec<(Option<&str>, &Value)> = match &self.repositories {
            Value::Array(list) => list.iter().map(|v| (None, v)).collect(),
            Value::Object(map) => map.iter().map(|(k, v)| (Some(k.as_str()), v)).collect(),
            _ => Vec::new(),
        };

        for (key, value) in items {
            match value {
                Value::Bool(false) if key == Some("packagist.org") || key == Some("packagist") => {
                    config.packagist_enabled = false;
                }
                Value::Object(map) if map.get("packagist.org") == Some(&Value::Bool(false)) => {
                    config.packagist_enabled = false;
                }
                Value::Object(_) => match RepositoryEntry::deserialize(value) {
                    Ok(entry) => config.entries.push(entry),
                    Err(e) => debug!(error = %e, "ignoring repository without url"),
                },
                _ => {}
            }
        }

        config
    }
}
