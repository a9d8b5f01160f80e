//! composer.lock model
//!
//! Only the fields needed to describe installed packages are read; everything
//! else in the lock file is ignored.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Locked package set
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ComposerLock {
    pub packages: Vec<LockedPackage>,
    pub packages_dev: Vec<LockedPackage>,
}

/// A package entry in composer.lock
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LockedPackage {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub package_type: Option<String>,
    pub source: Option<LockedReference>,
    pub dist: Option<LockedReference>,
    #[serde(deserialize_with = "map_or_empty_list")]
    pub require: BTreeMap<String, String>,
}

/// `source` / `dist` block of a locked package
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LockedReference {
    pub reference: Option<String>,
}

impl LockedPackage {
    /// Commit or content reference, preferring the source over the dist
    pub fn content_hash(&self) -> Option<&str> {
        [&self.source, &self.dist]
            .into_iter()
            .flatten()
            .find_map(|r| r.reference.as_deref())
    }
}

impl ComposerLock {
    /// Iterates over locked packages, optionally including dev packages
    pub fn locked_packages(&self, include_dev: bool) -> impl Iterator<Item = &LockedPackage> {
        let dev: &[LockedPackage] = if include_dev { &self.packages_dev } else { &[] };
        self.packages.iter().chain(dev.iter())
    }
}

// PHP serializes an empty map as `[]`.
fn map_or_empty_list<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MapOrList {
        Map(BTreeMap<String, String>),
        List(Vec<serde::de::IgnoredAny>),
    }

    Ok(match MapOrList::deserialize(deserializer)? {
        MapOrList::Map(map) => map,
        MapOrList::List(_) => BTreeMap::new(),
    })
}
