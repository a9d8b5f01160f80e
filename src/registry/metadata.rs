//! Composer v2 package metadata (`p2/<vendor>/<name>.json`)
//!
//! Shared by the HTTP repository source and the local file index, which use
//! the same document layout:
//!
//! ```json
//! {"minified": "composer/2.0",
//!  "packages": {"vendor/name": [{"version": "1.0.0", "source": {"reference": "..."}}]}}
//! ```
//!
//! Minified documents only list fields that changed since the previous entry,
//! with `"__unset"` marking a removed field.

use crate::domain::AvailablePackage;
use serde::Deserialize;
use serde_json::{Map, Value};

const UNSET: &str = "__unset";

/// A metadata document holding one or more packages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataDocument {
    #[serde(default)]
    packages: Value,
    #[serde(default)]
    minified: Option<String>,
}

impl MetadataDocument {
    /// Every version listed for `package`, or `None` if the package is absent
    pub fn versions(&self, package: &str) -> Option<Vec<AvailablePackage>> {
        let entries: Vec<Map<String, Value>> = self
            .packages
            .get(package)?
            .as_array()?
            .iter()
            .filter_map(|v| v.as_object().cloned())
            .collect();

        let entries = if self.minified.is_some() {
            expand_minified(entries)
        } else {
            entries
        };

        Some(entries.iter().filter_map(to_available).collect())
    }
}

/// Rebuild full entries from a minified list
fn expand_minified(entries: Vec<Map<String, Value>>) -> Vec<Map<String, Value>> {
    let mut expanded = Vec::with_capacity(entries.len());
    let mut current = Map::new();

    for entry in entries {
        for (key, value) in entry {
            if value.as_str() == Some(UNSET) {
                current.remove(&key);
            } else {
                current.insert(key, value);
            }
        }
        expanded.push(current.clone());
    }
    expanded
}

fn to_available(entry: &Map<String, Value>) -> Option<AvailablePackage> {
    let version = entry.get("version")?.as_str()?;
    let reference = ["source", "dist"]
        .iter()
        .find_map(|key| entry.get(*key)?.get("reference")?.as_str());

    let available = AvailablePackage::new(version);
    Some(match reference {
        Some(hash) => available.with_content_hash(hash),
        None => available,
    })
}
