use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::{Registry, RegistryEntry};
use crate::error::RegistryError;

const BUNDLED_CONSTRUCTIONS: &str = include_str!("../../registry/constructions.json");
const BUNDLED_ORIGIN: &str = "registry/constructions.json";

#[derive(Debug, Deserialize)]
struct ConstructionsFile {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    constructions: Vec<RegistryEntry>,
}

impl Registry {
    /// Registry built from the taxonomy compiled into the crate.
    pub fn bundled() -> Result<Self, RegistryError> {
        debug!("loading bundled construction registry");
        let file: ConstructionsFile = serde_json::from_str(BUNDLED_CONSTRUCTIONS)
            .map_err(|e| RegistryError::rules_parse_error(BUNDLED_ORIGIN, e.to_string()))?;

        let mut registry = Self::new();
        registry.merge_file(file, Path::new(BUNDLED_ORIGIN))?;
        debug!(constructions = registry.len(), "bundled registry loaded");
        Ok(registry)
    }

    /// Merges a user rules file (JSON or YAML) over the current entries.
    /// Entries sharing an id with an existing entry replace it.
    pub fn load_user_rules<P: AsRef<Path>>(&mut self, path: P) -> Result<(), RegistryError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading user rules");

        let content = fs::read_to_string(path)
            .map_err(|e| RegistryError::rules_file_read_error(path, e.to_string()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let file: ConstructionsFile = match extension {
            "json" => serde_json::from_str(&content)
                .map_err(|e| RegistryError::rules_parse_error(path, e.to_string()))?,
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| RegistryError::rules_parse_error(path, e.to_string()))?,
            _ => return Err(RegistryError::unsupported_format(extension)),
        };

        self.merge_file(file, path)
    }

    fn merge_file(&mut self, file: ConstructionsFile, origin: &Path) -> Result<(), RegistryError> {
        trace!(
            path = %origin.display(),
            version = file.version.as_deref().unwrap_or("unversioned"),
            entries = file.constructions.len(),
            "merging constructions"
        );

        let mut ids = BTreeSet::new();
        for entry in &file.constructions {
            if !ids.insert(entry.id.clone()) {
                return Err(RegistryError::duplicate_construction(
                    entry.id.as_str(),
                    origin,
                ));
            }
        }

        for entry in file.constructions {
            self.insert(entry)?;
        }
        Ok(())
    }
}

/// Loads the bundled registry, then every rules file in `dir` in name order.
pub fn load_rules_dir(dir: &Path) -> Result<Registry> {
    let mut registry = Registry::bundled().context("Failed to load bundled registry")?;

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read rules directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("json" | "yaml" | "yml")
            )
        })
        .collect();
    paths.sort();

    for path in &paths {
        registry
            .load_user_rules(path)
            .with_context(|| format!("Failed to load rules file: {}", path.display()))?;
    }

    debug!(
        dir = %dir.display(),
        files = paths.len(),
        constructions = registry.len(),
        "rules directory loaded"
    );
    Ok(registry)
}
