//! Scan and mapper configuration, loadable from an `atlas.toml` file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Which files the walker admits and which directories it never enters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extension allow-list (lowercase, no leading dot).
    pub extensions: Vec<String>,
    /// Directory names excluded from recursion (dependency caches, build
    /// output).
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: [
                "rb", "rs", "js", "jsx", "ts", "tsx", "erb", "hbs", "html",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            exclude_dirs: [
                "node_modules",
                "target",
                "dist",
                "build",
                ".git",
                "vendor",
                "tmp",
                "coverage",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Heuristic constants for the mapping pass.
///
/// These are configuration, not literals buried in the algorithm: the fuzzy
/// pass accepts a candidate only above `fuzzy_threshold`, and an exact-name
/// match between two zero-field entities scores `name_only_confidence`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub fuzzy_threshold: f32,
    pub name_only_confidence: f32,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.3,
            name_only_confidence: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub scan: ScanConfig,
    pub mapper: MapperConfig,
}

impl AtlasConfig {
    /// Load configuration from a TOML file, or defaults when no path is
    /// given. Missing keys fall back to their defaults section by section.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_carry_the_documented_constants() {
        let config = AtlasConfig::default();
        assert_eq!(config.mapper.fuzzy_threshold, 0.3);
        assert_eq!(config.mapper.name_only_confidence, 0.5);
        assert!(config.scan.extensions.contains(&"rb".to_string()));
        assert!(config.scan.exclude_dirs.contains(&"node_modules".to_string()));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("atlas.toml");
        fs::write(&path, "[mapper]\nfuzzy_threshold = 0.5\n").unwrap();

        let config = AtlasConfig::load(Some(&path)).unwrap();
        assert_eq!(config.mapper.fuzzy_threshold, 0.5);
        assert_eq!(config.mapper.name_only_confidence, 0.5);
        assert!(!config.scan.extensions.is_empty());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(AtlasConfig::load(Some(Path::new("/nonexistent/atlas.toml"))).is_err());
    }
}
