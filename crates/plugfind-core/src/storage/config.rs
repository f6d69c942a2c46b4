use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::kernel::constants::{DEFAULT_MANIFEST_NAME, DEFAULT_MAX_DEPTH};
use crate::plugin_system::class::PluginClass;
use crate::plugin_system::features::StaticFeatureToggles;
use crate::plugin_system::finder::FinderOptions;
use crate::storage::error::StorageSystemError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// Settings for a discovery and selection run.
///
/// Every field is optional in the file; command-line flags take precedence
/// over whatever is loaded here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Directories to scan for plugins, in precedence-neutral discovery order
    pub plugin_roots: Vec<PathBuf>,
    /// Feature flag name to enabled state
    pub feature_toggles: HashMap<String, bool>,
    /// Class the discovered plugins are loaded as
    pub class: Option<PluginClass>,
    /// Manifest file name, `plugin.json` when unset
    pub manifest_name: Option<String>,
    /// Maximum directory depth below each root
    pub max_depth: Option<usize>,
}

impl FinderConfig {
    /// Load a configuration file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self, StorageSystemError> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| StorageSystemError::UnsupportedConfigFormat(path.display().to_string()))?;

        if !path.is_file() {
            return Err(StorageSystemError::FileNotFound(path.to_path_buf()));
        }

        let data = fs::read_to_string(path)
            .map_err(|e| StorageSystemError::io(e, "read_config", path.to_path_buf()))?;
        let config = Self::deserialize(&data, format)?;
        log::debug!("Loaded {} configuration from {}", format.extension(), path.display());
        Ok(config)
    }

    /// Deserialize from string based on format
    pub fn deserialize(data: &str, format: ConfigFormat) -> Result<Self, StorageSystemError> {
        match format {
            ConfigFormat::Json => serde_json::from_str(data)
                .map_err(|e| StorageSystemError::deserialization("JSON", e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data)
                .map_err(|e| StorageSystemError::deserialization("YAML", e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data)
                .map_err(|e| StorageSystemError::deserialization("TOML", e)),
        }
    }

    /// Flags set to `true` in `feature_toggles`
    pub fn feature_toggles(&self) -> StaticFeatureToggles {
        self.feature_toggles
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(flag, _)| flag.clone())
            .collect()
    }

    /// Finder options for the given roots, falling back to `plugin_roots`
    pub fn finder_options(&self, roots: Vec<PathBuf>) -> FinderOptions {
        let roots = if roots.is_empty() { self.plugin_roots.clone() } else { roots };
        FinderOptions {
            roots,
            manifest_name: self
                .manifest_name
                .clone()
                .unwrap_or_else(|| DEFAULT_MANIFEST_NAME.to_string()),
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        }
    }
}
