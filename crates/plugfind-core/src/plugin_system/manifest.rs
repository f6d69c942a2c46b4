use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::plugin_system::error::PluginSystemError;

/// The parts of a `plugin.json` manifest that discovery needs.
///
/// Unknown fields are ignored and nothing is validated beyond the JSON
/// shape; a missing `info.version` reads as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique identifier for the plugin
    pub id: String,

    /// Human-readable name
    #[serde(default)]
    pub name: String,

    /// Plugin type as declared by the author (e.g. "panel", "datasource")
    #[serde(default, rename = "type")]
    pub plugin_type: String,

    /// Descriptive block holding the version
    #[serde(default)]
    pub info: PluginInfo,
}

/// The `info` block of a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Declared version, as written
    #[serde(default)]
    pub version: String,

    /// Plugin description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PluginManifest {
    /// Create a new plugin manifest
    pub fn new(id: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            plugin_type: String::new(),
            info: PluginInfo {
                version: version.to_string(),
                description: None,
            },
        }
    }

    /// Parse manifest JSON read from `path`
    pub fn from_json(data: &str, path: &Path) -> Result<Self, PluginSystemError> {
        serde_json::from_str(data).map_err(|e| PluginSystemError::ManifestError {
            path: path.to_path_buf(),
            message: format!("Failed to parse manifest JSON: {}", e),
            source: Some(Box::new(e)),
        })
    }

    /// Declared version string
    pub fn version(&self) -> &str {
        &self.info.version
    }
}

/// Builder for creating a plugin manifest
pub struct ManifestBuilder {
    manifest: PluginManifest,
}

impl ManifestBuilder {
    /// Create a new manifest builder
    pub fn new(id: &str) -> Self {
        Self {
            manifest: PluginManifest::new(id, ""),
        }
    }

    /// Set the plugin name
    pub fn name(mut self, name: &str) -> Self {
        self.manifest.name = name.to_string();
        self
    }

    /// Set the plugin type
    pub fn plugin_type(mut self, plugin_type: &str) -> Self {
        self.manifest.plugin_type = plugin_type.to_string();
        self
    }

    /// Set the declared version
    pub fn version(mut self, version: &str) -> Self {
        self.manifest.info.version = version.to_string();
        self
    }

    /// Set the plugin description
    pub fn description(mut self, description: &str) -> Self {
        self.manifest.info.description = Some(description.to_string());
        self
    }

    /// Build the manifest
    pub fn build(self) -> PluginManifest {
        self.manifest
    }
}
