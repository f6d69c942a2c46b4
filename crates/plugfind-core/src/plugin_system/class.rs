use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::plugin_system::error::PluginSystemError;

/// Why a set of plugins is being loaded.
///
/// Only [`PluginClass::Core`] changes how duplicates are resolved; the other
/// classes share the general rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginClass {
    /// Plugins shipped with the host itself
    Core,
    /// Plugins bundled alongside the host but not part of it
    Bundled,
    /// Externally installed plugins
    #[default]
    External,
}

impl PluginClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginClass::Core => "core",
            PluginClass::Bundled => "bundled",
            PluginClass::External => "external",
        }
    }

    pub fn is_core(&self) -> bool {
        matches!(self, PluginClass::Core)
    }
}

impl fmt::Display for PluginClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluginClass {
    type Err = PluginSystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "core" => Ok(PluginClass::Core),
            "bundled" => Ok(PluginClass::Bundled),
            "external" => Ok(PluginClass::External),
            _ => Err(PluginSystemError::InvalidClass(s.to_string())),
        }
    }
}
