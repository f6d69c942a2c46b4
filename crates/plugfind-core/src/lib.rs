pub mod kernel;
pub mod plugin_system;
pub mod storage;

// Re-export key public types for easier use by the binary
pub use kernel::error::{Error, Result};
pub use plugin_system::{
    DuplicateSelector, PluginCandidate, PluginClass, PluginFinder, PluginManifest,
    StaticFeatureToggles,
};
pub use storage::FinderConfig;

#[cfg(test)]
mod tests;
