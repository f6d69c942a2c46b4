//! # Plugfind Plugin System Errors
//!
//! Defines error types for plugin discovery.
//!
//! [`PluginSystemError`] covers manifest reading and parsing failures and
//! invalid plugin class names. Duplicate selection itself has no error
//! conditions and never produces one of these.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PluginSystemError {
    #[error("Plugin manifest error for '{path}': {message}")]
    ManifestError {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown plugin class '{0}' (expected core, bundled or external)")]
    InvalidClass(String),
}

impl PluginSystemError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        PluginSystemError::Io {
            source,
            operation: operation.into(),
            path,
        }
    }
}
