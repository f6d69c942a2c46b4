//! # Plugfind Core Storage
//!
//! Loading of on-disk configuration for discovery runs. The format is picked
//! from the file extension; TOML and YAML support sit behind the
//! `toml-config` and `yaml-config` features.
pub mod config;
pub mod error;

/// Re-export key types
pub use config::{ConfigFormat, FinderConfig};
pub use error::StorageSystemError;
