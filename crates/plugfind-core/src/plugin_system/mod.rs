//! # Plugfind Plugin System
//!
//! Discovery of plugin installations across several roots and selection of a
//! single installation per plugin identifier.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`dupe`]**: The duplicate selector ([`DuplicateSelector`]). Groups
//!   candidates by identifier and version and reduces each group to one winner
//!   using location and version precedence.
//! - **[`candidate`]**: A discovered installation ([`PluginCandidate`]): its
//!   manifest plus the directory it was found in.
//! - **[`class`]**: Why plugins are being loaded ([`PluginClass`]).
//! - **[`manifest`]**: The `plugin.json` model ([`PluginManifest`]).
//! - **[`version`]**: Lenient version parsing and the [`VersionKey`] buckets.
//! - **[`features`]**: The feature toggle capability consulted for core
//!   plugins ([`FeatureToggles`]).
//! - **[`diagnostics`]**: Trace events emitted by the selector and the sinks
//!   that receive them.
//! - **[`fs`]**: The filesystem abstraction ([`PluginFs`]) a candidate's
//!   location is reported through.
//! - **[`finder`]**: Async walk of plugin roots producing candidates
//!   ([`PluginFinder`]).
//! - **[`error`]**: Errors raised while discovering plugins
//!   ([`PluginSystemError`](error::PluginSystemError)).
pub mod candidate;
pub mod class;
pub mod diagnostics;
pub mod dupe;
pub mod error;
pub mod features;
pub mod finder;
pub mod fs;
pub mod manifest;
pub mod version;

pub use candidate::PluginCandidate;
pub use class::PluginClass;
pub use diagnostics::{LogSink, MemorySink, TraceEvent, TraceSink};
pub use dupe::{CompareReason, Comparison, DuplicateSelector, PluginGroup, VersionBucket};
pub use features::{FeatureToggles, StaticFeatureToggles, FLAG_EXTERNAL_CORE_PLUGINS};
pub use finder::{FinderOptions, PluginFinder, ScanReport, SkippedManifest};
pub use fs::{LocalPluginFs, PluginFs};
pub use manifest::{ManifestBuilder, PluginManifest};
pub use version::{parse_plugin_version, VersionKey};
// Test module declaration
#[cfg(test)]
mod tests;
