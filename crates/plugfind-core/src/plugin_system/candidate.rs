use std::path::Path;
use std::sync::Arc;

use crate::plugin_system::fs::{LocalPluginFs, PluginFs};
use crate::plugin_system::manifest::PluginManifest;

/// One discovered plugin installation, before duplicates are removed.
///
/// Cloning is cheap: the filesystem handle is shared.
#[derive(Debug, Clone)]
pub struct PluginCandidate {
    manifest: PluginManifest,
    fs: Arc<dyn PluginFs>,
}

impl PluginCandidate {
    pub fn new(manifest: PluginManifest, fs: Arc<dyn PluginFs>) -> Self {
        Self { manifest, fs }
    }

    /// Candidate rooted in a local directory
    pub fn local(manifest: PluginManifest, base: impl AsRef<Path>) -> Self {
        Self::new(manifest, Arc::new(LocalPluginFs::new(base.as_ref())))
    }

    pub fn id(&self) -> &str {
        &self.manifest.id
    }

    /// Declared version, as written in the manifest
    pub fn version(&self) -> &str {
        self.manifest.version()
    }

    pub fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    pub fn fs(&self) -> &Arc<dyn PluginFs> {
        &self.fs
    }

    /// Directory the candidate was discovered in
    pub fn base(&self) -> &Path {
        self.fs.base()
    }

    pub fn in_dist_folder(&self) -> bool {
        self.fs.in_dist_folder()
    }
}
