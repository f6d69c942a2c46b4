use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::kernel::constants::DIST_DIR_NAME;

/// Location a plugin was discovered in.
///
/// The selector only ever asks for the final segment of [`base`](PluginFs::base),
/// so implementations backed by something other than a local directory only
/// need to report a meaningful path.
pub trait PluginFs: Send + Sync + Debug {
    /// Directory holding the plugin's manifest
    fn base(&self) -> &Path;

    /// Final path segment of [`base`](PluginFs::base), if it is valid UTF-8
    fn base_name(&self) -> Option<&str> {
        self.base().file_name().and_then(|name| name.to_str())
    }

    /// Whether the plugin sits directly in a `dist` directory
    fn in_dist_folder(&self) -> bool {
        self.base_name() == Some(DIST_DIR_NAME)
    }
}

/// Plugin directory on the local filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPluginFs {
    base_path: PathBuf,
}

impl LocalPluginFs {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }
}

impl PluginFs for LocalPluginFs {
    fn base(&self) -> &Path {
        &self.base_path
    }
}
