/// File name of a plugin manifest inside a plugin directory
pub const DEFAULT_MANIFEST_NAME: &str = "plugin.json";

/// Final path segment marking a bundled distribution directory
pub const DIST_DIR_NAME: &str = "dist";

/// How deep below a plugin root the finder descends by default
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Log target used by the duplicate selector
pub const DUPE_LOG_TARGET: &str = "plugins.duplicate-selector";

/// Log target used by the plugin finder
pub const FINDER_LOG_TARGET: &str = "plugins.finder";
