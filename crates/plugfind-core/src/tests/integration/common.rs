#![cfg(test)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};

/// Temporary directory tree of plugin installations
pub struct PluginTree {
    dir: TempDir,
}

impl PluginTree {
    pub fn new() -> Self {
        Self {
            dir: tempdir().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `<root>/<relative>/plugin.json` and returns the plugin directory
    pub fn plugin(&self, relative: &str, id: &str, version: &str) -> PathBuf {
        let dir = self.dir.path().join(relative);
        fs::create_dir_all(&dir).expect("Failed to create plugin directory");
        let manifest = format!(
            r#"{{ "id": "{}", "name": "{}", "type": "panel", "info": {{ "version": "{}" }} }}"#,
            id, id, version
        );
        fs::write(dir.join("plugin.json"), manifest).expect("Failed to write manifest");
        dir
    }

    /// Writes an arbitrary file relative to the tree root
    pub fn file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, contents).expect("Failed to write file");
        path
    }
}
