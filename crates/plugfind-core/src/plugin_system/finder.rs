use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tokio::fs;

use crate::kernel::constants::{DEFAULT_MANIFEST_NAME, DEFAULT_MAX_DEPTH, FINDER_LOG_TARGET};
use crate::kernel::error::{Error as KernelError, Result as KernelResult};
use crate::plugin_system::candidate::PluginCandidate;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::manifest::PluginManifest;

/// Where and how deep to look for plugin manifests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderOptions {
    /// Base directories to search for plugins
    pub roots: Vec<PathBuf>,
    /// Manifest file name to look for in each directory
    pub manifest_name: String,
    /// Directory levels below a root that are still searched
    pub max_depth: usize,
}

impl FinderOptions {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A manifest that was found but could not be turned into a candidate
#[derive(Debug)]
pub struct SkippedManifest {
    pub path: PathBuf,
    pub error: PluginSystemError,
}

/// Result of walking the plugin roots
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Every plugin found, duplicates included, in discovery order
    pub candidates: Vec<PluginCandidate>,
    pub skipped: Vec<SkippedManifest>,
}

/// Walks plugin roots and collects one candidate per manifest found.
///
/// Missing roots are skipped with a warning. A directory holding a manifest
/// is still descended into, so nested plugins (such as a `dist` build inside
/// a source checkout) are found too.
#[derive(Debug, Clone)]
pub struct PluginFinder {
    options: FinderOptions,
}

impl PluginFinder {
    pub fn new(options: FinderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FinderOptions {
        &self.options
    }

    /// Scan every root, in order
    pub async fn find(&self) -> KernelResult<ScanReport> {
        let mut report = ScanReport::default();

        for root in &self.options.roots {
            let metadata = match fs::metadata(root).await {
                Ok(meta) => meta,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::warn!(target: FINDER_LOG_TARGET, "Skipping missing plugin root {}", root.display());
                    continue;
                }
                Err(e) => return Err(KernelError::io(e, "metadata", root.clone())),
            };

            if !metadata.is_dir() {
                log::warn!(target: FINDER_LOG_TARGET, "Skipping plugin root {}: not a directory", root.display());
                continue;
            }

            self.scan_directory_boxed(root.clone(), 0, &mut report).await?;
        }

        log::info!(
            target: FINDER_LOG_TARGET,
            "Found {} plugin manifests ({} skipped)",
            report.candidates.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Helper function that returns a boxed future for recursive scanning
    fn scan_directory_boxed<'a>(
        &'a self,
        dir: PathBuf,
        depth: usize,
        report: &'a mut ScanReport,
    ) -> Pin<Box<dyn Future<Output = KernelResult<()>> + Send + 'a>> {
        Box::pin(self.scan_directory_inner(dir, depth, report))
    }

    async fn scan_directory_inner(
        &self,
        dir: PathBuf,
        depth: usize,
        report: &mut ScanReport,
    ) -> KernelResult<()> {
        let manifest_path = dir.join(&self.options.manifest_name);
        if is_file(&manifest_path).await {
            match load_candidate(&dir, &manifest_path).await {
                Ok(candidate) => {
                    log::debug!(
                        target: FINDER_LOG_TARGET,
                        "Found plugin {} ({}) in {}",
                        candidate.id(),
                        candidate.version(),
                        dir.display()
                    );
                    report.candidates.push(candidate);
                }
                Err(error) => {
                    log::warn!(target: FINDER_LOG_TARGET, "Skipping {}: {}", manifest_path.display(), error);
                    report.skipped.push(SkippedManifest {
                        path: manifest_path,
                        error,
                    });
                }
            }
        }

        if depth >= self.options.max_depth {
            return Ok(());
        }

        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| KernelError::io(e, "read_dir", dir.clone()))?;

        let mut subdirs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| KernelError::io(e, "read_dir", dir.clone()))?
        {
            let entry_path = entry.path();
            match fs::metadata(&entry_path).await {
                Ok(meta) if meta.is_dir() => subdirs.push(entry_path),
                Ok(_) => {}
                Err(e) => {
                    log::warn!(target: FINDER_LOG_TARGET, "Failed to get metadata for {}: {}", entry_path.display(), e);
                }
            }
        }
        // read_dir order is platform dependent
        subdirs.sort();

        for subdir in subdirs {
            if let Err(e) = self.scan_directory_boxed(subdir.clone(), depth + 1, report).await {
                log::warn!(target: FINDER_LOG_TARGET, "Error scanning subdirectory {}: {}", subdir.display(), e);
            }
        }

        Ok(())
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.map(|meta| meta.is_file()).unwrap_or(false)
}

async fn load_candidate(dir: &Path, manifest_path: &Path) -> Result<PluginCandidate, PluginSystemError> {
    let content = fs::read_to_string(manifest_path)
        .await
        .map_err(|e| PluginSystemError::io(e, "read_manifest", manifest_path.to_path_buf()))?;
    let manifest = PluginManifest::from_json(&content, manifest_path)?;
    Ok(PluginCandidate::local(manifest, dir))
}
