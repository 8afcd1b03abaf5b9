//! Reconciling plugin storage with the registry.
//!
//! An interrupted install leaves a plugin directory behind with no registry
//! entry. Tidy removes such directories along with any stray files directly
//! under `<storage>/plugins`.

use crate::Result;
use crate::paths::Storage;
use crate::registry::Registry;
use std::path::PathBuf;

/// What a tidy pass removed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TidyReport {
    /// Plugin directories with no registry entry.
    pub removed_dirs: Vec<PathBuf>,
    /// Files that do not belong under the plugins directory.
    pub removed_files: Vec<PathBuf>,
    /// Entries that could not be removed.
    pub failed: Vec<PathBuf>,
}

impl TidyReport {
    /// Whether nothing needed removing.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.removed_dirs.is_empty() && self.removed_files.is_empty() && self.failed.is_empty()
    }
}

/// Remove plugin directories and files that the registry does not account for.
///
/// Directories are matched on name only. The registry is saved again even
/// when nothing changed.
pub fn tidy(storage: &Storage) -> Result<TidyReport> {
    let registry = Registry::load(storage)?;
    let plugins_dir = storage.plugins_dir();
    let mut report = TidyReport::default();

    let entries = match std::fs::read_dir(&plugins_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(dir = %plugins_dir.display(), "plugins directory does not exist");
            registry.save(storage)?;
            return Ok(report);
        }
        Err(e) => return Err(crate::Error::io(e, &plugins_dir, "read directory")),
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %plugins_dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        let is_dir = match entry.file_type() {
            Ok(file_type) => file_type.is_dir(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to inspect entry");
                report.failed.push(path);
                continue;
            }
        };

        if !is_dir {
            tracing::info!(path = %path.display(), "removing stray file");
            match std::fs::remove_file(&path) {
                Ok(()) => report.removed_files.push(path),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove file");
                    report.failed.push(path);
                }
            }
            continue;
        }

        let name = entry.file_name();
        if name.to_str().is_some_and(|name| registry.contains(name)) {
            continue;
        }

        tracing::info!(path = %path.display(), "removing broken plugin");
        match std::fs::remove_dir_all(&path) {
            Ok(()) => report.removed_dirs.push(path),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove directory");
                report.failed.push(path);
            }
        }
    }

    registry.save(storage)?;
    Ok(report)
}
