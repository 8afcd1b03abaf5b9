//! Discovery of plugin executables on a search path.
//!
//! Any file whose name starts with the plugin prefix (`konveyor-`) in a
//! search directory is a plugin. Problems with individual directories or
//! files are logged and skipped so one bad `PATH` entry never hides the rest.

use crate::settings::Settings;
use crate::{Error, Result};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// How scanned plugins are rendered for listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Absolute path of each executable.
    #[default]
    FullPath,
    /// File name only.
    NameOnly,
}

/// A plugin file found on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedPlugin {
    /// File name including the prefix.
    pub file_name: String,
    /// Full path of the file.
    pub path: PathBuf,
    /// Whether any execute bit is set.
    pub executable: bool,
}

impl ScannedPlugin {
    /// Render according to `mode`.
    #[must_use]
    pub fn render(&self, mode: ScanMode) -> String {
        match mode {
            ScanMode::FullPath => self.path.display().to_string(),
            ScanMode::NameOnly => self.file_name.clone(),
        }
    }
}

/// Scans directories for files carrying the plugin prefix.
#[derive(Debug, Clone)]
pub struct PathScanner {
    prefix: String,
    builtins: Vec<String>,
}

impl PathScanner {
    /// Create a scanner for `prefix` that warns about collisions with `builtins`.
    #[must_use]
    pub fn new(prefix: impl Into<String>, builtins: Vec<String>) -> Self {
        Self {
            prefix: prefix.into(),
            builtins,
        }
    }

    /// Create a scanner from the prefix and built-in commands in `settings`.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.prefix(), settings.builtin_commands().to_vec())
    }

    /// Scan `dirs` and return plugin files in search order.
    ///
    /// Each file name is reported once; a file shadowed by an earlier
    /// directory is dropped with a warning. Non-executable files and files
    /// that collide with a built-in command are reported with a warning.
    pub fn scan(&self, dirs: &[PathBuf]) -> Result<Vec<ScannedPlugin>> {
        if dirs.is_empty() {
            return Err(Error::configuration("the list of directories is empty"));
        }

        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for dir in unique_dirs(dirs) {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory, skipping");
                    continue;
                }
            };

            let mut names: Vec<(String, PathBuf)> = entries
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                        None
                    }
                })
                .filter_map(|entry| {
                    let name = entry.file_name().into_string().ok()?;
                    name.starts_with(&self.prefix).then(|| (name, entry.path()))
                })
                .collect();
            names.sort();

            for (file_name, path) in names {
                let metadata = match std::fs::metadata(&path) {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to inspect file, skipping");
                        continue;
                    }
                };
                if metadata.is_dir() {
                    continue;
                }
                if !seen.insert(file_name.clone()) {
                    tracing::warn!(
                        plugin = %file_name,
                        dir = %dir.display(),
                        "plugin found in multiple directories, ignoring this copy"
                    );
                    continue;
                }

                let executable = is_executable(&metadata);
                if !executable {
                    tracing::warn!(plugin = %file_name, dir = %dir.display(), "plugin file is not executable");
                } else if self.is_builtin(&file_name) {
                    tracing::warn!(plugin = %file_name, "plugin has the same name as a built-in command");
                }

                found.push(ScannedPlugin {
                    file_name,
                    path,
                    executable,
                });
            }
        }
        Ok(found)
    }

    /// Scan `dirs` and render each plugin according to `mode`.
    pub fn list(&self, dirs: &[PathBuf], mode: ScanMode) -> Result<Vec<String>> {
        Ok(self
            .scan(dirs)?
            .iter()
            .map(|plugin| plugin.render(mode))
            .collect())
    }

    /// Find the executable implementing `command` in `dirs`.
    ///
    /// Directories are searched in order and non-executable candidates are
    /// passed over, the way a shell resolves commands.
    #[must_use]
    pub fn find_executable(&self, dirs: &[PathBuf], command: &str) -> Option<PathBuf> {
        let file_name = format!("{}{command}", self.prefix);
        unique_dirs(dirs).into_iter().find_map(|dir| {
            candidate_names(&file_name)
                .into_iter()
                .map(|name| dir.join(name))
                .find(|path| {
                    std::fs::metadata(path)
                        .is_ok_and(|m| m.is_file() && is_executable(&m))
                })
        })
    }

    fn is_builtin(&self, file_name: &str) -> bool {
        let name = file_name.strip_prefix(&self.prefix).unwrap_or(file_name);
        let name = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);
        self.builtins.iter().any(|b| b == name)
    }
}

/// Directories listed in the `PATH` environment variable.
#[must_use]
pub fn search_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Trim, drop empty entries, resolve real paths and dedupe in first-seen order.
fn unique_dirs(dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    dirs.iter()
        .filter_map(|dir| {
            let trimmed = dir.to_string_lossy();
            let trimmed = trimmed.trim();
            if trimmed.is_empty() {
                return None;
            }
            match std::fs::canonicalize(trimmed) {
                Ok(real) => Some(real),
                Err(e) => {
                    tracing::debug!(dir = trimmed, error = %e, "failed to resolve directory, skipping");
                    None
                }
            }
        })
        .filter(|real| seen.insert(real.clone()))
        .collect()
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    metadata.is_file()
}

#[cfg(windows)]
fn candidate_names(file_name: &str) -> Vec<OsString> {
    [".exe", ".cmd", ".bat", ""]
        .iter()
        .map(|ext| OsString::from(format!("{file_name}{ext}")))
        .collect()
}

#[cfg(not(windows))]
fn candidate_names(file_name: &str) -> Vec<OsString> {
    vec![OsString::from(file_name)]
}
