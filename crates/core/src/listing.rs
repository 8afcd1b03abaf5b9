//! Listing plugins known to the registry and present on the search path.

use crate::Result;
use crate::registry::Registry;
use crate::scanner::{PathScanner, ScanMode};
use crate::settings::Settings;
use std::path::PathBuf;

/// Registry plugins followed by search path plugins.
///
/// In [`ScanMode::NameOnly`] registry plugins are listed by name and search
/// path plugins by file name; otherwise both are listed by entrypoint path.
/// An empty `search_dirs` is logged and only registry plugins are returned.
pub fn list_plugins(settings: &Settings, search_dirs: &[PathBuf], mode: ScanMode) -> Result<Vec<String>> {
    let storage = settings.storage();
    let registry = Registry::load(storage)?;

    let mut plugins: Vec<String> = registry
        .installed()
        .iter()
        .map(|plugin| match mode {
            ScanMode::NameOnly => plugin.name.clone(),
            ScanMode::FullPath => storage.bin_path(plugin).display().to_string(),
        })
        .collect();

    if search_dirs.is_empty() {
        tracing::warn!("the search path is empty, skipping plugins on PATH");
    } else {
        plugins.extend(PathScanner::from_settings(settings).list(search_dirs, mode)?);
    }
    Ok(plugins)
}
