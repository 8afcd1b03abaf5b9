//! Mapping a command name to the executable that implements it.

use crate::Result;
use crate::registry::{InstalledPlugin, Registry};
use crate::scanner::{PathScanner, search_path};
use crate::settings::Settings;
use std::path::PathBuf;

/// Where a command's executable was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Installed by konveyor and recorded in the registry.
    Installed {
        /// Registry entry.
        plugin: InstalledPlugin,
        /// Entrypoint path.
        path: PathBuf,
    },
    /// Found on the search path.
    OnPath {
        /// Executable path.
        path: PathBuf,
    },
}

impl Resolution {
    /// The executable to run.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Installed { path, .. } | Self::OnPath { path } => path,
        }
    }
}

/// Resolves commands against the registry, then the search path.
#[derive(Debug)]
pub struct Resolver<'a> {
    settings: &'a Settings,
    search_dirs: Vec<PathBuf>,
}

impl<'a> Resolver<'a> {
    /// Resolve against the process `PATH`.
    #[must_use]
    pub fn new(settings: &'a Settings) -> Self {
        Self::with_search_dirs(settings, search_path())
    }

    /// Resolve against explicit search directories.
    #[must_use]
    pub fn with_search_dirs(settings: &'a Settings, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            settings,
            search_dirs,
        }
    }

    /// Find the executable for `command`, or `None` when nothing provides it.
    ///
    /// A registry entry is authoritative: its path is returned without
    /// checking the file exists and the search path is not consulted.
    pub fn resolve(&self, command: &str) -> Result<Option<Resolution>> {
        let storage = self.settings.storage();
        let registry = Registry::load(storage)?;

        if let Some(plugin) = registry.find(command) {
            let path = storage.bin_path(plugin);
            tracing::debug!(command, path = %path.display(), "resolved from registry");
            return Ok(Some(Resolution::Installed {
                plugin: plugin.clone(),
                path,
            }));
        }

        let scanner = PathScanner::from_settings(self.settings);
        Ok(scanner
            .find_executable(&self.search_dirs, command)
            .map(|path| {
                tracing::debug!(command, path = %path.display(), "resolved from search path");
                Resolution::OnPath { path }
            }))
    }
}
