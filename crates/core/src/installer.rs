//! Installing and uninstalling plugins.
//!
//! Installation is not transactional. A failure after the install directory
//! is created leaves files without a registry entry, which [`crate::tidy`]
//! later removes.

use crate::archive::extract_tar_gz;
use crate::download::Downloader;
use crate::metadata::PluginMetadata;
use crate::paths::{Storage, ensure_dir};
use crate::platform::Platform;
use crate::registry::{InstalledPlugin, Registry};
use crate::selector::select;
use crate::source::MetadataSource;
use crate::{Error, Result};
use tracing::{debug, info};

/// Installs plugins from a metadata source into storage.
pub struct Installer<'a> {
    storage: &'a Storage,
    source: &'a dyn MetadataSource,
    downloader: &'a dyn Downloader,
    platform: Platform,
}

impl<'a> Installer<'a> {
    /// Create an installer targeting the running platform.
    #[must_use]
    pub fn new(
        storage: &'a Storage,
        source: &'a dyn MetadataSource,
        downloader: &'a dyn Downloader,
    ) -> Self {
        Self {
            storage,
            source,
            downloader,
            platform: Platform::current(),
        }
    }

    /// Select builds for `platform` instead of the running one.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Install the plugin called `name` from the metadata source.
    pub fn install(&self, name: &str) -> Result<InstalledPlugin> {
        if Registry::load(self.storage)?.contains(name) {
            return Err(Error::already_installed(name));
        }

        info!(plugin = name, source = %self.source.location(), "fetching plugin metadata");
        let metadata = self.source.fetch_metadata(name)?;
        self.install_metadata(name, &metadata)
    }

    /// Install `name` using already fetched metadata.
    pub fn install_metadata(&self, name: &str, metadata: &PluginMetadata) -> Result<InstalledPlugin> {
        let mut registry = Registry::load(self.storage)?;
        if registry.contains(name) {
            return Err(Error::already_installed(name));
        }
        if metadata.spec.versions.is_empty() {
            return Err(Error::NoVersions {
                name: name.to_string(),
            });
        }

        let (version, artifact) = select(metadata, &self.platform)?;
        let platform = self.platform.to_string();
        let install_dir = self.storage.install_dir(name, &version.version, &platform);
        ensure_dir(&install_dir)?;

        let archive = install_dir.join(format!("{name}.tar.gz"));
        info!(plugin = name, version = %version.version, uri = %artifact.uri, "downloading plugin");
        let bytes = self
            .downloader
            .download(&artifact.uri, &archive, artifact.checksum())?;
        debug!(plugin = name, bytes, path = %archive.display(), "downloaded archive");

        extract_tar_gz(&archive, &install_dir)?;
        metadata.save(&self.storage.sidecar_path(name))?;

        let installed = InstalledPlugin {
            name: name.to_string(),
            version: version.version.clone(),
            platform,
            bin: artifact.bin.clone(),
        };
        registry.add(installed.clone());
        registry.save(self.storage)?;

        info!(plugin = name, version = %installed.version, "plugin installed");
        Ok(installed)
    }
}

/// Remove `name` from the registry and delete its storage directory.
///
/// The registry is saved before any files are deleted.
pub fn uninstall(storage: &Storage, name: &str) -> Result<()> {
    let mut registry = Registry::load(storage)?;
    registry.find_by_name(name)?;

    let removed = registry.remove(name);
    registry.save(storage)?;
    debug!(plugin = name, entries = removed, "removed registry entries");

    let dir = storage.plugin_dir(name);
    match std::fs::remove_dir_all(&dir) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "plugin directory already absent");
        }
        Err(e) => return Err(Error::io(e, &dir, "remove directory")),
    }

    info!(plugin = name, "plugin uninstalled");
    Ok(())
}
