//! Storage layout for installed plugins.
//!
//! Everything konveyor owns lives under a single storage root:
//!
//! ```text
//! <root>/cache.yaml                                   registry document
//! <root>/plugins/<name>/<name>.yaml                   metadata sidecar
//! <root>/plugins/<name>/<version>/<os-arch>/...       extracted archive
//! ```
//!
//! The root resolves from `KONVEYOR_STORAGE_DIR` first and falls back to
//! `~/.konveyor`.

use crate::registry::InstalledPlugin;
use crate::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the storage directory under the home directory.
pub const STORAGE_DIR_NAME: &str = ".konveyor";

/// Environment variable overriding the storage root.
pub const STORAGE_DIR_ENV: &str = "KONVEYOR_STORAGE_DIR";

/// Directory under the storage root holding one subdirectory per plugin.
pub const PLUGINS_DIR_NAME: &str = "plugins";

/// File name of the registry document.
pub const REGISTRY_FILE_NAME: &str = "cache.yaml";

/// Permission bits for directories konveyor creates.
pub const DIR_MODE: u32 = 0o755;

/// Permission bits for files konveyor writes.
pub const FILE_MODE: u32 = 0o644;

/// Resolve the storage root.
///
/// Resolution order:
/// 1. `KONVEYOR_STORAGE_DIR` environment variable
/// 2. Home directory + `/.konveyor`
/// 3. `.konveyor` relative to the working directory
#[must_use]
pub fn default_storage_root() -> PathBuf {
    if let Ok(dir) = std::env::var(STORAGE_DIR_ENV)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }

    dirs::home_dir().map_or_else(
        || {
            tracing::warn!("could not determine the home directory, using the working directory");
            PathBuf::from(STORAGE_DIR_NAME)
        },
        |home| home.join(STORAGE_DIR_NAME),
    )
}

/// Handle to the on-disk storage layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Create a storage handle rooted at `root`. Nothing is created on disk.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the registry document.
    #[must_use]
    pub fn registry_path(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE_NAME)
    }

    /// Directory holding all plugin directories.
    #[must_use]
    pub fn plugins_dir(&self) -> PathBuf {
        self.root.join(PLUGINS_DIR_NAME)
    }

    /// Directory owned by a single plugin.
    #[must_use]
    pub fn plugin_dir(&self, name: &str) -> PathBuf {
        self.plugins_dir().join(name)
    }

    /// Path of the metadata sidecar for a plugin.
    #[must_use]
    pub fn sidecar_path(&self, name: &str) -> PathBuf {
        self.plugin_dir(name).join(format!("{name}.yaml"))
    }

    /// Directory an archive for `version` on `platform` is unpacked into.
    #[must_use]
    pub fn install_dir(&self, name: &str, version: &str, platform: &str) -> PathBuf {
        self.plugin_dir(name).join(version).join(platform)
    }

    /// Absolute path of an installed plugin's executable.
    #[must_use]
    pub fn bin_path(&self, plugin: &InstalledPlugin) -> PathBuf {
        self.install_dir(&plugin.name, &plugin.version, &plugin.platform)
            .join(&plugin.bin)
    }
}

/// Create `path` and any missing parents with [`DIR_MODE`].
pub fn ensure_dir(path: &Path) -> Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder
        .create(path)
        .map_err(|e| Error::io(e, path, "create directory"))
}

/// Write `contents` to `path` atomically with [`FILE_MODE`].
///
/// The bytes first land in a temporary file beside the target which is
/// renamed over it, so readers never observe a partially written file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ensure_dir(parent)?;

    let mut file = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| Error::io(e, parent, "create temporary file"))?;
    file.write_all(contents)
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| Error::io(e, file.path(), "write"))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(FILE_MODE))
            .map_err(|e| Error::io(e, file.path(), "set permissions"))?;
    }

    file.persist(path)
        .map_err(|e| Error::io(e.error, path, "rename"))?;
    Ok(())
}
