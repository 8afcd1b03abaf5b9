//! The local registry of installed plugins.
//!
//! A single YAML document at `<storage>/cache.yaml` records every plugin
//! konveyor installed. The whole document is rewritten on each mutation and
//! there is no locking, so two concurrent invocations that both mutate it can
//! lose one of the writes.

use crate::metadata::{API_VERSION, ObjectMeta};
use crate::paths::{Storage, write_atomic};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// `kind` of the registry document.
pub const REGISTRY_KIND: &str = "Cache";

/// `metadata.name` of the registry document.
pub const REGISTRY_NAME: &str = "cache";

/// The registry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    /// Document API version.
    pub api_version: String,
    /// Document kind.
    pub kind: String,
    /// Document name.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Installed plugins.
    #[serde(default)]
    pub spec: RegistrySpec,
}

/// Body of the registry document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySpec {
    /// Installed plugins in installation order.
    #[serde(default)]
    pub installed: Vec<InstalledPlugin>,
}

/// A plugin recorded as installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPlugin {
    /// Plugin name, without the filename prefix.
    pub name: String,
    /// Installed version.
    pub version: String,
    /// Canonical `os-arch` platform string.
    pub platform: String,
    /// Entrypoint relative to the version/platform directory.
    pub bin: String,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: REGISTRY_KIND.to_string(),
            metadata: ObjectMeta {
                name: REGISTRY_NAME.to_string(),
            },
            spec: RegistrySpec::default(),
        }
    }

    /// Load the registry from storage.
    ///
    /// A missing registry file is not an error: an empty registry is written
    /// out and returned.
    pub fn load(storage: &Storage) -> Result<Self> {
        let path = storage.registry_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "registry not found, creating an empty one");
                let registry = Self::new();
                registry.save(storage)?;
                return Ok(registry);
            }
            Err(e) => return Err(Error::io(e, &path, "read")),
        };

        let registry: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::parse(format!("registry {}", path.display()), e.to_string()))?;

        if registry.api_version != API_VERSION {
            tracing::warn!(
                path = %path.display(),
                found = %registry.api_version,
                expected = API_VERSION,
                "registry has an unexpected apiVersion"
            );
        }

        Ok(registry)
    }

    /// Persist the registry to storage, replacing the previous document.
    pub fn save(&self, storage: &Storage) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::io_no_path(std::io::Error::other(e), "serialize registry"))?;
        write_atomic(&storage.registry_path(), content.as_bytes())
    }

    /// Installed plugins in installation order.
    #[must_use]
    pub fn installed(&self) -> &[InstalledPlugin] {
        &self.spec.installed
    }

    /// First entry with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&InstalledPlugin> {
        self.spec.installed.iter().find(|p| p.name == name)
    }

    /// First entry with the given name, or [`Error::NotInstalled`].
    pub fn find_by_name(&self, name: &str) -> Result<&InstalledPlugin> {
        self.find(name).ok_or_else(|| Error::not_installed(name))
    }

    /// Whether any entry has the given name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Append an entry.
    pub fn add(&mut self, plugin: InstalledPlugin) {
        self.spec.installed.push(plugin);
    }

    /// Remove every entry with the given name, returning how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.spec.installed.len();
        self.spec.installed.retain(|p| p.name != name);
        before - self.spec.installed.len()
    }
}
