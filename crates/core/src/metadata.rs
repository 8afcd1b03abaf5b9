//! Plugin metadata documents.
//!
//! The same document is served by the remote plugin repository and kept as a
//! sidecar next to an installed plugin.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// API version stamped on every document konveyor reads or writes.
pub const API_VERSION: &str = "cli.konveyor.io/v1alpha1";

/// `kind` of a plugin metadata document.
pub const PLUGIN_KIND: &str = "Plugin";

/// The `metadata` block shared by all documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Object name.
    #[serde(default)]
    pub name: String,
}

/// A plugin as described by its metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMetadata {
    /// Document API version.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Document kind.
    #[serde(default = "default_plugin_kind")]
    pub kind: String,
    /// Name of the plugin.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Descriptive fields and published versions.
    #[serde(default)]
    pub spec: PluginSpec,
}

/// Body of a plugin metadata document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSpec {
    /// Project home page.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub home_page: String,
    /// Documentation link.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub docs: String,
    /// Tutorials link.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tutorials: String,
    /// One line summary.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub short_description: String,
    /// Long form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Published versions in preference order.
    #[serde(default)]
    pub versions: Vec<PluginVersion>,
}

/// A single published version of a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginVersion {
    /// Version string, usually `vX.Y.Z`.
    pub version: String,
    /// Builds of this version in preference order.
    #[serde(default)]
    pub platforms: Vec<PlatformArtifact>,
}

/// A downloadable build of a plugin version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformArtifact {
    /// Which platforms the build runs on.
    #[serde(default)]
    pub selector: Selector,
    /// Location of the `.tar.gz` archive.
    pub uri: String,
    /// Hex encoded SHA-256 digest of the archive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Entrypoint relative to the extracted archive.
    pub bin: String,
}

impl PlatformArtifact {
    /// Published checksum, treating an empty string as absent.
    #[must_use]
    pub fn checksum(&self) -> Option<&str> {
        self.sha256.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Label selector on a platform artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    /// Labels that must match; empty values match anything.
    #[serde(default)]
    pub match_labels: MatchLabels,
}

/// OS and architecture labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLabels {
    /// Operating system, empty for any.
    #[serde(default)]
    pub os: String,
    /// Architecture, empty for any.
    #[serde(default)]
    pub arch: String,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_plugin_kind() -> String {
    PLUGIN_KIND.to_string()
}

impl PluginMetadata {
    /// The plugin name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Parse a metadata document. `origin` names the document in errors.
    pub fn from_yaml(content: &str, origin: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::parse(format!("plugin metadata {origin}"), e.to_string()))
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::parse(format!("plugin metadata {}", self.name()), e.to_string()))
    }

    /// Load a sidecar file. Returns `None` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(e, path, "read")),
        };
        Self::from_yaml(&content, &path.display().to_string()).map(Some)
    }

    /// Write the document to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        crate::paths::write_atomic(path, self.to_yaml()?.as_bytes())
    }
}
