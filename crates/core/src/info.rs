//! Human readable plugin summaries for `konveyor plugin info`.

use crate::metadata::PluginMetadata;
use crate::paths::Storage;
use crate::registry::Registry;
use crate::source::MetadataSource;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeSet;

/// Summary of a plugin and its local installation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PluginInfo {
    /// Plugin name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Whether the registry has an entry.
    pub installed: bool,
    /// Version recorded in the registry.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub installed_version: String,
    /// Project home page.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub home_page: String,
    /// Documentation link.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub documentation: String,
    /// Tutorials link.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tutorials: String,
    /// Published versions in declared order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub versions_available: Vec<String>,
    /// Distinct `os-arch` pairs across all versions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub platforms_supported: Vec<String>,
}

impl PluginInfo {
    /// Summarize `metadata` for the plugin installed as `name`, filling in
    /// the installation state from `registry`.
    ///
    /// The registry records plugins under the name they were installed with,
    /// which need not match the document's `metadata.name`.
    #[must_use]
    pub fn new(name: &str, metadata: &PluginMetadata, registry: &Registry) -> Self {
        let installed = registry.find(name);
        Self {
            name: name.to_string(),
            description: metadata.spec.description.clone(),
            installed: installed.is_some(),
            installed_version: installed.map(|p| p.version.clone()).unwrap_or_default(),
            home_page: metadata.spec.home_page.clone(),
            documentation: metadata.spec.docs.clone(),
            tutorials: metadata.spec.tutorials.clone(),
            versions_available: metadata
                .spec
                .versions
                .iter()
                .map(|v| v.version.clone())
                .collect(),
            platforms_supported: supported_platforms(metadata),
        }
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::parse("plugin info", e.to_string()))
    }
}

/// Distinct `os-arch` pairs, sorted. Empty labels render as `*`; builds
/// with no labels at all are left out.
#[must_use]
pub fn supported_platforms(metadata: &PluginMetadata) -> Vec<String> {
    metadata
        .spec
        .versions
        .iter()
        .flat_map(|v| &v.platforms)
        .map(|a| &a.selector.match_labels)
        .filter(|labels| !(labels.os.is_empty() && labels.arch.is_empty()))
        .map(|labels| format!("{}-{}", or_star(&labels.os), or_star(&labels.arch)))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn or_star(label: &str) -> &str {
    if label.is_empty() { "*" } else { label }
}

/// Look up `name`, preferring the installed sidecar over the remote source.
pub fn plugin_info(storage: &Storage, source: &dyn MetadataSource, name: &str) -> Result<PluginInfo> {
    let metadata = match PluginMetadata::load(&storage.sidecar_path(name)) {
        Ok(Some(metadata)) => metadata,
        Ok(None) => fetch_remote(source, name)?,
        Err(e) => {
            tracing::debug!(plugin = name, error = %e, "unreadable metadata sidecar, asking the remote");
            fetch_remote(source, name)?
        }
    };
    let registry = Registry::load(storage)?;
    Ok(PluginInfo::new(name, &metadata, &registry))
}

fn fetch_remote(source: &dyn MetadataSource, name: &str) -> Result<PluginMetadata> {
    source.fetch_metadata(name).map_err(|e| match e {
        Error::NotFoundRemote { name, location } => Error::NotFoundRemote {
            name,
            location: format!("the local cache or {location}"),
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InstalledPlugin;
    use tempfile::TempDir;

    const DOC: &str = r"
apiVersion: cli.konveyor.io/v1alpha1
kind: Plugin
metadata:
  name: move2kube
spec:
  homePage: https://move2kube.konveyor.io/
  description: Move2Kube helps
  versions:
    - version: v0.3.0
      platforms:
        - selector: {matchLabels: {os: linux, arch: amd64}}
          uri: a
          bin: b
        - selector: {matchLabels: {os: darwin}}
          uri: a
          bin: b
        - uri: a
          bin: b
    - version: v0.2.0
      platforms:
        - selector: {matchLabels: {os: linux, arch: amd64}}
          uri: a
          bin: b
";

    struct NoRemote;

    impl MetadataSource for NoRemote {
        fn location(&self) -> String {
            "GitHub".to_string()
        }

        fn list_plugins(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn fetch_metadata(&self, name: &str) -> Result<PluginMetadata> {
            Err(Error::not_found_remote(name, self.location()))
        }
    }

    struct FixedRemote;

    impl MetadataSource for FixedRemote {
        fn location(&self) -> String {
            "fixed".to_string()
        }

        fn list_plugins(&self) -> Result<Vec<String>> {
            Ok(vec!["move2kube".to_string()])
        }

        fn fetch_metadata(&self, _name: &str) -> Result<PluginMetadata> {
            PluginMetadata::from_yaml(DOC, "fixed")
        }
    }

    #[test]
    fn test_supported_platforms() {
        let metadata = PluginMetadata::from_yaml(DOC, "test").unwrap();
        assert_eq!(
            supported_platforms(&metadata),
            vec!["darwin-*".to_string(), "linux-amd64".to_string()]
        );
    }

    #[test]
    fn test_info_from_sidecar() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path());
        let metadata = PluginMetadata::from_yaml(DOC, "test").unwrap();
        metadata.save(&storage.sidecar_path("move2kube")).unwrap();

        let mut registry = Registry::new();
        registry.add(InstalledPlugin {
            name: "move2kube".to_string(),
            version: "v0.3.0".to_string(),
            platform: "linux-amd64".to_string(),
            bin: "b".to_string(),
        });
        registry.save(&storage).unwrap();

        let info = plugin_info(&storage, &NoRemote, "move2kube").unwrap();
        assert!(info.installed);
        assert_eq!(info.installed_version, "v0.3.0");
        assert_eq!(info.versions_available, vec!["v0.3.0", "v0.2.0"]);

        let yaml = info.to_yaml().unwrap();
        assert!(yaml.contains("installed-version: v0.3.0"));
        assert!(yaml.contains("home-page: https://move2kube.konveyor.io/"));
        assert!(!yaml.contains("tutorials"));
    }

    #[test]
    fn test_info_from_remote() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path());

        let info = plugin_info(&storage, &FixedRemote, "move2kube").unwrap();
        assert!(!info.installed);
        assert!(info.installed_version.is_empty());
        assert_eq!(info.description, "Move2Kube helps");
    }

    #[test]
    fn test_info_uses_installed_name() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path());
        let mut registry = Registry::new();
        registry.add(InstalledPlugin {
            name: "m2k".to_string(),
            version: "v0.3.0".to_string(),
            platform: "linux-amd64".to_string(),
            bin: "b".to_string(),
        });
        registry.save(&storage).unwrap();

        // The document is named move2kube but was installed as m2k
        let info = plugin_info(&storage, &FixedRemote, "m2k").unwrap();
        assert_eq!(info.name, "m2k");
        assert!(info.installed);
        assert_eq!(info.installed_version, "v0.3.0");
    }

    #[test]
    fn test_info_not_found_anywhere() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path());

        let err = plugin_info(&storage, &NoRemote, "absent").unwrap_err();
        assert_eq!(
            err.to_string(),
            "did not find a plugin named 'absent' in the local cache or GitHub"
        );
    }
}
