//! Plugin catalog stored as YAML documents in a GitHub repository.

use crate::client::{authorize, build_client, check_status};
use konveyor_core::{Error, MetadataSource, PluginMetadata, RemoteRepository, Result};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

const API_URL: &str = "https://api.github.com";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Entry of the repository contents API.
#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Reads `<directory>/<name>.yaml` documents through the GitHub contents API.
pub struct GitHubSource {
    client: Client,
    remote: RemoteRepository,
}

impl GitHubSource {
    /// Create a source for `remote`.
    pub fn new(remote: RemoteRepository) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            remote,
        })
    }

    fn contents_url(&self, file: Option<&str>) -> String {
        let mut path = self.remote.directory.trim_matches('/').to_string();
        if let Some(file) = file {
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(file);
        }
        format!(
            "{API_URL}/repos/{}/{}/contents/{}?ref={}",
            self.remote.owner, self.remote.repo, path, self.remote.branch
        )
    }
}

impl MetadataSource for GitHubSource {
    fn location(&self) -> String {
        format!("GitHub ({}/{})", self.remote.owner, self.remote.repo)
    }

    fn list_plugins(&self) -> Result<Vec<String>> {
        let url = self.contents_url(None);
        debug!(%url, "listing plugins on GitHub");

        let response = authorize(self.client.get(&url).header(ACCEPT, JSON_MEDIA_TYPE))
            .send()
            .map_err(|e| Error::remote(format!("failed to list plugins: {e}")))?;
        let response = check_status(response, "listing plugins")?;
        let entries: Vec<ContentEntry> = response
            .json()
            .map_err(|e| Error::parse("GitHub directory listing", e.to_string()))?;
        Ok(plugin_names(entries))
    }

    fn fetch_metadata(&self, name: &str) -> Result<PluginMetadata> {
        validate_name(name)?;
        let url = self.contents_url(Some(&format!("{name}.yaml")));
        debug!(%url, plugin = name, "fetching plugin metadata from GitHub");

        let response = authorize(self.client.get(&url).header(ACCEPT, RAW_MEDIA_TYPE))
            .send()
            .map_err(|e| Error::remote(format!("failed to fetch metadata for '{name}': {e}")))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::not_found_remote(name, self.location()));
        }
        let body = check_status(response, "fetching plugin metadata")?
            .text()
            .map_err(|e| Error::remote(format!("failed to read metadata for '{name}': {e}")))?;

        let metadata = PluginMetadata::from_yaml(&body, &url)?;
        if metadata.name() != name {
            tracing::warn!(
                plugin = name,
                document = metadata.name(),
                "metadata document names a different plugin"
            );
        }
        Ok(metadata)
    }
}

/// A plugin name becomes one path segment of the request URL.
fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "invalid plugin name '{name}': use letters, digits, '-', '_' and '.' only"
        )))
    }
}

/// Plugin names from a directory listing: files ending in `.yaml`, suffix removed.
fn plugin_names(entries: Vec<ContentEntry>) -> Vec<String> {
    entries
        .into_iter()
        .filter(|entry| entry.kind == "file")
        .filter_map(|entry| entry.name.strip_suffix(".yaml").map(str::to_string))
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> GitHubSource {
        GitHubSource::new(RemoteRepository::default()).unwrap()
    }

    #[test]
    fn test_contents_urls() {
        let source = source();
        assert_eq!(
            source.contents_url(None),
            "https://api.github.com/repos/konveyor/cli/contents/plugins?ref=main"
        );
        assert_eq!(
            source.contents_url(Some("move2kube.yaml")),
            "https://api.github.com/repos/konveyor/cli/contents/plugins/move2kube.yaml?ref=main"
        );
    }

    #[test]
    fn test_contents_url_at_repository_root() {
        let remote = RemoteRepository {
            directory: String::new(),
            ..RemoteRepository::from_slug("acme/catalog").unwrap().with_branch("dev")
        };
        let source = GitHubSource::new(remote).unwrap();
        assert_eq!(
            source.contents_url(Some("a.yaml")),
            "https://api.github.com/repos/acme/catalog/contents/a.yaml?ref=dev"
        );
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("move2kube").is_ok());
        assert!(validate_name("my_plugin-1.2").is_ok());
        for bad in ["", ".", "..", "a/b", "../secrets", "a?ref=evil", "a#frag", "a b", "a%2F"] {
            assert!(
                matches!(validate_name(bad), Err(Error::Configuration { .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_fetch_rejects_unsafe_name_before_request() {
        // Rejected locally, so no request reaches the network
        let err = source().fetch_metadata("x?ref=other").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_plugin_names() {
        let listing = r#"[
            {"name": "move2kube.yaml", "type": "file", "size": 10},
            {"name": "README.md", "type": "file"},
            {"name": "nested", "type": "dir"},
            {"name": "crane.yaml", "type": "file"},
            {"name": "fake.yaml", "type": "dir"}
        ]"#;
        let entries: Vec<ContentEntry> = serde_json::from_str(listing).unwrap();
        assert_eq!(plugin_names(entries), vec!["move2kube", "crane"]);
    }

    #[test]
    fn test_location() {
        assert_eq!(source().location(), "GitHub (konveyor/cli)");
    }
}
