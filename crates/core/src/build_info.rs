//! Build information reported by `konveyor version`.

use crate::platform::Platform;
use crate::{Error, Result};
use serde::Serialize;

/// Immutable description of the running build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// Semantic version, optionally with `+buildmetadata`.
    pub version: String,
    /// Commit the binary was built from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<String>,
    /// `clean` or `dirty`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_tree_state: Option<String>,
    /// Compiler that produced the binary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rust_version: Option<String>,
    /// Platform as `os/arch`.
    pub platform: String,
}

impl BuildInfo {
    /// Describe a build of `version` for the running platform.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            git_commit: None,
            git_tree_state: None,
            rust_version: None,
            platform: Platform::current().to_slash_form(),
        }
    }

    /// Append build metadata to the version (`1.2.3+meta`).
    #[must_use]
    pub fn with_build_metadata(mut self, metadata: Option<&str>) -> Self {
        if let Some(metadata) = non_empty(metadata) {
            self.version = format!("{}+{metadata}", self.version);
        }
        self
    }

    /// Record the source commit.
    #[must_use]
    pub fn with_git_commit(mut self, commit: Option<&str>) -> Self {
        self.git_commit = non_empty(commit).map(str::to_string);
        self
    }

    /// Record whether the source tree had local changes.
    #[must_use]
    pub fn with_git_tree_state(mut self, state: Option<&str>) -> Self {
        self.git_tree_state = non_empty(state).map(str::to_string);
        self
    }

    /// Record the compiler version.
    #[must_use]
    pub fn with_rust_version(mut self, version: Option<&str>) -> Self {
        self.rust_version = non_empty(version).map(str::to_string);
        self
    }

    /// One line form: the version alone.
    #[must_use]
    pub fn short(&self) -> &str {
        &self.version
    }

    /// Multi line YAML form with every known field.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::parse("build info", e.to_string()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_version() {
        let info = BuildInfo::new("0.1.0");
        assert_eq!(info.short(), "0.1.0");

        let info = BuildInfo::new("0.1.0").with_build_metadata(Some("abc123"));
        assert_eq!(info.short(), "0.1.0+abc123");

        let info = BuildInfo::new("0.1.0").with_build_metadata(Some(""));
        assert_eq!(info.short(), "0.1.0");
    }

    #[test]
    fn test_long_version() {
        let info = BuildInfo::new("0.1.0")
            .with_git_commit(Some("deadbeef"))
            .with_git_tree_state(Some("clean"))
            .with_rust_version(Some("rustc 1.90.0"));
        let yaml = info.to_yaml().unwrap();

        assert!(yaml.contains("version: 0.1.0"));
        assert!(yaml.contains("gitCommit: deadbeef"));
        assert!(yaml.contains("gitTreeState: clean"));
        assert!(yaml.contains("rustVersion: rustc 1.90.0"));
        assert!(yaml.contains(&format!("platform: {}", Platform::current().to_slash_form())));
    }

    #[test]
    fn test_long_version_omits_unknown_fields() {
        let yaml = BuildInfo::new("0.1.0").with_git_commit(None).to_yaml().unwrap();
        assert!(!yaml.contains("gitCommit"));
    }
}
