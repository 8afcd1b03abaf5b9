//! Process wide configuration.
//!
//! [`Settings`] is assembled once at startup from explicit values, then
//! environment variables, then defaults, and passed by reference afterwards.

use crate::build_info::BuildInfo;
use crate::paths::{Storage, default_storage_root};
use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;

/// Filename prefix that marks an executable as a plugin.
pub const PLUGIN_PREFIX: &str = "konveyor-";

/// Top level commands implemented by the CLI itself.
pub const BUILTIN_COMMANDS: &[&str] = &["plugin", "version"];

/// Environment variable overriding the remote repository (`owner/repo`).
pub const PLUGIN_REPO_ENV: &str = "KONVEYOR_PLUGIN_REPO";

/// Environment variable overriding the remote branch.
pub const PLUGIN_BRANCH_ENV: &str = "KONVEYOR_PLUGIN_BRANCH";

/// Location of plugin metadata documents in a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch holding the metadata.
    pub branch: String,
    /// Directory inside the repository.
    pub directory: String,
}

impl Default for RemoteRepository {
    fn default() -> Self {
        Self {
            owner: "konveyor".to_string(),
            repo: "cli".to_string(),
            branch: "main".to_string(),
            directory: "plugins".to_string(),
        }
    }
}

impl RemoteRepository {
    /// Parse an `owner/repo` slug, keeping the default branch and directory.
    pub fn from_slug(slug: &str) -> Result<Self> {
        match slug.trim().split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    ..Self::default()
                })
            }
            _ => Err(Error::configuration(format!(
                "invalid plugin repository '{slug}', expected 'owner/repo'"
            ))),
        }
    }

    /// Use `branch` instead of the default.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }
}

impl fmt::Display for RemoteRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{}:{}",
            self.owner, self.repo, self.branch, self.directory
        )
    }
}

/// Immutable runtime configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    storage: Storage,
    prefix: String,
    builtin_commands: Vec<String>,
    remote: RemoteRepository,
    build: BuildInfo,
}

impl Settings {
    /// Resolve settings from the environment.
    pub fn from_env(build: BuildInfo) -> Result<Self> {
        SettingsBuilder::new(build).build()
    }

    /// Start building settings explicitly.
    #[must_use]
    pub fn builder(build: BuildInfo) -> SettingsBuilder {
        SettingsBuilder::new(build)
    }

    /// Storage layout.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Plugin filename prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Built-in command names.
    #[must_use]
    pub fn builtin_commands(&self) -> &[String] {
        &self.builtin_commands
    }

    /// Remote metadata repository.
    #[must_use]
    pub fn remote(&self) -> &RemoteRepository {
        &self.remote
    }

    /// Build information.
    #[must_use]
    pub fn build(&self) -> &BuildInfo {
        &self.build
    }
}

/// Builder for [`Settings`]; unset values fall back to the environment.
#[derive(Debug)]
pub struct SettingsBuilder {
    build: BuildInfo,
    storage_root: Option<PathBuf>,
    remote: Option<RemoteRepository>,
}

impl SettingsBuilder {
    fn new(build: BuildInfo) -> Self {
        Self {
            build,
            storage_root: None,
            remote: None,
        }
    }

    /// Use an explicit storage root.
    #[must_use]
    pub fn storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage_root = Some(root.into());
        self
    }

    /// Use an explicit remote repository.
    #[must_use]
    pub fn remote(mut self, remote: RemoteRepository) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Resolve the remaining values and build.
    pub fn build(self) -> Result<Settings> {
        let storage_root = self.storage_root.unwrap_or_else(default_storage_root);
        let remote = match self.remote {
            Some(remote) => remote,
            None => remote_from_env()?,
        };

        tracing::debug!(
            storage = %storage_root.display(),
            remote = %remote,
            "resolved settings"
        );

        Ok(Settings {
            storage: Storage::new(storage_root),
            prefix: PLUGIN_PREFIX.to_string(),
            builtin_commands: BUILTIN_COMMANDS.iter().map(|c| (*c).to_string()).collect(),
            remote,
            build: self.build,
        })
    }
}

fn remote_from_env() -> Result<RemoteRepository> {
    let mut remote = match env_non_empty(PLUGIN_REPO_ENV) {
        Some(slug) => RemoteRepository::from_slug(&slug)?,
        None => RemoteRepository::default(),
    };
    if let Some(branch) = env_non_empty(PLUGIN_BRANCH_ENV) {
        remote = remote.with_branch(branch);
    }
    Ok(remote)
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
