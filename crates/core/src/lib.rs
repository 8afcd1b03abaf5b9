//! Plugin management for the konveyor CLI.
//!
//! Plugins are executables named `konveyor-<name>`. They are either
//! installed by konveyor into its storage directory and recorded in a local
//! registry, or placed anywhere on `PATH` by the user. This crate decides
//! which executable runs a command, installs and removes plugins, and keeps
//! storage consistent with the registry.
//!
//! The remote catalog and the download transport are traits
//! ([`MetadataSource`], [`Downloader`]) so the orchestration here never
//! touches the network directly.

pub mod archive;
pub mod build_info;
pub mod download;
pub mod error;
pub mod executor;
pub mod info;
pub mod installer;
pub mod listing;
pub mod metadata;
pub mod paths;
pub mod platform;
pub mod registry;
pub mod resolver;
pub mod scanner;
pub mod selector;
pub mod settings;
pub mod source;
pub mod tidy;

pub use build_info::BuildInfo;
pub use download::Downloader;
pub use error::{Error, Result};
pub use installer::{Installer, uninstall};
pub use metadata::PluginMetadata;
pub use paths::Storage;
pub use platform::Platform;
pub use registry::{InstalledPlugin, Registry};
pub use resolver::{Resolution, Resolver};
pub use scanner::{PathScanner, ScanMode};
pub use settings::{RemoteRepository, Settings};
pub use source::MetadataSource;
pub use tidy::{TidyReport, tidy};
