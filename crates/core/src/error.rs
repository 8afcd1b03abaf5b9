//! Error types for plugin management

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Error type for plugin operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The plugin has no entry in the local registry
    #[error("the plugin '{name}' is not installed")]
    #[diagnostic(
        code(konveyor::plugin::not_installed),
        help("Run 'konveyor plugin list' to see the installed plugins")
    )]
    NotInstalled {
        /// Requested plugin name
        name: String,
    },

    /// The plugin already has an entry in the local registry
    #[error("the plugin '{name}' is already installed")]
    #[diagnostic(
        code(konveyor::plugin::already_installed),
        help("Run 'konveyor plugin uninstall {name}' before installing it again")
    )]
    AlreadyInstalled {
        /// Requested plugin name
        name: String,
    },

    /// The remote repository has no metadata for the plugin
    #[error("did not find a plugin named '{name}' in {location}")]
    #[diagnostic(
        code(konveyor::plugin::not_found),
        help("Run 'konveyor plugin list --remote' to see the available plugins")
    )]
    NotFoundRemote {
        /// Requested plugin name
        name: String,
        /// Where the lookup happened
        location: String,
    },

    /// The metadata lists no versions at all
    #[error("the plugin '{name}' does not publish any versions")]
    #[diagnostic(code(konveyor::plugin::no_versions))]
    NoVersions {
        /// Plugin name
        name: String,
    },

    /// No published version has a build for the running platform
    #[error("no published version of the plugin '{name}' supports {platform}")]
    #[diagnostic(
        code(konveyor::plugin::unsupported_platform),
        help("Run 'konveyor plugin info {name}' to see the supported platforms")
    )]
    NoSupportedPlatform {
        /// Plugin name
        name: String,
        /// Running platform as `os-arch`
        platform: String,
    },

    /// Downloaded bytes do not hash to the published digest
    #[error("checksum mismatch for {}: expected {expected}, got {actual}", path.display())]
    #[diagnostic(
        code(konveyor::plugin::checksum),
        help("The download may be corrupted or tampered with, try again")
    )]
    ChecksumMismatch {
        /// File that was written
        path: Box<Path>,
        /// Published SHA-256 digest
        expected: String,
        /// Computed SHA-256 digest
        actual: String,
    },

    /// The archive could not be unpacked
    #[error("failed to extract {}: {message}", archive.display())]
    #[diagnostic(code(konveyor::plugin::extract))]
    Extraction {
        /// Archive being unpacked
        archive: Box<Path>,
        /// What went wrong
        message: String,
    },

    /// A transport or protocol failure talking to a remote
    #[error("remote request failed: {message}")]
    #[diagnostic(
        code(konveyor::plugin::remote),
        help("Check your network connection. Set GITHUB_TOKEN if you are rate limited")
    )]
    Remote {
        /// What went wrong
        message: String,
        /// HTTP status, when a response was received
        status: Option<u16>,
    },

    /// Metadata or registry documents that do not parse
    #[error("failed to parse {what}: {message}")]
    #[diagnostic(code(konveyor::plugin::parse))]
    Parse {
        /// Document being parsed
        what: String,
        /// Parser message
        message: String,
    },

    /// Invalid settings or arguments
    #[error("configuration error: {message}")]
    #[diagnostic(code(konveyor::plugin::config))]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },

    /// The plugin executable could not be started
    #[error("failed to launch {}: {source}", path.display())]
    #[diagnostic(
        code(konveyor::plugin::launch),
        help("Check that the plugin file is executable")
    )]
    Launch {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Executable path
        path: Box<Path>,
    },

    /// I/O error while touching local storage
    #[error("I/O {operation} failed{}", path.as_ref().map_or(String::new(), |p| format!(": {}", p.display())))]
    #[diagnostic(
        code(konveyor::plugin::io),
        help("Check file permissions on the konveyor storage directory")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "read", "write", "create")
        operation: String,
    },
}

impl Error {
    /// Create a not installed error
    #[must_use]
    pub fn not_installed(name: impl Into<String>) -> Self {
        Self::NotInstalled { name: name.into() }
    }

    /// Create an already installed error
    #[must_use]
    pub fn already_installed(name: impl Into<String>) -> Self {
        Self::AlreadyInstalled { name: name.into() }
    }

    /// Create a remote not found error
    #[must_use]
    pub fn not_found_remote(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self::NotFoundRemote {
            name: name.into(),
            location: location.into(),
        }
    }

    /// Create an extraction error
    #[must_use]
    pub fn extraction(archive: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Extraction {
            archive: archive.as_ref().into(),
            message: message.into(),
        }
    }

    /// Create a remote error without a status
    #[must_use]
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
            status: None,
        }
    }

    /// Create a remote error carrying the HTTP status
    #[must_use]
    pub fn remote_status(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create a parse error
    #[must_use]
    pub fn parse(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            what: what.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    /// Create a launch error
    #[must_use]
    pub fn launch(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::Launch {
            source,
            path: path.as_ref().into(),
        }
    }

    /// Create an I/O error with path context
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl AsRef<Path>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }

    /// Create an I/O error without path context
    #[must_use]
    pub fn io_no_path(source: std::io::Error, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: None,
            operation: operation.into(),
        }
    }
}

/// Result type for plugin operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_io_error_includes_path() {
        let err = Error::io(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            PathBuf::from("/tmp/cache.yaml"),
            "write",
        );
        assert_eq!(err.to_string(), "I/O write failed: /tmp/cache.yaml");
    }

    #[test]
    fn test_io_error_without_path() {
        let err = Error::io_no_path(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            "scan",
        );
        assert_eq!(err.to_string(), "I/O scan failed");
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = Error::not_installed("hello");
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("konveyor::plugin::not_installed".to_string())
        );
        assert!(err.help().is_some());
    }

    #[test]
    fn test_remote_status() {
        let err = Error::remote_status(503, "service unavailable");
        assert!(matches!(err, Error::Remote { status: Some(503), .. }));
    }
}
