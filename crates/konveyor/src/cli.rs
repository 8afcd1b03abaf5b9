//! Command line definition, errors and JSON envelopes.

use clap::{Parser, Subcommand};
use miette::{Diagnostic, Report};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::io::{self, Write};
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// CLI, configuration or plugin lookup error exit code
pub const EXIT_CLI: i32 = 2;
/// Plugin installation or launch failure exit code
pub const EXIT_PLUGIN: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// Bad input or a plugin that cannot be found (exit code 2)
    #[error("{message}")]
    #[diagnostic(code(konveyor::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Failure while installing or running a plugin (exit code 3)
    #[error("{message}")]
    #[diagnostic(code(konveyor::cli::plugin))]
    Plugin {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Other unexpected error (exit code 3)
    #[error("{message}")]
    #[diagnostic(code(konveyor::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }

    /// Prefix the message with the operation that failed.
    #[must_use]
    pub fn context(self, operation: impl std::fmt::Display) -> Self {
        let wrap = |message: String| format!("{operation}: {message}");
        match self {
            Self::Config { message, help } => Self::Config {
                message: wrap(message),
                help,
            },
            Self::Plugin { message, help } => Self::Plugin {
                message: wrap(message),
                help,
            },
            Self::Other { message, help } => Self::Other {
                message: wrap(message),
                help,
            },
        }
    }
}

/// Convert `konveyor_core::Error` to the matching `CliError` variant.
///
/// - Lookup and input problems -> Config (exit code 2)
/// - Download, extraction and launch failures -> Plugin (exit code 3)
/// - I/O errors -> Other (exit code 3)
impl From<konveyor_core::Error> for CliError {
    fn from(err: konveyor_core::Error) -> Self {
        use konveyor_core::Error as E;

        let help = err.help().map(|h| h.to_string());
        let message = match &err {
            // Avoid "configuration error: configuration error:"
            E::Configuration { message } => message.clone(),
            E::Io {
                source,
                path,
                operation,
            } => {
                let path_str = path
                    .as_ref()
                    .map_or(String::new(), |p| format!(" on {}", p.display()));
                format!("I/O {operation} failed{path_str}: {source}")
            }
            other => other.to_string(),
        };

        match err {
            E::NotInstalled { .. }
            | E::AlreadyInstalled { .. }
            | E::NotFoundRemote { .. }
            | E::NoVersions { .. }
            | E::NoSupportedPlatform { .. }
            | E::Configuration { .. } => Self::Config { message, help },
            E::ChecksumMismatch { .. }
            | E::Extraction { .. }
            | E::Remote { .. }
            | E::Parse { .. }
            | E::Launch { .. } => Self::Plugin { message, help },
            E::Io { .. } => Self::Other { message, help },
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Plugin { .. } | CliError::Other { .. } => EXIT_PLUGIN,
    }
}

/// Render error appropriately based on JSON flag
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let error_envelope = ErrorEnvelope::new(serde_json::json!({
            "code": match err {
                CliError::Config { .. } => "config",
                CliError::Plugin { .. } => "plugin",
                CliError::Other { .. } => "other",
            },
            "message": err.to_string()
        }));

        match serde_json::to_string(&error_envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else {
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
        let _ = io::stderr().flush();
    }
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: &'static str,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error" for failures
    pub status: &'static str,
    /// The error details
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

/// Konveyor command line.
///
/// Commands that are not built in run the matching `konveyor-<name>` plugin.
#[derive(Parser, Debug)]
#[command(name = "konveyor")]
#[command(about = "A tool to help with modernizing and migrating applications")]
#[command(version, arg_required_else_help = true)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: crate::tracing::LogLevel,

    /// Emit JSON envelopes and JSON logs.
    #[arg(long, global = true, help = "Emit JSON envelope regardless of format")]
    pub json: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provides utilities for interacting with plugins.
    #[command(
        long_about = "Provides utilities for interacting with plugins.\n\n\
        Plugins provide extended functionality that is not part of the main \
        command line distribution. A plugin is any executable whose name starts \
        with 'konveyor-', either installed by 'konveyor plugin install' or \
        placed on the PATH."
    )]
    Plugin {
        /// Plugin subcommand.
        #[command(subcommand)]
        subcommand: PluginCommands,
    },

    /// Print the version information.
    Version {
        /// Print the full build information.
        #[arg(short, long)]
        long: bool,
    },

    /// Run a plugin.
    #[command(external_subcommand)]
    External(Vec<OsString>),
}

/// `konveyor plugin` subcommands.
#[derive(Subcommand, Debug)]
pub enum PluginCommands {
    /// List all the installed plugins.
    #[command(
        long_about = "List all the installed plugins.\n\n\
        Installed plugins are the plugins recorded in the konveyor storage \
        directory followed by executables on the PATH whose name begins with \
        'konveyor-'."
    )]
    List {
        /// Display only the name of each plugin, rather than its full path.
        #[arg(long)]
        name_only: bool,
        /// List the plugins available in the remote plugin repository instead.
        #[arg(long)]
        remote: bool,
    },

    /// Install a plugin.
    Install {
        /// Name of the plugin.
        name: String,
    },

    /// Uninstall a plugin.
    Uninstall {
        /// Name of the plugin.
        name: String,
    },

    /// Remove broken plugins so the plugins directory matches the local cache.
    Tidy,

    /// Display info about a plugin: available versions, links to the home page, documentation.
    Info {
        /// Name of the plugin.
        name: String,
    },
}

/// Parse the process arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracing::LogLevel;

    #[test]
    fn test_parse_plugin_list() {
        let cli = Cli::try_parse_from(["konveyor", "plugin", "list", "--name-only"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Plugin {
                subcommand: PluginCommands::List {
                    name_only: true,
                    remote: false
                }
            })
        ));
        assert!(matches!(cli.level, LogLevel::Warn));
    }

    #[test]
    fn test_parse_install_requires_name() {
        assert!(Cli::try_parse_from(["konveyor", "plugin", "install"]).is_err());
        let cli = Cli::try_parse_from(["konveyor", "plugin", "install", "move2kube"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Plugin {
                subcommand: PluginCommands::Install { ref name }
            }) if name == "move2kube"
        ));
    }

    #[test]
    fn test_parse_version_long() {
        let cli = Cli::try_parse_from(["konveyor", "version", "--long"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Version { long: true })));
    }

    #[test]
    fn test_unknown_command_is_external() {
        let cli = Cli::try_parse_from(["konveyor", "move2kube", "transform", "--qa-skip"]).unwrap();
        match cli.command {
            Some(Commands::External(args)) => {
                assert_eq!(args, vec!["move2kube", "transform", "--qa-skip"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_before_plugin() {
        let cli = Cli::try_parse_from(["konveyor", "-L", "debug", "--json", "hello", "-L", "x"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.level, LogLevel::Debug));
        match cli.command {
            Some(Commands::External(args)) => assert_eq!(args, vec!["hello", "-L", "x"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(EXIT_OK, 0);
        assert_eq!(exit_code_for(&CliError::config("c")), EXIT_CLI);
        assert_eq!(exit_code_for(&CliError::Plugin {
                message: "p".to_string(),
                help: None
            }), EXIT_PLUGIN);
        assert_eq!(exit_code_for(&CliError::other("o")), EXIT_PLUGIN);
    }

    #[test]
    fn test_from_core_error() {
        let err = CliError::from(konveyor_core::Error::not_installed("hello"));
        assert!(matches!(err, CliError::Config { help: Some(_), .. }));
        assert_eq!(err.to_string(), "the plugin 'hello' is not installed");

        let err = CliError::from(konveyor_core::Error::extraction("a.tar.gz", "bad"));
        assert!(matches!(err, CliError::Plugin { .. }));

        let err = CliError::from(konveyor_core::Error::configuration("bad repo"));
        assert_eq!(err.to_string(), "bad repo");
    }

    #[test]
    fn test_context() {
        let err = CliError::config("the plugin 'x' is not installed")
            .context("failed to uninstall the plugin 'x'");
        assert_eq!(
            err.to_string(),
            "failed to uninstall the plugin 'x': the plugin 'x' is not installed"
        );
    }
}
