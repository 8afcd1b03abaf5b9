//! Running plugins for commands the CLI does not implement itself.

use crate::cli::CliError;
use konveyor_core::executor::launch;
use konveyor_core::{Resolution, Resolver, Settings};
use std::ffi::OsString;
use tracing::{debug, instrument};

/// Run the plugin named by the first argument, forwarding the rest verbatim.
///
/// On Unix this only returns on failure. Elsewhere it returns the plugin's
/// exit code.
#[instrument(skip(settings))]
pub fn run_plugin(settings: &Settings, args: &[OsString]) -> Result<i32, CliError> {
    let Some((command, rest)) = args.split_first() else {
        return Err(CliError::config("no command given"));
    };
    let Some(command) = command.to_str() else {
        return Err(CliError::config(format!(
            "unknown command {}",
            command.to_string_lossy()
        )));
    };

    let resolution = Resolver::new(settings)
        .resolve(command)
        .map_err(|e| CliError::from(e).context(format!("failed to look up the plugin '{command}'")))?
        .ok_or_else(|| unknown_command(command))?;

    match &resolution {
        Resolution::Installed { plugin, path } => {
            debug!(command, version = %plugin.version, path = %path.display(), "running installed plugin");
        }
        Resolution::OnPath { path } => {
            debug!(command, path = %path.display(), "running plugin from PATH");
        }
    }

    launch(resolution.path(), rest, std::env::vars_os())
        .map_err(|e| CliError::from(e).context(format!("failed to run the plugin '{command}'")))
}

fn unknown_command(command: &str) -> CliError {
    CliError::config_with_help(
        format!("unknown command \"{command}\" for \"konveyor\""),
        "Run 'konveyor --help' for usage, or 'konveyor plugin list' to see the installed plugins",
    )
}
