//! The konveyor command line.
//!
//! Built-in commands manage plugins; anything else is handed to the
//! `konveyor-<name>` plugin that provides it.

pub mod cli;
pub mod commands;
pub mod tracing;

use cli::{CliError, Commands, EXIT_OK, PluginCommands};
use commands::{CommandContext, Output};

/// Run a parsed command line, returning the process exit code on success.
#[allow(clippy::print_stdout)]
pub fn run(command: Commands, ctx: &CommandContext) -> Result<i32, CliError> {
    let output: Output = match command {
        Commands::Plugin { subcommand } => match subcommand {
            PluginCommands::List { name_only, remote } => {
                commands::plugin::list(ctx, name_only, remote)?
            }
            PluginCommands::Install { name } => commands::plugin::install(ctx, &name)?,
            PluginCommands::Uninstall { name } => commands::plugin::uninstall_plugin(ctx, &name)?,
            PluginCommands::Tidy => commands::plugin::tidy_plugins(ctx)?,
            PluginCommands::Info { name } => commands::plugin::info_plugin(ctx, &name)?,
        },
        Commands::Version { long } => commands::version::version(ctx.settings.build(), long)?,
        Commands::External(args) => return commands::dispatch::run_plugin(&ctx.settings, &args),
    };

    println!("{}", output.render(ctx.json)?);
    Ok(EXIT_OK)
}
