//! konveyor CLI entry point.

// The binary reports results on stdout and panics on stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::CommandFactory;
use konveyor::cli::{self, CliError, EXIT_OK, exit_code_for, render_error};
use konveyor::commands::CommandContext;
use konveyor::tracing::{TracingConfig, init_tracing};
use konveyor_core::{BuildInfo, Settings};

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();
    let json = cli.json;

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            render_error(&err, json);
            exit_code_for(&err)
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: cli::Cli) -> Result<i32, CliError> {
    init_tracing(TracingConfig::from_flags(cli.level, cli.json))?;

    let Some(command) = cli.command else {
        let _ = cli::Cli::command().print_help();
        return Ok(EXIT_OK);
    };

    let settings = Settings::from_env(build_info())?;
    let ctx = CommandContext {
        settings,
        json: cli.json,
    };
    konveyor::run(command, &ctx)
}

fn build_info() -> BuildInfo {
    BuildInfo::new(env!("CARGO_PKG_VERSION"))
        .with_build_metadata(option_env!("KONVEYOR_BUILD_METADATA"))
        .with_git_commit(option_env!("KONVEYOR_GIT_COMMIT"))
        .with_git_tree_state(option_env!("KONVEYOR_GIT_TREE_STATE"))
        .with_rust_version(option_env!("KONVEYOR_RUSTC_VERSION"))
}
