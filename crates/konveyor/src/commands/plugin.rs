//! `konveyor plugin` subcommands.

use super::{CommandContext, Output};
use crate::cli::CliError;
use konveyor_core::info::plugin_info;
use konveyor_core::listing::list_plugins;
use konveyor_core::scanner::search_path;
use konveyor_core::{Installer, MetadataSource, ScanMode, tidy, uninstall};
use konveyor_github::{GitHubSource, HttpDownloader};
use serde_json::json;
use tracing::{info, instrument};

fn remote_source(ctx: &CommandContext) -> Result<GitHubSource, CliError> {
    Ok(GitHubSource::new(ctx.settings.remote().clone())?)
}

/// List installed plugins, or the plugins available remotely.
#[instrument(skip(ctx))]
pub fn list(ctx: &CommandContext, name_only: bool, remote: bool) -> Result<Output, CliError> {
    if remote {
        let source = remote_source(ctx)?;
        info!(source = %source.location(), "fetching the list of plugins");
        let plugins = source
            .list_plugins()
            .map_err(|e| CliError::from(e).context("failed to get the list of plugins"))?;
        return Output::new(plugins.join("\n"), &plugins);
    }

    info!("looking for installed plugins");
    let mode = if name_only {
        ScanMode::NameOnly
    } else {
        ScanMode::FullPath
    };
    let plugins = list_plugins(&ctx.settings, &search_path(), mode)
        .map_err(|e| CliError::from(e).context("failed to get the list of plugins"))?;
    if plugins.is_empty() {
        return Output::new("No plugins were found.", &plugins);
    }
    Output::new(plugins.join("\n"), &plugins)
}

/// Install a plugin from the remote repository.
#[instrument(skip(ctx))]
pub fn install(ctx: &CommandContext, name: &str) -> Result<Output, CliError> {
    let source = remote_source(ctx)?;
    let downloader = HttpDownloader::new()?.with_progress(!ctx.json);

    let installed = Installer::new(ctx.settings.storage(), &source, &downloader)
        .install(name)
        .map_err(|e| {
            CliError::from(e).context(format!("failed to install the plugin named '{name}'"))
        })?;
    Output::new(
        format!(
            "The plugin named '{}' version {} was installed!",
            installed.name, installed.version
        ),
        &installed,
    )
}

/// Uninstall a plugin.
#[instrument(skip(ctx))]
pub fn uninstall_plugin(ctx: &CommandContext, name: &str) -> Result<Output, CliError> {
    uninstall(ctx.settings.storage(), name).map_err(|e| {
        CliError::from(e).context(format!("failed to uninstall the plugin named '{name}'"))
    })?;
    Output::new(
        format!("The plugin named '{name}' was uninstalled!"),
        &json!({ "name": name }),
    )
}

/// Remove broken plugins from the storage directory.
#[instrument(skip(ctx))]
pub fn tidy_plugins(ctx: &CommandContext) -> Result<Output, CliError> {
    let report = tidy(ctx.settings.storage())
        .map_err(|e| CliError::from(e).context("failed to uninstall the broken plugins"))?;

    let mut lines: Vec<String> = report
        .removed_dirs
        .iter()
        .map(|p| format!("Removed broken plugin {}", p.display()))
        .chain(
            report
                .removed_files
                .iter()
                .map(|p| format!("Removed stray file {}", p.display())),
        )
        .chain(
            report
                .failed
                .iter()
                .map(|p| format!("Could not remove {}", p.display())),
        )
        .collect();
    lines.push("Tidying done!".to_string());

    let display = |paths: &[std::path::PathBuf]| -> Vec<String> {
        paths.iter().map(|p| p.display().to_string()).collect()
    };
    Output::new(
        lines.join("\n"),
        &json!({
            "removed_dirs": display(&report.removed_dirs),
            "removed_files": display(&report.removed_files),
            "failed": display(&report.failed),
        }),
    )
}

/// Show information about a plugin.
#[instrument(skip(ctx))]
pub fn info_plugin(ctx: &CommandContext, name: &str) -> Result<Output, CliError> {
    let source = remote_source(ctx)?;
    let info = plugin_info(ctx.settings.storage(), &source, name).map_err(|e| {
        CliError::from(e).context(format!("failed to find a plugin named '{name}'"))
    })?;
    Output::new(info.to_yaml()?, &info)
}
