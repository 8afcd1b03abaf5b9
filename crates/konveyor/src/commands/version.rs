//! `konveyor version`.

use super::Output;
use crate::cli::CliError;
use konveyor_core::BuildInfo;
use tracing::instrument;

/// Report the build version, or every build detail with `long`.
#[instrument(skip(build))]
pub fn version(build: &BuildInfo, long: bool) -> Result<Output, CliError> {
    let text = if long {
        build.to_yaml()?
    } else {
        build.short().to_string()
    };
    Output::new(text, build)
}
