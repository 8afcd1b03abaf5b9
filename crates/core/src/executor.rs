//! Running a resolved plugin.

use crate::{Error, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// Run the plugin at `path` with `args` and exactly the environment `env`.
///
/// On Unix the current process image is replaced, argv[0] being `path`, so
/// this only returns on failure. Elsewhere the plugin runs as a child with
/// inherited stdio and working directory and its exit code is returned.
pub fn launch<I>(path: &Path, args: &[OsString], env: I) -> Result<i32>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut command = Command::new(path);
    command.args(args).env_clear().envs(env);
    tracing::debug!(path = %path.display(), args = ?args, "launching plugin");
    run(path, command)
}

#[cfg(unix)]
fn run(path: &Path, mut command: Command) -> Result<i32> {
    use std::os::unix::process::CommandExt;
    let err = command.exec();
    Err(Error::launch(err, path))
}

#[cfg(not(unix))]
fn run(path: &Path, mut command: Command) -> Result<i32> {
    let status = command.status().map_err(|e| Error::launch(e, path))?;
    // A child killed without an exit code still has to fail the invocation.
    Ok(status.code().unwrap_or(1))
}
