//! Unpacking plugin archives (gzip-compressed tarballs).

use crate::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tar::{Archive, EntryType};
use tracing::{debug, trace, warn};

/// Counts of what an extraction produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Directories created.
    pub dirs: usize,
    /// Regular files written.
    pub files: usize,
    /// Symbolic links skipped.
    pub skipped_symlinks: usize,
}

/// Unpack `archive` into `dest`.
///
/// Directories take the mode recorded in the archive. Regular files are
/// created exclusively, so a file that already exists fails the extraction.
/// Symbolic links are skipped with a warning. Hard links, device nodes and
/// other entry types are rejected, as are entries whose path is absolute or
/// climbs out of `dest`.
pub fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<ExtractSummary> {
    debug!(archive = %archive.display(), dest = %dest.display(), "extracting archive");

    let file = File::open(archive).map_err(|e| Error::io(e, archive, "open"))?;
    let mut tar = Archive::new(GzDecoder::new(file));
    let mut summary = ExtractSummary::default();

    let entries = tar
        .entries()
        .map_err(|e| Error::extraction(archive, e.to_string()))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| Error::extraction(archive, e.to_string()))?;
        let entry_path = entry
            .path()
            .map_err(|e| Error::extraction(archive, e.to_string()))?
            .into_owned();
        let entry_type = entry.header().entry_type();
        trace!(path = %entry_path.display(), ?entry_type, "archive entry");

        if entry_type == EntryType::XGlobalHeader {
            continue;
        }

        let Some(relative) = sanitize(&entry_path) else {
            return Err(Error::extraction(
                archive,
                format!("entry '{}' escapes the destination directory", entry_path.display()),
            ));
        };
        let target = dest.join(&relative);
        let mode = entry.header().mode().unwrap_or(0o755) & 0o7777;

        match entry_type {
            EntryType::Directory => {
                create_dir(&target, mode).map_err(|e| Error::io(e, &target, "create directory"))?;
                summary.dirs += 1;
            }
            EntryType::Regular | EntryType::Continuous => {
                if let Some(parent) = target.parent() {
                    crate::paths::ensure_dir(parent)?;
                }
                write_file(&mut entry, &target, mode).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::AlreadyExists {
                        Error::extraction(
                            archive,
                            format!("file '{}' already exists", target.display()),
                        )
                    } else {
                        Error::io(e, &target, "write")
                    }
                })?;
                summary.files += 1;
            }
            EntryType::Symlink => {
                warn!(
                    path = %entry_path.display(),
                    archive = %archive.display(),
                    "skipping symbolic link in plugin archive"
                );
                summary.skipped_symlinks += 1;
            }
            other => {
                return Err(Error::extraction(
                    archive,
                    format!(
                        "entry '{}' has unsupported type {other:?}",
                        entry_path.display()
                    ),
                ));
            }
        }
    }

    debug!(
        dirs = summary.dirs,
        files = summary.files,
        skipped = summary.skipped_symlinks,
        "extracted archive"
    );
    Ok(summary)
}

/// Strip `.` components and reject absolute or parent-relative paths.
fn sanitize(path: &Path) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(clean)
}

fn create_dir(path: &Path, mode: u32) -> std::io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(path)
}

fn write_file(reader: &mut impl Read, path: &Path, mode: u32) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    let mut file = options.open(path)?;
    std::io::copy(reader, &mut file)?;
    Ok(())
}
