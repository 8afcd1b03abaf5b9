//! Streaming downloads with checksum verification.

use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

const BUFFER_SIZE: usize = 64 * 1024;

/// Fetches a URL into a local file.
pub trait Downloader: Send + Sync {
    /// Download `url` to `dest` and return the number of bytes written.
    ///
    /// When `sha256` is given the bytes are hashed while streaming and a
    /// mismatch fails with [`Error::ChecksumMismatch`], leaving the file in
    /// place.
    fn download(&self, url: &str, dest: &Path, sha256: Option<&str>) -> Result<u64>;
}

/// Copy `reader` into a new file at `dest`, verifying an optional checksum.
///
/// `on_chunk` is called with the size of every chunk written, for progress
/// reporting.
pub fn copy_verified(
    reader: &mut impl Read,
    dest: &Path,
    sha256: Option<&str>,
    mut on_chunk: impl FnMut(usize),
) -> Result<u64> {
    let mut file = File::create(dest).map_err(|e| Error::io(e, dest, "create"))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut written: u64 = 0;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::remote(format!("failed to read download stream: {e}"))),
        };
        let chunk = &buffer[..n];
        file.write_all(chunk)
            .map_err(|e| Error::io(e, dest, "write"))?;
        hasher.update(chunk);
        written += n as u64;
        on_chunk(n);
    }
    file.flush().map_err(|e| Error::io(e, dest, "flush"))?;

    if let Some(expected) = sha256 {
        let actual = hex::encode(hasher.finalize());
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            return Err(Error::ChecksumMismatch {
                path: dest.into(),
                expected: expected.trim().to_lowercase(),
                actual,
            });
        }
        tracing::debug!(path = %dest.display(), "checksum verified");
    }

    Ok(written)
}

/// Hex encoded SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
