//! Blocking HTTP downloads with a progress bar.

use crate::client::{authorize, build_client, check_status, is_github_url};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use konveyor_core::download::copy_verified;
use konveyor_core::{Downloader, Error, Result};
use reqwest::blocking::Client;
use std::path::Path;
use tracing::info;

const PROGRESS_TEMPLATE: &str = "{spinner} {msg} [{bar:30}] {bytes}/{total_bytes} ({eta})";

/// Downloads over HTTP(S), streaming straight to disk.
pub struct HttpDownloader {
    client: Client,
    progress: bool,
}

impl HttpDownloader {
    /// Create a downloader that draws progress on interactive terminals.
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            progress: true,
        })
    }

    /// Enable or disable the progress bar.
    #[must_use]
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    fn progress_bar(&self, total: Option<u64>, dest: &Path) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        // Drawing to stderr is skipped automatically when it is not a terminal.
        let bar = ProgressBar::with_draw_target(total, ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template(PROGRESS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        bar.set_message(name);
        bar
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path, sha256: Option<&str>) -> Result<u64> {
        let request = self.client.get(url);
        let request = if is_github_url(url) {
            authorize(request)
        } else {
            request
        };

        let response = request
            .send()
            .map_err(|e| Error::remote(format!("failed to download {url}: {e}")))?;
        let mut response = check_status(response, &format!("downloading {url}"))?;

        let bar = self.progress_bar(response.content_length(), dest);
        let result = copy_verified(&mut response, dest, sha256, |n| bar.inc(n as u64));
        bar.finish_and_clear();

        let bytes = result?;
        info!(url, bytes, path = %dest.display(), "download complete");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_bar() {
        let downloader = HttpDownloader::new().unwrap().with_progress(false);
        let bar = downloader.progress_bar(Some(10), Path::new("a.tar.gz"));
        assert!(bar.is_hidden());
    }
}
