//! GitHub backed plugin catalog and HTTP downloader for konveyor.
//!
//! Plugin metadata lives as `<name>.yaml` documents in a directory of a
//! GitHub repository (by default `konveyor/cli`, branch `main`, directory
//! `plugins`). Requests carry `GITHUB_TOKEN` or `GH_TOKEN` when set.

mod client;
mod download;
mod source;

pub use download::HttpDownloader;
pub use source::GitHubSource;
