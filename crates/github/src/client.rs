//! Shared HTTP client setup.

use konveyor_core::{Error, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};

const USER_AGENT: &str = concat!("konveyor/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::remote(format!("failed to create HTTP client: {e}")))
}

/// Token from `GITHUB_TOKEN`, falling back to `GH_TOKEN`.
pub(crate) fn auth_token() -> Option<String> {
    ["GITHUB_TOKEN", "GH_TOKEN"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|token| !token.trim().is_empty())
}

/// Attach the GitHub token, if any.
pub(crate) fn authorize(request: RequestBuilder) -> RequestBuilder {
    match auth_token() {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Whether `url` points at GitHub, so the token may be sent along.
pub(crate) fn is_github_url(url: &str) -> bool {
    let Some(rest) = url.strip_prefix("https://") else {
        return false;
    };
    let host = rest.split(['/', ':', '?']).next().unwrap_or_default();
    host == "github.com"
        || host == "api.github.com"
        || host.ends_with(".githubusercontent.com")
}

/// Fail on non-success statuses, keeping the status code.
pub(crate) fn check_status(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let hint = if status.as_u16() == 403 || status.as_u16() == 429 {
        " (rate limited? set GITHUB_TOKEN)"
    } else {
        ""
    };
    Err(Error::remote_status(
        status.as_u16(),
        format!("{what} returned HTTP {status}{hint}"),
    ))
}
