//! Command handlers.
//!
//! Handlers return an [`Output`] instead of printing, so `main` decides
//! between plain text and a JSON envelope.

pub mod dispatch;
pub mod plugin;
pub mod version;

use crate::cli::{CliError, OkEnvelope};
use konveyor_core::Settings;
use serde::Serialize;

/// State shared by every command.
#[derive(Debug)]
pub struct CommandContext {
    /// Resolved configuration.
    pub settings: Settings,
    /// Whether `--json` was given.
    pub json: bool,
}

/// Result of a command: human text plus a structured payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// Text printed without `--json`.
    pub text: String,
    /// Payload of the JSON envelope.
    pub data: serde_json::Value,
}

impl Output {
    /// Pair `text` with the serialized form of `data`.
    pub fn new(text: impl Into<String>, data: &impl Serialize) -> Result<Self, CliError> {
        let data = serde_json::to_value(data)
            .map_err(|e| CliError::other(format!("failed to serialize output: {e}")))?;
        Ok(Self {
            text: text.into(),
            data,
        })
    }

    /// Render for stdout.
    pub fn render(&self, json: bool) -> Result<String, CliError> {
        if json {
            serde_json::to_string(&OkEnvelope::new(&self.data))
                .map_err(|e| CliError::other(format!("failed to serialize output: {e}")))
        } else {
            Ok(self.text.trim_end().to_string())
        }
    }
}
