// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mailvane triage engine.

use thiserror::Error;

/// The primary error type used across all Mailvane adapter traits and the
/// triage workflow.
#[derive(Debug, Error)]
pub enum MailvaneError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Mail gateway errors (message fetch failed, reply send failed, auth failure).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// LLM provider errors (API failure, token limits, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Model output could not be sanitized into a JSON object.
    ///
    /// `truncated` is set when the text ends mid-object (unbalanced braces),
    /// which callers may treat as a retryable condition rather than a parse bug.
    #[error("malformed model response: {reason}")]
    MalformedResponse { reason: String, truncated: bool },

    /// A referenced entity (tenant, module, work item) does not exist.
    /// The message names the missing id so operators can fix the upstream data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Outcome store errors (connectivity, constraint violation, serialization).
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MailvaneError {
    /// True when the error signals truncated model output worth retrying.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::MalformedResponse { truncated: true, .. })
    }
}
