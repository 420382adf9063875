// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mail gateway trait for mail-transport integrations (IMAP, Gmail, etc.).

use async_trait::async_trait;

use crate::error::MailvaneError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::InboundMessage;

/// Adapter for the mail transport the triage workflow reads from.
///
/// The workflow treats the gateway as an opaque provider of raw message
/// bytes and headers; provider-specific error codes are not interpreted.
#[async_trait]
pub trait MailGateway: ServiceAdapter {
    /// Fetches the full message for a source id.
    async fn fetch_message(&self, source_id: &str) -> Result<InboundMessage, MailvaneError>;

    /// Lists messages matching a provider-side query string.
    async fn list_messages(&self, query: &str) -> Result<Vec<InboundMessage>, MailvaneError>;

    /// Sends a reply on an existing thread. Returns the sent message id.
    async fn send_reply(
        &self,
        source_id: &str,
        thread_id: Option<&str>,
        body: &str,
        to: Option<&str>,
        cc: &[String],
    ) -> Result<String, MailvaneError>;

    /// Marks the source message as processed (label, flag, or folder move).
    ///
    /// Best-effort from the workflow's point of view: failures are logged
    /// and never revert a successful persist.
    async fn mark_processed(&self, source_id: &str) -> Result<(), MailvaneError>;
}
