// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted mail gateway for deterministic testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use mailvane_core::error::MailvaneError;
use mailvane_core::traits::{MailGateway, ServiceAdapter};
use mailvane_core::types::{AdapterType, HealthStatus, InboundMessage};

/// A reply recorded by [`ScriptedGateway::send_reply`].
#[derive(Debug, Clone, PartialEq)]
pub struct SentReply {
    pub source_id: String,
    pub thread_id: Option<String>,
    pub body: String,
    pub to: Option<String>,
    pub cc: Vec<String>,
}

/// A scripted mail gateway backed by an in-memory message map.
///
/// Failure switches let tests exercise the workflow's error paths without a
/// real transport.
pub struct ScriptedGateway {
    messages: Arc<Mutex<HashMap<String, InboundMessage>>>,
    labeled: Arc<Mutex<Vec<String>>>,
    sent: Arc<Mutex<Vec<SentReply>>>,
    fail_fetch: AtomicBool,
    fail_labeling: AtomicBool,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(HashMap::new())),
            labeled: Arc::new(Mutex::new(Vec::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_fetch: AtomicBool::new(false),
            fail_labeling: AtomicBool::new(false),
        }
    }

    /// Preload a message, keyed by its source id.
    pub async fn add_message(&self, message: InboundMessage) {
        self.messages
            .lock()
            .await
            .insert(message.id.clone(), message);
    }

    /// Make every subsequent `fetch_message` fail.
    pub fn fail_fetch(&self) {
        self.fail_fetch.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent `mark_processed` fail.
    pub fn fail_labeling(&self) {
        self.fail_labeling.store(true, Ordering::SeqCst);
    }

    /// Source ids that were marked processed, in order.
    pub async fn labeled(&self) -> Vec<String> {
        self.labeled.lock().await.clone()
    }

    /// Replies sent through the gateway, in order.
    pub async fn sent_replies(&self) -> Vec<SentReply> {
        self.sent.lock().await.clone()
    }
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted-gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, MailvaneError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MailvaneError> {
        Ok(())
    }
}

#[async_trait]
impl MailGateway for ScriptedGateway {
    async fn fetch_message(&self, source_id: &str) -> Result<InboundMessage, MailvaneError> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(MailvaneError::Gateway {
                message: format!("scripted fetch failure for {source_id}"),
                source: None,
            });
        }
        self.messages
            .lock()
            .await
            .get(source_id)
            .cloned()
            .ok_or_else(|| MailvaneError::Gateway {
                message: format!("message {source_id} not found"),
                source: None,
            })
    }

    async fn list_messages(&self, _query: &str) -> Result<Vec<InboundMessage>, MailvaneError> {
        let mut messages: Vec<InboundMessage> =
            self.messages.lock().await.values().cloned().collect();
        messages.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(messages)
    }

    async fn send_reply(
        &self,
        source_id: &str,
        thread_id: Option<&str>,
        body: &str,
        to: Option<&str>,
        cc: &[String],
    ) -> Result<String, MailvaneError> {
        let reply = SentReply {
            source_id: source_id.to_string(),
            thread_id: thread_id.map(str::to_owned),
            body: body.to_string(),
            to: to.map(str::to_owned),
            cc: cc.to_vec(),
        };
        self.sent.lock().await.push(reply);
        Ok(format!("sent-{}", uuid::Uuid::new_v4()))
    }

    async fn mark_processed(&self, source_id: &str) -> Result<(), MailvaneError> {
        if self.fail_labeling.load(Ordering::SeqCst) {
            return Err(MailvaneError::Gateway {
                message: format!("scripted labeling failure for {source_id}"),
                source: None,
            });
        }
        self.labeled.lock().await.push(source_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(id: &str) -> InboundMessage {
        InboundMessage {
            id: id.to_string(),
            thread_id: Some(format!("thread-{id}")),
            from: "alice@example.com".into(),
            subject: "hello".into(),
            body_text: "body".into(),
            body_html: None,
            received_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn fetch_returns_preloaded_message() {
        let gateway = ScriptedGateway::new();
        gateway.add_message(message("msg-1")).await;

        let fetched = gateway.fetch_message("msg-1").await.unwrap();
        assert_eq!(fetched.subject, "hello");
    }

    #[tokio::test]
    async fn fetch_unknown_id_fails() {
        let gateway = ScriptedGateway::new();
        assert!(gateway.fetch_message("nope").await.is_err());
    }

    #[tokio::test]
    async fn fail_fetch_switch_trips_every_fetch() {
        let gateway = ScriptedGateway::new();
        gateway.add_message(message("msg-1")).await;
        gateway.fail_fetch();
        assert!(gateway.fetch_message("msg-1").await.is_err());
    }

    #[tokio::test]
    async fn labeling_is_recorded() {
        let gateway = ScriptedGateway::new();
        gateway.mark_processed("msg-9").await.unwrap();
        assert_eq!(gateway.labeled().await, vec!["msg-9".to_string()]);
    }

    #[tokio::test]
    async fn list_messages_returns_all_in_id_order() {
        let gateway = ScriptedGateway::new();
        gateway.add_message(message("msg-2")).await;
        gateway.add_message(message("msg-1")).await;

        let listed = gateway.list_messages("is:unread").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "msg-1");
        assert_eq!(listed[1].id, "msg-2");
    }

    #[tokio::test]
    async fn send_reply_records_the_reply() {
        let gateway = ScriptedGateway::new();
        let id = gateway
            .send_reply("msg-1", Some("thread-1"), "thanks!", None, &[])
            .await
            .unwrap();
        assert!(id.starts_with("sent-"));

        let sent = gateway.sent_replies().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "thanks!");
        assert_eq!(sent[0].thread_id.as_deref(), Some("thread-1"));
    }
}
