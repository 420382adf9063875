// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted model provider for deterministic testing.
//!
//! `ScriptedProvider` implements `ModelProvider` with pre-configured
//! responses, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use mailvane_core::error::MailvaneError;
use mailvane_core::traits::{ModelProvider, ServiceAdapter};
use mailvane_core::types::{
    AdapterType, CompletionRequest, HealthStatus, ModelResponse, ResponsePart,
};

/// One scripted reply from the fake provider.
#[derive(Debug, Clone)]
enum Scripted {
    Text(String),
    Parts(Vec<Option<String>>),
    Failure(String),
}

/// A scripted model provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty, an
/// empty JSON object is returned so classification defaults apply.
pub struct ScriptedProvider {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    /// Create a new provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a provider pre-loaded with the given text responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(Scripted::Text).collect(),
            )),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a plain text response to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses
            .lock()
            .await
            .push_back(Scripted::Text(text.into()));
    }

    /// Add a multi-part response; `None` entries are parts with no text.
    pub async fn add_parts(&self, parts: Vec<Option<String>>) {
        self.responses
            .lock()
            .await
            .push_back(Scripted::Parts(parts));
    }

    /// Add a scripted provider failure.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .await
            .push_back(Scripted::Failure(message.into()));
    }

    /// Every completion request received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_response(&self) -> Result<ModelResponse, MailvaneError> {
        let scripted = self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Scripted::Text("{}".to_string()));

        match scripted {
            Scripted::Text(text) => Ok(ModelResponse::Text(text)),
            Scripted::Parts(parts) => Ok(ModelResponse::Parts(
                parts.into_iter().map(|text| ResponsePart { text }).collect(),
            )),
            Scripted::Failure(message) => Err(MailvaneError::Provider {
                message,
                source: None,
            }),
        }
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MailvaneError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MailvaneError> {
        Ok(())
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<ModelResponse, MailvaneError> {
        self.requests.lock().await.push(request);
        self.next_response().await
    }
}
