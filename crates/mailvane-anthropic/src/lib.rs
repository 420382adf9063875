// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude model provider for the Mailvane triage engine.
//!
//! This crate implements [`ModelProvider`] for the Anthropic Messages API.
//! Triage classification is a single-shot completion, so the provider
//! exposes no streaming surface.

pub mod client;
pub mod types;

use async_trait::async_trait;
use mailvane_config::MailvaneConfig;
use mailvane_core::error::MailvaneError;
use mailvane_core::traits::{ModelProvider, ServiceAdapter};
use mailvane_core::types::{
    AdapterType, CompletionRequest, HealthStatus, ModelResponse, ResponsePart,
};
use tracing::{debug, info};

use crate::client::AnthropicClient;
use crate::types::{ApiMessage, MessageRequest, ResponseContentBlock};

/// Anthropic Claude provider implementing [`ModelProvider`].
///
/// API key resolution order: config -> `ANTHROPIC_API_KEY` env var -> error.
pub struct AnthropicProvider {
    client: AnthropicClient,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider from the given configuration.
    ///
    /// # API Key Resolution
    /// 1. `config.anthropic.api_key` if set
    /// 2. `ANTHROPIC_API_KEY` environment variable
    /// 3. Returns error if neither is available
    pub fn from_config(config: &MailvaneConfig) -> Result<Self, MailvaneError> {
        let api_key = resolve_api_key(&config.anthropic.api_key)?;
        let client = AnthropicClient::new(
            api_key,
            config.anthropic.api_version.clone(),
            config.anthropic.default_model.clone(),
        )?;

        info!(
            model = config.anthropic.default_model,
            "Anthropic provider initialized"
        );

        Ok(Self { client })
    }

    /// Creates a provider with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: AnthropicClient) -> Self {
        Self { client }
    }

    /// Converts a [`CompletionRequest`] to an Anthropic [`MessageRequest`].
    fn to_message_request(&self, request: &CompletionRequest) -> MessageRequest {
        MessageRequest {
            model: self.client.default_model().to_string(),
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            system: request.system.clone(),
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl ServiceAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MailvaneError> {
        // Verify the client is constructable; a full check would make a
        // lightweight API call, but we avoid consuming tokens on health checks.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MailvaneError> {
        debug!("Anthropic provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ModelProvider for AnthropicProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<ModelResponse, MailvaneError> {
        let api_request = self.to_message_request(&request);
        let response = self.client.complete_message(&api_request).await?;

        // The API returns a sequence of content blocks; hand them to the
        // caller as parts so the sanitizer can concatenate extractable text.
        let parts: Vec<ResponsePart> = response
            .content
            .into_iter()
            .map(|block| match block {
                ResponseContentBlock::Text { text } => ResponsePart { text: Some(text) },
            })
            .collect();

        Ok(ModelResponse::Parts(parts))
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, MailvaneError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
        MailvaneError::Config(
            "Anthropic API key not found. Set anthropic.api_key in config or ANTHROPIC_API_KEY environment variable.".into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_provider(base_url: &str) -> AnthropicProvider {
        let client = AnthropicClient::new(
            "test-key".into(),
            "2023-06-01".into(),
            "claude-sonnet-4-20250514".into(),
        )
        .unwrap()
        .with_base_url(base_url.to_string());
        AnthropicProvider::with_client(client)
    }

    #[test]
    fn from_config_uses_configured_key() {
        let config = mailvane_config::load_config_from_str(
            "[anthropic]\napi_key = \"sk-test-abc\"\ndefault_model = \"claude-sonnet-4-20250514\"\n",
        )
        .unwrap();
        let provider = AnthropicProvider::from_config(&config).unwrap();
        assert_eq!(provider.client.default_model(), "claude-sonnet-4-20250514");
    }

    #[test]
    fn resolve_api_key_from_config() {
        let result = resolve_api_key(&Some("sk-test-123".into()));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "sk-test-123");
    }

    #[test]
    fn resolve_api_key_none_falls_back_to_env() {
        let result = resolve_api_key(&None);
        // Will succeed if env is set, fail otherwise.
        if result.is_err() {
            let err = result.unwrap_err().to_string();
            assert!(err.contains("API key not found"), "got: {err}");
        }
    }

    #[test]
    fn to_message_request_conversion() {
        let provider = test_provider("http://unused");

        let request = CompletionRequest {
            system: Some("You are a triage classifier.".into()),
            prompt: "Classify this.".into(),
            max_tokens: 2048,
        };

        let api_req = provider.to_message_request(&request);
        assert_eq!(api_req.model, "claude-sonnet-4-20250514");
        assert_eq!(api_req.max_tokens, 2048);
        assert_eq!(api_req.system.as_deref(), Some("You are a triage classifier."));
        assert_eq!(api_req.messages.len(), 1);
        assert_eq!(api_req.messages[0].role, "user");
        assert_eq!(api_req.messages[0].content, "Classify this.");
    }

    #[tokio::test]
    async fn complete_returns_multi_part_response() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "id": "msg_parts",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "{\"category\":"},
                {"type": "text", "text": " \"feature\"}"}
            ],
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 6}
        });

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = test_provider(&server.uri());
        let response = provider
            .complete(CompletionRequest {
                system: None,
                prompt: "classify".into(),
                max_tokens: 256,
            })
            .await
            .unwrap();

        assert_eq!(response.extract_text(), "{\"category\": \"feature\"}");
    }

    #[test]
    fn service_adapter_metadata() {
        let provider = test_provider("http://unused");

        assert_eq!(provider.name(), "anthropic");
        assert_eq!(provider.version(), semver::Version::new(0, 1, 0));
        assert_eq!(provider.adapter_type(), AdapterType::Provider);
    }
}
