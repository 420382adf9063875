// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model provider trait for LLM integrations (Anthropic, etc.).

use async_trait::async_trait;

use crate::error::MailvaneError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{CompletionRequest, ModelResponse};

/// Adapter for language model providers.
///
/// The contract is a single-shot completion with no guaranteed output
/// format: responses may be slow, partial, or truncated under provider-side
/// token limits. Callers parse defensively.
#[async_trait]
pub trait ModelProvider: ServiceAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<ModelResponse, MailvaneError>;
}
