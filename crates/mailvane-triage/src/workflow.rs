// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The triage workflow: a per-message state machine that classifies one
//! inbound email and persists exactly one outcome record.
//!
//! States: parsing -> classifying -> {correlating -> validating |
//! validating} -> persisting -> labeling -> done, with error reachable from
//! any step. A fatal error short-circuits the remaining steps but still
//! routes through persisting, so every processed non-no_action message
//! leaves one audit row. Messages classified `no_action` persist nothing
//! and return an explicit skip signal.
//!
//! Workflow instances share no mutable state: concurrent messages run as
//! independent instances, bounded only by the caller.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mailvane_config::MailvaneConfig;
use mailvane_core::error::MailvaneError;
use mailvane_core::traits::{MailGateway, ModelProvider, OutcomeStore, ReferenceValidator};
use mailvane_core::types::{
    Category, CompletionRequest, CorrelationScope, ExtractedFields, InboundMessage,
    OutcomeStatus, TriageDisposition, TriageOutcome,
};
use tracing::{debug, info, warn};

use crate::classify::ClassificationResult;
use crate::correlate::{extract_comment, Correlator};
use crate::prompt::{build_classification_prompt, SYSTEM_PROMPT};
use crate::sanitize::sanitize_response;

/// Persisted error text is truncated to this many characters so verbose
/// model/library failures stay bounded.
const MAX_ERROR_CHARS: usize = 500;

/// Default token budget for the classification call.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// States in the triage state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageState {
    /// Fetching the full message from the mail gateway.
    Parsing,
    /// Building the prompt, calling the model, sanitizing the response.
    Classifying,
    /// Resolving a correlated work item and merging status/comment.
    Correlating,
    /// Confirming every referenced entity exists.
    Validating,
    /// Writing the outcome record.
    Persisting,
    /// Best-effort marking of the source message as processed.
    Labeling,
    /// Terminal for both the no-action short-circuit and normal completion.
    Done,
    /// A fatal error was recorded for this run.
    Error,
}

impl std::fmt::Display for TriageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriageState::Parsing => write!(f, "parsing"),
            TriageState::Classifying => write!(f, "classifying"),
            TriageState::Correlating => write!(f, "correlating"),
            TriageState::Validating => write!(f, "validating"),
            TriageState::Persisting => write!(f, "persisting"),
            TriageState::Labeling => write!(f, "labeling"),
            TriageState::Done => write!(f, "done"),
            TriageState::Error => write!(f, "error"),
        }
    }
}

/// Orchestrates triage for single messages.
///
/// Collaborators are injected at construction; the workflow holds no
/// ambient global state and no internal timeouts (callers bound wall-clock
/// time and treat a timeout like a gateway/model failure).
pub struct TriageWorkflow {
    gateway: Arc<dyn MailGateway>,
    provider: Arc<dyn ModelProvider>,
    store: Arc<dyn OutcomeStore>,
    validator: Arc<dyn ReferenceValidator>,
    correlator: Correlator,
    max_tokens: u32,
    label_processed: bool,
}

impl TriageWorkflow {
    pub fn new(
        gateway: Arc<dyn MailGateway>,
        provider: Arc<dyn ModelProvider>,
        store: Arc<dyn OutcomeStore>,
        validator: Arc<dyn ReferenceValidator>,
        correlator: Correlator,
    ) -> Self {
        Self {
            gateway,
            provider,
            store,
            validator,
            correlator,
            max_tokens: DEFAULT_MAX_TOKENS,
            label_processed: true,
        }
    }

    /// Overrides the classification token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Applies workflow and correlator settings from loaded configuration.
    pub fn with_config(mut self, config: &MailvaneConfig) -> Self {
        self.max_tokens = config.anthropic.max_tokens;
        self.label_processed = config.triage.label_processed;
        self.correlator = self
            .correlator
            .with_rerank(config.triage.rerank_matches)
            .with_model_status(config.triage.model_status_extraction);
        self
    }

    /// Enables or disables post-persist labeling.
    pub fn with_labeling(mut self, enabled: bool) -> Self {
        self.label_processed = enabled;
        self
    }

    /// Processes one message end to end.
    ///
    /// Returns the persisted (or synthesized) outcome, or an explicit
    /// no-action signal. Expected failure modes (gateway errors, malformed
    /// model output, invalid references) are recorded on the outcome, not
    /// raised; only unexpected defects such as a store outage propagate as
    /// errors.
    pub async fn process(
        &self,
        source_id: &str,
    ) -> Result<TriageDisposition, MailvaneError> {
        // Idempotency gate: re-processing a known source id must not create
        // a second outcome row.
        if let Some(existing) = self.store.find_by_source_id(source_id).await? {
            debug!(source_id, outcome_id = %existing.id, "outcome already exists");
            return Ok(TriageDisposition::Completed(existing));
        }

        let mut state = TriageState::Parsing;
        let mut error: Option<String> = None;
        debug!(source_id, state = %state, "triage run started");

        let message = match self.gateway.fetch_message(source_id).await {
            Ok(message) => Some(message),
            Err(e) => {
                warn!(source_id, error = %e, "message fetch failed");
                error = Some(e.to_string());
                state = TriageState::Error;
                debug!(source_id, state = %state, "fatal error recorded");
                None
            }
        };

        let mut classification: Option<ClassificationResult> = None;
        if let Some(msg) = &message {
            state = TriageState::Classifying;
            debug!(source_id, state = %state, "classifying message");
            match self.classify(msg).await {
                Ok(result) => {
                    debug!(
                        source_id,
                        category = %result.category,
                        confidence = result.confidence,
                        "classification complete"
                    );
                    classification = Some(result);
                }
                Err(e) => {
                    // No internal retry: re-invoking the workflow for the
                    // same source id is safe because persistence is
                    // idempotent-by-source-id.
                    warn!(source_id, error = %e, "classification failed");
                    error = Some(e.to_string());
                    state = TriageState::Error;
                    debug!(source_id, state = %state, "fatal error recorded");
                }
            }
        }

        // Routing after classification: no_action terminates without
        // persisting anything.
        if error.is_none()
            && let Some(result) = &classification
            && result.category == Category::NoAction
        {
            state = TriageState::Done;
            debug!(source_id, state = %state, "no action required, nothing persisted");
            return Ok(TriageDisposition::NoAction {
                source_id: source_id.to_string(),
            });
        }

        if error.is_none()
            && let (Some(msg), Some(result)) = (message.as_ref(), classification.as_mut())
            && result.category == Category::CorrelateExisting
        {
            state = TriageState::Correlating;
            debug!(source_id, state = %state, "correlating against existing work items");
            self.correlate(source_id, msg, result).await;
        }

        if error.is_none()
            && let Some(result) = classification.as_ref()
        {
            state = TriageState::Validating;
            debug!(source_id, state = %state, "validating references");
            match self.validate_references(result).await {
                Ok(()) => {}
                Err(MailvaneError::Validation(message)) => {
                    warn!(source_id, error = %message, "reference validation failed");
                    error = Some(format!("validation error: {message}"));
                    state = TriageState::Error;
                    debug!(source_id, state = %state, "fatal error recorded");
                }
                // A validator transport failure is an unexpected defect.
                Err(other) => return Err(other),
            }
        }

        state = TriageState::Persisting;
        let now = Utc::now();
        let outcome = build_outcome(
            source_id,
            message.as_ref(),
            classification.as_ref(),
            error.as_deref(),
            now,
        );
        debug!(source_id, state = %state, status = %outcome.status, "persisting outcome");
        let stored = self.store.create(&outcome).await?;
        info!(
            source_id,
            outcome_id = %stored.id,
            category = %stored.category,
            status = %stored.status,
            "outcome persisted"
        );

        if self.label_processed {
            state = TriageState::Labeling;
            debug!(source_id, state = %state, "labeling source message");
            if let Err(e) = self.gateway.mark_processed(source_id).await {
                // Never reverts a successful persist.
                warn!(source_id, error = %e, "failed to label message as processed (ignored)");
            }
        }

        state = TriageState::Done;
        debug!(source_id, state = %state, "triage run finished");

        // Return the authoritative stored record (covers stores with
        // server-generated fields); synthesize from in-memory state if the
        // lookup comes back empty.
        match self.store.find_by_source_id(source_id).await? {
            Some(authoritative) => Ok(TriageDisposition::Completed(authoritative)),
            None => Ok(TriageDisposition::Completed(stored)),
        }
    }

    /// Prompt, model call, sanitize, coerce.
    async fn classify(
        &self,
        message: &InboundMessage,
    ) -> Result<ClassificationResult, MailvaneError> {
        let prompt = build_classification_prompt(message);
        let response = self
            .provider
            .complete(CompletionRequest {
                system: Some(SYSTEM_PROMPT.to_string()),
                prompt,
                max_tokens: self.max_tokens,
            })
            .await?;
        let value = sanitize_response(&response)?;
        Ok(ClassificationResult::from_value(value))
    }

    /// Best-effort correlation: resolves a matched item when the model did
    /// not supply one and merges extracted status/comment into the fields.
    /// Every failure is logged and swallowed.
    async fn correlate(
        &self,
        source_id: &str,
        message: &InboundMessage,
        result: &mut ClassificationResult,
    ) {
        if result.matched_item_id.is_none() {
            let scope = CorrelationScope {
                tenant_id: result.fields.tenant_id().map(str::to_owned),
                module_id: result.fields.module_id().map(str::to_owned),
            };
            match self
                .correlator
                .find_matches(&message.body_text, &scope)
                .await
            {
                Ok(matches) => {
                    if let Some(top) = matches.first() {
                        debug!(
                            source_id,
                            item_id = %top.item_id,
                            score = top.score,
                            "correlated to existing work item"
                        );
                        result.matched_item_id = Some(top.item_id.clone());
                    }
                }
                Err(e) => {
                    warn!(source_id, error = %e, "correlation failed (non-fatal)");
                }
            }
        }

        let status = self.correlator.extract_status_for(&message.body_text).await;
        let comment = extract_comment(&message.body_text);
        if let ExtractedFields::Correlation(fields) = &mut result.fields {
            if fields.status.is_none() {
                fields.status = status;
            }
            if fields.comment.is_none() {
                fields.comment = Some(comment);
            }
        }
    }

    /// Confirms every referenced entity exists. A missing reference is a
    /// `Validation` error naming the id; transport failures pass through.
    async fn validate_references(
        &self,
        result: &ClassificationResult,
    ) -> Result<(), MailvaneError> {
        if let Some(tenant_id) = result.fields.tenant_id()
            && !self.validator.tenant_exists(tenant_id).await?
        {
            return Err(MailvaneError::Validation(format!(
                "tenant {tenant_id} not found"
            )));
        }

        if let Some(module_id) = result.fields.module_id()
            && !self.validator.module_exists(module_id).await?
        {
            return Err(MailvaneError::Validation(format!(
                "module {module_id} not found"
            )));
        }

        if let Some(item_id) = &result.matched_item_id
            && !self.validator.work_item_exists(item_id).await?
        {
            return Err(MailvaneError::Validation(format!(
                "work item {item_id} not found"
            )));
        }

        Ok(())
    }
}

/// Builds the outcome row for this run. Executes on the error path too, so
/// operators can see why a message failed rather than having it vanish.
fn build_outcome(
    source_id: &str,
    message: Option<&InboundMessage>,
    classification: Option<&ClassificationResult>,
    error: Option<&str>,
    now: DateTime<Utc>,
) -> TriageOutcome {
    let status = if error.is_some() {
        OutcomeStatus::Error
    } else {
        OutcomeStatus::Pending
    };

    let (category, fields, matched_item_id, confidence) = match classification {
        Some(c) => (
            c.category,
            Some(c.fields.clone()),
            c.matched_item_id.clone(),
            c.confidence,
        ),
        None => (Category::Response, None, None, 0.0),
    };

    TriageOutcome {
        id: uuid::Uuid::new_v4().to_string(),
        source_id: source_id.to_string(),
        thread_id: message.and_then(|m| m.thread_id.clone()),
        category,
        fields,
        matched_item_id,
        confidence,
        status,
        error: error.map(|e| truncate_chars(e, MAX_ERROR_CHARS)),
        subject: message.map(|m| m.subject.clone()).unwrap_or_default(),
        body: message.map(|m| m.body_text.clone()).unwrap_or_default(),
        received_at: message.map(|m| m.received_at).unwrap_or(now),
        processed_at: now,
        created_at: now,
        updated_at: now,
    }
}

/// Truncates on a character boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triage_state_display() {
        assert_eq!(TriageState::Parsing.to_string(), "parsing");
        assert_eq!(TriageState::Classifying.to_string(), "classifying");
        assert_eq!(TriageState::Correlating.to_string(), "correlating");
        assert_eq!(TriageState::Validating.to_string(), "validating");
        assert_eq!(TriageState::Persisting.to_string(), "persisting");
        assert_eq!(TriageState::Labeling.to_string(), "labeling");
        assert_eq!(TriageState::Done.to_string(), "done");
        assert_eq!(TriageState::Error.to_string(), "error");
    }

    #[test]
    fn error_text_is_truncated_on_char_boundary() {
        let long = "é".repeat(600);
        let truncated = truncate_chars(&long, MAX_ERROR_CHARS);
        assert_eq!(truncated.chars().count(), MAX_ERROR_CHARS);
    }

    #[test]
    fn outcome_without_classification_defaults_category() {
        let outcome = build_outcome("msg-1", None, None, Some("gateway down"), Utc::now());
        assert_eq!(outcome.category, Category::Response);
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert!(outcome.fields.is_none());
        assert_eq!(outcome.subject, "");
        assert_eq!(outcome.received_at, outcome.processed_at);
    }
}
