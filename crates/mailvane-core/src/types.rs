// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the triage workflow.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`crate::ServiceAdapter`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Gateway,
    Provider,
    Store,
}

// --- Inbound mail ---

/// An inbound email as delivered by the mail gateway.
///
/// Read-only input: the triage workflow never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Provider-side message identifier (the triage idempotency key).
    pub id: String,
    /// Conversation thread identifier, if the provider exposes one.
    pub thread_id: Option<String>,
    /// Sender address.
    pub from: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub received_at: DateTime<Utc>,
}

// --- Classification taxonomy ---

/// The closed set of triage categories a message can classify into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// The message describes a new product feature request.
    Feature,
    /// The message describes a concrete work task.
    Task,
    /// The message needs a drafted reply and nothing else.
    Response,
    /// The message refers to an existing work item.
    CorrelateExisting,
    /// The message requires no stored result at all.
    NoAction,
}

impl Category {
    /// Parses a category string, defaulting to [`Category::Response`] for
    /// empty, missing, or unrecognized values.
    ///
    /// The default is deliberately `Response` and never `NoAction`: silently
    /// dropping a message is higher-risk than flagging it as needing a reply.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if !s.trim().is_empty() => {
                Self::from_str(s.trim()).unwrap_or(Self::Response)
            }
            _ => Self::Response,
        }
    }
}

// --- Extracted fields (per-category tagged union) ---

/// Typed fields extracted by the classifier, one variant per category.
///
/// The model's extraction schema is advisory, so each variant carries a
/// flattened residual map for keys outside the known schema. Coercion from
/// the raw sanitized JSON happens once, at the classification boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractedFields {
    Feature(FeatureFields),
    Task(TaskFields),
    Response(ResponseFields),
    Correlation(CorrelationFields),
}

impl ExtractedFields {
    /// Tenant reference, if the classifier populated one.
    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            Self::Feature(f) => f.tenant_id.as_deref(),
            Self::Task(f) => f.tenant_id.as_deref(),
            Self::Response(_) => None,
            Self::Correlation(f) => f.tenant_id.as_deref(),
        }
    }

    /// Module reference, if the classifier populated one.
    pub fn module_id(&self) -> Option<&str> {
        match self {
            Self::Feature(f) => f.module_id.as_deref(),
            Self::Task(f) => f.module_id.as_deref(),
            Self::Response(_) => None,
            Self::Correlation(f) => f.module_id.as_deref(),
        }
    }
}

/// Fields for a [`Category::Feature`] classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub module_id: Option<String>,
    /// Keys the model emitted outside the known schema.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Fields for a [`Category::Task`] classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub module_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Fields for a [`Category::Response`] classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseFields {
    /// Suggested reply text drafted by the model.
    #[serde(default)]
    pub reply_text: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Fields for a [`Category::CorrelateExisting`] classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationFields {
    /// Free-text hint the model gave about which item is meant.
    #[serde(default)]
    pub item_hint: Option<String>,
    /// Status keyword extracted from the email body.
    #[serde(default)]
    pub status: Option<WorkItemStatus>,
    /// Trimmed comment body extracted from the email.
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub module_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// --- Persisted outcome ---

/// Lifecycle status of a persisted [`TriageOutcome`].
///
/// `Pending` is the only non-terminal state; a record never returns to it
/// once left.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Pending,
    Approved,
    Rejected,
    Created,
    Correlated,
    Sent,
    Error,
}

impl OutcomeStatus {
    /// True for every state except `Pending`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// The persisted record of one triaged message: classification snapshot,
/// lifecycle status, and denormalized subject/body for audit.
///
/// Exactly one outcome exists per distinct source message id, except
/// messages classified `no_action`, which persist zero outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageOutcome {
    /// Generated identifier.
    pub id: String,
    /// Source message id. Unique across outcomes.
    pub source_id: String,
    pub thread_id: Option<String>,
    pub category: Category,
    /// Classification snapshot. Absent when the message was never fetched
    /// (gateway failure recorded as an error-only outcome).
    pub fields: Option<ExtractedFields>,
    pub matched_item_id: Option<String>,
    /// Advisory model confidence in [0, 1].
    pub confidence: f64,
    pub status: OutcomeStatus,
    /// Human-readable failure text, bounded length.
    pub error: Option<String>,
    pub subject: String,
    pub body: String,
    pub received_at: DateTime<Utc>,
    pub processed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the workflow hands back to its caller: either the persisted (or
/// synthesized) outcome, or an explicit no-action signal. Never a silent
/// empty result.
#[derive(Debug, Clone)]
pub enum TriageDisposition {
    Completed(TriageOutcome),
    NoAction { source_id: String },
}

impl TriageDisposition {
    /// The outcome record, if one was persisted or synthesized.
    pub fn outcome(&self) -> Option<&TriageOutcome> {
        match self {
            Self::Completed(outcome) => Some(outcome),
            Self::NoAction { .. } => None,
        }
    }

    pub fn is_no_action(&self) -> bool {
        matches!(self, Self::NoAction { .. })
    }
}

// --- Correlation ---

/// A candidate work item the correlator can match an email against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// One ranked correlation candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMatch {
    pub item_id: String,
    pub title: String,
    /// Keyword score in [0, 1].
    pub score: f64,
}

/// Work item status keywords the correlator can extract from email text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WorkItemStatus {
    Done,
    Blocked,
    InProgress,
    Todo,
}

/// Optional tenant/module narrowing for the correlation candidate listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrelationScope {
    pub tenant_id: Option<String>,
    pub module_id: Option<String>,
}

// --- Model provider ---

/// A single-shot completion request to a language model provider.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Optional system prompt.
    pub system: Option<String>,
    /// User-turn prompt text.
    pub prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// One part of a multi-part model response.
///
/// Only text parts are extractable; other part kinds carry no text.
#[derive(Debug, Clone, Default)]
pub struct ResponsePart {
    pub text: Option<String>,
}

/// A model response in whichever shape the provider returned it.
///
/// No output format is guaranteed: the response sanitizer exists to recover
/// a JSON object from whatever text this yields.
#[derive(Debug, Clone)]
pub enum ModelResponse {
    /// A plain text completion.
    Text(String),
    /// A sequence of heterogeneous parts, some of which carry text.
    Parts(Vec<ResponsePart>),
}

impl ModelResponse {
    /// Concatenates every extractable text field into a single string.
    pub fn extract_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join(""),
        }
    }
}
