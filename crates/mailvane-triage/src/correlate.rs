// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Correlation of inbound email to existing work items.
//!
//! The primary pass is cheap, explainable keyword scoring over the scoped
//! candidate list. A model-assisted re-rank of the top candidates is
//! attempted when a provider is attached, but it fails open and its result
//! never changes the keyword ordering: correlation is a convenience, not a
//! correctness requirement.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::LazyLock;

use mailvane_core::error::MailvaneError;
use mailvane_core::traits::{ModelProvider, WorkItemSource};
use mailvane_core::types::{
    CandidateMatch, CompletionRequest, CorrelationScope, WorkItemStatus,
};
use regex::Regex;
use tracing::{debug, warn};

/// Score contributions for a candidate work item.
const TITLE_WEIGHT: f64 = 0.4;
const DESCRIPTION_WEIGHT: f64 = 0.3;
const ID_WEIGHT: f64 = 0.5;

/// Candidates scoring at or below this are discarded; short/common titles
/// would otherwise produce false positives.
const SCORE_FLOOR: f64 = 0.3;

/// How many ranked candidates are returned.
const MAX_MATCHES: usize = 3;

/// How many candidates the model-assisted re-rank sees.
const RERANK_POOL: usize = 5;

/// Comment extraction bounds.
const MIN_COMMENT_CHARS: usize = 10;
const COMMENT_FALLBACK_CHARS: usize = 500;
const MAX_COMMENT_CHARS: usize = 1000;

/// Status keyword table. First matching row wins.
const STATUS_KEYWORDS: &[(&str, WorkItemStatus)] = &[
    ("done", WorkItemStatus::Done),
    ("completed", WorkItemStatus::Done),
    ("finished", WorkItemStatus::Done),
    ("blocked", WorkItemStatus::Blocked),
    ("stuck", WorkItemStatus::Blocked),
    ("in progress", WorkItemStatus::InProgress),
    ("working on", WorkItemStatus::InProgress),
    ("started", WorkItemStatus::InProgress),
    ("todo", WorkItemStatus::Todo),
    ("pending", WorkItemStatus::Todo),
];

/// Matches a reply-quote header like "On Tue, Jan 6 ... wrote:".
static QUOTE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^On .{0,200}wrote:").expect("static regex"));

/// Matches inbound email against existing work items and extracts status
/// keywords and trimmed comment bodies from email text.
pub struct Correlator {
    items: Arc<dyn WorkItemSource>,
    provider: Option<Arc<dyn ModelProvider>>,
    rerank_enabled: bool,
    model_status_enabled: bool,
}

impl Correlator {
    pub fn new(items: Arc<dyn WorkItemSource>) -> Self {
        Self {
            items,
            provider: None,
            rerank_enabled: true,
            model_status_enabled: false,
        }
    }

    /// Attaches a model provider for the re-rank pass and delegated status
    /// extraction.
    pub fn with_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Enables or disables the model-assisted re-rank pass.
    pub fn with_rerank(mut self, enabled: bool) -> Self {
        self.rerank_enabled = enabled;
        self
    }

    /// Enables delegating status extraction to the model.
    pub fn with_model_status(mut self, enabled: bool) -> Self {
        self.model_status_enabled = enabled;
        self
    }

    /// Returns the top ranked candidate work items for the given text.
    ///
    /// Scoring per candidate: +0.4 when its title appears verbatim
    /// (case-insensitive) in the text, +0.3 for its description, +0.5 for
    /// its own identifier; ≤0.3 discarded; clamped to 1.0; sorted by score
    /// descending with an id tie-break for deterministic ordering; top 3.
    pub async fn find_matches(
        &self,
        text: &str,
        scope: &CorrelationScope,
    ) -> Result<Vec<CandidateMatch>, MailvaneError> {
        let items = self.items.list_items(scope).await?;
        let haystack = text.to_lowercase();

        let mut scored: Vec<CandidateMatch> = items
            .iter()
            .filter_map(|item| {
                let mut score = 0.0;
                if !item.title.is_empty() && haystack.contains(&item.title.to_lowercase()) {
                    score += TITLE_WEIGHT;
                }
                if !item.description.is_empty()
                    && haystack.contains(&item.description.to_lowercase())
                {
                    score += DESCRIPTION_WEIGHT;
                }
                if haystack.contains(&item.id.to_lowercase()) {
                    score += ID_WEIGHT;
                }
                (score > SCORE_FLOOR).then(|| CandidateMatch {
                    item_id: item.id.clone(),
                    title: item.title.clone(),
                    score: score.min(1.0),
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });

        if self.rerank_enabled && !scored.is_empty() {
            self.rerank_for_telemetry(text, &scored[..scored.len().min(RERANK_POOL)])
                .await;
        }

        scored.truncate(MAX_MATCHES);
        Ok(scored)
    }

    /// Model-assisted re-rank over the top candidates.
    ///
    /// The outcome is logged and otherwise discarded: the keyword ordering
    /// stands regardless of what the model picks, and any provider error is
    /// swallowed here.
    async fn rerank_for_telemetry(&self, text: &str, candidates: &[CandidateMatch]) {
        let Some(provider) = &self.provider else {
            return;
        };

        let listing = candidates
            .iter()
            .map(|c| format!("- {}: {}", c.item_id, c.title))
            .collect::<Vec<_>>()
            .join("\n");
        let excerpt: String = text.chars().take(COMMENT_FALLBACK_CHARS).collect();
        let prompt = format!(
            "Which of these work items does the email refer to? Respond with \
             the single item id, or null if none match.\n\nItems:\n{listing}\n\n\
             Email:\n{excerpt}"
        );

        match provider
            .complete(CompletionRequest {
                system: None,
                prompt,
                max_tokens: 32,
            })
            .await
        {
            Ok(response) => {
                let pick = response.extract_text().trim().to_string();
                debug!(model_pick = %pick, "re-rank result (keyword order kept)");
            }
            Err(e) => {
                warn!(error = %e, "model re-rank failed (ignored)");
            }
        }
    }

    /// Extracts a status keyword, delegating to the model when configured
    /// and falling back to the keyword table on any provider problem.
    pub async fn extract_status_for(&self, text: &str) -> Option<WorkItemStatus> {
        let (Some(provider), true) = (&self.provider, self.model_status_enabled) else {
            return extract_status(text);
        };

        let excerpt: String = text.chars().take(COMMENT_FALLBACK_CHARS).collect();
        let prompt = format!(
            "Does this email report a work item status? Respond with exactly \
             one token: done, blocked, in_progress, todo, or null.\n\n{excerpt}"
        );

        match provider
            .complete(CompletionRequest {
                system: None,
                prompt,
                max_tokens: 8,
            })
            .await
        {
            Ok(response) => {
                let token = response
                    .extract_text()
                    .trim()
                    .trim_matches('"')
                    .to_lowercase();
                if token == "null" {
                    None
                } else {
                    WorkItemStatus::from_str(&token)
                        .ok()
                        .or_else(|| extract_status(text))
                }
            }
            Err(e) => {
                warn!(error = %e, "model status extraction failed, using keyword table");
                extract_status(text)
            }
        }
    }
}

/// Keyword-table status extraction. First matching table row wins; no match
/// returns `None`.
pub fn extract_status(text: &str) -> Option<WorkItemStatus> {
    let lowered = text.to_lowercase();
    STATUS_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, status)| *status)
}

/// Extracts the author's own words from an email body.
///
/// Strips quoted-reply lines, signature blocks, and everything from an
/// "On ... wrote:" header onward. If stripping leaves fewer than 10
/// characters the original body's first 500 characters are used instead.
/// Output is always capped at 1000 characters.
pub fn extract_comment(text: &str) -> String {
    let head = match QUOTE_HEADER_RE.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    };

    let mut kept = Vec::new();
    for line in head.lines() {
        let trimmed = line.trim();
        if is_signature_marker(trimmed) {
            break;
        }
        if trimmed.starts_with('>') {
            continue;
        }
        kept.push(line);
    }

    let cleaned = kept.join("\n").trim().to_string();
    let result = if cleaned.chars().count() < MIN_COMMENT_CHARS {
        // Likely over-stripped; fall back to a prefix of the raw body.
        text.chars().take(COMMENT_FALLBACK_CHARS).collect()
    } else {
        cleaned
    };

    result.chars().take(MAX_COMMENT_CHARS).collect()
}

/// Lines that start a signature block.
fn is_signature_marker(line: &str) -> bool {
    line.starts_with("--") || line.starts_with("Best regards") || line.starts_with("Sent from")
}
