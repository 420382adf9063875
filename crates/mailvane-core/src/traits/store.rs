// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome store trait for triage persistence backends.

use async_trait::async_trait;

use crate::error::MailvaneError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::TriageOutcome;

/// Adapter for the store that holds persisted triage outcomes.
///
/// The store owns the uniqueness constraint on source id: if two concurrent
/// workflow runs create an outcome for the same source id, at most one
/// non-error outcome survives. [`find_by_source_id`] is the existence probe
/// callers use to short-circuit before starting a run.
///
/// [`find_by_source_id`]: OutcomeStore::find_by_source_id
#[async_trait]
pub trait OutcomeStore: ServiceAdapter {
    /// Persists a new outcome and returns the stored record, which may carry
    /// server-generated fields.
    async fn create(&self, outcome: &TriageOutcome) -> Result<TriageOutcome, MailvaneError>;

    /// Looks up the outcome for a source message id, if one exists.
    async fn find_by_source_id(
        &self,
        source_id: &str,
    ) -> Result<Option<TriageOutcome>, MailvaneError>;
}
