// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory outcome store for deterministic testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use mailvane_core::error::MailvaneError;
use mailvane_core::traits::{OutcomeStore, ServiceAdapter};
use mailvane_core::types::{AdapterType, HealthStatus, TriageOutcome};

/// An in-memory [`OutcomeStore`] keyed by source id.
///
/// Enforces the source-id uniqueness constraint the real store owns. The
/// `hide_finds` switch simulates a store whose read-after-write lookup comes
/// back empty, exercising the workflow's synthesis fallback.
pub struct MemoryOutcomeStore {
    outcomes: Arc<Mutex<HashMap<String, TriageOutcome>>>,
    hide_finds: AtomicBool,
}

impl MemoryOutcomeStore {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(HashMap::new())),
            hide_finds: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `find_by_source_id` return `None`, while
    /// `create` keeps storing.
    pub fn hide_finds(&self) {
        self.hide_finds.store(true, Ordering::SeqCst);
    }

    /// Number of stored outcomes.
    pub async fn count(&self) -> usize {
        self.outcomes.lock().await.len()
    }

    /// Direct lookup bypassing the `hide_finds` switch.
    pub async fn stored(&self, source_id: &str) -> Option<TriageOutcome> {
        self.outcomes.lock().await.get(source_id).cloned()
    }
}

impl Default for MemoryOutcomeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MemoryOutcomeStore {
    fn name(&self) -> &str {
        "memory-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, MailvaneError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MailvaneError> {
        Ok(())
    }
}

#[async_trait]
impl OutcomeStore for MemoryOutcomeStore {
    async fn create(&self, outcome: &TriageOutcome) -> Result<TriageOutcome, MailvaneError> {
        let mut outcomes = self.outcomes.lock().await;
        if outcomes.contains_key(&outcome.source_id) {
            return Err(MailvaneError::Store {
                source: format!(
                    "outcome already exists for source id {}",
                    outcome.source_id
                )
                .into(),
            });
        }
        outcomes.insert(outcome.source_id.clone(), outcome.clone());
        Ok(outcome.clone())
    }

    async fn find_by_source_id(
        &self,
        source_id: &str,
    ) -> Result<Option<TriageOutcome>, MailvaneError> {
        if self.hide_finds.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.outcomes.lock().await.get(source_id).cloned())
    }
}
