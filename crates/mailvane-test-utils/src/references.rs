// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static reference validator and work-item source for deterministic testing.

use std::collections::HashSet;

use async_trait::async_trait;

use mailvane_core::error::MailvaneError;
use mailvane_core::traits::{ReferenceValidator, WorkItemSource};
use mailvane_core::types::{CorrelationScope, WorkItem};

/// A [`ReferenceValidator`] backed by static id sets.
#[derive(Debug, Default)]
pub struct StaticReferences {
    tenants: HashSet<String>,
    modules: HashSet<String>,
    items: HashSet<String>,
    fail_lookups: bool,
}

impl StaticReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// A validator whose every lookup fails, simulating a transport outage.
    pub fn failing() -> Self {
        Self {
            fail_lookups: true,
            ..Self::default()
        }
    }

    pub fn with_tenants<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.tenants.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_modules<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.modules.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_items<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.items.extend(ids.into_iter().map(Into::into));
        self
    }

    fn check(&self, set: &HashSet<String>, id: &str) -> Result<bool, MailvaneError> {
        if self.fail_lookups {
            return Err(MailvaneError::Internal(
                "reference lookup unavailable".into(),
            ));
        }
        Ok(set.contains(id))
    }
}

#[async_trait]
impl ReferenceValidator for StaticReferences {
    async fn tenant_exists(&self, tenant_id: &str) -> Result<bool, MailvaneError> {
        self.check(&self.tenants, tenant_id)
    }

    async fn module_exists(&self, module_id: &str) -> Result<bool, MailvaneError> {
        self.check(&self.modules, module_id)
    }

    async fn work_item_exists(&self, item_id: &str) -> Result<bool, MailvaneError> {
        self.check(&self.items, item_id)
    }
}

/// A [`WorkItemSource`] returning a fixed candidate list regardless of scope.
#[derive(Debug, Default)]
pub struct StaticWorkItems {
    items: Vec<WorkItem>,
    fail_listing: bool,
}

impl StaticWorkItems {
    pub fn new(items: Vec<WorkItem>) -> Self {
        Self {
            items,
            fail_listing: false,
        }
    }

    /// A source whose listing always fails.
    pub fn failing() -> Self {
        Self {
            items: Vec::new(),
            fail_listing: true,
        }
    }
}

#[async_trait]
impl WorkItemSource for StaticWorkItems {
    async fn list_items(
        &self,
        _scope: &CorrelationScope,
    ) -> Result<Vec<WorkItem>, MailvaneError> {
        if self.fail_listing {
            return Err(MailvaneError::Internal("work item listing unavailable".into()));
        }
        Ok(self.items.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_sets_answer_existence() {
        let refs = StaticReferences::new()
            .with_tenants(["t-1"])
            .with_modules(["m-1"])
            .with_items(["w-1"]);

        assert!(refs.tenant_exists("t-1").await.unwrap());
        assert!(!refs.tenant_exists("t-2").await.unwrap());
        assert!(refs.module_exists("m-1").await.unwrap());
        assert!(!refs.module_exists("m-404").await.unwrap());
        assert!(refs.work_item_exists("w-1").await.unwrap());
    }

    #[tokio::test]
    async fn failing_validator_errors_instead_of_answering() {
        let refs = StaticReferences::failing();
        assert!(refs.tenant_exists("t-1").await.is_err());
    }

    #[tokio::test]
    async fn work_items_listing_ignores_scope() {
        let source = StaticWorkItems::new(vec![WorkItem {
            id: "w-1".into(),
            title: "Login bug".into(),
            description: "OAuth flow broken".into(),
        }]);

        let scope = CorrelationScope {
            tenant_id: Some("t-1".into()),
            module_id: None,
        };
        let items = source.list_items(&scope).await.unwrap();
        assert_eq!(items.len(), 1);
    }
}
