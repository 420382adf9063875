// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Correlation candidate source: a read-only listing of existing work items.

use async_trait::async_trait;

use crate::error::MailvaneError;
use crate::types::{CorrelationScope, WorkItem};

/// Read-only listing of existing work items, scoped by tenant/module.
///
/// The correlator only reads candidates; it never writes work items or
/// outcomes.
#[async_trait]
pub trait WorkItemSource: Send + Sync + 'static {
    /// Lists candidate work items within the given scope.
    async fn list_items(
        &self,
        scope: &CorrelationScope,
    ) -> Result<Vec<WorkItem>, MailvaneError>;
}
