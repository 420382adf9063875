// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference validator trait: existence checks for the foreign-key-like
//! fields the classifier may populate.

use async_trait::async_trait;

use crate::error::MailvaneError;

/// Lookup-by-id for each foreign reference a classification can carry.
///
/// Each method returns a definite exists/not-exists answer. A transport
/// failure is an error, not a `false`: the workflow treats it as an
/// unexpected defect and propagates it.
#[async_trait]
pub trait ReferenceValidator: Send + Sync + 'static {
    async fn tenant_exists(&self, tenant_id: &str) -> Result<bool, MailvaneError>;

    async fn module_exists(&self, module_id: &str) -> Result<bool, MailvaneError>;

    async fn work_item_exists(&self, item_id: &str) -> Result<bool, MailvaneError>;
}
