// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that the gateway, provider, and store adapters implement.

use async_trait::async_trait;

use crate::error::MailvaneError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for Mailvane service adapters.
///
/// Every external collaborator with its own transport (mail gateway, model
/// provider, outcome store) implements this trait, which provides identity,
/// lifecycle, and health check capabilities for host supervision.
#[async_trait]
pub trait ServiceAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of adapter (gateway, provider, store).
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, MailvaneError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), MailvaneError>;
}
