// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mailvane email-triage engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Mailvane workspace. All collaborator
//! adapters (mail gateway, model provider, outcome store) implement traits
//! defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MailvaneError;
pub use types::{
    AdapterType, Category, HealthStatus, OutcomeStatus, TriageDisposition, TriageOutcome,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    MailGateway, ModelProvider, OutcomeStore, ReferenceValidator, ServiceAdapter,
    WorkItemSource,
};
