// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the triage core and its external collaborators.
//!
//! Adapters with their own transport extend the [`ServiceAdapter`] base
//! trait; read-only collaborators (`ReferenceValidator`, `WorkItemSource`)
//! are plain async traits. All use `#[async_trait]` for dynamic dispatch
//! compatibility.

pub mod adapter;
pub mod gateway;
pub mod provider;
pub mod references;
pub mod store;
pub mod work_items;

// Re-export all traits at the traits module level for convenience.
pub use adapter::ServiceAdapter;
pub use gateway::MailGateway;
pub use provider::ModelProvider;
pub use references::ReferenceValidator;
pub use store::OutcomeStore;
pub use work_items::WorkItemSource;
