// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic in-process fakes for Mailvane tests.
//!
//! These implement the core adapter traits with scripted behavior so
//! workflow tests run fast, without network access, and with explicit
//! failure switches for every collaborator.

pub mod gateway;
pub mod provider;
pub mod references;
pub mod store;

pub use gateway::{ScriptedGateway, SentReply};
pub use provider::ScriptedProvider;
pub use references::{StaticReferences, StaticWorkItems};
pub use store::MemoryOutcomeStore;
