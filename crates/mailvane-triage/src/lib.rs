// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email triage core for the Mailvane product-management backend.
//!
//! One inbound message enters [`workflow::TriageWorkflow::process`], which
//! classifies it via a language model (defensively parsed by
//! [`sanitize`]), optionally correlates it to an existing work item via
//! [`correlate::Correlator`], validates referenced entities, and persists
//! exactly one outcome record with idempotent re-processing semantics.

pub mod classify;
pub mod correlate;
pub mod prompt;
pub mod sanitize;
pub mod workflow;

pub use classify::ClassificationResult;
pub use correlate::{extract_comment, extract_status, Correlator};
pub use prompt::build_classification_prompt;
pub use sanitize::{sanitize, sanitize_response};
pub use workflow::{TriageState, TriageWorkflow};
