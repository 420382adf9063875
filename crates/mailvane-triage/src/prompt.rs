// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification prompt construction.
//!
//! Builds a deterministic instruction+context prompt from cleaned email
//! fields. Subject, body, and sender are whitespace-collapsed and truncated
//! to bound prompt cost and blunt prompt injection via oversized bodies.

use mailvane_core::types::InboundMessage;

/// Caps applied after whitespace collapse.
const MAX_SUBJECT_CHARS: usize = 200;
const MAX_BODY_CHARS: usize = 1500;
const MAX_SENDER_CHARS: usize = 100;

/// System prompt for the classification call.
pub const SYSTEM_PROMPT: &str =
    "You are the email-triage classifier for a product-management workspace. \
     You classify inbound email and extract structured fields. You respond \
     only with JSON.";

/// Builds the classification prompt for one inbound message.
///
/// The JSON-only instruction is load-bearing: the response sanitizer exists
/// to compensate for models that violate it anyway.
pub fn build_classification_prompt(email: &InboundMessage) -> String {
    let from = clean(&email.from, MAX_SENDER_CHARS);
    let subject = clean(&email.subject, MAX_SUBJECT_CHARS);
    let body = clean(&email.body_text, MAX_BODY_CHARS);

    format!(
        "Classify the following email into exactly one category and extract fields.\n\
         \n\
         Categories:\n\
         - \"feature\": the email requests new product functionality.\n\
         - \"task\": the email describes concrete work to be done.\n\
         - \"response\": the email needs a drafted reply and nothing else.\n\
         - \"correlate_existing\": the email refers to an already-tracked work item.\n\
         - \"no_action\": the email requires no stored result (spam, pure FYI, automated notifications).\n\
         \n\
         Respond with a single JSON object and no leading characters before the \
         opening brace: no prose, no code fences. Schema:\n\
         {{\n\
         \x20 \"category\": \"<one of the five categories>\",\n\
         \x20 \"confidence\": <number between 0 and 1>,\n\
         \x20 \"matched_item_id\": \"<work item id, correlate_existing only>\",\n\
         \x20 \"fields\": {{ \"title\", \"description\", \"priority\", \"status\", \
         \"assignees\", \"due_date\", \"reply_text\", \"tone\", \"tenant_id\", \
         \"module_id\", \"item_hint\" as applicable }}\n\
         }}\n\
         \n\
         From: {from}\n\
         Subject: {subject}\n\
         Received: {received}\n\
         Body:\n\
         {body}",
        received = email.received_at.to_rfc3339(),
    )
}

/// Collapses internal whitespace runs (including newlines) to single spaces,
/// then truncates to `max_chars`.
fn clean(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        collapsed.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn email(subject: &str, body: &str, from: &str) -> InboundMessage {
        InboundMessage {
            id: "msg-1".into(),
            thread_id: None,
            from: from.into(),
            subject: subject.into(),
            body_text: body.into(),
            body_html: None,
            received_at: Utc::now(),
        }
    }

    #[test]
    fn prompt_embeds_cleaned_fields_and_taxonomy() {
        let prompt = build_classification_prompt(&email(
            "Please fix login bug",
            "The OAuth login is broken.",
            "john@example.com",
        ));

        assert!(prompt.contains("Subject: Please fix login bug"));
        assert!(prompt.contains("From: john@example.com"));
        assert!(prompt.contains("The OAuth login is broken."));
        for category in [
            "\"feature\"",
            "\"task\"",
            "\"response\"",
            "\"correlate_existing\"",
            "\"no_action\"",
        ] {
            assert!(prompt.contains(category), "missing {category}");
        }
        assert!(prompt.contains("no leading characters"));
    }

    #[test]
    fn prompt_is_deterministic_for_fixed_input() {
        let message = email("Weekly sync", "Agenda attached.", "pm@example.com");
        assert_eq!(
            build_classification_prompt(&message),
            build_classification_prompt(&message)
        );
    }

    #[test]
    fn subject_is_truncated_to_200_chars() {
        let long_subject = "s".repeat(400);
        let prompt = build_classification_prompt(&email(&long_subject, "b", "a@b.c"));
        assert!(prompt.contains(&"s".repeat(200)));
        assert!(!prompt.contains(&"s".repeat(201)));
    }

    #[test]
    fn body_is_truncated_to_1500_chars() {
        let long_body = "b".repeat(4000);
        let prompt = build_classification_prompt(&email("s", &long_body, "a@b.c"));
        assert!(prompt.contains(&"b".repeat(1500)));
        assert!(!prompt.contains(&"b".repeat(1501)));
    }

    #[test]
    fn sender_is_truncated_to_100_chars() {
        let long_sender = "x".repeat(300);
        let prompt = build_classification_prompt(&email("s", "b", &long_sender));
        assert!(prompt.contains(&"x".repeat(100)));
        assert!(!prompt.contains(&"x".repeat(101)));
    }

    #[test]
    fn internal_whitespace_collapses_before_truncation() {
        let prompt = build_classification_prompt(&email(
            "a  b\n\nc\td",
            "line one\nline two\r\n\r\nline three",
            "a@b.c",
        ));
        assert!(prompt.contains("Subject: a b c d"));
        assert!(prompt.contains("line one line two line three"));
    }
}
