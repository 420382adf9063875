// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Defensive extraction of a JSON object from unreliable model output.
//!
//! The classification prompt instructs the model to respond with a bare
//! JSON object, but models violate that instruction in practice: code
//! fences, conversational preambles, trailing commentary, and truncated
//! output under token limits all occur. This module recovers the object
//! when one is present and fails with a diagnosable
//! [`MailvaneError::MalformedResponse`] when it is not.

use mailvane_core::error::MailvaneError;
use mailvane_core::types::ModelResponse;
use serde_json::Value;

/// How much surrounding text a parse error carries for diagnostics.
const ERROR_CONTEXT_CHARS: usize = 100;

/// Sanitizes a model response, concatenating extractable text from each
/// part before recovery.
pub fn sanitize_response(response: &ModelResponse) -> Result<Value, MailvaneError> {
    sanitize(&response.extract_text())
}

/// Recovers a JSON object from arbitrary model text.
///
/// Steps, each operating on the previous step's output:
/// 1. Strip leading/trailing BOM, zero-width, and whitespace characters.
/// 2. Strip a fenced code-block marker (triple-backtick, optional language
///    tag) if present.
/// 3. Discard everything before the first `{` (tolerates prose preamble).
/// 4. Discard everything after the last `}` (tolerates trailing commentary).
/// 5. Reject unbalanced braces as truncation, carrying the deficit.
/// 6. Parse what remains, wrapping syntax errors with bounded context.
///
/// Pure function: no side effects.
pub fn sanitize(raw: &str) -> Result<Value, MailvaneError> {
    let text = raw.trim_matches(is_noise);
    let text = strip_code_fence(text);

    let start = text.find('{').ok_or_else(|| MailvaneError::MalformedResponse {
        reason: "no JSON object found in response".into(),
        truncated: false,
    })?;
    let end = text.rfind('}').ok_or_else(|| MailvaneError::MalformedResponse {
        reason: "object is never closed".into(),
        truncated: true,
    })?;
    if end < start {
        return Err(MailvaneError::MalformedResponse {
            reason: "closing brace precedes opening brace".into(),
            truncated: false,
        });
    }
    let text = &text[start..=end];

    let open = text.matches('{').count();
    let close = text.matches('}').count();
    if open != close {
        return Err(MailvaneError::MalformedResponse {
            reason: format!(
                "unbalanced braces: {open} open vs {close} close (deficit {})",
                open.abs_diff(close)
            ),
            truncated: true,
        });
    }

    serde_json::from_str(text).map_err(|e| {
        let context: String = text.chars().take(ERROR_CONTEXT_CHARS).collect();
        MailvaneError::MalformedResponse {
            reason: format!("{e}; near: {context}"),
            truncated: false,
        }
    })
}

/// BOM, zero-width, and whitespace characters stripped in step 1.
fn is_noise(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\u{feff}' | '\u{200b}' | '\u{200c}' | '\u{200d}')
}

/// Removes a surrounding triple-backtick fence, including an optional
/// language tag on the opening line.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line if the fence opens one.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    let rest = rest.trim_end_matches(is_noise);
    rest.strip_suffix("```").unwrap_or(rest).trim_matches(is_noise)
}
