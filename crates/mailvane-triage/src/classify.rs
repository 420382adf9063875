// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coercion of sanitized model output into a typed classification.
//!
//! This is the single boundary where the model's open, advisory schema is
//! turned into typed data: category defaulting, confidence clamping, and
//! per-category field coercion all happen here, once, so the rest of the
//! workflow never handles an untyped dictionary.

use mailvane_core::types::{
    Category, CorrelationFields, ExtractedFields, FeatureFields, ResponseFields, TaskFields,
};
use serde_json::{Map, Value};

/// The classifier's output for one message, coerced from sanitized JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub category: Category,
    pub fields: ExtractedFields,
    pub matched_item_id: Option<String>,
    /// Advisory confidence, clamped to [0, 1].
    pub confidence: f64,
}

impl ClassificationResult {
    /// Builds a classification from the sanitized model object.
    ///
    /// An empty, missing, or unrecognized category becomes `response`
    /// (never `no_action`); confidence is clamped to [0, 1]; unknown field
    /// keys survive in the variant's residual map.
    pub fn from_value(value: Value) -> Self {
        let obj = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let category =
            Category::parse_or_default(obj.get("category").and_then(Value::as_str));

        let confidence = obj
            .get("confidence")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);

        let matched_item_id = obj
            .get("matched_item_id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .filter(|s| !s.is_empty());

        // Prefer a nested "fields" object; fall back to treating the
        // remaining top-level keys as the field map.
        let raw_fields = match obj.get("fields") {
            Some(Value::Object(map)) => map.clone(),
            _ => {
                let mut residual = obj;
                for key in ["category", "confidence", "matched_item_id", "fields"] {
                    residual.remove(key);
                }
                residual
            }
        };

        let fields = coerce_fields(category, raw_fields);

        Self {
            category,
            fields,
            matched_item_id,
            confidence,
        }
    }
}

/// Maps the raw field map onto the typed variant for the category.
///
/// A type mismatch on a known key demotes the whole map to the variant's
/// residual: extraction is advisory, so nothing is dropped on coercion
/// failure.
fn coerce_fields(category: Category, map: Map<String, Value>) -> ExtractedFields {
    let value = Value::Object(map.clone());
    match category {
        Category::Feature => ExtractedFields::Feature(
            serde_json::from_value::<FeatureFields>(value).unwrap_or(FeatureFields {
                extra: map,
                ..Default::default()
            }),
        ),
        Category::Task => ExtractedFields::Task(
            serde_json::from_value::<TaskFields>(value).unwrap_or(TaskFields {
                extra: map,
                ..Default::default()
            }),
        ),
        Category::CorrelateExisting => ExtractedFields::Correlation(
            serde_json::from_value::<CorrelationFields>(value).unwrap_or(CorrelationFields {
                extra: map,
                ..Default::default()
            }),
        ),
        Category::Response | Category::NoAction => ExtractedFields::Response(
            serde_json::from_value::<ResponseFields>(value).unwrap_or(ResponseFields {
                extra: map,
                ..Default::default()
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_classification_coerces_typed_fields() {
        let result = ClassificationResult::from_value(json!({
            "category": "task",
            "confidence": 0.85,
            "fields": {
                "title": "Fix login bug",
                "description": "OAuth flow broken",
                "assignees": ["john"],
                "module_id": "m-1",
                "sprint_hint": "next"
            }
        }));

        assert_eq!(result.category, Category::Task);
        assert!((result.confidence - 0.85).abs() < f64::EPSILON);
        match &result.fields {
            ExtractedFields::Task(task) => {
                assert_eq!(task.title.as_deref(), Some("Fix login bug"));
                assert_eq!(task.assignees, vec!["john"]);
                assert_eq!(task.module_id.as_deref(), Some("m-1"));
                assert_eq!(
                    task.extra.get("sprint_hint").and_then(Value::as_str),
                    Some("next")
                );
            }
            other => panic!("expected Task fields, got {other:?}"),
        }
    }

    #[test]
    fn missing_category_defaults_to_response() {
        let result = ClassificationResult::from_value(json!({"confidence": 0.3}));
        assert_eq!(result.category, Category::Response);
        assert!(matches!(result.fields, ExtractedFields::Response(_)));
    }

    #[test]
    fn unrecognized_category_defaults_to_response() {
        for bad in ["", "  ", "spam", "FEATURE REQUEST"] {
            let result = ClassificationResult::from_value(json!({"category": bad}));
            assert_eq!(result.category, Category::Response, "for category {bad:?}");
        }
    }

    #[test]
    fn confidence_is_clamped_to_unit_interval() {
        let high = ClassificationResult::from_value(json!({"confidence": 3.5}));
        assert_eq!(high.confidence, 1.0);

        let low = ClassificationResult::from_value(json!({"confidence": -0.2}));
        assert_eq!(low.confidence, 0.0);

        let missing = ClassificationResult::from_value(json!({}));
        assert_eq!(missing.confidence, 0.0);
    }

    #[test]
    fn empty_matched_item_id_is_treated_as_absent() {
        let result = ClassificationResult::from_value(json!({
            "category": "correlate_existing",
            "matched_item_id": ""
        }));
        assert!(result.matched_item_id.is_none());
    }

    #[test]
    fn top_level_keys_fall_back_as_field_map() {
        // No "fields" object -- the model put extraction keys at top level.
        let result = ClassificationResult::from_value(json!({
            "category": "feature",
            "confidence": 0.6,
            "title": "Dark mode",
            "priority": "high"
        }));
        match &result.fields {
            ExtractedFields::Feature(feature) => {
                assert_eq!(feature.title.as_deref(), Some("Dark mode"));
                assert_eq!(feature.priority.as_deref(), Some("high"));
            }
            other => panic!("expected Feature fields, got {other:?}"),
        }
    }

    #[test]
    fn type_mismatch_demotes_map_to_residual() {
        // "assignees" should be an array; a string fails typed coercion.
        let result = ClassificationResult::from_value(json!({
            "category": "task",
            "fields": {"title": "x", "assignees": "john"}
        }));
        match &result.fields {
            ExtractedFields::Task(task) => {
                assert!(task.title.is_none(), "typed coercion should have failed");
                assert_eq!(
                    task.extra.get("assignees").and_then(Value::as_str),
                    Some("john")
                );
                assert_eq!(task.extra.get("title").and_then(Value::as_str), Some("x"));
            }
            other => panic!("expected Task fields, got {other:?}"),
        }
    }

    #[test]
    fn non_object_input_yields_conservative_default() {
        let result = ClassificationResult::from_value(json!("just a string"));
        assert_eq!(result.category, Category::Response);
        assert_eq!(result.confidence, 0.0);
        assert!(result.matched_item_id.is_none());
    }
}
