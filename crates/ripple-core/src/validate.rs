//! Consistency checks for item banks.
//!
//! None of these problems stop a bank from being used; they are reported so
//! content authors can fix them.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{AnswerKey, ItemBank};

/// A warning from bank validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    /// The item the warning is about, if any.
    pub item_id: Option<String>,
    pub message: String,
}

impl ValidationWarning {
    fn item(id: &str, message: impl Into<String>) -> Self {
        Self {
            item_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a bank for common authoring mistakes.
pub fn validate_bank(bank: &ItemBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.is_empty() {
        warnings.push(ValidationWarning {
            item_id: None,
            message: "bank has no items".into(),
        });
    }

    // Check for duplicate item IDs
    let mut seen_ids = HashSet::new();
    for item in &bank.items {
        if !seen_ids.insert(item.id.as_str()) {
            warnings.push(ValidationWarning::item(
                &item.id,
                format!("duplicate item ID: {}", item.id),
            ));
        }
    }

    for item in &bank.items {
        if item.body_html.trim().is_empty() {
            warnings.push(ValidationWarning::item(&item.id, "body is empty"));
        }

        if item.estimated_minutes < 0.0 || !item.estimated_minutes.is_finite() {
            warnings.push(ValidationWarning::item(
                &item.id,
                format!("invalid estimated duration: {}", item.estimated_minutes),
            ));
        }

        let mut letters = HashSet::new();
        for alternative in &item.alternatives {
            if !letters.insert(alternative.letter.trim().to_ascii_uppercase()) {
                warnings.push(ValidationWarning::item(
                    &item.id,
                    format!("duplicate alternative letter: {}", alternative.letter),
                ));
            }
        }

        if let Some(AnswerKey::Alternative { letter }) = &item.answer_key {
            if !letters.contains(&letter.to_ascii_uppercase()) {
                warnings.push(ValidationWarning::item(
                    &item.id,
                    format!("answer key names missing alternative {letter}"),
                ));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bank(items: serde_json::Value) -> ItemBank {
        serde_json::from_value(json!({ "items": items })).unwrap()
    }

    #[test]
    fn clean_bank_has_no_warnings() {
        let bank = bank(json!([{
            "id": "q1",
            "bodyHtml": "<p>Capital of France?</p>",
            "estimatedMinutes": 1.5,
            "alternatives": [
                {"letter": "A", "bodyHtml": "Paris"},
                {"letter": "B", "bodyHtml": "Lyon"}
            ],
            "answerKey": "a"
        }]));
        assert!(validate_bank(&bank).is_empty());
    }

    #[test]
    fn empty_bank_is_flagged() {
        let warnings = validate_bank(&ItemBank::default());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].item_id, None);
    }

    #[test]
    fn reports_each_problem() {
        let bank = bank(json!([
            {"id": "q1", "bodyHtml": "ok"},
            {"id": "q1", "bodyHtml": "  "},
            {
                "id": "q2",
                "bodyHtml": "x",
                "estimatedMinutes": -2,
                "alternatives": [{"letter": "A"}, {"letter": "a"}],
                "answerKey": {"letter": "C"}
            }
        ]));
        let messages: Vec<String> = validate_bank(&bank)
            .into_iter()
            .map(|w| format!("{}: {}", w.item_id.unwrap_or_default(), w.message))
            .collect();
        assert_eq!(
            messages,
            vec![
                "q1: duplicate item ID: q1",
                "q1: body is empty",
                "q2: invalid estimated duration: -2",
                "q2: duplicate alternative letter: a",
                "q2: answer key names missing alternative C",
            ]
        );
    }

    #[test]
    fn keyword_keys_are_not_checked_against_letters() {
        let bank = bank(json!([{
            "id": "q1",
            "bodyHtml": "Name the process",
            "answerKey": ["photosynthesis"]
        }]));
        assert!(validate_bank(&bank).is_empty());
    }
}
