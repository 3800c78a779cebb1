//! Read-only statistics over an assembled exam.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{ExamItemSlot, Item, ItemBank, TokenCatalog};

/// Derived view of an exam for the summary panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummary {
    pub total_slots: usize,
    pub locked_count: usize,
    /// Slots whose item is missing from the bank.
    pub orphaned: usize,
    /// Sum of estimated minutes; orphaned slots contribute nothing.
    pub total_minutes: f64,
    /// Mean difficulty of the items that carry one, 0 when none do.
    pub average_difficulty: f64,
    pub curriculum_codes: BTreeSet<String>,
    pub item_types: BTreeMap<String, usize>,
    pub cognitive_levels: BTreeMap<String, usize>,
    /// Referenced token id → label, falling back to the id itself.
    pub tokens: BTreeMap<String, String>,
}

/// Aggregate `slots` against `bank`.
pub fn summarize(bank: &ItemBank, slots: &[ExamItemSlot], tokens: &TokenCatalog) -> ExamSummary {
    let index: HashMap<&str, &Item> = bank.index();
    let mut summary = ExamSummary {
        total_slots: slots.len(),
        locked_count: slots.iter().filter(|s| s.locked).count(),
        ..Default::default()
    };

    let mut difficulty_sum = 0i64;
    let mut difficulty_count = 0usize;

    for slot in slots {
        let Some(item) = index.get(slot.ref_id.as_str()) else {
            summary.orphaned += 1;
            continue;
        };

        summary.total_minutes += item.estimated_minutes;
        if let Some(d) = item.difficulty_level {
            difficulty_sum += d;
            difficulty_count += 1;
        }
        if let Some(code) = &item.curriculum_code {
            summary.curriculum_codes.insert(code.clone());
        }
        if let Some(kind) = &item.item_type {
            *summary.item_types.entry(kind.clone()).or_default() += 1;
        }
        if let Some(level) = &item.cognitive_level {
            *summary.cognitive_levels.entry(level.clone()).or_default() += 1;
        }
        for token in &item.tokens {
            summary
                .tokens
                .entry(token.token_id.clone())
                .or_insert_with(|| {
                    tokens
                        .label_for(&token.token_id)
                        .unwrap_or(&token.token_id)
                        .to_string()
                });
        }
    }

    if difficulty_count > 0 {
        summary.average_difficulty = difficulty_sum as f64 / difficulty_count as f64;
    }

    summary
}
