//! Filter matching.
//!
//! [`matches`] is the single predicate deciding whether an item may appear in
//! an exam under a filter set. It is pure: no randomness, no side effects.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{FilterSet, Item};

/// Does `item` satisfy every populated dimension of `filters`?
///
/// Single-valued dimensions compare for equality, list dimensions test
/// membership, and the token dimension is satisfied when at least one of the
/// item's tokens is listed. An item lacking a field that the filter
/// constrains never matches.
pub fn matches(item: &Item, filters: &FilterSet) -> bool {
    single(&filters.subject, &item.subject)
        && single(&filters.grade_level, &item.grade_level)
        && member(&filters.curriculum_codes, &item.curriculum_code)
        && member(&filters.themes, &item.theme)
        && member(&filters.sub_themes, &item.sub_theme)
        && member(&filters.item_types, &item.item_type)
        && member(&filters.cognitive_levels, &item.cognitive_level)
        && (filters.difficulty_levels.is_empty()
            || item
                .difficulty_level
                .is_some_and(|d| filters.difficulty_levels.contains(&d)))
        && (filters.token_ids.is_empty()
            || item
                .tokens
                .iter()
                .any(|t| filters.token_ids.contains(&t.token_id)))
}

fn single(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match wanted {
        None => true,
        Some(w) => actual.as_deref() == Some(w.as_str()),
    }
}

fn member(wanted: &[String], actual: &Option<String>) -> bool {
    wanted.is_empty() || actual.as_ref().is_some_and(|a| wanted.contains(a))
}

/// Items of `items` that satisfy `filters`, in their original order.
pub fn candidates<'a>(items: &'a [Item], filters: &FilterSet) -> Vec<&'a Item> {
    items.iter().filter(|item| matches(item, filters)).collect()
}

/// Distinct values per filter dimension, for populating option lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub subjects: BTreeSet<String>,
    pub grade_levels: BTreeSet<String>,
    pub curriculum_codes: BTreeSet<String>,
    pub themes: BTreeSet<String>,
    pub sub_themes: BTreeSet<String>,
    pub item_types: BTreeSet<String>,
    pub difficulty_levels: BTreeSet<i64>,
    pub cognitive_levels: BTreeSet<String>,
    pub token_ids: BTreeSet<String>,
}

impl FilterOptions {
    pub fn from_items(items: &[Item]) -> Self {
        let mut options = FilterOptions::default();
        for item in items {
            insert(&mut options.subjects, &item.subject);
            insert(&mut options.grade_levels, &item.grade_level);
            insert(&mut options.curriculum_codes, &item.curriculum_code);
            insert(&mut options.themes, &item.theme);
            insert(&mut options.sub_themes, &item.sub_theme);
            insert(&mut options.item_types, &item.item_type);
            insert(&mut options.cognitive_levels, &item.cognitive_level);
            if let Some(d) = item.difficulty_level {
                options.difficulty_levels.insert(d);
            }
            options
                .token_ids
                .extend(item.tokens.iter().map(|t| t.token_id.clone()));
        }
        options
    }
}

fn insert(set: &mut BTreeSet<String>, value: &Option<String>) {
    if let Some(v) = value {
        set.insert(v.clone());
    }
}
