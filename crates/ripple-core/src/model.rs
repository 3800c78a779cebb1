//! Core data model types for ripple.
//!
//! Item banks and catalogs are read-only reference data fetched from the
//! catalog server; exam documents are the only values the engine creates
//! and the only values that are persisted. Everything is camelCase on the
//! wire.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::prng::normalize_seed;

// ---------------------------------------------------------------------------
// Item bank
// ---------------------------------------------------------------------------

/// One answer choice of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    /// Printed label, e.g. "A".
    pub letter: String,
    /// HTML body of the choice.
    #[serde(default)]
    pub body_html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

/// Answer key of an item.
///
/// Banks ship several shapes for the key. The two shapes the engine
/// understands are typed; everything else is carried through untouched so a
/// newer bank format survives a save/load cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerKey {
    /// The letter of the correct alternative.
    Alternative { letter: String },
    /// Expected keywords for a short-answer item.
    Keywords { keywords: Vec<String> },
    /// A shape this version does not interpret.
    Opaque(Value),
}

/// Longest string still read as an alternative letter rather than free text.
const MAX_LETTER_LEN: usize = 2;

impl AnswerKey {
    /// Classify a raw JSON answer key.
    pub fn from_value(value: Value) -> Self {
        match &value {
            Value::String(s) if is_letter(s) => AnswerKey::Alternative {
                letter: s.trim().to_string(),
            },
            Value::Array(entries) if !entries.is_empty() && entries.iter().all(Value::is_string) => {
                AnswerKey::Keywords {
                    keywords: string_list(entries),
                }
            }
            Value::Object(map) => {
                if let Some(Value::String(letter)) = map.get("letter") {
                    if is_letter(letter) {
                        return AnswerKey::Alternative {
                            letter: letter.trim().to_string(),
                        };
                    }
                }
                if let Some(Value::Array(entries)) = map.get("keywords") {
                    if entries.iter().all(Value::is_string) {
                        return AnswerKey::Keywords {
                            keywords: string_list(entries),
                        };
                    }
                }
                AnswerKey::Opaque(value)
            }
            _ => AnswerKey::Opaque(value),
        }
    }

    /// The wire representation of this key.
    pub fn to_value(&self) -> Value {
        match self {
            AnswerKey::Alternative { letter } => Value::String(letter.clone()),
            AnswerKey::Keywords { keywords } => {
                Value::Array(keywords.iter().cloned().map(Value::String).collect())
            }
            AnswerKey::Opaque(value) => value.clone(),
        }
    }
}

fn is_letter(s: &str) -> bool {
    let trimmed = s.trim();
    !trimmed.is_empty()
        && trimmed.chars().count() <= MAX_LETTER_LEN
        && trimmed.chars().all(|c| c.is_ascii_alphabetic())
}

fn string_list(entries: &[Value]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

impl Serialize for AnswerKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AnswerKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(AnswerKey::from_value)
    }
}

/// Tag linking an item to a pedagogical concept of the token catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRef {
    pub token_id: String,
}

/// An assessment question of the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Stable identifier, unique within a bank.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curriculum_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_theme: Option<String>,
    /// e.g. "multiple_choice", "true_false", "short_answer".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<i64>,
    /// Taxonomy tag such as a Bloom level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognitive_level: Option<String>,
    /// Estimated time to answer, in minutes.
    #[serde(default)]
    pub estimated_minutes: f64,
    /// HTML prompt.
    #[serde(default)]
    pub body_html: String,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_key: Option<AnswerKey>,
    #[serde(default)]
    pub tokens: Vec<TokenRef>,
}

/// Descriptive header of a bank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankMeta {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub grade_level: Option<String>,
    /// Banks are replaced wholesale whenever this changes.
    #[serde(default, deserialize_with = "deserialize_version")]
    pub content_version: Option<String>,
}

/// The full set of items available for one route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemBank {
    #[serde(default)]
    pub meta: BankMeta,
    pub items: Vec<Item>,
}

impl ItemBank {
    pub fn new(meta: BankMeta, items: Vec<Item>) -> Self {
        Self { meta, items }
    }

    /// Find an item by id.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Id → item map for repeated lookups.
    pub fn index(&self) -> HashMap<&str, &Item> {
        self.items.iter().map(|item| (item.id.as_str(), item)).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Banks and manifests write the version as either a string or a number.
fn deserialize_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "contentVersion must be a string or a number, got {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Pedagogical constraints for assembly and replacement.
///
/// An empty list or `None` imposes no constraint on that dimension. The
/// engine only ever reads a filter set; relaxed variants are fresh copies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub curriculum_codes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub themes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_themes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub item_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub difficulty_levels: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cognitive_levels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub token_ids: Vec<String>,
}

impl FilterSet {
    /// Returns `true` if no dimension is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.subject.is_none()
            && self.grade_level.is_none()
            && self.curriculum_codes.is_empty()
            && self.themes.is_empty()
            && self.sub_themes.is_empty()
            && self.item_types.is_empty()
            && self.difficulty_levels.is_empty()
            && self.cognitive_levels.is_empty()
            && self.token_ids.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Exam document
// ---------------------------------------------------------------------------

/// One printed position of an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamItemSlot {
    /// Id of the bank item shown at this position.
    pub ref_id: String,
    #[serde(default)]
    pub locked: bool,
    /// The item's alternatives in printed order.
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
    /// Seed the alternatives were shuffled with; `None` means bank order.
    #[serde(default)]
    pub alt_shuffle_seed: Option<u32>,
}

impl ExamItemSlot {
    /// A fresh, unlocked slot showing `item` with its alternatives in bank order.
    pub fn fresh(item: &Item) -> Self {
        Self {
            ref_id: item.id.clone(),
            locked: false,
            alternatives: item.alternatives.clone(),
            alt_shuffle_seed: None,
        }
    }
}

/// Header printed on the exam.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamMeta {
    pub school: String,
    pub teacher: String,
    pub class: String,
    pub date: String,
    pub subject: String,
    pub grade_level: String,
}

/// A persisted exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDocument {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub meta: ExamMeta,
    /// Seed of the last full assembly.
    pub seed: u32,
    pub target_item_count: usize,
    #[serde(default)]
    pub items: Vec<ExamItemSlot>,
    /// Filters of the last assembly, so a later session can regenerate.
    #[serde(default)]
    pub filters: FilterSet,
    /// Manifest route the bank was loaded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_route: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ExamDocument {
    /// A new, empty, unsaved exam with a random id and a fresh seed.
    pub fn new(title: impl Into<String>, target_item_count: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            meta: ExamMeta::default(),
            seed: normalize_seed(None),
            target_item_count,
            items: Vec::new(),
            filters: FilterSet::default(),
            bank_route: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns `true` if the bank could not supply every requested slot.
    pub fn is_partial(&self) -> bool {
        self.items.len() < self.target_item_count
    }

    pub fn locked_count(&self) -> usize {
        self.items.iter().filter(|slot| slot.locked).count()
    }
}

// ---------------------------------------------------------------------------
// Reference catalogs
// ---------------------------------------------------------------------------

/// A `{id, label, ...}` row of the token or topic catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// Fields this version does not use.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Pedagogical concepts items are tagged with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenCatalog {
    pub tokens: Vec<CatalogEntry>,
}

impl TokenCatalog {
    /// Human-readable label of a token, if the catalog knows it.
    pub fn label_for(&self, id: &str) -> Option<&str> {
        self.tokens
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.label.as_str())
    }
}

/// Curriculum topics of one subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicCatalog {
    #[serde(default)]
    pub subject: Option<String>,
    pub topics: Vec<CatalogEntry>,
}

impl TopicCatalog {
    pub fn label_for(&self, id: &str) -> Option<&str> {
        self.topics
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.label.as_str())
    }
}

/// Content version and route table of the catalog server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, deserialize_with = "deserialize_version")]
    pub content_version: Option<String>,
    /// Path of the token catalog, when not the default.
    #[serde(default)]
    pub tokens: Option<String>,
    pub routes: Vec<Route>,
}

impl Manifest {
    pub fn route(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == id)
    }
}

/// One bank published by the catalog server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub grade_level: Option<String>,
    /// Path of the item bank resource.
    pub bank: String,
    /// Path of the subject's topic catalog.
    #[serde(default)]
    pub topics: Option<String>,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        match (&self.subject, &self.grade_level) {
            (Some(s), Some(g)) => write!(f, " ({s}, {g})"),
            (Some(s), None) => write!(f, " ({s})"),
            (None, Some(g)) => write!(f, " ({g})"),
            (None, None) => Ok(()),
        }
    }
}
