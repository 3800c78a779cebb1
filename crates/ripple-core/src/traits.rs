//! Core trait definitions for catalog sources and exam stores.
//!
//! These async traits are implemented by the `ripple-catalog` and
//! `ripple-store` crates respectively.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CatalogError, StoreError};
use crate::model::ExamDocument;

// ---------------------------------------------------------------------------
// Catalog source trait
// ---------------------------------------------------------------------------

/// Raw transport for catalog resources (manifest, banks, token and topic
/// catalogs).
///
/// A source only fetches and parses JSON; shape validation and caching live
/// in the loaders layered on top.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable source name (e.g. "http", "file").
    fn name(&self) -> &str;

    /// Fetch the resource at `path`, relative to the catalog root.
    async fn fetch_json(&self, path: &str) -> Result<Value, CatalogError>;
}

// ---------------------------------------------------------------------------
// Exam store trait
// ---------------------------------------------------------------------------

/// Durable storage of exam documents keyed by id.
#[async_trait]
pub trait ExamStore: Send + Sync {
    /// Stamp and upsert the full document, returning the stamped copy.
    ///
    /// `updated_at` is always rewritten and moves strictly forward;
    /// `created_at` is only set when absent.
    async fn save(&self, doc: &ExamDocument) -> Result<ExamDocument, StoreError>;

    /// `Ok(None)` when no document has this id.
    async fn get(&self, id: &str) -> Result<Option<ExamDocument>, StoreError>;

    /// Every document, most recently saved first.
    async fn list(&self) -> Result<Vec<ExamDocument>, StoreError>;

    /// Remove a document. Deleting a missing id is not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
