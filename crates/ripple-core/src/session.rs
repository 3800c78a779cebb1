//! Exam editing session.
//!
//! Owns the in-memory exam document and binds each user action (apply
//! filters, regenerate, replace, shuffle, lock, save, load, delete) to the
//! pure operations of this crate and to an [`ExamStore`]. Conditions the user
//! must be told about are reported to a [`SessionObserver`] instead of being
//! raised as errors.

use std::sync::Arc;

use crate::assembler::{assemble, replace_one, Assembly, RelaxationLevel, Replacement};
use crate::error::{ExamError, StoreError};
use crate::model::{ExamDocument, FilterSet, ItemBank, TokenCatalog};
use crate::prng::normalize_seed;
use crate::restore::{restore_slots, Restored};
use crate::shuffle::shuffle_alternatives;
use crate::summary::{summarize, ExamSummary};
use crate::traits::ExamStore;

/// Item count of a new exam when the caller does not choose one.
pub const DEFAULT_ITEM_COUNT: usize = 10;

/// Receives the warnings a session raises.
pub trait SessionObserver: Send + Sync {
    fn on_partial_fill(&self, requested: usize, filled: usize);
    fn on_relaxed_replacement(&self, index: usize, level: RelaxationLevel);
    fn on_replacement_exhausted(&self, index: usize);
    fn on_orphans_dropped(&self, dropped: &[String]);
}

/// No-op observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_partial_fill(&self, _: usize, _: usize) {}
    fn on_relaxed_replacement(&self, _: usize, _: RelaxationLevel) {}
    fn on_replacement_exhausted(&self, _: usize) {}
    fn on_orphans_dropped(&self, _: &[String]) {}
}

/// One exam being edited against one loaded bank.
pub struct ExamSession {
    bank: Arc<ItemBank>,
    store: Arc<dyn ExamStore>,
    observer: Arc<dyn SessionObserver>,
    document: ExamDocument,
}

impl ExamSession {
    pub fn new(
        bank: Arc<ItemBank>,
        store: Arc<dyn ExamStore>,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        Self {
            bank,
            store,
            observer,
            document: ExamDocument::new("", DEFAULT_ITEM_COUNT),
        }
    }

    /// Replace the working document, dropping slots the bank cannot resolve.
    pub fn with_document(mut self, document: ExamDocument) -> Self {
        self.install(document);
        self
    }

    pub fn document(&self) -> &ExamDocument {
        &self.document
    }

    /// Mutable access for header edits (title, meta, target count).
    pub fn document_mut(&mut self) -> &mut ExamDocument {
        &mut self.document
    }

    pub fn into_document(self) -> ExamDocument {
        self.document
    }

    pub fn bank(&self) -> &ItemBank {
        &self.bank
    }

    /// Assemble with new filters, keeping the current seed and locked slots.
    pub fn apply(&mut self, filters: FilterSet) -> Assembly {
        self.document.filters = filters;
        self.reassemble()
    }

    /// Reassemble with a new seed, keeping filters and locked slots.
    ///
    /// `None` draws a fresh seed.
    pub fn regenerate(&mut self, seed: Option<u32>) -> Assembly {
        self.document.seed = seed.unwrap_or_else(|| normalize_seed(None));
        self.reassemble()
    }

    fn reassemble(&mut self) -> Assembly {
        let assembly = assemble(
            &self.bank,
            &self.document.filters,
            &self.document.items,
            self.document.seed,
            self.document.target_item_count,
        );
        tracing::info!(
            seed = self.document.seed,
            pool = assembly.pool_size,
            slots = assembly.slots.len(),
            "assembled exam"
        );
        if assembly.is_partial() {
            self.observer
                .on_partial_fill(assembly.target_count, assembly.filled());
        }
        self.document.items = assembly.slots.clone();
        assembly
    }

    /// Swap the item at `index` for another one, relaxing filters if needed.
    pub fn replace(&mut self, index: usize) -> Result<Replacement, ExamError> {
        let outcome = replace_one(
            &self.bank,
            &self.document.filters,
            &self.document.items,
            index,
            normalize_seed(None),
        )?;
        match &outcome {
            Replacement::Replaced { slot, level } => {
                self.document.items[index] = slot.clone();
                if level.is_relaxed() {
                    self.observer.on_relaxed_replacement(index, *level);
                }
            }
            Replacement::Exhausted => self.observer.on_replacement_exhausted(index),
        }
        Ok(outcome)
    }

    /// Reorder the alternatives of the slot at `index` with a fresh seed.
    ///
    /// Returns the seed used so the order can be reproduced.
    pub fn shuffle_alternatives(&mut self, index: usize) -> Result<u32, ExamError> {
        let len = self.document.items.len();
        let slot = self
            .document
            .items
            .get_mut(index)
            .ok_or(ExamError::IndexOutOfRange { index, len })?;
        if slot.locked {
            return Err(ExamError::SlotLocked { index });
        }
        let item = self
            .bank
            .get(&slot.ref_id)
            .ok_or_else(|| ExamError::UnknownItem(slot.ref_id.clone()))?;

        let seed = normalize_seed(None);
        slot.alternatives = shuffle_alternatives(&item.alternatives, Some(seed));
        slot.alt_shuffle_seed = Some(seed);
        Ok(seed)
    }

    /// Flip the lock of the slot at `index`; returns the new state.
    pub fn toggle_lock(&mut self, index: usize) -> Result<bool, ExamError> {
        let len = self.document.items.len();
        let slot = self
            .document
            .items
            .get_mut(index)
            .ok_or(ExamError::IndexOutOfRange { index, len })?;
        slot.locked = !slot.locked;
        Ok(slot.locked)
    }

    /// Persist the working document and adopt the stamped copy.
    pub async fn save(&mut self) -> Result<&ExamDocument, StoreError> {
        let stamped = self.store.save(&self.document).await?;
        self.document = stamped;
        Ok(&self.document)
    }

    /// Load a stored exam into the session.
    ///
    /// Returns `false` when no exam has this id; the working document is
    /// left untouched in that case.
    pub async fn load(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(document) = self.store.get(id).await? else {
            return Ok(false);
        };
        self.install(document);
        Ok(true)
    }

    /// Delete a stored exam. Deleting the exam being edited starts a new one.
    pub async fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.store.delete(id).await?;
        if self.document.id == id {
            self.document = ExamDocument::new("", self.document.target_item_count);
        }
        Ok(())
    }

    pub fn summary(&self, tokens: &TokenCatalog) -> ExamSummary {
        summarize(&self.bank, &self.document.items, tokens)
    }

    /// Switch to another bank, typically a newer content version.
    pub fn set_bank(&mut self, bank: Arc<ItemBank>) -> Restored {
        self.bank = bank;
        self.restore()
    }

    fn install(&mut self, document: ExamDocument) {
        self.document = document;
        self.restore();
    }

    fn restore(&mut self) -> Restored {
        let restored = restore_slots(&self.bank, &self.document.items);
        if restored.has_orphans() {
            self.observer.on_orphans_dropped(&restored.dropped);
        }
        self.document.items = restored.slots.clone();
        restored
    }
}
