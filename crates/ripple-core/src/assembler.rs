//! Exam assembly and single-slot replacement.
//!
//! Both operations are synchronous and deterministic for a given seed. An
//! empty candidate pool is reported through the returned values
//! ([`Assembly::unfilled`], [`Replacement::Exhausted`]) and never raised as an
//! error; the caller decides how to warn the user.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ExamError;
use crate::filter::candidates;
use crate::model::{ExamItemSlot, FilterSet, Item, ItemBank};
use crate::prng::SeededRng;

/// Result of a full assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    /// Slots in printed order. Shorter than `target_count` when the pool was
    /// empty.
    pub slots: Vec<ExamItemSlot>,
    pub target_count: usize,
    /// Number of bank items that matched the filters.
    pub pool_size: usize,
    /// Positions left empty because no item matched. Always trailing.
    pub unfilled: usize,
    /// Positions ahead of a locked slot that kept their previous item because
    /// no item matched, so the locked slot stays at its index.
    pub kept: usize,
    /// Positions filled with an item already used elsewhere because the pool
    /// ran out of fresh items.
    pub reused: usize,
}

impl Assembly {
    /// Returns `true` if fewer slots than requested satisfy the filters.
    pub fn is_partial(&self) -> bool {
        self.filled() < self.target_count
    }

    /// Slots that satisfy the request: locked or freshly drawn.
    pub fn filled(&self) -> usize {
        self.slots.len() - self.kept
    }
}

/// Build the ordered slot list of an exam.
///
/// Locked slots of `previous` keep their position and content regardless of
/// `filters` and `seed`; locked slots beyond `target_count` are dropped. Every
/// other position draws from the items matching `filters` that are not yet
/// used in this exam, falling back to the whole pool once fresh items run
/// out. With an empty pool, positions before the last locked slot keep their
/// previous content and only the trailing ones are left unfilled.
pub fn assemble(
    bank: &ItemBank,
    filters: &FilterSet,
    previous: &[ExamItemSlot],
    seed: u32,
    target_count: usize,
) -> Assembly {
    let pool = candidates(&bank.items, filters);
    let mut rng = SeededRng::new(seed);

    let mut used: HashSet<&str> = previous
        .iter()
        .take(target_count)
        .filter(|slot| slot.locked)
        .map(|slot| slot.ref_id.as_str())
        .collect();

    let last_locked = previous[..target_count.min(previous.len())]
        .iter()
        .rposition(|slot| slot.locked);

    let mut slots = Vec::with_capacity(target_count);
    let mut unfilled = 0usize;
    let mut kept = 0usize;
    let mut reused = 0usize;

    for position in 0..target_count {
        if let Some(locked) = previous.get(position).filter(|slot| slot.locked) {
            slots.push(locked.clone());
            continue;
        }

        if pool.is_empty() {
            match previous.get(position) {
                Some(slot) if last_locked.is_some_and(|last| position < last) => {
                    slots.push(slot.clone());
                    kept += 1;
                }
                _ => unfilled += 1,
            }
            continue;
        }

        let fresh: Vec<&Item> = pool
            .iter()
            .copied()
            .filter(|item| !used.contains(item.id.as_str()))
            .collect();

        let item = if fresh.is_empty() {
            reused += 1;
            pool[rng.pick(pool.len())]
        } else {
            fresh[rng.pick(fresh.len())]
        };

        used.insert(item.id.as_str());
        slots.push(ExamItemSlot::fresh(item));
    }

    if pool.is_empty() {
        tracing::debug!(target_count, unfilled, kept, "no items match the filters");
    }

    Assembly {
        slots,
        target_count,
        pool_size: pool.len(),
        unfilled,
        kept,
        reused,
    }
}

// ---------------------------------------------------------------------------
// Replacement
// ---------------------------------------------------------------------------

/// How far the filters were loosened to find a replacement.
///
/// The ladder always drops curriculum codes first, then themes, then
/// difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelaxationLevel {
    Exact,
    WithoutCurriculum,
    WithoutTheme,
    WithoutDifficulty,
}

impl RelaxationLevel {
    /// Levels in the order they are tried.
    pub const LADDER: [RelaxationLevel; 4] = [
        RelaxationLevel::Exact,
        RelaxationLevel::WithoutCurriculum,
        RelaxationLevel::WithoutTheme,
        RelaxationLevel::WithoutDifficulty,
    ];

    /// 0 for an exact match, 1–3 for increasing relaxation.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_relaxed(self) -> bool {
        self != RelaxationLevel::Exact
    }

    /// A copy of `filters` with this level's dimensions cleared.
    pub fn apply(self, filters: &FilterSet) -> FilterSet {
        let mut relaxed = filters.clone();
        if self >= RelaxationLevel::WithoutCurriculum {
            relaxed.curriculum_codes.clear();
        }
        if self >= RelaxationLevel::WithoutTheme {
            relaxed.themes.clear();
        }
        if self >= RelaxationLevel::WithoutDifficulty {
            relaxed.difficulty_levels.clear();
        }
        relaxed
    }
}

impl fmt::Display for RelaxationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelaxationLevel::Exact => write!(f, "exact match"),
            RelaxationLevel::WithoutCurriculum => write!(f, "curriculum codes ignored"),
            RelaxationLevel::WithoutTheme => write!(f, "curriculum codes and themes ignored"),
            RelaxationLevel::WithoutDifficulty => {
                write!(f, "curriculum codes, themes and difficulty ignored")
            }
        }
    }
}

/// Outcome of [`replace_one`].
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    /// A new slot for the requested position and the level that produced it.
    Replaced {
        slot: ExamItemSlot,
        level: RelaxationLevel,
    },
    /// Every level of the ladder came up empty; the slot stays as it is.
    Exhausted,
}

impl Replacement {
    pub fn level(&self) -> Option<RelaxationLevel> {
        match self {
            Replacement::Replaced { level, .. } => Some(*level),
            Replacement::Exhausted => None,
        }
    }
}

/// Pick a new item for `slots[index]`.
///
/// Items used at any other position are never chosen. The filter variants of
/// [`RelaxationLevel::LADDER`] are tried in order and the first non-empty pool
/// wins; the pick is drawn from a generator seeded with `seed`.
pub fn replace_one(
    bank: &ItemBank,
    filters: &FilterSet,
    slots: &[ExamItemSlot],
    index: usize,
    seed: u32,
) -> Result<Replacement, ExamError> {
    let current = slots.get(index).ok_or(ExamError::IndexOutOfRange {
        index,
        len: slots.len(),
    })?;
    if current.locked {
        return Err(ExamError::SlotLocked { index });
    }

    let used_elsewhere: HashSet<&str> = slots
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, slot)| slot.ref_id.as_str())
        .collect();

    for level in RelaxationLevel::LADDER {
        let relaxed = level.apply(filters);
        let pool: Vec<&Item> = candidates(&bank.items, &relaxed)
            .into_iter()
            .filter(|item| !used_elsewhere.contains(item.id.as_str()))
            .collect();

        if pool.is_empty() {
            tracing::debug!(index, %level, "no replacement candidates");
            continue;
        }

        let mut rng = SeededRng::new(seed);
        let item = pool[rng.pick(pool.len())];
        return Ok(Replacement::Replaced {
            slot: ExamItemSlot::fresh(item),
            level,
        });
    }

    Ok(Replacement::Exhausted)
}
