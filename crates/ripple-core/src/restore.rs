//! Reconciling stored slots with the currently loaded bank.

use std::collections::HashSet;

use crate::model::{ExamItemSlot, ItemBank};

/// Slots that survived a restore, plus the ids that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Restored {
    pub slots: Vec<ExamItemSlot>,
    /// Ref ids dropped because the bank no longer has them, in slot order.
    pub dropped: Vec<String>,
}

impl Restored {
    pub fn has_orphans(&self) -> bool {
        !self.dropped.is_empty()
    }
}

/// Drop every slot whose item is absent from `bank`.
///
/// Bank content changes between versions; a stored exam referencing a retired
/// item loses that slot instead of failing to load. Surviving slots keep
/// their relative order, lock state and alternative order.
pub fn restore_slots(bank: &ItemBank, slots: &[ExamItemSlot]) -> Restored {
    let known: HashSet<&str> = bank.items.iter().map(|item| item.id.as_str()).collect();
    let mut restored = Restored::default();
    for slot in slots {
        if known.contains(slot.ref_id.as_str()) {
            restored.slots.push(slot.clone());
        } else {
            restored.dropped.push(slot.ref_id.clone());
        }
    }
    if restored.has_orphans() {
        tracing::warn!(dropped = restored.dropped.len(), "dropped orphaned exam slots");
    }
    restored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BankMeta, Item};

    fn bank(ids: &[&str]) -> ItemBank {
        let items = ids
            .iter()
            .map(|id| {
                serde_json::from_value::<Item>(serde_json::json!({"id": id, "bodyHtml": "x"}))
                    .unwrap()
            })
            .collect();
        ItemBank::new(BankMeta::default(), items)
    }

    fn slot(id: &str, locked: bool) -> ExamItemSlot {
        ExamItemSlot {
            ref_id: id.into(),
            locked,
            alternatives: vec![],
            alt_shuffle_seed: Some(3),
        }
    }

    #[test]
    fn keeps_known_slots_in_order() {
        let restored = restore_slots(&bank(&["a", "b", "c"]), &[slot("c", true), slot("a", false)]);
        assert!(!restored.has_orphans());
        assert_eq!(restored.slots, vec![slot("c", true), slot("a", false)]);
    }

    #[test]
    fn drops_orphans_and_reports_them() {
        let restored = restore_slots(
            &bank(&["a"]),
            &[slot("x", true), slot("a", false), slot("y", false)],
        );
        assert_eq!(restored.slots, vec![slot("a", false)]);
        assert_eq!(restored.dropped, vec!["x".to_string(), "y".to_string()]);
    }
}
