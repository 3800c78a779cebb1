//! Deterministic reordering of answer choices.

use crate::model::Alternative;
use crate::prng::SeededRng;

/// Fisher–Yates shuffle of `alternatives` driven by `seed`.
///
/// `None` keeps the bank order, so a slot that was never shuffled prints its
/// choices as authored.
pub fn shuffle_alternatives(alternatives: &[Alternative], seed: Option<u32>) -> Vec<Alternative> {
    let mut shuffled = alternatives.to_vec();
    let Some(seed) = seed else {
        return shuffled;
    };

    let mut rng = SeededRng::new(seed);
    for i in (1..shuffled.len()).rev() {
        let j = rng.pick(i + 1);
        shuffled.swap(i, j);
    }
    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices(letters: &[&str]) -> Vec<Alternative> {
        letters
            .iter()
            .map(|l| Alternative {
                letter: l.to_string(),
                body_html: format!("choice {l}"),
                is_correct: None,
            })
            .collect()
    }

    fn letters(alternatives: &[Alternative]) -> Vec<&str> {
        alternatives.iter().map(|a| a.letter.as_str()).collect()
    }

    #[test]
    fn no_seed_keeps_order() {
        let original = choices(&["A", "B", "C", "D"]);
        assert_eq!(shuffle_alternatives(&original, None), original);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(shuffle_alternatives(&[], Some(5)).is_empty());
    }

    #[test]
    fn same_seed_same_order() {
        let original = choices(&["A", "B", "C", "D", "E"]);
        let first = shuffle_alternatives(&original, Some(1234));
        let second = shuffle_alternatives(&original, Some(1234));
        assert_eq!(first, second);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let original = choices(&["A", "B", "C", "D", "E"]);
        for seed in 0..100 {
            let mut shuffled = letters(&shuffle_alternatives(&original, Some(seed)))
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>();
            shuffled.sort();
            assert_eq!(shuffled, vec!["A", "B", "C", "D", "E"]);
        }
    }

    #[test]
    fn seeds_produce_varied_orders() {
        let original = choices(&["A", "B", "C", "D"]);
        let orders: std::collections::HashSet<Vec<String>> = (0..50)
            .map(|seed| {
                letters(&shuffle_alternatives(&original, Some(seed)))
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .collect();
        assert!(orders.len() > 1);
    }
}
