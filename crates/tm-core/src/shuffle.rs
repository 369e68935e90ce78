//! Unbiased in-place shuffling.

use rand::Rng;
use rand::rngs::StdRng;

/// Shuffle a slice in place with the Fisher–Yates algorithm.
///
/// Iterates from the last index down to 1, swapping each position with a
/// uniformly chosen index at or below it, so every permutation is equally
/// likely.
pub fn shuffle<T>(items: &mut [T], rng: &mut StdRng) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Return a shuffled copy of a vector.
pub fn shuffled<T>(mut items: Vec<T>, rng: &mut StdRng) -> Vec<T> {
    shuffle(&mut items, rng);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let original: Vec<u32> = (0..50).collect();
        let mut items = original.clone();
        shuffle(&mut items, &mut rng);
        assert_eq!(items.len(), original.len());
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, original);
    }

    #[test]
    fn empty_and_single_are_noops() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut empty: Vec<u32> = vec![];
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut one = vec![9];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, vec![9]);
    }

    #[test]
    fn positions_are_approximately_uniform() {
        // Each of the 5 elements should land in position 0 about 1/5 of the
        // time. With 10_000 trials the expected count is 2000; allow a wide
        // tolerance so the test is not flaky.
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 10_000;
        let mut first_slot: HashMap<u32, u32> = HashMap::new();
        for _ in 0..trials {
            let mut items = vec![0u32, 1, 2, 3, 4];
            shuffle(&mut items, &mut rng);
            *first_slot.entry(items[0]).or_insert(0) += 1;
        }
        for v in 0..5 {
            let count = first_slot.get(&v).copied().unwrap_or(0);
            assert!(
                (1700..=2300).contains(&count),
                "element {v} landed first {count} times"
            );
        }
    }

    #[test]
    fn all_permutations_of_three_occur() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen: HashMap<Vec<u32>, u32> = HashMap::new();
        for _ in 0..6_000 {
            let mut items = vec![0u32, 1, 2];
            shuffle(&mut items, &mut rng);
            *seen.entry(items).or_insert(0) += 1;
        }
        assert_eq!(seen.len(), 6);
        // Each permutation expected ~1000 times.
        for (perm, count) in &seen {
            assert!(
                (800..=1200).contains(count),
                "permutation {perm:?} occurred {count} times"
            );
        }
    }
}
