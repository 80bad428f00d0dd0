//! Fisher–Yates shuffling.

use rand::Rng;

/// Returns a uniformly random permutation of `items` using the thread RNG.
/// The input is left untouched.
#[must_use]
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut rand::rng())
}

/// Same as [`shuffle`] but draws from the supplied RNG, so callers (and
/// tests) can seed it.
#[must_use]
pub fn shuffle_with<T, R>(items: &[T], rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.random_range(0..=i);
        out.swap(i, j);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn empty_and_single_are_unchanged() {
        assert!(shuffle::<u8>(&[]).is_empty());
        assert_eq!(shuffle(&[42]), vec![42]);
    }

    #[test]
    fn result_is_a_permutation() {
        let input: Vec<u32> = (0..50).collect();
        let mut out = shuffle(&input);
        assert_eq!(out.len(), input.len());
        out.sort_unstable();
        assert_eq!(out, input);
    }

    #[test]
    fn input_is_not_modified() {
        let input = vec!["a", "b", "c", "d"];
        let snapshot = input.clone();
        let _ = shuffle(&input);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn duplicates_are_preserved() {
        let input = vec![1, 1, 2, 2, 2, 3];
        let mut out = shuffle(&input);
        out.sort_unstable();
        assert_eq!(out, input);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let input: Vec<u32> = (0..8).collect();
        let a = shuffle_with(&input, &mut StdRng::seed_from_u64(7));
        let b = shuffle_with(&input, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn repeated_calls_produce_several_orderings() {
        let input = [1, 2, 3, 4];
        let seen: HashSet<Vec<i32>> = (0..200).map(|_| shuffle(&input)).collect();
        assert!(seen.len() > 1, "200 shuffles produced a single ordering");
    }

    #[test]
    fn every_position_is_roughly_uniform() {
        // Three elements, 6000 draws: each value should land in each slot
        // about 2000 times. A biased shuffle (e.g. j in 0..n) skews this badly.
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts = [[0_u32; 3]; 3];
        for _ in 0..6000 {
            let out = shuffle_with(&[0_usize, 1, 2], &mut rng);
            for (slot, &value) in out.iter().enumerate() {
                counts[value][slot] += 1;
            }
        }
        for row in counts {
            for count in row {
                assert!((1700..=2300).contains(&count), "skewed counts: {counts:?}");
            }
        }
    }

    #[test]
    fn all_orderings_of_three_appear() {
        let mut rng = StdRng::seed_from_u64(99);
        let seen: HashSet<Vec<u8>> = (0..600)
            .map(|_| shuffle_with(&[1_u8, 2, 3], &mut rng))
            .collect();
        assert_eq!(seen.len(), 6);
    }
}
