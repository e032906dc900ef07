//! Seedable randomness shared by the seeding and mutation code.
//!
//! Every randomized routine in this crate takes an explicit `&mut R: Rng`.
//! The helpers here only build the generator and wrap the few sampling
//! patterns used in several places.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Shuffles a slice in place (Fisher-Yates).
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Picks `k` distinct elements of `items` in random order.
///
/// Returns `None` when fewer than `k` elements are available.
pub fn sample_distinct<T: Copy, R: Rng>(items: &[T], k: usize, rng: &mut R) -> Option<Vec<T>> {
    if items.len() < k {
        return None;
    }
    let picked = rand::seq::index::sample(rng, items.len(), k);
    Some(picked.into_iter().map(|i| items[i]).collect())
}

/// Picks one element uniformly, or `None` for an empty slice.
pub fn choose<T: Copy, R: Rng>(items: &[T], rng: &mut R) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[rng.random_range(0..items.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = create_rng(7);
        let mut b = create_rng(7);
        let xs: Vec<u32> = (0..8).map(|_| a.random_range(0..1000)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.random_range(0..1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_sample_distinct() {
        let mut rng = create_rng(1);
        let items = [10, 20, 30, 40];
        let picked = sample_distinct(&items, 3, &mut rng).unwrap();
        assert_eq!(picked.len(), 3);
        assert_ne!(picked[0], picked[1]);
        assert_ne!(picked[1], picked[2]);
        assert_ne!(picked[0], picked[2]);
        assert!(sample_distinct(&items, 5, &mut rng).is_none());
    }

    #[test]
    fn test_choose_empty() {
        let mut rng = create_rng(1);
        let empty: [u32; 0] = [];
        assert!(choose(&empty, &mut rng).is_none());
        assert_eq!(choose(&[5], &mut rng), Some(5));
    }

    #[test]
    fn test_shuffle_preserves_elements() {
        let mut rng = create_rng(3);
        let mut items: Vec<u32> = (0..20).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}
