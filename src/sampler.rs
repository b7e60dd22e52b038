// src/sampler.rs
//! Uniform random selection over the loaded review set. The RNG is injected
//! so tests can run deterministically.

use rand::Rng;

use crate::loader::Review;

/// Uniform random index in `0..len`.
///
/// Panics when `len == 0`; callers check non-emptiness first, mirroring the
/// disabled-until-loaded gating of the demo page.
pub fn pick_index<R: Rng>(rng: &mut R, len: usize) -> usize {
    assert!(len > 0, "cannot sample from an empty review set");
    rng.random_range(0..len)
}

/// Uniform random element of a non-empty slice.
pub fn pick<'a, R: Rng>(rng: &mut R, reviews: &'a [Review]) -> &'a Review {
    let idx = pick_index(rng, reviews.len());
    &reviews[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn reviews(n: usize) -> Vec<Review> {
        (0..n)
            .map(|i| Review::new(&format!("review {i}")).unwrap())
            .collect()
    }

    #[test]
    fn picked_index_is_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 1..20 {
            for _ in 0..100 {
                assert!(pick_index(&mut rng, len) < len);
            }
        }
    }

    #[test]
    fn every_element_is_reachable() {
        let set = reviews(5);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            seen.insert(pick(&mut rng, &set).as_str().to_string());
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    #[should_panic(expected = "empty review set")]
    fn empty_set_panics() {
        let mut rng = StdRng::seed_from_u64(1);
        pick_index(&mut rng, 0);
    }
}
