// src/store.rs
//! In-memory owner of the loaded review set for the lifetime of the process.
//! Replaced wholesale on each successful load; never persisted.

use std::sync::RwLock;

use serde::Serialize;

use crate::loader::{LoadedReviews, Review};
use crate::sampler;

/// One sampled review as handed to the display layer.
#[derive(Debug, Clone, Serialize)]
pub struct SampledReview {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct ReviewStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    reviews: Vec<Review>,
    location: Option<String>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set with a fresh load.
    pub fn install(&self, loaded: LoadedReviews) {
        let mut g = self.inner.write().expect("review store lock poisoned");
        g.reviews = loaded.reviews;
        g.location = Some(loaded.location);
        metrics::gauge!("reviews_loaded").set(g.reviews.len() as f64);
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .expect("review store lock poisoned")
            .reviews
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Candidate location the current set was loaded from.
    pub fn location(&self) -> Option<String> {
        self.inner
            .read()
            .expect("review store lock poisoned")
            .location
            .clone()
    }

    /// Uniform random review, or `None` while nothing is loaded.
    pub fn sample(&self) -> Option<SampledReview> {
        let g = self.inner.read().expect("review store lock poisoned");
        if g.reviews.is_empty() {
            return None;
        }
        let index = sampler::pick_index(&mut rand::rng(), g.reviews.len());
        Some(SampledReview {
            index,
            text: g.reviews[index].as_str().to_string(),
        })
    }
}
