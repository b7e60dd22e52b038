// src/loader/mod.rs
//! # Tabular Data Loader
//! Resolves the review file from an ordered candidate list, fetches the
//! first location that answers, and parses it as tab-separated text with a
//! header row. Failed candidates are collected as structured diagnostics
//! instead of concatenated message strings.

pub mod fetch;

use std::collections::HashSet;

use metrics::counter;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

pub use fetch::{FixtureFetcher, HttpFetcher, ResourceFetcher};

/// Default guesses for the review file, tried in order.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "reviews_test.tsv",
    "data/reviews_test.tsv",
    "static/reviews_test.tsv",
];

/// One trimmed, non-empty review text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    text: String,
}

impl Review {
    /// Trims the raw value; blank input yields `None`.
    pub fn new(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            None
        } else {
            Some(Self {
                text: text.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Diagnostic entry for one failed candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchAttempt {
    pub location: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch the review file: all {} candidate locations exhausted", .attempts.len())]
    AllCandidatesExhausted { attempts: Vec<FetchAttempt> },
    #[error("no reviews found; ensure the file has a '{column}' column with content")]
    Empty { column: String },
}

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct LoadedReviews {
    pub reviews: Vec<Review>,
    /// Candidate that answered.
    pub location: String,
    /// Malformed data rows dropped during parsing.
    pub skipped_rows: usize,
}

/// Build the candidate list: an explicit override is the sole candidate,
/// otherwise the configured guesses deduplicated in first-seen order.
pub fn candidate_locations(override_path: Option<&str>, configured: &[String]) -> Vec<String> {
    if let Some(p) = override_path {
        let p = p.trim();
        if !p.is_empty() {
            return vec![p.to_string()];
        }
    }
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(configured.len());
    for c in configured {
        if seen.insert(c.as_str()) {
            out.push(c.clone());
        }
    }
    out
}

/// Try each candidate strictly in order; the first successful fetch wins and
/// resolution stops there. Every failure is recorded with its reason.
pub async fn load(
    fetcher: &dyn ResourceFetcher,
    candidates: &[String],
    text_column: &str,
) -> Result<LoadedReviews, LoadError> {
    let mut attempts: Vec<FetchAttempt> = Vec::new();

    for location in candidates {
        counter!("load_attempts_total").increment(1);
        match fetcher.fetch(location).await {
            Ok(raw) => {
                let (reviews, skipped_rows) = parse_reviews(&raw, text_column);
                if reviews.is_empty() {
                    counter!("load_failures_total").increment(1);
                    return Err(LoadError::Empty {
                        column: text_column.to_string(),
                    });
                }
                return Ok(LoadedReviews {
                    reviews,
                    location: location.clone(),
                    skipped_rows,
                });
            }
            Err(e) => {
                warn!(location = %location, error = ?e, "candidate failed");
                attempts.push(FetchAttempt {
                    location: location.clone(),
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    counter!("load_failures_total").increment(1);
    Err(LoadError::AllCandidatesExhausted { attempts })
}

/// Parse tab-separated content with a header row. Header names are trimmed
/// before the text column is located. Malformed rows are skipped with a
/// warning, never fatal. Returns the extracted reviews plus the skip count.
pub fn parse_reviews(raw: &str, text_column: &str) -> (Vec<Review>, usize) {
    let mut lines = raw.lines();
    let Some(header) = lines.next() else {
        return (Vec::new(), 0);
    };
    let headers: Vec<&str> = header.split('\t').map(str::trim).collect();
    let Some(col) = headers.iter().position(|h| *h == text_column) else {
        return (Vec::new(), 0);
    };

    let mut reviews = Vec::new();
    let mut skipped = 0usize;
    for (idx, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != headers.len() {
            // Row numbering counts the header, matching the raw file.
            warn!(
                row = idx + 2,
                fields = fields.len(),
                expected = headers.len(),
                "malformed row skipped"
            );
            skipped += 1;
            continue;
        }
        if let Some(review) = fields.get(col).and_then(|f| Review::new(f)) {
            reviews.push(review);
        }
    }
    (reviews, skipped)
}
