// tests/loader_fallback.rs
//
// Candidate resolution and sequential fallback behavior of the loader.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use review_analyzer::loader::{self, FixtureFetcher, LoadError, ResourceFetcher};

#[tokio::test]
async fn first_successful_candidate_wins() {
    let fetcher = FixtureFetcher::new()
        .with("b.tsv", "text\nsecond\n")
        .with("c.tsv", "text\nthird\n");
    let candidates: Vec<String> = ["a.tsv", "b.tsv", "c.tsv"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let loaded = loader::load(&fetcher, &candidates, "text").await.unwrap();
    assert_eq!(loaded.location, "b.tsv");
    assert_eq!(loaded.reviews.len(), 1);
    assert_eq!(loaded.reviews[0].as_str(), "second");
}

/// Fetcher that counts calls so we can prove resolution stops at the first
/// success and never looks further down the list.
struct CountingFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl ResourceFetcher for CountingFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if location == "good.tsv" {
            Ok("text\nworks\n".to_string())
        } else {
            anyhow::bail!("unreachable {location}")
        }
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

#[tokio::test]
async fn later_candidates_are_never_fetched_after_a_success() {
    let fetcher = CountingFetcher {
        calls: AtomicUsize::new(0),
    };
    let candidates: Vec<String> = ["bad.tsv", "good.tsv", "also-good-but-unused.tsv"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let loaded = loader::load(&fetcher, &candidates, "text").await.unwrap();
    assert_eq!(loaded.location, "good.tsv");
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn exhausted_candidates_keep_ordered_diagnostics() {
    let fetcher = FixtureFetcher::new();
    let candidates = vec!["a.tsv".to_string(), "b.tsv".to_string()];

    let err = loader::load(&fetcher, &candidates, "text").await.unwrap_err();
    match err {
        LoadError::AllCandidatesExhausted { attempts } => {
            assert_eq!(attempts.len(), 2);
            assert_eq!(attempts[0].location, "a.tsv");
            assert_eq!(attempts[1].location, "b.tsv");
            assert!(attempts[0].reason.contains("no fixture"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn blank_text_values_fail_even_when_fetch_succeeds() {
    let fetcher = FixtureFetcher::new().with("a.tsv", "text\tlabel\n\tpos\n   \tneg\n");
    let candidates = vec!["a.tsv".to_string()];

    let err = loader::load(&fetcher, &candidates, "text").await.unwrap_err();
    assert!(matches!(err, LoadError::Empty { .. }));
}

#[tokio::test]
async fn missing_text_column_fails_the_same_way() {
    let fetcher = FixtureFetcher::new().with("a.tsv", "body\tlabel\nsome text\tpos\n");
    let candidates = vec!["a.tsv".to_string()];

    let err = loader::load(&fetcher, &candidates, "text").await.unwrap_err();
    match err {
        LoadError::Empty { column } => assert_eq!(column, "text"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn candidate_dedup_preserves_first_seen_order() {
    let configured: Vec<String> = ["a", "b", "a", "c", "b"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let out = loader::candidate_locations(None, &configured);
    assert_eq!(out, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
}

#[test]
fn override_is_the_sole_candidate() {
    let configured = vec!["a.tsv".to_string(), "b.tsv".to_string()];
    let out = loader::candidate_locations(Some("custom.tsv"), &configured);
    assert_eq!(out, vec!["custom.tsv".to_string()]);
}

#[test]
fn blank_override_falls_back_to_the_configured_list() {
    let configured = vec!["a.tsv".to_string()];
    let out = loader::candidate_locations(Some("   "), &configured);
    assert_eq!(out, vec!["a.tsv".to_string()]);
}
