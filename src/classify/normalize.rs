// src/classify/normalize.rs
//! Best-effort interpretation of inference payloads.
//!
//! Never fails: the response shape is detected explicitly and anything
//! unrecognized degrades to the task default (neutral polarity, low bucket)
//! instead of surfacing an error.

use std::cmp::Ordering;

use serde_json::Value;

use super::outcome::{Category, Outcome};

/// Which instruction the generated text answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Sentiment,
    NounDensity,
}

/// Known response shapes, tried in priority order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Shape {
    /// `[[{"label": ..., "score": ...}, ...]]` from a dedicated classifier.
    /// Holds only the entries with a string label and a numeric score.
    Ranked(Vec<(String, f64)>),
    /// `[{"generated_text": ...}]` from an instruct model.
    Generated(String),
    Unrecognized,
}

impl Shape {
    pub(crate) fn parse(payload: &Value) -> Shape {
        if let Some(first) = payload.as_array().and_then(|a| a.first()) {
            if let Some(entries) = first.as_array() {
                let ranked = entries
                    .iter()
                    .filter_map(|e| {
                        let label = e.get("label")?.as_str()?;
                        let score = e.get("score")?.as_f64()?;
                        Some((label.to_string(), score))
                    })
                    .collect();
                return Shape::Ranked(ranked);
            }
            if let Some(text) = first.get("generated_text").and_then(Value::as_str) {
                return Shape::Generated(text.to_string());
            }
        }
        Shape::Unrecognized
    }
}

/// Normalize a dedicated sentiment-classifier payload.
///
/// The top-scoring entry wins; at or below the 0.5 threshold (or when the
/// label matches neither polarity) the outcome is neutral but still carries
/// the top score.
pub fn from_ranked(payload: &Value) -> Outcome {
    let mut entries = match Shape::parse(payload) {
        Shape::Ranked(entries) if !entries.is_empty() => entries,
        _ => return Outcome::new(Category::Neutral, Some(0.0)),
    };

    // Stable sort keeps the first-encountered maximum on ties.
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    let (label, score) = &entries[0];

    let upper = label.to_ascii_uppercase();
    if *score > 0.5 && upper.contains("POSITIVE") {
        Outcome::new(Category::Positive, Some(*score))
    } else if *score > 0.5 && upper.contains("NEGATIVE") {
        Outcome::new(Category::Negative, Some(*score))
    } else {
        Outcome::new(Category::Neutral, Some(*score))
    }
}

/// Normalize an instruct-model payload by keyword containment.
///
/// Keywords are checked in a fixed priority order ("high" before "medium",
/// "positive" before "negative"): a text mentioning several resolves to the
/// first checked, not the first occurring.
pub fn from_generated(payload: &Value, task: Task) -> Outcome {
    let text = match Shape::parse(payload) {
        Shape::Generated(text) => text.to_lowercase(),
        _ => return Outcome::new(task_default(task), None),
    };

    let category = match task {
        Task::Sentiment => {
            if text.contains("positive") {
                Category::Positive
            } else if text.contains("negative") {
                Category::Negative
            } else {
                Category::Neutral
            }
        }
        Task::NounDensity => {
            if text.contains("high") {
                Category::High
            } else if text.contains("medium") {
                Category::Medium
            } else {
                Category::Low
            }
        }
    };
    Outcome::new(category, None)
}

fn task_default(task: Task) -> Category {
    match task {
        Task::Sentiment => Category::Neutral,
        Task::NounDensity => Category::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ranked_top_positive_wins() {
        let payload = json!([[
            {"label": "POSITIVE", "score": 0.92},
            {"label": "NEGATIVE", "score": 0.08}
        ]]);
        let out = from_ranked(&payload);
        assert_eq!(out.category, Category::Positive);
        assert_eq!(out.score, Some(0.92));
    }

    #[test]
    fn ranked_top_negative_wins() {
        let payload = json!([[
            {"label": "NEGATIVE", "score": 0.95},
            {"label": "POSITIVE", "score": 0.05}
        ]]);
        let out = from_ranked(&payload);
        assert_eq!(out.category, Category::Negative);
        assert_eq!(out.score, Some(0.95));
    }

    #[test]
    fn ranked_below_threshold_is_neutral_with_score() {
        let payload = json!([[
            {"label": "POSITIVE", "score": 0.45},
            {"label": "NEGATIVE", "score": 0.40}
        ]]);
        let out = from_ranked(&payload);
        assert_eq!(out.category, Category::Neutral);
        assert_eq!(out.score, Some(0.45));
    }

    #[test]
    fn ranked_empty_payload_is_neutral_zero() {
        let out = from_ranked(&json!([]));
        assert_eq!(out.category, Category::Neutral);
        assert_eq!(out.score, Some(0.0));
    }

    #[test]
    fn ranked_wrong_first_element_is_neutral_zero() {
        // A generated-text payload fed to the ranked normalizer.
        let out = from_ranked(&json!([{"generated_text": "positive"}]));
        assert_eq!(out.category, Category::Neutral);
        assert_eq!(out.score, Some(0.0));
    }

    #[test]
    fn ranked_skips_malformed_entries() {
        let payload = json!([[
            {"label": 3, "score": 0.99},
            {"label": "NEGATIVE", "score": "high"},
            {"label": "NEGATIVE", "score": 0.7}
        ]]);
        let out = from_ranked(&payload);
        assert_eq!(out.category, Category::Negative);
        assert_eq!(out.score, Some(0.7));
    }

    #[test]
    fn generated_bucket_priority_beats_position() {
        let payload = json!([{
            "generated_text": "this review seems medium in detail but also high"
        }]);
        let out = from_generated(&payload, Task::NounDensity);
        assert_eq!(out.category, Category::High);
        assert_eq!(out.score, None);
    }

    #[test]
    fn generated_bucket_defaults_to_low() {
        let payload = json!([{"generated_text": "hard to say, maybe a handful"}]);
        let out = from_generated(&payload, Task::NounDensity);
        assert_eq!(out.category, Category::Low);
    }

    #[test]
    fn generated_sentiment_checks_positive_first() {
        let payload = json!([{"generated_text": "Not negative at all, clearly Positive."}]);
        let out = from_generated(&payload, Task::Sentiment);
        assert_eq!(out.category, Category::Positive);
    }

    #[test]
    fn generated_malformed_payload_uses_task_default() {
        let payload = json!({"unexpected": true});
        assert_eq!(
            from_generated(&payload, Task::Sentiment).category,
            Category::Neutral
        );
        assert_eq!(
            from_generated(&payload, Task::NounDensity).category,
            Category::Low
        );
        assert_eq!(from_generated(&payload, Task::NounDensity).score, None);
    }
}
