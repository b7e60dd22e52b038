// src/classify/outcome.rs
use serde::{Deserialize, Serialize};

/// Normalized category vocabulary: a sentiment polarity or a noun-density
/// bucket. Always set; the normalizer falls back to `Neutral`/`Low` instead
/// of leaving a result open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Positive,
    Negative,
    Neutral,
    Low,
    Medium,
    High,
}

impl Category {
    /// Human-readable label handed to the display layer.
    pub fn label(self) -> &'static str {
        match self {
            Category::Positive => "Positive",
            Category::Negative => "Negative",
            Category::Neutral => "Neutral",
            Category::Low => "Low",
            Category::Medium => "Medium",
            Category::High => "High",
        }
    }

    /// Small integer code for bucket categories (1=low, 2=medium, 3=high).
    /// Sentiment polarities have no code and never reach the validation
    /// aggregator.
    pub fn bucket_code(self) -> Option<u8> {
        match self {
            Category::Low => Some(1),
            Category::Medium => Some(2),
            Category::High => Some(3),
            _ => None,
        }
    }
}

/// Result of normalizing one inference response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub category: Category,
    pub label: String,
    /// Classifier confidence in [0,1]; absent for generated text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Outcome {
    pub fn new(category: Category, score: Option<f64>) -> Self {
        Self {
            category,
            label: category.label().to_string(),
            score,
        }
    }
}
