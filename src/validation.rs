// src/validation.rs
//! # Validation Aggregator
//! Running sample of bucket outcomes (1=low, 2=medium, 3=high) with
//! population statistics for the demo's validation panel. Accumulative only:
//! no windowing, no decay, reset only by restarting the process.

use std::sync::Mutex;

use serde::Serialize;

/// Per-bucket share of the sample, each independently rounded to one decimal
/// place. The three values need not sum to exactly 100.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distribution {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationStats {
    pub mean: f64,
    /// Population variance: squared deviations divided by N, not N-1.
    pub variance: f64,
    pub std_dev: f64,
    pub distribution: Distribution,
    pub sample_size: usize,
    /// Display string, e.g. "Result ± 0.82".
    pub confidence_interval: String,
}

/// Report rendered to the display layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationReport {
    /// Fewer than two samples recorded so far.
    InsufficientData { sample_size: usize },
    Ready(ValidationStats),
}

#[derive(Debug, Default)]
pub struct ValidationAggregator {
    samples: Mutex<Vec<u8>>,
}

impl ValidationAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one bucket outcome. Codes outside 1..=3 are dropped with a
    /// warning so the sample-set invariant holds.
    pub fn record(&self, code: u8) {
        if !(1..=3).contains(&code) {
            tracing::warn!(code, "ignoring out-of-range bucket code");
            return;
        }
        self.samples
            .lock()
            .expect("validation mutex poisoned")
            .push(code);
    }

    pub fn sample_size(&self) -> usize {
        self.samples.lock().expect("validation mutex poisoned").len()
    }

    pub fn report(&self) -> ValidationReport {
        let samples = self.samples.lock().expect("validation mutex poisoned");
        if samples.len() < 2 {
            return ValidationReport::InsufficientData {
                sample_size: samples.len(),
            };
        }

        let n = samples.len() as f64;
        let mean = samples.iter().map(|&c| c as f64).sum::<f64>() / n;
        let variance = samples
            .iter()
            .map(|&c| {
                let d = c as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        let mut counts = [0usize; 3];
        for &c in samples.iter() {
            counts[(c - 1) as usize] += 1;
        }
        let pct = |count: usize| round1(count as f64 / n * 100.0);

        ValidationReport::Ready(ValidationStats {
            mean,
            variance,
            std_dev,
            distribution: Distribution {
                low: pct(counts[0]),
                medium: pct(counts[1]),
                high: pct(counts[2]),
            },
            sample_size: samples.len(),
            confidence_interval: format!("Result ± {std_dev:.2}"),
        })
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
