// src/config.rs
//! Application configuration: candidate locations for the review data,
//! inference endpoint URLs, and the optional API credential. Loaded from
//! `config/app.toml` (JSON accepted as a fallback format); a missing file
//! means built-in defaults so the demo runs out of the box.

use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/app.toml";
pub const ENV_CONFIG_PATH: &str = "REVIEW_ANALYZER_CONFIG";
/// Env var consulted when `api_token = "ENV"`.
pub const ENV_API_TOKEN: &str = "HF_API_TOKEN";

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}
fn default_text_column() -> String {
    "text".to_string()
}
fn default_candidates() -> Vec<String> {
    crate::loader::DEFAULT_CANDIDATES
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_sentiment_url() -> String {
    "https://api-inference.huggingface.co/models/siebert/sentiment-roberta-large-english"
        .to_string()
}
fn default_generative_url() -> String {
    "https://api-inference.huggingface.co/models/tiiuae/falcon-7b-instruct".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Ordered candidate locations for the review file.
    pub candidates: Vec<String>,
    /// Column holding the review text, matched after trimming headers.
    pub text_column: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
            text_column: default_text_column(),
        }
    }
}

/// Which engine answers the sentiment trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentEngine {
    /// Dedicated text-classification model (ranked label/score payload).
    Classifier,
    /// Instruct model answering a classification prompt.
    Generative,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub sentiment_url: String,
    pub generative_url: String,
    /// Bearer token passed through to the inference service. "ENV" reads
    /// HF_API_TOKEN; blank or absent means anonymous calls.
    pub api_token: Option<String>,
    pub sentiment_engine: SentimentEngine,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sentiment_url: default_sentiment_url(),
            generative_url: default_generative_url(),
            api_token: None,
            sentiment_engine: SentimentEngine::Classifier,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub classifier: ClassifierConfig,
}

impl AppConfig {
    /// Load using the env override, then the default path, then built-in
    /// defaults when no file exists.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            return Self::load_from(Path::new(&p));
        }
        let default = Path::new(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::load_from(default);
        }
        Ok(Self::default().resolved())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, &ext)?;
        Ok(cfg.resolved())
    }

    /// Resolve the "ENV" token indirection and drop blank tokens.
    fn resolved(mut self) -> Self {
        self.classifier.api_token = match self.classifier.api_token.take() {
            Some(t) if t.trim().eq_ignore_ascii_case("env") => env::var(ENV_API_TOKEN).ok(),
            Some(t) if t.trim().is_empty() => None,
            other => other,
        };
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppConfig> {
    if hint_ext == "json" {
        return serde_json::from_str(s).context("parsing JSON config");
    }
    // TOML first, JSON as a fallback format.
    if let Ok(cfg) = toml::from_str::<AppConfig>(s) {
        return Ok(cfg);
    }
    serde_json::from_str(s).context("unsupported config format")
}
