// src/classify/client.rs
//! Remote inference client: one POST per call, no retries, typed failures.
//!
//! The caller keeps its trigger disabled while a call is in flight, so the
//! client carries no internal mutual exclusion and no independently enforced
//! timeout; a request either completes or fails at the transport layer.

use metrics::{counter, histogram};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::ClassifierConfig;

use super::normalize::{self, Task};
use super::outcome::Outcome;

/// Failure modes of a single classification request.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("model is loading upstream; please retry in a moment")]
    ServiceWarmingUp,
    #[error("rate limit reached; add a valid API token or wait and try again")]
    RateLimited,
    #[error("API error (HTTP {status}){}", format_detail(.detail))]
    RequestFailed { status: u16, detail: Option<String> },
    #[error("request transport failed: {0}")]
    Transport(#[from] reqwest::Error),
}

fn format_detail(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {d}"),
        None => String::new(),
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

pub struct RemoteClassifier {
    http: reqwest::Client,
    sentiment_url: String,
    generative_url: String,
    api_token: Option<String>,
}

impl RemoteClassifier {
    pub fn new(cfg: &ClassifierConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("review-analyzer/0.1")
            .build()
            .expect("reqwest client");
        Self {
            http,
            sentiment_url: cfg.sentiment_url.clone(),
            generative_url: cfg.generative_url.clone(),
            api_token: cfg.api_token.clone(),
        }
    }

    /// Classify sentiment with the dedicated classifier model.
    pub async fn sentiment(&self, text: &str) -> Result<Outcome, ClassifyError> {
        let payload = self.post_inputs(&self.sentiment_url, text).await?;
        Ok(normalize::from_ranked(&payload))
    }

    /// Classify sentiment by instructing the generative model.
    pub async fn sentiment_generated(&self, text: &str) -> Result<Outcome, ClassifyError> {
        let prompt = format!("Classify this review as positive, negative, or neutral: {text}");
        let payload = self.post_inputs(&self.generative_url, &prompt).await?;
        Ok(normalize::from_generated(&payload, Task::Sentiment))
    }

    /// Bucket the noun count by instructing the generative model.
    pub async fn noun_density(&self, text: &str) -> Result<Outcome, ClassifyError> {
        let prompt = format!(
            "Count the nouns in this review and return only High (>15), Medium (6-15), or Low (<6). {text}"
        );
        let payload = self.post_inputs(&self.generative_url, &prompt).await?;
        Ok(normalize::from_generated(&payload, Task::NounDensity))
    }

    /// Exactly one request per call.
    async fn post_inputs(&self, url: &str, inputs: &str) -> Result<Value, ClassifyError> {
        counter!("classify_requests_total").increment(1);
        let t0 = std::time::Instant::now();

        let mut req = self.http.post(url).json(&InferenceRequest { inputs });
        if let Some(token) = self.api_token.as_deref() {
            if !token.trim().is_empty() {
                req = req.bearer_auth(token.trim());
            }
        }

        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) => {
                counter!("classify_errors_total").increment(1);
                return Err(ClassifyError::Transport(e));
            }
        };

        let status = resp.status();
        if !status.is_success() {
            counter!("classify_errors_total").increment(1);
            let body = resp.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), &body));
        }

        let payload = resp.json::<Value>().await?;
        histogram!("classify_duration_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(payload)
    }
}

/// Map a non-success HTTP status (plus its raw body) to a typed error.
///
/// 503 means the hosted model is still warming up; 429 and 402 both signal
/// rate/credit limits for anonymous callers. Everything else keeps the
/// status and a best-effort detail from a JSON `error` field.
pub fn error_for_status(status: u16, body: &str) -> ClassifyError {
    match status {
        503 => ClassifyError::ServiceWarmingUp,
        429 | 402 => ClassifyError::RateLimited,
        _ => {
            let detail = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string));
            ClassifyError::RequestFailed { status, detail }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warming_up_and_rate_limits_map_to_typed_errors() {
        assert!(matches!(
            error_for_status(503, ""),
            ClassifyError::ServiceWarmingUp
        ));
        assert!(matches!(error_for_status(429, ""), ClassifyError::RateLimited));
        assert!(matches!(error_for_status(402, ""), ClassifyError::RateLimited));
    }

    #[test]
    fn other_statuses_keep_code_and_json_detail() {
        let err = error_for_status(500, r#"{"error": "internal oops"}"#);
        match err {
            ClassifyError::RequestFailed { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail.as_deref(), Some("internal oops"));
            }
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn unparseable_error_body_yields_no_detail() {
        let err = error_for_status(404, "<html>not json</html>");
        match err {
            ClassifyError::RequestFailed { status, detail } => {
                assert_eq!(status, 404);
                assert!(detail.is_none());
            }
            other => panic!("unexpected: {other}"),
        }
        assert_eq!(
            error_for_status(404, "").to_string(),
            "API error (HTTP 404)"
        );
    }
}
