// src/api.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::classify::{ClassifyError, Outcome, RemoteClassifier};
use crate::config::{AppConfig, SentimentEngine};
use crate::loader::{self, FetchAttempt, HttpFetcher, LoadError, ResourceFetcher};
use crate::store::{ReviewStore, SampledReview};
use crate::validation::{ValidationAggregator, ValidationReport};

#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    fetcher: Arc<dyn ResourceFetcher>,
    classifier: Arc<RemoteClassifier>,
    reviews: Arc<ReviewStore>,
    validation: Arc<ValidationAggregator>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self::with_fetcher(config, Arc::new(HttpFetcher::new()))
    }

    /// Same state with a custom fetcher; used by tests to stay off the
    /// network.
    pub fn with_fetcher(config: AppConfig, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        let classifier = Arc::new(RemoteClassifier::new(&config.classifier));
        Self {
            config: Arc::new(config),
            fetcher,
            classifier,
            reviews: Arc::new(ReviewStore::new()),
            validation: Arc::new(ValidationAggregator::new()),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &dyn ResourceFetcher {
        self.fetcher.as_ref()
    }

    pub fn reviews(&self) -> &ReviewStore {
        &self.reviews
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/reviews/load", post(load_reviews))
        .route("/reviews", get(reviews_info))
        .route("/reviews/random", get(random_review))
        .route("/classify/sentiment", post(classify_sentiment))
        .route("/classify/nouns", post(classify_nouns))
        .route("/validation/stats", get(validation_stats))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Handler-level error envelope mapped onto HTTP statuses.
#[derive(Debug)]
pub enum ApiError {
    Load(LoadError),
    Classify(ClassifyError),
    ReviewsNotLoaded,
}

impl From<LoadError> for ApiError {
    fn from(e: LoadError) -> Self {
        ApiError::Load(e)
    }
}

impl From<ClassifyError> for ApiError {
    fn from(e: ClassifyError) -> Self {
        ApiError::Classify(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    /// Per-candidate failure reasons when a load ran out of locations.
    #[serde(skip_serializing_if = "Option::is_none")]
    attempts: Option<Vec<FetchAttempt>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Load(err) => {
                let status = match &err {
                    LoadError::AllCandidatesExhausted { .. } => StatusCode::BAD_GATEWAY,
                    LoadError::Empty { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                };
                let attempts = match &err {
                    LoadError::AllCandidatesExhausted { attempts } => Some(attempts.clone()),
                    LoadError::Empty { .. } => None,
                };
                (
                    status,
                    ErrorBody {
                        error: err.to_string(),
                        attempts,
                    },
                )
            }
            ApiError::Classify(err) => {
                let status = match &err {
                    ClassifyError::ServiceWarmingUp => StatusCode::SERVICE_UNAVAILABLE,
                    ClassifyError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                    ClassifyError::RequestFailed { .. } | ClassifyError::Transport(_) => {
                        StatusCode::BAD_GATEWAY
                    }
                };
                (
                    status,
                    ErrorBody {
                        error: err.to_string(),
                        attempts: None,
                    },
                )
            }
            ApiError::ReviewsNotLoaded => (
                StatusCode::CONFLICT,
                ErrorBody {
                    error: "Reviews not loaded. Load the review file first.".to_string(),
                    attempts: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Deserialize)]
struct LoadParams {
    /// Explicit override for the review file location.
    path: Option<String>,
}

#[derive(Serialize)]
struct LoadResp {
    count: usize,
    location: String,
    skipped_rows: usize,
}

async fn load_reviews(
    State(state): State<AppState>,
    Query(params): Query<LoadParams>,
) -> Result<Json<LoadResp>, ApiError> {
    let candidates =
        loader::candidate_locations(params.path.as_deref(), &state.config.data.candidates);
    let loaded = loader::load(
        state.fetcher.as_ref(),
        &candidates,
        &state.config.data.text_column,
    )
    .await?;

    let resp = LoadResp {
        count: loaded.reviews.len(),
        location: loaded.location.clone(),
        skipped_rows: loaded.skipped_rows,
    };
    info!(count = resp.count, location = %resp.location, "reviews loaded");
    state.reviews.install(loaded);
    Ok(Json(resp))
}

#[derive(Serialize)]
struct ReviewsInfo {
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

async fn reviews_info(State(state): State<AppState>) -> Json<ReviewsInfo> {
    Json(ReviewsInfo {
        count: state.reviews.len(),
        location: state.reviews.location(),
    })
}

async fn random_review(State(state): State<AppState>) -> Result<Json<SampledReview>, ApiError> {
    state
        .reviews
        .sample()
        .map(Json)
        .ok_or(ApiError::ReviewsNotLoaded)
}

#[derive(Deserialize)]
struct ClassifyReq {
    text: String,
}

async fn classify_sentiment(
    State(state): State<AppState>,
    Json(req): Json<ClassifyReq>,
) -> Result<Json<Outcome>, ApiError> {
    let outcome = match state.config.classifier.sentiment_engine {
        SentimentEngine::Classifier => state.classifier.sentiment(&req.text).await?,
        SentimentEngine::Generative => state.classifier.sentiment_generated(&req.text).await?,
    };
    Ok(Json(outcome))
}

#[derive(Serialize)]
struct NounResp {
    outcome: Outcome,
    validation: ValidationReport,
}

async fn classify_nouns(
    State(state): State<AppState>,
    Json(req): Json<ClassifyReq>,
) -> Result<Json<NounResp>, ApiError> {
    let outcome = state.classifier.noun_density(&req.text).await?;
    if let Some(code) = outcome.category.bucket_code() {
        state.validation.record(code);
    }
    Ok(Json(NounResp {
        outcome,
        validation: state.validation.report(),
    }))
}

async fn validation_stats(State(state): State<AppState>) -> Json<ValidationReport> {
    Json(state.validation.report())
}
