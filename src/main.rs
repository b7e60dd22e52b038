//! Review Analyzer binary entrypoint.
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.
//!
//! See `README.md` for quickstart.

use tower_http::services::ServeDir;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use review_analyzer::api::{self, AppState};
use review_analyzer::config::AppConfig;
use review_analyzer::loader;
use review_analyzer::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("review_analyzer=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op where no file exists.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AppConfig::load_default()?;
    let metrics = Metrics::init();
    let state = AppState::new(config.clone());

    // Populate the review set up front. Failure is logged, not fatal: the
    // load trigger can be retried from the page at any time.
    let candidates = loader::candidate_locations(None, &config.data.candidates);
    match loader::load(state.fetcher(), &candidates, &config.data.text_column).await {
        Ok(loaded) => {
            info!(count = loaded.reviews.len(), location = %loaded.location, "startup load complete");
            state.reviews().install(loaded);
        }
        Err(e) => warn!(error = %e, "startup load failed; waiting for a manual load"),
    }

    let app = api::router(state)
        .merge(metrics.router())
        .fallback_service(ServeDir::new("static"));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    info!(addr = %config.server.bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
