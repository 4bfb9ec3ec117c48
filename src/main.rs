//! News feed ingestor, Shuttle entrypoint.
//! Serves `POST /run` so an external scheduler can trigger one
//! aggregation-and-persist cycle per call.

use news_feed_ingestor::{
    api::{self, AppState},
    config::AppConfig,
    ingest::config::load_sources_default,
    metrics::Metrics,
    telemetry, Pipeline,
};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    telemetry::init_tracing();

    // Missing credentials fail here, before anything is fetched.
    let cfg = AppConfig::load_default()?;
    let sources = load_sources_default()?;
    let metrics = Metrics::init()?;
    let pipeline = Pipeline::from_config(&cfg, sources)?;

    let router = api::router(AppState::new(pipeline), Some(&metrics));
    Ok(router.into())
}
