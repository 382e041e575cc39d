//! News Summarizer: binary entrypoint
//! Boots the Axum HTTP server: config with hot reload, summary cache, metrics.

use news_summarizer::{
    api::{self, AppState},
    config::{HotReloadConfig, SummarizerConfig},
    metrics::Metrics,
    telemetry,
};
use shuttle_axum::ShuttleAxum;
use tracing::{info, warn};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This enables SUMMARIZER_CONFIG_PATH / SUMMARIZER_TIMEOUT_MS from .env.
    let _ = dotenvy::dotenv();

    // No-op when the runtime already installed a subscriber.
    telemetry::init_tracing();

    let cfg = SummarizerConfig::load()?;
    let cache_ttl_secs = cfg.service.cache_ttl_secs;
    let hot = HotReloadConfig::new(None, cfg);
    if let Some(path) = hot.path() {
        info!(target: "api", path = %path.display(), "watching summarizer config");
    }

    let mut router = api::router(AppState::new(hot));
    match Metrics::init(cache_ttl_secs) {
        Ok(metrics) => router = router.merge(metrics.router()),
        Err(e) => warn!(target: "api", error = %e, "prometheus recorder not installed"),
    }

    Ok(router.into())
}
