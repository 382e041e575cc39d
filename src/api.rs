// src/api.rs
//! HTTP surface: `/health`, `POST /summarize`, `POST /score`.
//!
//! Summarization is CPU-bound, so each request runs on the blocking pool under the
//! configured soft timeout. Responses to `/summarize` carry `X-Summary-Cache: HIT|MISS`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::analyze::FeatureBag;
use crate::cache::{cache_key, SummaryCache};
use crate::clean::{clean_article_text, clean_description};
use crate::config::{HotReloadConfig, SummarizerConfig};
use crate::error::SummarizeError;
use crate::metrics::{CACHE_HITS_TOTAL, DURATION_MS, EMPTY_INPUT_TOTAL, REQUESTS_TOTAL};
use crate::pipeline::{Article, SentenceReport, Summarizer, SummaryResult};
use crate::rank::{ProfileName, SentenceRanker};
use crate::telemetry::anon_hash;

pub const CACHE_HEADER: &str = "x-summary-cache";
pub const SOURCE_HEADER: &str = "x-summary-source";

#[derive(Clone)]
pub struct AppState {
    config: Arc<HotReloadConfig>,
    cache: Arc<SummaryCache>,
}

impl AppState {
    /// Cache sizing is read once here; later config reloads affect the pipeline only.
    pub fn new(config: HotReloadConfig) -> Self {
        let service = config.current().service;
        let cache = SummaryCache::new(
            Duration::from_secs(service.cache_ttl_secs),
            service.cache_capacity,
        );
        Self {
            config: Arc::new(config),
            cache: Arc::new(cache),
        }
    }

    /// Load config from `$SUMMARIZER_CONFIG_PATH` / `config/summarizer.toml` and watch it.
    pub fn from_env() -> anyhow::Result<Self> {
        let cfg = SummarizerConfig::load()?;
        Ok(Self::new(HotReloadConfig::new(None, cfg)))
    }

    /// Fixed configuration, no file watching.
    pub fn with_config(cfg: SummarizerConfig) -> Self {
        Self::new(HotReloadConfig::fixed(cfg))
    }

    pub fn cache(&self) -> &SummaryCache {
        &self.cache
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/summarize", post(summarize))
        .route("/score", post(score))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SummarizeReq {
    title: String,
    #[serde(default, alias = "sourceName")]
    source: String,
    #[serde(alias = "content")]
    body: String,
    /// Used as the summary when the body turns out empty.
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    clean: bool,
}

#[derive(Debug, Deserialize)]
struct ScoreReq {
    #[serde(default)]
    title: String,
    body: String,
    #[serde(default)]
    profile: Option<ProfileName>,
    #[serde(default)]
    clean: bool,
}

#[derive(Debug, Serialize)]
struct ScoreResp {
    profile: String,
    cap: f64,
    sentences: Vec<SentenceReport>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Error)]
enum ApiError {
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
    #[error("summarization exceeded {0} ms")]
    Timeout(u64),
    #[error("summarization worker failed")]
    Worker,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Summarize(SummarizeError::EmptyInput) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Summarize(SummarizeError::Extraction(_)) | ApiError::Worker => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Run `f` on the blocking pool under a soft deadline.
async fn run_blocking<T, F>(timeout_ms: u64, f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, SummarizeError> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(f);
    match tokio::time::timeout(Duration::from_millis(timeout_ms), task).await {
        Err(_) => Err(ApiError::Timeout(timeout_ms)),
        Ok(Err(join_err)) => {
            error!(target: "api", error = %join_err, "summarization task panicked");
            Err(ApiError::Worker)
        }
        Ok(Ok(res)) => res.map_err(ApiError::from),
    }
}

async fn summarize(State(state): State<AppState>, Json(req): Json<SummarizeReq>) -> Response {
    counter!(REQUESTS_TOTAL).increment(1);
    let cfg = state.config.current();
    let timeout_ms = cfg.service.timeout_ms;

    let article = Article::new(req.title, req.source);
    let body = if req.clean {
        clean_article_text(&req.body)
    } else {
        req.body
    };
    let id = anon_hash(&article.title);
    let key = cache_key(&article, &body, req.clean);

    if let Some(hit) = state.cache.get(&key) {
        counter!(CACHE_HITS_TOTAL).increment(1);
        info!(target: "api", %id, cache = "HIT", "summarize");
        return ([(CACHE_HEADER, "HIT")], Json(hit)).into_response();
    }

    let started = Instant::now();
    let title = article.title.clone();
    let outcome = run_blocking(timeout_ms, move || {
        Summarizer::new(cfg).summarize(&article, &body)
    })
    .await;
    let ms = started.elapsed().as_secs_f64() * 1000.0;
    histogram!(DURATION_MS).record(ms);

    match outcome {
        Ok(result) => {
            state.cache.insert(key, result.clone());
            info!(target: "api", %id, cache = "MISS", ms, "summarize");
            ([(CACHE_HEADER, "MISS")], Json(result)).into_response()
        }
        Err(ApiError::Summarize(SummarizeError::EmptyInput)) => {
            counter!(EMPTY_INPUT_TOTAL).increment(1);
            let description = req
                .description
                .as_deref()
                .map(clean_description)
                .filter(|d| !d.is_empty());
            match description {
                Some(content) => {
                    info!(target: "api", %id, "empty body, serving description");
                    let fallback = SummaryResult {
                        title,
                        content,
                        key_phrases: FeatureBag::default(),
                    };
                    ([(SOURCE_HEADER, "description")], Json(fallback)).into_response()
                }
                None => ApiError::Summarize(SummarizeError::EmptyInput).into_response(),
            }
        }
        Err(e) => {
            warn!(target: "api", %id, error = %e, ms, "summarize failed");
            e.into_response()
        }
    }
}

async fn score(State(state): State<AppState>, Json(req): Json<ScoreReq>) -> Response {
    let cfg = state.config.current();
    let timeout_ms = cfg.service.timeout_ms;
    let profile = match req.profile {
        Some(name) => name.profile(),
        None => cfg.ranking.resolve(),
    };
    let body = if req.clean {
        clean_article_text(&req.body)
    } else {
        req.body
    };

    let (name, cap) = (profile.name.clone(), profile.cap);
    let title = req.title;
    let outcome = run_blocking(timeout_ms, move || {
        Summarizer::new(cfg)
            .with_ranker(SentenceRanker::new(profile))
            .score(&title, &body)
    })
    .await;

    match outcome {
        Ok(sentences) => Json(ScoreResp {
            profile: name,
            cap,
            sentences,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}
