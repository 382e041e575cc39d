// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /summarize  (MISS → HIT, cleaning, description fallback, 422, 504)
// - POST /score      (profile override)

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use news_summarizer::api::{self, AppState, CACHE_HEADER, SOURCE_HEADER};
use news_summarizer::config::SummarizerConfig;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

const ARTICLE: &str = "The Reserve Bank of India raised its policy rate by 25 basis points on Friday. \
    Governor Shaktikanta Das said inflation remained above the target band. \
    Markets in Mumbai fell 2% after the announcement. \
    Economists expect one more increase before the end of the year.";

/// Build the same Router the binary uses, with a fixed default config.
fn test_router() -> (Router, AppState) {
    let state = AppState::with_config(SummarizerConfig::default());
    (api::router(state.clone()), state)
}

async fn post_json(app: &Router, uri: &str, payload: Json) -> (StatusCode, Option<String>, Option<String>, Json) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build request");

    let resp = app.clone().oneshot(req).await.expect("router response");
    let status = resp.status();
    let header = |name: &str| {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let (cache, source) = (header(CACHE_HEADER), header(SOURCE_HEADER));

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse json");
    (status, cache, source, v)
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let (app, _) = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "OK", "health body should be 'OK'");
}

#[tokio::test]
async fn summarize_returns_contract_fields_then_hits_cache() {
    let (app, state) = test_router();
    let payload = json!({
        "title": "RBI raises repo rate",
        "sourceName": "Mint",
        "body": ARTICLE,
    });

    let (status, cache, _, v) = post_json(&app, "/summarize", payload.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache.as_deref(), Some("MISS"));

    // Contract checks for UI consumers
    assert_eq!(v["title"], "RBI raises repo rate");
    let content = v["content"].as_str().expect("content string");
    assert!(content.contains("Markets in Mumbai fell 2% after the announcement."));
    let kp = &v["keyPhrases"];
    for field in ["people", "organizations", "places", "dates", "numbers", "keywords"] {
        assert!(kp[field].is_array(), "missing keyPhrases.{field}");
    }
    assert!(kp["numbers"]
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n == "2%"));

    let (status, cache, _, again) = post_json(&app, "/summarize", payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache.as_deref(), Some("HIT"));
    assert_eq!(again, v);
    assert_eq!(state.cache().len(), 1);
}

#[tokio::test]
async fn one_character_change_misses_cache() {
    let (app, _) = test_router();
    let a = json!({ "title": "T", "body": ARTICLE });
    let b = json!({ "title": "T", "body": format!("{ARTICLE} ") });

    let (_, first, _, _) = post_json(&app, "/summarize", a).await;
    let (_, second, _, _) = post_json(&app, "/summarize", b).await;
    assert_eq!(first.as_deref(), Some("MISS"));
    assert_eq!(second.as_deref(), Some("MISS"));
}

#[tokio::test]
async fn clean_flag_strips_markup() {
    let (app, _) = test_router();
    let payload = json!({
        "title": "Court ruling",
        "body": "<p>New Delhi (PTI) The court ruled on Monday.</p><p>Advertisement click here. The verdict was unanimous.</p>",
        "clean": true,
    });
    let (status, _, _, v) = post_json(&app, "/summarize", payload).await;
    assert_eq!(status, StatusCode::OK);
    let content = v["content"].as_str().unwrap();
    assert!(!content.contains('<'));
    assert!(!content.contains("PTI"));
    assert!(!content.contains("Advertisement"));
    assert!(content.contains("The verdict was unanimous."));
}

#[tokio::test]
async fn empty_body_falls_back_to_description() {
    let (app, _) = test_router();
    let payload = json!({
        "title": "Paywalled story",
        "body": "   ",
        "description": "<b>Short</b> teaser &amp; summary",
    });
    let (status, cache, source, v) = post_json(&app, "/summarize", payload).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cache.is_none());
    assert_eq!(source.as_deref(), Some("description"));
    assert_eq!(v["content"], "Short teaser & summary");
    assert_eq!(v["keyPhrases"]["people"], json!([]));
}

#[tokio::test]
async fn empty_body_without_description_is_422() {
    let (app, _) = test_router();
    let payload = json!({ "title": "Nothing", "body": "" });
    let (status, _, _, v) = post_json(&app, "/summarize", payload).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(v["error"], "article body is empty");
}

#[tokio::test]
async fn slow_summaries_time_out_with_504() {
    let mut cfg = SummarizerConfig::default();
    cfg.service.timeout_ms = 1;
    cfg.fallback.enabled = false;
    let app = api::router(AppState::with_config(cfg));

    // Large enough that ranking cannot finish within a millisecond.
    let body = format!("{ARTICLE} ").repeat(500);
    let (status, _, _, v) = post_json(&app, "/summarize", json!({ "title": "T", "body": body })).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(v["error"].as_str().unwrap().contains("exceeded 1 ms"));
}

#[tokio::test]
async fn score_lists_every_sentence_under_requested_profile() {
    let (app, _) = test_router();

    let (status, _, _, v) = post_json(
        &app,
        "/score",
        json!({ "title": "RBI raises repo rate", "body": ARTICLE, "profile": "legacy" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["profile"], "legacy");
    assert_eq!(v["cap"], 13.0);

    let sentences = v["sentences"].as_array().expect("sentences array");
    assert_eq!(sentences.len(), 4);
    for (i, s) in sentences.iter().enumerate() {
        assert_eq!(s["index"], i);
        let score = s["score"].as_f64().unwrap();
        assert!((0.0..=13.0).contains(&score));
        assert!(s["signals"]["position"].is_number());
    }

    let (_, _, _, default_profile) =
        post_json(&app, "/score", json!({ "body": ARTICLE })).await;
    assert_eq!(default_profile["profile"], "advanced");
}
