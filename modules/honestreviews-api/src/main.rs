use std::any::Any;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ai_client::Gemini;
use honestreviews_analysis::{analyzer, Analyzer};
use honestreviews_common::{Config, GENERIC_FAILURE};
use reddit_client::RedditClient;

mod pages;
mod rest;
mod templates;

pub struct AppState {
    pub analyzer: Analyzer,
}

const DEFAULT_LOG_DIRECTIVES: &str = "honestreviews=info,reddit_client=info,ai_client=info";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Panics inside a handler become the generic 500 body.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = message, "Handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "detail": GENERIC_FAILURE })),
    )
        .into_response()
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // JSON API
        .route("/api/analyze", get(rest::api_analyze_status).post(rest::api_analyze))
        .route("/health", get(rest::health))
        // HTML pages
        .route("/", get(pages::search_page))
        .route("/analyze", get(pages::analyze_page))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Results are per-request and never cached
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        // Method + path + status + latency only (no query string)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env();

    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;

    let reddit = RedditClient::new(
        config.reddit_client_id.clone(),
        config.reddit_client_secret.clone(),
    )
    .with_http_client(http.clone())
    .with_user_agent(config.reddit_user_agent.clone());

    let gemini = Gemini::new(
        config.gemini_api_key.clone().unwrap_or_default(),
        config.gemini_model.clone(),
    )
    .with_http_client(http);

    if !reddit.has_credentials() {
        tracing::warn!("Reddit credentials missing; analysis requests will fail until configured");
    }
    if !gemini.has_api_key() {
        tracing::warn!("GEMINI_API_KEY missing; analysis requests will fail after collection");
    }

    let state = Arc::new(AppState {
        analyzer: analyzer(Arc::new(reddit), Arc::new(gemini)),
    });
    let app = build_router(state);

    let addr = format!("{}:{}", config.api_host, config.api_port);
    info!("HonestReviews API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
