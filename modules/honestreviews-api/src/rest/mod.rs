pub mod analyze;

use axum::response::Json;
use serde_json::{json, Value};

pub use analyze::api_analyze;

/// Liveness probe for the analyze endpoint.
pub async fn api_analyze_status() -> Json<Value> {
    Json(json!({ "status": "API is working", "method": "GET" }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "HonestReviews Backend is running" }))
}
