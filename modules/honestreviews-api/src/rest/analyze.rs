use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use honestreviews_analysis::AnalysisRequest;
use honestreviews_common::AnalysisError;

use crate::AppState;

#[derive(Deserialize)]
pub struct AnalyzeBody {
    product_name: Option<String>,
    category: Option<String>,
}

pub async fn api_analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Response {
    // An unreadable body has no usable product name.
    let request = match payload {
        Ok(Json(body)) => AnalysisRequest {
            product_name: body.product_name,
            category: body.category,
        },
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected analyze body");
            AnalysisRequest::default()
        }
    };

    match state.analyzer.analyze(request).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `{detail}` body with the status the error maps to. Internal diagnostics
/// go to the log only.
fn error_response(err: &AnalysisError) -> Response {
    let status = log_failure(err);
    (
        status,
        Json(serde_json::json!({ "detail": err.public_detail() })),
    )
        .into_response()
}

/// Log an analysis failure at a level matching who caused it.
pub fn log_failure(err: &AnalysisError) -> StatusCode {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(status = status.as_u16(), error = %err, "Analysis failed");
    } else {
        info!(status = status.as_u16(), error = %err, "Analysis rejected");
    }
    status
}
