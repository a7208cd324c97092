use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use honestreviews_analysis::AnalysisRequest;
use honestreviews_common::{SearchHistory, HISTORY_COOKIE};

use crate::rest::analyze::log_failure;
use crate::templates::{render_report, render_search, SearchForm};
use crate::AppState;

/// One year.
const HISTORY_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Deserialize, Default)]
pub struct AnalyzeQuery {
    product: Option<String>,
    category: Option<String>,
}

pub async fn search_page(headers: HeaderMap) -> Html<String> {
    let history = read_history(&headers);
    Html(render_search(&history, &SearchForm::default()))
}

pub async fn analyze_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<AnalyzeQuery>,
) -> Response {
    let mut history = read_history(&headers);
    let request = AnalysisRequest {
        product_name: query.product.clone(),
        category: query.category.clone(),
    };

    match state.analyzer.analyze(request).await {
        Ok(report) => {
            history.record(&report.product, report.category);
            let cookie = history_cookie(&history);
            (
                [(header::SET_COOKIE, cookie)],
                Html(render_report(&report, &history)),
            )
                .into_response()
        }
        Err(e) => {
            let status = log_failure(&e);
            let form = SearchForm {
                product: query.product.unwrap_or_default(),
                category: query.category,
                error: Some(e.public_detail()),
            };
            (status, Html(render_search(&history, &form))).into_response()
        }
    }
}

/// The search history carried in the request's cookies, or an empty one.
fn read_history(headers: &HeaderMap) -> SearchHistory {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == HISTORY_COOKIE)
        .map(|(_, value)| SearchHistory::from_cookie_value(value))
        .unwrap_or_default()
}

fn history_cookie(history: &SearchHistory) -> String {
    format!(
        "{HISTORY_COOKIE}={}; Path=/; Max-Age={HISTORY_MAX_AGE_SECS}; SameSite=Lax",
        history.to_cookie_value()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn history_is_found_among_other_cookies() {
        let mut history = SearchHistory::new();
        history.record("Kindle", None);
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("a=1; {HISTORY_COOKIE}={}; b=2", history.to_cookie_value()))
                .unwrap(),
        );

        assert_eq!(read_history(&headers).items()[0].product, "Kindle");
    }

    #[test]
    fn missing_or_garbage_cookie_is_empty_history() {
        assert!(read_history(&HeaderMap::new()).is_empty());

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{HISTORY_COOKIE}=!!!")).unwrap(),
        );
        assert!(read_history(&headers).is_empty());
    }
}
