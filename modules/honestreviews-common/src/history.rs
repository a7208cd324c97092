//! Recent searches, persisted on the client as a cookie.
//!
//! The list holds at most [`MAX_HISTORY`] entries, most recent first, with
//! products compared case-insensitively. Every update rewrites the whole value.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::types::Category;

pub const MAX_HISTORY: usize = 5;
pub const HISTORY_COOKIE: &str = "honest_reviews_history";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryItem {
    pub product: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHistory {
    items: Vec<SearchHistoryItem>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[SearchHistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Put `product` at the front, dropping any earlier entry for the same
    /// product and anything past the cap.
    pub fn record(&mut self, product: &str, category: Option<Category>) {
        let product = product.trim();
        if product.is_empty() {
            return;
        }
        let key = product.to_lowercase();
        self.items.retain(|h| h.product.to_lowercase() != key);
        self.items.insert(
            0,
            SearchHistoryItem {
                product: product.to_string(),
                category,
            },
        );
        self.items.truncate(MAX_HISTORY);
    }

    pub fn to_cookie_value(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a cookie value. Anything unreadable yields an empty history.
    pub fn from_cookie_value(raw: &str) -> Self {
        let decoded = match URL_SAFE_NO_PAD.decode(raw.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "Discarding undecodable history cookie");
                return Self::default();
            }
        };
        match serde_json::from_slice::<SearchHistory>(&decoded) {
            Ok(mut history) => {
                history.items.truncate(MAX_HISTORY);
                history
            }
            Err(e) => {
                tracing::debug!(error = %e, "Discarding malformed history cookie");
                Self::default()
            }
        }
    }
}
