//! Fixed bounds for collection and generation.

use reddit_client::{SearchSort, TimeWindow};

/// Suffixes appended to the quoted product name, in query order. A final
/// query uses the bare name.
pub const QUERY_SUFFIXES: [&str; 3] = ["review", "thoughts", "vs"];

/// Comment bodies Reddit leaves behind for moderated or deleted comments.
pub const REMOVED_SENTINELS: [&str; 2] = ["[removed]", "[deleted]"];

#[derive(Debug, Clone)]
pub struct CollectorLimits {
    /// Accepted posts across all queries.
    pub max_posts: usize,
    /// Raw results requested per search query.
    pub results_per_query: u32,
    /// Posts with fewer comments than this are skipped.
    pub min_comments: u64,
    /// Comments kept per post.
    pub max_comments_per_post: usize,
    /// Comments must be strictly longer than this (in characters).
    pub min_comment_chars: usize,
    pub max_body_chars: usize,
    pub max_comment_chars: usize,
    pub sort: SearchSort,
    pub time_window: TimeWindow,
}

impl Default for CollectorLimits {
    fn default() -> Self {
        Self {
            max_posts: 6,
            results_per_query: 6,
            min_comments: 3,
            max_comments_per_post: 15,
            min_comment_chars: 20,
            max_body_chars: 2000,
            max_comment_chars: 1500,
            sort: SearchSort::Relevance,
            time_window: TimeWindow::Year,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerdictSettings {
    /// Characters of collected text passed to the model.
    pub max_input_chars: usize,
    pub temperature: f32,
}

impl Default for VerdictSettings {
    fn default() -> Self {
        Self {
            max_input_chars: 30_000,
            temperature: 0.2,
        }
    }
}

/// The search queries for a product, in the order they are tried.
pub fn build_queries(product: &str) -> Vec<String> {
    let mut queries: Vec<String> = QUERY_SUFFIXES
        .iter()
        .map(|suffix| format!("\"{product}\" {suffix}"))
        .collect();
    queries.push(product.to_string());
    queries
}
