// Trait seams for the two upstreams.
//
// DiscussionSource: token exchange, search, and comment reads (Reddit).
// VerdictModel: one JSON-mode generation call (Gemini).
//
// Both have in-memory mocks in `testing` so the collector and pipeline run
// without network access.

use async_trait::async_trait;

use ai_client::Gemini;
use reddit_client::{AccessToken, Comment, Post, RedditClient, SearchRequest};

// ---------------------------------------------------------------------------
// DiscussionSource
// ---------------------------------------------------------------------------

#[async_trait]
pub trait DiscussionSource: Send + Sync {
    /// Fresh bearer token for this request.
    async fn access_token(&self) -> reddit_client::Result<AccessToken>;

    /// Run one search query.
    async fn search(
        &self,
        token: &AccessToken,
        request: &SearchRequest,
    ) -> reddit_client::Result<Vec<Post>>;

    /// Top comments of the post at `permalink`.
    async fn top_comments(
        &self,
        token: &AccessToken,
        permalink: &str,
        limit: u32,
    ) -> reddit_client::Result<Vec<Comment>>;
}

#[async_trait]
impl DiscussionSource for RedditClient {
    async fn access_token(&self) -> reddit_client::Result<AccessToken> {
        RedditClient::access_token(self).await
    }

    async fn search(
        &self,
        token: &AccessToken,
        request: &SearchRequest,
    ) -> reddit_client::Result<Vec<Post>> {
        RedditClient::search(self, token, request).await
    }

    async fn top_comments(
        &self,
        token: &AccessToken,
        permalink: &str,
        limit: u32,
    ) -> reddit_client::Result<Vec<Comment>> {
        RedditClient::top_comments(self, token, permalink, limit).await
    }
}

// ---------------------------------------------------------------------------
// VerdictModel
// ---------------------------------------------------------------------------

#[async_trait]
pub trait VerdictModel: Send + Sync {
    /// Send `prompt` in JSON mode and return the raw text answer.
    async fn generate_json_text(&self, prompt: &str, temperature: f32) -> ai_client::Result<String>;
}

#[async_trait]
impl VerdictModel for Gemini {
    async fn generate_json_text(&self, prompt: &str, temperature: f32) -> ai_client::Result<String> {
        self.prompt(prompt).temperature(temperature).json().send().await
    }
}
