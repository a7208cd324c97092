// Test mocks for the analysis pipeline.
//
// Two mocks matching the two trait boundaries:
// - MockDiscussionSource (DiscussionSource): query to posts, permalink to comments
// - MockVerdictModel (VerdictModel): canned reply, records prompts
//
// Plus builders for posts, comments, and a well-formed verdict payload.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use ai_client::AiError;
use reddit_client::{AccessToken, Comment, Post, RedditError, SearchRequest};

use crate::traits::{DiscussionSource, VerdictModel};

// ---------------------------------------------------------------------------
// MockDiscussionSource
// ---------------------------------------------------------------------------

enum TokenMode {
    Valid,
    MissingCredentials,
    Rejected,
}

/// HashMap-based Reddit stand-in. Unregistered queries and permalinks fail
/// with a 404, like a search the platform refused.
/// Builder pattern: `.on_search()`, `.on_comments()`, `.failing_search()`.
pub struct MockDiscussionSource {
    token: TokenMode,
    searches: HashMap<String, Vec<Post>>,
    failing_searches: HashMap<String, u16>,
    comments: HashMap<String, Vec<Comment>>,
    search_log: Mutex<Vec<SearchRequest>>,
    comment_log: Mutex<Vec<(String, u32)>>,
}

impl MockDiscussionSource {
    pub fn new() -> Self {
        Self {
            token: TokenMode::Valid,
            searches: HashMap::new(),
            failing_searches: HashMap::new(),
            comments: HashMap::new(),
            search_log: Mutex::new(Vec::new()),
            comment_log: Mutex::new(Vec::new()),
        }
    }

    /// Register empty results for every query generated for `product`.
    pub fn with_empty_searches(mut self, product: &str) -> Self {
        for query in crate::limits::build_queries(product) {
            self.searches.insert(query, Vec::new());
        }
        self
    }

    pub fn on_search(mut self, query: &str, posts: Vec<Post>) -> Self {
        self.searches.insert(query.to_string(), posts);
        self
    }

    pub fn failing_search(mut self, query: &str, status: u16) -> Self {
        self.failing_searches.insert(query.to_string(), status);
        self
    }

    pub fn on_comments(mut self, permalink: &str, comments: Vec<Comment>) -> Self {
        self.comments.insert(permalink.to_string(), comments);
        self
    }

    pub fn without_credentials(mut self) -> Self {
        self.token = TokenMode::MissingCredentials;
        self
    }

    pub fn rejecting_token(mut self) -> Self {
        self.token = TokenMode::Rejected;
        self
    }

    /// Every search issued, in order.
    pub fn searches_made(&self) -> Vec<SearchRequest> {
        self.search_log.lock().unwrap().clone()
    }

    /// Every comment fetch issued as `(permalink, limit)`, in order.
    pub fn comment_fetches(&self) -> Vec<(String, u32)> {
        self.comment_log.lock().unwrap().clone()
    }
}

impl Default for MockDiscussionSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiscussionSource for MockDiscussionSource {
    async fn access_token(&self) -> reddit_client::Result<AccessToken> {
        match self.token {
            TokenMode::Valid => Ok(AccessToken::new("mock-token")),
            TokenMode::MissingCredentials => Err(RedditError::MissingCredentials),
            TokenMode::Rejected => Err(RedditError::Api {
                status: 401,
                message: "invalid_client".to_string(),
            }),
        }
    }

    async fn search(
        &self,
        _token: &AccessToken,
        request: &SearchRequest,
    ) -> reddit_client::Result<Vec<Post>> {
        self.search_log.lock().unwrap().push(request.clone());

        if let Some(status) = self.failing_searches.get(&request.query) {
            return Err(RedditError::Api {
                status: *status,
                message: "mock failure".to_string(),
            });
        }
        let posts = self.searches.get(&request.query).cloned().ok_or_else(|| {
            RedditError::Api {
                status: 404,
                message: format!("MockDiscussionSource: no search registered for {}", request.query),
            }
        })?;
        Ok(posts.into_iter().take(request.limit as usize).collect())
    }

    async fn top_comments(
        &self,
        _token: &AccessToken,
        permalink: &str,
        limit: u32,
    ) -> reddit_client::Result<Vec<Comment>> {
        self.comment_log
            .lock()
            .unwrap()
            .push((permalink.to_string(), limit));
        let comments = self.comments.get(permalink).cloned().ok_or_else(|| RedditError::Api {
            status: 404,
            message: format!("MockDiscussionSource: no comments registered for {permalink}"),
        })?;
        Ok(comments.into_iter().take(limit as usize).collect())
    }
}

// ---------------------------------------------------------------------------
// MockVerdictModel
// ---------------------------------------------------------------------------

enum Reply {
    Text(String),
    MissingKey,
    ApiError(u16),
    Empty,
}

/// Returns one canned reply for every prompt and records what it was sent.
pub struct MockVerdictModel {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl MockVerdictModel {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text(text.into()))
    }

    /// Replies with [`verdict_json`].
    pub fn valid() -> Self {
        Self::replying(verdict_json().to_string())
    }

    pub fn missing_key() -> Self {
        Self::with_reply(Reply::MissingKey)
    }

    pub fn failing(status: u16) -> Self {
        Self::with_reply(Reply::ApiError(status))
    }

    pub fn empty() -> Self {
        Self::with_reply(Reply::Empty)
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl VerdictModel for MockVerdictModel {
    async fn generate_json_text(&self, prompt: &str, _temperature: f32) -> ai_client::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::ApiError(status) => Err(AiError::Api {
                status: *status,
                message: "mock provider failure".to_string(),
            }),
            Reply::Empty => Err(AiError::EmptyResponse),
            Reply::MissingKey => Err(AiError::MissingApiKey),
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// A post whose permalink is derived from `id`.
pub fn post(id: &str, subreddit: &str, num_comments: u64) -> Post {
    Post {
        title: format!("Thread {id}"),
        selftext: format!("Body of thread {id}"),
        url: format!("https://www.reddit.com/r/{subreddit}/comments/{id}/thread/"),
        permalink: format!("/r/{subreddit}/comments/{id}/thread/"),
        subreddit: subreddit.to_string(),
        score: 10,
        num_comments,
    }
}

pub fn comment(body: &str) -> Comment {
    Comment {
        body: Some(body.to_string()),
        author: None,
        score: None,
    }
}

/// A verdict payload that passes validation.
pub fn verdict_json() -> serde_json::Value {
    json!({
        "conclusion": "Reddit broadly recommends it for the price.",
        "pros": ["Long battery life", "Comfortable fit", "Good noise cancelling"],
        "cons": ["Fragile hinge", "Mediocre mic", "Pricey cases"],
        "sentiment_score": 74,
        "word_cloud": [
            {"text": "battery", "value": 90},
            {"text": "comfort", "value": 70},
            {"text": "hinge", "value": 45}
        ]
    })
}
