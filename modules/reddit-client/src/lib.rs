pub mod error;
pub mod types;

pub use error::{RedditError, Result};
pub use types::{
    AccessToken, Comment, Listing, Post, SearchRequest, SearchSort, TimeWindow, TokenResponse,
};

use reqwest::header::USER_AGENT;
use reqwest::RequestBuilder;

const AUTH_URL: &str = "https://www.reddit.com";
const API_URL: &str = "https://oauth.reddit.com";

pub const DEFAULT_USER_AGENT: &str = "honestreviews-app/1.0";

/// Reddit client for app-only (client-credentials) access.
///
/// Credentials are checked lazily: a client without them can be built, but
/// `access_token` fails with `MissingCredentials` before touching the network.
#[derive(Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    client_id: Option<String>,
    client_secret: Option<String>,
    user_agent: String,
    auth_url: String,
    api_url: String,
}

impl RedditClient {
    pub fn new(client_id: Option<String>, client_secret: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: non_blank(client_id),
            client_secret: non_blank(client_secret),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            auth_url: AUTH_URL.to_string(),
            api_url: API_URL.to_string(),
        }
    }

    /// Share a preconfigured HTTP client (timeouts, pooling).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Point both the OAuth and API hosts somewhere else (used by tests).
    pub fn with_base_urls(mut self, auth_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into().trim_end_matches('/').to_string();
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Exchange the client id/secret for a bearer token.
    pub async fn access_token(&self) -> Result<AccessToken> {
        let (Some(id), Some(secret)) = (&self.client_id, &self.client_secret) else {
            return Err(RedditError::MissingCredentials);
        };

        let url = format!("{}/api/v1/access_token", self.auth_url);
        let resp = self
            .http
            .post(&url)
            .basic_auth(id, Some(secret))
            .header(USER_AGENT, &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let token: TokenResponse = resp.json().await?;
        tracing::debug!(expires_in = ?token.expires_in, "Obtained Reddit access token");
        Ok(token.into())
    }

    /// Search all of Reddit. Results follow Reddit's ranking for the requested sort.
    pub async fn search(&self, token: &AccessToken, request: &SearchRequest) -> Result<Vec<Post>> {
        let url = format!("{}/r/all/search", self.api_url);
        let limit = request.limit.to_string();
        let resp = self
            .authed(self.http.get(&url), token)
            .query(&[
                ("q", request.query.as_str()),
                ("sort", request.sort.as_str()),
                ("t", request.time.as_str()),
                ("limit", limit.as_str()),
                ("raw_json", "1"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let listing: Listing<Post> = resp.json().await?;
        let posts = listing.into_items();
        tracing::debug!(query = %request.query, count = posts.len(), "Reddit search returned");
        Ok(posts)
    }

    /// Fetch the top-level comments of a post, sorted by `top`.
    ///
    /// `permalink` is the path form Reddit returns (`/r/<sub>/comments/<id>/<slug>/`).
    pub async fn top_comments(
        &self,
        token: &AccessToken,
        permalink: &str,
        limit: u32,
    ) -> Result<Vec<Comment>> {
        let path = permalink.trim_end_matches('/');
        let url = format!("{}{}", self.api_url, path);
        let limit = limit.to_string();
        let resp = self
            .authed(self.http.get(&url), token)
            .query(&[("sort", "top"), ("limit", limit.as_str()), ("raw_json", "1")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        // [post listing, comment listing]
        let mut listings: Vec<serde_json::Value> = resp.json().await?;
        if listings.len() < 2 {
            return Ok(Vec::new());
        }
        let comments: Listing<Comment> = serde_json::from_value(listings.swap_remove(1))?;
        Ok(comments.into_items())
    }

    fn authed(&self, builder: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        builder
            .bearer_auth(token.bearer())
            .header(USER_AGENT, &self.user_agent)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
