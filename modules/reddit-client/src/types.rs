use serde::Deserialize;

// --- OAuth ---

/// Response body of `POST /api/v1/access_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// App-only bearer token. Not cached; callers request one per unit of work.
#[derive(Clone)]
pub struct AccessToken {
    token: String,
    pub expires_in: Option<u64>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_in: None,
        }
    }

    pub fn bearer(&self) -> &str {
        &self.token
    }
}

impl From<TokenResponse> for AccessToken {
    fn from(resp: TokenResponse) -> Self {
        Self {
            token: resp.access_token,
            expires_in: resp.expires_in,
        }
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

// --- Search parameters ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSort {
    Relevance,
    Top,
    New,
    Comments,
}

impl SearchSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSort::Relevance => "relevance",
            SearchSort::Top => "top",
            SearchSort::New => "new",
            SearchSort::Comments => "comments",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

/// A site-wide (`r/all`) search request.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub sort: SearchSort,
    pub time: TimeWindow,
    pub limit: u32,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sort: SearchSort::Relevance,
            time: TimeWindow::Year,
            limit: 25,
        }
    }

    pub fn sort(mut self, sort: SearchSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn time(mut self, time: TimeWindow) -> Self {
        self.time = time;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

// --- Listings ---

/// Reddit wraps every collection in `{ kind: "Listing", data: { children: [...] } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    #[serde(default = "Vec::new")]
    pub children: Vec<Thing<T>>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thing<T> {
    #[serde(default)]
    pub kind: Option<String>,
    pub data: T,
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        self.data.children.into_iter().map(|t| t.data).collect()
    }
}

/// A submission (`t3`) as returned by search.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u64,
}

impl Post {
    /// Canonical discussion link, independent of what the post itself links to.
    pub fn discussion_url(&self) -> String {
        if self.permalink.starts_with("http") {
            self.permalink.clone()
        } else {
            format!("https://reddit.com{}", self.permalink)
        }
    }
}

/// A comment (`t1`). `more` stubs deserialize with an empty body.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_listing_deserializes() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "after": null,
                "children": [
                    {"kind": "t3", "data": {
                        "title": "Sony WH-1000XM5 after 6 months",
                        "selftext": "Long review",
                        "url": "https://www.reddit.com/r/headphones/comments/abc/sony/",
                        "permalink": "/r/headphones/comments/abc/sony/",
                        "subreddit": "headphones",
                        "score": 412,
                        "num_comments": 88,
                        "created_utc": 1700000000.0
                    }}
                ]
            }
        }"#;
        let listing: Listing<Post> = serde_json::from_str(json).unwrap();
        let posts = listing.into_items();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].subreddit, "headphones");
        assert_eq!(posts[0].num_comments, 88);
    }

    #[test]
    fn missing_fields_default() {
        let json = r#"{"data": {"children": [{"data": {}}]}}"#;
        let listing: Listing<Post> = serde_json::from_str(json).unwrap();
        let post = &listing.data.children[0].data;
        assert_eq!(post.num_comments, 0);
        assert!(post.title.is_empty());
    }

    #[test]
    fn more_stub_has_no_body() {
        let json = r#"{"data": {"children": [
            {"kind": "t1", "data": {"body": "Battery life is great"}},
            {"kind": "more", "data": {"count": 12, "children": ["x1"]}}
        ]}}"#;
        let listing: Listing<Comment> = serde_json::from_str(json).unwrap();
        let comments = listing.into_items();
        assert_eq!(comments[0].body.as_deref(), Some("Battery life is great"));
        assert!(comments[1].body.is_none());
    }

    #[test]
    fn discussion_url_prefixes_permalink() {
        let post = Post {
            title: String::new(),
            selftext: String::new(),
            url: "https://i.redd.it/img.png".to_string(),
            permalink: "/r/gadgets/comments/xyz/title/".to_string(),
            subreddit: "gadgets".to_string(),
            score: 1,
            num_comments: 5,
        };
        assert_eq!(
            post.discussion_url(),
            "https://reddit.com/r/gadgets/comments/xyz/title/"
        );
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("secret-token");
        assert!(!format!("{token:?}").contains("secret-token"));
    }
}
