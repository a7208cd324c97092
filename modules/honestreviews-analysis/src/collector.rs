use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use ai_client::truncate_chars;
use honestreviews_common::{AnalysisError, Citation, Discussions, Provider};
use reddit_client::{AccessToken, Comment, Post, RedditError, SearchRequest};

use crate::limits::{build_queries, CollectorLimits, REMOVED_SENTINELS};
use crate::traits::DiscussionSource;

/// Gathers Reddit discussion about a product into one text blob.
///
/// Queries run strictly in order. Search and comment failures are skipped;
/// only a failed token exchange or an empty result aborts.
pub struct DiscussionCollector {
    source: Arc<dyn DiscussionSource>,
    limits: CollectorLimits,
}

/// Running state for one collection.
#[derive(Default)]
struct Accumulator {
    seen_urls: HashSet<String>,
    blocks: Vec<String>,
    sources: Vec<Citation>,
}

impl Accumulator {
    fn is_full(&self, limits: &CollectorLimits) -> bool {
        self.sources.len() >= limits.max_posts
    }
}

impl DiscussionCollector {
    pub fn new(source: Arc<dyn DiscussionSource>) -> Self {
        Self {
            source,
            limits: CollectorLimits::default(),
        }
    }

    pub async fn collect(&self, product: &str) -> Result<Discussions, AnalysisError> {
        let token = self
            .source
            .access_token()
            .await
            .map_err(|e| reddit_error(e, "token exchange"))?;

        let mut acc = Accumulator::default();

        for query in build_queries(product) {
            if acc.is_full(&self.limits) {
                break;
            }

            let request = SearchRequest::new(&query)
                .sort(self.limits.sort)
                .time(self.limits.time_window)
                .limit(self.limits.results_per_query);

            let posts = match self.source.search(&token, &request).await {
                Ok(posts) => posts,
                Err(e) => {
                    warn!(query = %query, error = %e, "Search failed, skipping query");
                    continue;
                }
            };

            let before = acc.sources.len();
            for post in posts {
                if acc.is_full(&self.limits) {
                    break;
                }
                if acc.seen_urls.contains(&post.url) {
                    debug!(url = %post.url, "Skipping duplicate post");
                    continue;
                }
                if post.num_comments < self.limits.min_comments {
                    continue;
                }
                self.accept(&token, post, &mut acc).await;
            }
            debug!(query = %query, accepted = acc.sources.len() - before, "Query done");
        }

        if acc.blocks.is_empty() {
            return Err(AnalysisError::NoDiscussions {
                product: product.to_string(),
            });
        }

        info!(
            posts = acc.sources.len(),
            blocks = acc.blocks.len(),
            "Collected Reddit discussions"
        );

        Ok(Discussions {
            text_blob: acc.blocks.join("\n\n"),
            sources: acc.sources,
        })
    }

    async fn accept(&self, token: &AccessToken, post: Post, acc: &mut Accumulator) {
        acc.seen_urls.insert(post.url.clone());
        acc.blocks.push(format_post_block(&post, &self.limits));
        acc.sources.push(Citation {
            title: post.title.clone(),
            url: post.discussion_url(),
            subreddit: post.subreddit.clone(),
            score: post.score,
        });

        let limit = self.limits.max_comments_per_post as u32;
        match self.source.top_comments(token, &post.permalink, limit).await {
            Ok(comments) => {
                acc.blocks
                    .extend(select_comments(&comments, &self.limits).map(|body| {
                        format!("Comment: {}", truncate_chars(body, self.limits.max_comment_chars))
                    }));
            }
            Err(e) => {
                debug!(permalink = %post.permalink, error = %e, "Comment fetch failed, keeping post");
            }
        }
    }
}

/// Header, title, and (truncated) body of an accepted post.
pub fn format_post_block(post: &Post, limits: &CollectorLimits) -> String {
    let mut block = format!("### Post from r/{}\nTitle: {}\n", post.subreddit, post.title);
    if !post.selftext.is_empty() {
        block.push_str("Body: ");
        block.push_str(truncate_chars(&post.selftext, limits.max_body_chars));
        block.push('\n');
    }
    block
}

/// Whether a comment body carries enough signal to keep.
pub fn is_substantive_comment(body: &str, limits: &CollectorLimits) -> bool {
    !body.is_empty()
        && !REMOVED_SENTINELS.contains(&body)
        && body.chars().count() > limits.min_comment_chars
}

/// Kept comment bodies in order, capped per post.
fn select_comments<'a>(
    comments: &'a [Comment],
    limits: &'a CollectorLimits,
) -> impl Iterator<Item = &'a str> + 'a {
    comments
        .iter()
        .filter_map(|c| c.body.as_deref())
        .filter(|body| is_substantive_comment(body, limits))
        .take(limits.max_comments_per_post)
}

fn reddit_error(err: RedditError, stage: &str) -> AnalysisError {
    match err {
        RedditError::MissingCredentials => AnalysisError::Configuration(Provider::Reddit),
        other => {
            warn!(stage, error = %other, "Reddit request failed");
            AnalysisError::upstream(Provider::Reddit, other.to_string())
        }
    }
}
