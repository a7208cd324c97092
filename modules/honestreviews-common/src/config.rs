use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
///
/// Provider secrets are optional at startup. A missing secret surfaces as a
/// configuration error on the request that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    // Reddit
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub reddit_user_agent: String,

    // Gemini
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,

    // Web server
    pub api_host: String,
    pub api_port: u16,

    // Deadline applied to every upstream call
    pub http_timeout: Duration,
}

pub const DEFAULT_USER_AGENT: &str = "honestreviews-app/1.0";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            reddit_client_id: get("REDDIT_CLIENT_ID"),
            reddit_client_secret: get("REDDIT_CLIENT_SECRET"),
            reddit_user_agent: get("REDDIT_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            api_host: get("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            api_port: parse_or("API_PORT", get("API_PORT"), 3000),
            http_timeout: Duration::from_secs(parse_or(
                "HTTP_TIMEOUT_SECS",
                get("HTTP_TIMEOUT_SECS"),
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
        };

        config.log_keys();
        config
    }

    fn log_keys(&self) {
        fn preview(val: &Option<String>) -> String {
            match val {
                Some(v) => {
                    let shown: String = v.chars().take(5).collect();
                    format!("{}...({} chars)", shown, v.chars().count())
                }
                None => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  REDDIT_CLIENT_ID: {}", preview(&self.reddit_client_id));
        tracing::info!("  REDDIT_CLIENT_SECRET: {}", preview(&self.reddit_client_secret));
        tracing::info!("  REDDIT_USER_AGENT: {}", self.reddit_user_agent);
        tracing::info!("  GEMINI_API_KEY: {}", preview(&self.gemini_api_key));
        tracing::info!("  GEMINI_MODEL: {}", self.gemini_model);
        tracing::info!("  HTTP_TIMEOUT_SECS: {}", self.http_timeout.as_secs());
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(v) => v.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %v, default = %default, "Invalid number, using default");
            default
        }),
        None => default,
    }
}
