pub mod config;
pub mod error;
pub mod history;
pub mod types;

pub use config::Config;
pub use error::{AnalysisError, Provider, GENERIC_FAILURE};
pub use history::{SearchHistory, SearchHistoryItem, HISTORY_COOKIE, MAX_HISTORY};
pub use types::*;
