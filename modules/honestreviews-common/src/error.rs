use std::fmt;

use thiserror::Error;

/// The external service an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Reddit,
    Gemini,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Reddit => write!(f, "reddit"),
            Provider::Gemini => write!(f, "gemini"),
        }
    }
}

/// Every way an analysis request can fail.
///
/// `Display` carries internal diagnostics for logs. Callers only ever see
/// `public_detail()`.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Product name is required")]
    MissingProductName,

    #[error("{0} is not configured")]
    Configuration(Provider),

    #[error("{provider} request failed: {message}")]
    Upstream { provider: Provider, message: String },

    #[error("No Reddit discussions found for '{product}'")]
    NoDiscussions { product: String },

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model output could not be parsed: {0}")]
    ResponseParse(String),

    #[error("Model output failed validation: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl AnalysisError {
    pub fn upstream(provider: Provider, message: impl Into<String>) -> Self {
        AnalysisError::Upstream {
            provider,
            message: message.into(),
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AnalysisError::MissingProductName | AnalysisError::NoDiscussions { .. } => 400,
            _ => 500,
        }
    }

    /// Short message safe to return to the caller.
    pub fn public_detail(&self) -> String {
        match self {
            AnalysisError::MissingProductName => "Product name is required".to_string(),
            AnalysisError::Configuration(Provider::Reddit) => {
                "Reddit API credentials not configured".to_string()
            }
            AnalysisError::Configuration(Provider::Gemini) => {
                "AI analysis failed: provider not configured".to_string()
            }
            AnalysisError::Upstream {
                provider: Provider::Reddit,
                ..
            } => GENERIC_FAILURE.to_string(),
            AnalysisError::Upstream {
                provider: Provider::Gemini,
                ..
            } => "AI analysis failed".to_string(),
            AnalysisError::NoDiscussions { product } => format!(
                "No Reddit discussions found for '{product}'. Try a more specific name."
            ),
            AnalysisError::EmptyResponse => "Empty response from AI".to_string(),
            AnalysisError::ResponseParse(_) => "Failed to parse AI response".to_string(),
            AnalysisError::Validation(_) => {
                "AI response did not match the expected shape".to_string()
            }
        }
    }
}

/// Returned for anything unexpected, including panics in a handler.
pub const GENERIC_FAILURE: &str = "Something went wrong while consulting Reddit.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_400() {
        assert_eq!(AnalysisError::MissingProductName.status_code(), 400);
        let err = AnalysisError::NoDiscussions {
            product: "Zune".to_string(),
        };
        assert_eq!(err.status_code(), 400);
        assert!(err.public_detail().contains("'Zune'"));
    }

    #[test]
    fn upstream_details_are_not_leaked() {
        let err = AnalysisError::upstream(Provider::Gemini, "403: API key not valid. key=AIza...");
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_detail(), "AI analysis failed");
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn configuration_errors_are_500() {
        let err = AnalysisError::Configuration(Provider::Gemini);
        assert_eq!(err.status_code(), 500);
        assert!(err.public_detail().starts_with("AI analysis failed"));
        assert_eq!(
            AnalysisError::Configuration(Provider::Reddit).public_detail(),
            "Reddit API credentials not configured"
        );
    }

    #[test]
    fn validation_lists_every_issue_internally() {
        let err = AnalysisError::Validation(vec!["pros is empty".into(), "score 140".into()]);
        assert_eq!(err.to_string(), "Model output failed validation: pros is empty; score 140");
        assert_eq!(err.status_code(), 500);
    }
}
