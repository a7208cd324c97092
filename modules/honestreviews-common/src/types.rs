use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// --- Verdict ---

/// One keyword in the cloud. `value` is relevance in 1..=100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCloudEntry {
    pub text: String,
    pub value: u8,
}

/// The model's structured answer, after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub conclusion: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    /// The Truth Index: 0 (avoid) to 100 (must-buy).
    pub sentiment_score: u8,
    pub word_cloud: Vec<WordCloudEntry>,
}

// --- Citation ---

/// Evidence shown next to the verdict. One per accepted post, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub url: String,
    pub subreddit: String,
    pub score: i64,
}

// --- Collected discussions ---

/// Output of the collector: the text handed to the model plus its citations.
#[derive(Debug, Clone, Default)]
pub struct Discussions {
    pub text_blob: String,
    pub sources: Vec<Citation>,
}

// --- Category ---

/// Product category picked in the UI. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "General")]
    General,
    #[serde(rename = "Technology & Electronics")]
    Technology,
    #[serde(rename = "Home Goods & Appliances")]
    HomeGoods,
    #[serde(rename = "Fashion & Apparel")]
    Fashion,
    #[serde(rename = "Beauty & Personal Care")]
    Beauty,
    #[serde(rename = "Outdoors, Sports & Travel Gear")]
    Outdoors,
    #[serde(rename = "Hobbies & Specific Interests")]
    Hobbies,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Technology,
        Category::HomeGoods,
        Category::Fashion,
        Category::Beauty,
        Category::Outdoors,
        Category::Hobbies,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Technology => "Technology & Electronics",
            Category::HomeGoods => "Home Goods & Appliances",
            Category::Fashion => "Fashion & Apparel",
            Category::Beauty => "Beauty & Personal Care",
            Category::Outdoors => "Outdoors, Sports & Travel Gear",
            Category::Hobbies => "Hobbies & Specific Interests",
        }
    }

    /// Parse an optional, possibly blank, category field. Unknown labels
    /// are treated as absent; the category never gates an analysis.
    pub fn parse_optional(raw: Option<&str>) -> Option<Category> {
        match raw.map(str::trim) {
            None | Some("") => None,
            Some(s) => match s.parse() {
                Ok(category) => Some(category),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unknown category");
                    None
                }
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// --- Report ---

/// The successful response of an analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub product: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub analysis: Verdict,
    pub sources: Vec<Citation>,
}
