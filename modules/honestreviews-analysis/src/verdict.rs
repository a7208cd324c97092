use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use ai_client::{parse_json_lenient, truncate_chars, AiError};
use honestreviews_common::{AnalysisError, Provider, Verdict, WordCloudEntry};

use crate::limits::VerdictSettings;
use crate::traits::VerdictModel;

/// Instructions prepended to the collected discussion text.
pub const VERDICT_INSTRUCTIONS: &str = "\
You are a brutally honest product analyst. Your job is to tell people whether Reddit \
actually recommends buying this product.

Detect and discount suspicious content:
- Brand-new accounts gushing about a product are likely shills.
- Overly enthusiastic, marketing-style reviews are suspicious.
- The same talking points repeated across posts suggest coordinated promotion.
- Weight detailed, first-hand user experiences MORE heavily.
- Weight low-effort hype or hate LESS.

Return a JSON object with EXACTLY these keys:
- 'conclusion': a blunt 2-3 sentence verdict. Should they buy it or not?
- 'pros': 3-5 genuine strengths real users consistently mention.
- 'cons': 3-5 real problems users complain about, including dealbreakers.
- 'sentiment_score': the TRUTH INDEX, an integer 0-100 measuring how confidently Reddit would recommend buying:
  * 90-100: universal praise, must-buy
  * 70-89: generally recommended with minor caveats
  * 50-69: mixed, depends on your needs
  * 30-49: more complaints than praise, proceed with caution
  * 0-29: widely disliked, avoid
- 'word_cloud': 15-20 terms or phrases people actually talk about (features, complaints, comparisons), each an object with 'text' and 'value' (relevance 1-100).

Output ONLY valid JSON.";

/// Soft bounds requested in the prompt. Violations are logged, not rejected.
const PROS_CONS_RANGE: std::ops::RangeInclusive<usize> = 3..=5;
const WORD_CLOUD_RANGE: std::ops::RangeInclusive<usize> = 15..=20;

pub struct VerdictGenerator {
    model: Arc<dyn VerdictModel>,
    settings: VerdictSettings,
}

impl VerdictGenerator {
    pub fn new(model: Arc<dyn VerdictModel>) -> Self {
        Self {
            model,
            settings: VerdictSettings::default(),
        }
    }

    pub async fn generate(&self, text_blob: &str) -> Result<Verdict, AnalysisError> {
        let prompt = build_prompt(text_blob, &self.settings);

        let raw = self
            .model
            .generate_json_text(&prompt, self.settings.temperature)
            .await
            .map_err(model_error)?;

        let value = parse_json_lenient(&raw).map_err(|e| {
            warn!(error = %e, "Could not parse model output");
            AnalysisError::ResponseParse(e.to_string())
        })?;

        let verdict = validate_verdict(&value)?;
        info!(
            sentiment_score = verdict.sentiment_score,
            pros = verdict.pros.len(),
            cons = verdict.cons.len(),
            terms = verdict.word_cloud.len(),
            "Verdict generated"
        );
        Ok(verdict)
    }
}

/// Instructions followed by the (truncated) discussion text.
pub fn build_prompt(text_blob: &str, settings: &VerdictSettings) -> String {
    let safe_text = truncate_chars(text_blob, settings.max_input_chars);
    format!("{VERDICT_INSTRUCTIONS}\n\nReviews:\n{safe_text}")
}

fn model_error(err: AiError) -> AnalysisError {
    match err {
        AiError::MissingApiKey => AnalysisError::Configuration(Provider::Gemini),
        AiError::EmptyResponse => AnalysisError::EmptyResponse,
        AiError::Parse(msg) => AnalysisError::ResponseParse(msg),
        other => {
            error!(error = %other, "Gemini analysis failed");
            AnalysisError::upstream(Provider::Gemini, other.to_string())
        }
    }
}

/// Check the parsed output against the shape the UI relies on.
///
/// Hard requirements: every field present with the right type, non-empty
/// conclusion/pros/cons, score in 0..=100, every keyword weight in 1..=100.
pub fn validate_verdict(value: &Value) -> Result<Verdict, AnalysisError> {
    let mut issues = Vec::new();

    let Some(obj) = value.as_object() else {
        return Err(AnalysisError::Validation(vec![
            "top-level value is not an object".to_string(),
        ]));
    };

    let conclusion = match obj.get("conclusion").and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        Some(_) => {
            issues.push("conclusion is empty".to_string());
            String::new()
        }
        None => {
            issues.push("conclusion is missing or not a string".to_string());
            String::new()
        }
    };

    let pros = string_list(obj.get("pros"), "pros", &mut issues);
    let cons = string_list(obj.get("cons"), "cons", &mut issues);
    let sentiment_score = score(obj.get("sentiment_score"), &mut issues);
    let word_cloud = word_cloud(obj.get("word_cloud"), &mut issues);

    if !issues.is_empty() {
        warn!(?issues, "Model output failed validation");
        return Err(AnalysisError::Validation(issues));
    }

    if !PROS_CONS_RANGE.contains(&pros.len()) || !PROS_CONS_RANGE.contains(&cons.len()) {
        warn!(pros = pros.len(), cons = cons.len(), "Pros/cons count outside requested range");
    }
    if !WORD_CLOUD_RANGE.contains(&word_cloud.len()) {
        warn!(terms = word_cloud.len(), "Word cloud size outside requested range");
    }

    Ok(Verdict {
        conclusion,
        pros,
        cons,
        sentiment_score,
        word_cloud,
    })
}

fn string_list(value: Option<&Value>, field: &str, issues: &mut Vec<String>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        issues.push(format!("{field} is missing or not an array"));
        return Vec::new();
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str().map(str::trim) {
            Some("") => {}
            Some(s) => out.push(s.to_string()),
            None => issues.push(format!("{field} contains a non-string entry")),
        }
    }
    if out.is_empty() {
        issues.push(format!("{field} is empty"));
    }
    out
}

/// Integral number in 0..=100. Whole floats (`72.0`) are accepted.
fn score(value: Option<&Value>, issues: &mut Vec<String>) -> u8 {
    let Some(number) = value.and_then(as_whole_number) else {
        issues.push("sentiment_score is missing or not an integer".to_string());
        return 0;
    };
    if !(0..=100).contains(&number) {
        issues.push(format!("sentiment_score {number} is outside 0..=100"));
        return 0;
    }
    number as u8
}

fn word_cloud(value: Option<&Value>, issues: &mut Vec<String>) -> Vec<WordCloudEntry> {
    let Some(items) = value.and_then(Value::as_array) else {
        issues.push("word_cloud is missing or not an array".to_string());
        return Vec::new();
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let text = item.get("text").and_then(Value::as_str).map(str::trim);
        let weight = item.get("value").and_then(as_whole_number);
        match (text, weight) {
            (Some(t), Some(w)) if !t.is_empty() && (1..=100).contains(&w) => {
                out.push(WordCloudEntry {
                    text: t.to_string(),
                    value: w as u8,
                });
            }
            (Some(t), Some(w)) if !t.is_empty() => {
                issues.push(format!("word_cloud[{i}] weight {w} is outside 1..=100"));
            }
            _ => issues.push(format!("word_cloud[{i}] needs a non-empty 'text' and integer 'value'")),
        }
    }
    out
}

fn as_whole_number(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f.is_finite()).then_some(f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn good() -> Value {
        json!({
            "conclusion": "Great e-reader, buy the Paperwhite.",
            "pros": ["battery", "screen", "weight"],
            "cons": ["ads", "lock-in", "slow store"],
            "sentiment_score": 82,
            "word_cloud": [{"text": "battery life", "value": 95}, {"text": "ads", "value": 40}]
        })
    }

    #[test]
    fn accepts_well_formed_verdict() {
        let verdict = validate_verdict(&good()).unwrap();
        assert_eq!(verdict.sentiment_score, 82);
        assert_eq!(verdict.pros.len(), 3);
        assert_eq!(verdict.word_cloud[0].text, "battery life");
    }

    #[test]
    fn whole_float_score_is_accepted() {
        let mut value = good();
        value["sentiment_score"] = json!(70.0);
        assert_eq!(validate_verdict(&value).unwrap().sentiment_score, 70);
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let mut value = good();
        value["sentiment_score"] = json!(140);
        let err = validate_verdict(&value).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation(ref issues) if issues[0].contains("140")));
    }

    #[test]
    fn empty_pros_are_rejected() {
        let mut value = good();
        value["pros"] = json!([]);
        assert!(matches!(validate_verdict(&value), Err(AnalysisError::Validation(_))));
    }

    #[test]
    fn missing_field_is_rejected() {
        let mut value = good();
        value.as_object_mut().unwrap().remove("cons");
        match validate_verdict(&value) {
            Err(AnalysisError::Validation(issues)) => {
                assert_eq!(issues, vec!["cons is missing or not an array".to_string()]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn keyword_weight_bounds() {
        let mut value = good();
        value["word_cloud"] = json!([{"text": "hype", "value": 0}]);
        assert!(validate_verdict(&value).is_err());
        value["word_cloud"] = json!([{"text": "hype", "value": 1}, {"text": "value", "value": 100}]);
        assert_eq!(validate_verdict(&value).unwrap().word_cloud.len(), 2);
    }

    #[test]
    fn array_is_not_a_verdict() {
        assert!(validate_verdict(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn prompt_truncates_blob() {
        let blob = "r".repeat(40_000);
        let prompt = build_prompt(&blob, &VerdictSettings::default());
        let reviews = prompt.split("Reviews:\n").nth(1).unwrap();
        assert_eq!(reviews.chars().count(), 30_000);
        assert!(prompt.starts_with(VERDICT_INSTRUCTIONS));
    }

    #[test]
    fn missing_key_maps_to_configuration() {
        assert!(matches!(
            model_error(AiError::MissingApiKey),
            AnalysisError::Configuration(Provider::Gemini)
        ));
        assert!(matches!(
            model_error(AiError::Api { status: 500, message: "boom".into() }),
            AnalysisError::Upstream { provider: Provider::Gemini, .. }
        ));
    }
}
