use tracing::{debug, warn};

use crate::error::{AiError, Result};

use super::types::*;
use super::Gemini;

pub struct GeminiPromptBuilder {
    agent: Gemini,
    input: String,
    temperature: Option<f32>,
    json_mode: bool,
}

impl GeminiPromptBuilder {
    pub(crate) fn new(agent: Gemini, input: String) -> Self {
        Self {
            agent,
            input,
            temperature: None,
            json_mode: false,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Ask for `application/json` output.
    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }

    fn build_request(&self) -> GenerateContentRequest {
        GenerateContentRequest::new(&self.input).config(GenerationConfig {
            temperature: self.temperature,
            response_mime_type: self.json_mode.then(|| "application/json".to_string()),
        })
    }

    /// Send and return the raw text of the first candidate.
    pub async fn send(self) -> Result<String> {
        let client = self.agent.client()?;
        let request = self.build_request();

        let response = client.generate_content(&self.agent.model, &request).await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                prompt_tokens = ?usage.prompt_token_count,
                output_tokens = ?usage.candidates_token_count,
                "Gemini usage"
            );
        }

        match response.text() {
            Some(text) => Ok(text.to_string()),
            None => {
                let finish_reason = response
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.clone());
                warn!(?finish_reason, "Gemini returned no text");
                Err(AiError::EmptyResponse)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_mode_sets_mime_type() {
        let builder = Gemini::new("k", "m").prompt("hello").temperature(0.2).json();
        let request = serde_json::to_value(builder.build_request()).unwrap();
        assert_eq!(request["generationConfig"]["responseMimeType"], "application/json");
        let temp = request["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temp - 0.2).abs() < 1e-6);
    }

    #[test]
    fn plain_mode_omits_mime_type() {
        let builder = Gemini::new("k", "m").prompt("hello");
        let request = serde_json::to_value(builder.build_request()).unwrap();
        assert!(request["generationConfig"].get("responseMimeType").is_none());
        assert!(request["generationConfig"].get("temperature").is_none());
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        let err = Gemini::new("", "m")
            .with_base_url("http://127.0.0.1:9")
            .prompt("hello")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey));
    }
}
