use std::time::Duration;

use async_trait::async_trait;
use log::{ debug, info, warn };
use serde::{ Deserialize, Serialize };

use crate::errors::{ GenerationError, ProofsmithError, ProofsmithResult };
use crate::implementations::config::ModelConfig;
use crate::models::prompt::Prompt;
use crate::traits::proof_generator::ProofGenerator;

/// OpenAI API request and response types
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(config: &ModelConfig, prompt: &Prompt) -> Self {
        Self {
            model: config.model.clone(),
            messages: vec![ChatMessage::system(&prompt.system), ChatMessage::user(&prompt.user)],
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatResponseChoice>,
}

/// Read the generated text from the first completion choice
pub fn parse_completion(body: &str) -> Result<String, GenerationError> {
    let response: ChatResponse = serde_json
        ::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(format!("invalid JSON response: {}", e)))?;

    let choice = response.choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::MalformedResponse("response has no choices".to_string()))?;

    choice.message
        .and_then(|m| m.content)
        .ok_or_else(|| {
            GenerationError::MalformedResponse(
                "first choice has no message content".to_string()
            )
        })
}

/// Generator backed by an OpenAI-compatible chat-completion endpoint
#[derive(Clone)]
pub struct OpenAiGenerator {
    config: ModelConfig,
    http_client: reqwest::Client,
}

impl OpenAiGenerator {
    pub fn new(config: ModelConfig) -> ProofsmithResult<Self> {
        let http_client = reqwest::Client
            ::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ProofsmithError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http_client })
    }
}

#[async_trait]
impl ProofGenerator for OpenAiGenerator {
    async fn submit(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let endpoint = self.config.completions_url();
        let request = ChatRequest::new(&self.config, prompt);

        info!("Requesting a proof from {}", self.config.model);
        debug!("API endpoint: {}", endpoint);
        debug!("Temperature: {}", request.temperature);
        debug!("Max tokens: {}", request.max_tokens);
        debug!("Prompt length: {} characters", prompt.user.len());

        let response = self.http_client
            .post(&endpoint)
            .bearer_auth(self.config.api_key_or_placeholder())
            .json(&request)
            .send().await
            .map_err(|e| {
                let error_msg = format!("could not reach {}: {}", endpoint, e);
                warn!("{}", error_msg);
                if e.is_timeout() {
                    warn!("Request timed out");
                }
                if e.is_connect() {
                    warn!("Connection error - check network connectivity");
                }
                GenerationError::Unreachable(error_msg)
            })?;

        let status = response.status();
        let body = response
            .text().await
            .map_err(|e| GenerationError::MalformedResponse(format!("failed to read body: {}", e)))?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            warn!("API rejected credentials: HTTP {}", status.as_u16());
            return Err(GenerationError::Unauthorized {
                status: status.as_u16(),
                message: body,
            });
        }
        if !status.is_success() {
            warn!("API error: HTTP {} - {}", status.as_u16(), body);
            return Err(GenerationError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        let content = parse_completion(&body)?;
        debug!("Response content length: {} characters", content.len());
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_has_openai_shape() {
        let config = ModelConfig::default();
        let prompt = Prompt { system: "sys".to_string(), user: "prove it".to_string() };
        let json = serde_json::to_value(ChatRequest::new(&config, &prompt)).unwrap();

        assert_eq!(json["model"], "mistral-small3.2:latest");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "prove it");
        assert_eq!(json["max_tokens"], 2000);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_parse_reads_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"first"}},
                                  {"message":{"role":"assistant","content":"second"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "first");
    }

    #[test]
    fn test_parse_rejects_missing_content() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{"id":"x"}"#,
            r#"{"choices":[{"message":{"role":"assistant"}}]}"#,
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
            "not json",
        ] {
            assert!(
                matches!(parse_completion(body), Err(GenerationError::MalformedResponse(_))),
                "accepted: {}",
                body
            );
        }
    }
}
