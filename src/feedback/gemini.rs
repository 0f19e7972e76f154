use crate::config::GeminiConfig;
use crate::error::FeedbackError;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// A text-generation backend that turns a prompt into reply text.
pub trait FeedbackService {
    fn generate(&self, prompt: &str) -> Result<String, FeedbackError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Blocking client for the Generative Language `generateContent` endpoint.
pub struct GeminiClient {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
    generation: GenerationConfig,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, FeedbackError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(FeedbackError::MissingApiKey)?;

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FeedbackError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            endpoint: generate_url(&config.api_base, &config.model),
            generation: GenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
                top_k: config.top_k,
                max_output_tokens: config.max_output_tokens,
                response_mime_type: "application/json",
            },
        })
    }
}

fn generate_url(api_base: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        api_base.trim_end_matches('/'),
        model
    )
}

/// Text of the first part of the first candidate.
fn first_candidate_text(body: &str) -> Result<String, FeedbackError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| FeedbackError::Envelope(e.to_string()))?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or(FeedbackError::EmptyReply)
}

impl FeedbackService for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, FeedbackError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: self.generation,
        };

        info!("Requesting feedback from {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .map_err(|e| FeedbackError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| FeedbackError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FeedbackError::HttpStatus {
                status: status.as_u16(),
                message: body,
            });
        }

        debug!("Feedback service replied with {} bytes", body.len());
        first_candidate_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url() {
        assert_eq!(
            generate_url("https://example.com/v1beta/", "gemini-2.0-flash"),
            "https://example.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_uses_camel_case() {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.5,
                top_p: 0.95,
                top_k: 40,
                max_output_tokens: 8192,
                response_mime_type: "application/json",
            },
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["topK"], 40);
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 8192);
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_first_candidate_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"first"},{"text":"second"}]}},
                       {"content":{"parts":[{"text":"other"}]}}]}"#;
        assert_eq!(first_candidate_text(body).unwrap(), "first");
    }

    #[test]
    fn test_no_candidates_is_empty_reply() {
        assert!(matches!(
            first_candidate_text(r#"{"candidates":[]}"#),
            Err(FeedbackError::EmptyReply)
        ));
        assert!(matches!(
            first_candidate_text(r#"{"promptFeedback":{}}"#),
            Err(FeedbackError::EmptyReply)
        ));
    }

    #[test]
    fn test_garbage_envelope() {
        assert!(matches!(
            first_candidate_text("<html>"),
            Err(FeedbackError::Envelope(_))
        ));
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let result = GeminiClient::new(&GeminiConfig::default());
        assert!(matches!(result, Err(FeedbackError::MissingApiKey)));
    }

    #[test]
    #[ignore]
    fn test_live_generate() {
        dotenvy::dotenv().ok();
        let config = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            ..GeminiConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        let reply = client
            .generate("Reply with the JSON object {\"feedback\": \"ok\"}")
            .unwrap();
        assert!(!reply.is_empty());
    }
}
