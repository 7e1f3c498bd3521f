//! Q&A connector over the Gemini generateContent API

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::prompt::{build_prompt, parse_reply};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Error types for Q&A operations.
#[derive(Debug, thiserror::Error)]
pub enum QaError {
    /// Upstream rejected the request
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Upstream returned no usable answer
    #[error("Empty reply from model")]
    EmptyReply,
}

/// A parsed answer from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaResponse {
    /// Answer text, grounded in the supplied document
    pub answer: String,
    /// Short topic label the model assigned to the question
    pub topic: String,
    /// Round-trip latency of the upstream call
    pub latency_ms: i32,
}

/// Core trait for document Q&A backends.
///
/// Abstracts the upstream model so handlers can be exercised against a stub.
#[async_trait]
pub trait QaClient: Send + Sync {
    /// Model identifier recorded alongside each answered question.
    fn model(&self) -> &str;

    /// Answer a question grounded in the given document text.
    async fn ask(&self, document_text: &str, question: &str) -> Result<QaResponse, QaError>;
}

/// Gemini-backed Q&A client.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client for the hosted Gemini API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_MODEL, api_key)
    }

    /// Create a client against a custom endpoint (used by tests and proxies).
    pub fn with_base_url(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

/// generateContent request body.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

/// generateContent response body.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[async_trait]
impl QaClient for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn ask(&self, document_text: &str, question: &str) -> Result<QaResponse, QaError> {
        let prompt = build_prompt(document_text, question);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let started = Instant::now();

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| QaError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(QaError::RequestFailed(format!("HTTP {}: {}", status, body)));
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| QaError::ParseError(e.to_string()))?;

        let latency_ms = started.elapsed().as_millis() as i32;

        let reply = generate_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(QaError::EmptyReply)?;

        if reply.trim().is_empty() {
            return Err(QaError::EmptyReply);
        }

        let (answer, topic) = parse_reply(&reply);

        Ok(QaResponse {
            answer,
            topic,
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url_includes_model_and_key() {
        let client = GeminiClient::with_base_url("http://localhost:9900/v1beta", "gemini-2.5-flash", "k123");
        assert_eq!(
            client.generate_url(),
            "http://localhost:9900/v1beta/models/gemini-2.5-flash:generateContent?key=k123"
        );
        assert_eq!(client.model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_default_model() {
        let client = GeminiClient::new("key");
        assert_eq!(client.model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_response_deserializes() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "ANSWER: Yes.\nTOPIC: Policies"}]}}
            ]
        }"#;

        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(
            parsed.candidates[0].content.parts[0].text,
            "ANSWER: Yes.\nTOPIC: Policies"
        );
    }

    #[test]
    fn test_empty_candidates_deserialize() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
