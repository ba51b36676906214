// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Google Gemini API provider implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, ApiError, Result};
use crate::llm::message::{ChatRequest, ChatResponse, Usage};
use crate::llm::provider::AiProvider;

use super::{extract_retry_after, http_client, transport_error};

const GOOGLE_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-pro";

/// Google Gemini provider
pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleProvider {
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            api_key: api_key.into(),
            base_url: base_url.unwrap_or(GOOGLE_API_URL).trim_end_matches('/').to_string(),
        })
    }

    fn build_request(request: &ChatRequest) -> GenerateContentRequest {
        // Gemini has no dedicated system role on this endpoint; fold the
        // system prompt into the user text.
        let text = match &request.system {
            Some(system) => format!("{system}\n\n{}", request.prompt),
            None => request.prompt.clone(),
        };

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        }
    }

    fn parse_error(status: u16, body: &str, retry_after: Option<u32>) -> AgentError {
        match status {
            400 if body.contains("API_KEY_INVALID") => {
                AgentError::Api(ApiError::AuthenticationFailed)
            }
            401 | 403 => AgentError::Api(ApiError::AuthenticationFailed),
            429 => AgentError::Api(ApiError::RateLimited(retry_after.unwrap_or(10))),
            _ => {
                let message = serde_json::from_str::<GoogleError>(body)
                    .map(|e| e.error.message)
                    .unwrap_or_else(|_| body.to_string());
                AgentError::Api(ApiError::ServerError { status, message })
            }
        }
    }
}

#[async_trait]
impl AiProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn available_models(&self) -> Vec<String> {
        vec!["gemini-pro".to_string(), "gemini-pro-vision".to_string()]
    }

    fn default_model(&self) -> &str {
        DEFAULT_MODEL
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let model = request.model.clone();
        let body = Self::build_request(&request);

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let retry_after = extract_retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status, &body, retry_after));
        }

        let api_response: GenerateContentResponse =
            response.json().await.map_err(transport_error)?;

        let text = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                AgentError::Api(ApiError::InvalidResponse("no candidates".to_string()))
            })?;

        Ok(ChatResponse {
            text,
            model,
            usage: api_response.usage_metadata.map(|u| Usage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
            }),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}
