// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Anthropic Claude API provider implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, ApiError, Result};
use crate::llm::message::{ChatRequest, ChatResponse, Usage};
use crate::llm::provider::AiProvider;

use super::{extract_retry_after, http_client, transport_error};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Anthropic Claude provider
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            api_key: api_key.into(),
            base_url: base_url.unwrap_or(ANTHROPIC_API_URL).to_string(),
        })
    }

    fn build_request(request: &ChatRequest) -> AnthropicRequest {
        AnthropicRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system.clone(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
        }
    }

    fn parse_error(status: u16, body: &str, retry_after: Option<u32>) -> AgentError {
        if let Ok(error_response) = serde_json::from_str::<AnthropicError>(body) {
            match error_response.error.error_type.as_str() {
                "authentication_error" => AgentError::Api(ApiError::AuthenticationFailed),
                "rate_limit_error" => {
                    AgentError::Api(ApiError::RateLimited(retry_after.unwrap_or(10)))
                }
                "invalid_request_error" => {
                    AgentError::Api(ApiError::InvalidResponse(error_response.error.message))
                }
                _ => AgentError::Api(ApiError::ServerError {
                    status,
                    message: error_response.error.message,
                }),
            }
        } else {
            match status {
                401 | 403 => AgentError::Api(ApiError::AuthenticationFailed),
                429 => AgentError::Api(ApiError::RateLimited(retry_after.unwrap_or(10))),
                _ => AgentError::Api(ApiError::ServerError {
                    status,
                    message: body.to_string(),
                }),
            }
        }
    }
}

#[async_trait]
impl AiProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn available_models(&self) -> Vec<String> {
        vec![
            "claude-3-5-sonnet-20241022".to_string(),
            "claude-3-opus-20240229".to_string(),
            "claude-3-sonnet-20240229".to_string(),
            "claude-3-haiku-20240307".to_string(),
        ]
    }

    fn default_model(&self) -> &str {
        DEFAULT_MODEL
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let body = Self::build_request(&request);

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
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

        let api_response: AnthropicResponse = response.json().await.map_err(transport_error)?;

        let text = api_response
            .content
            .into_iter()
            .find_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text),
                AnthropicContentBlock::Other => None,
            })
            .ok_or_else(|| {
                AgentError::Api(ApiError::InvalidResponse("no text content".to_string()))
            })?;

        Ok(ChatResponse {
            text,
            model: api_response.model,
            usage: Some(Usage {
                prompt_tokens: api_response.usage.input_tokens,
                completion_tokens: api_response.usage.output_tokens,
            }),
        })
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<AnthropicContentBlock>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text { text: String },
    // Block types this adapter does not consume (tool_use etc.) must not
    // make the whole response undecodable.
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_shape() {
        let request = ChatRequest::new("claude-3-5-sonnet-20241022", "hi").with_system("be brief");
        let body = AnthropicProvider::build_request(&request);

        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].role, "user");
        assert_eq!(body.system.as_deref(), Some("be brief"));
    }

    #[test]
    fn test_parse_typed_auth_error() {
        let body = r#"{"error": {"type": "authentication_error", "message": "bad key"}}"#;
        let err = AnthropicProvider::parse_error(401, body, None);
        assert_eq!(err.kind(), "AuthError");
    }

    #[test]
    fn test_parse_rate_limit_error() {
        let body = r#"{"error": {"type": "rate_limit_error", "message": "slow down"}}"#;
        match AnthropicProvider::parse_error(429, body, Some(5)) {
            AgentError::Api(ApiError::RateLimited(secs)) => assert_eq!(secs, 5),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_unstructured_body_falls_back_to_status() {
        let err = AnthropicProvider::parse_error(403, "forbidden", None);
        assert_eq!(err.kind(), "AuthError");
    }
}
