// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! OpenAI chat-completions provider implementation
//!
//! The wire types here are shared with the DeepSeek adapter, which speaks
//! the same dialect.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, ApiError, Result};
use crate::llm::message::{ChatRequest, ChatResponse, Usage};
use crate::llm::provider::AiProvider;

use super::{extract_retry_after, http_client, transport_error};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// OpenAI provider
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            api_key: api_key.into(),
            base_url: base_url.unwrap_or(OPENAI_API_URL).trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn available_models(&self) -> Vec<String> {
        vec![
            "gpt-4".to_string(),
            "gpt-4-turbo-preview".to_string(),
            "gpt-3.5-turbo".to_string(),
            "gpt-3.5-turbo-16k".to_string(),
        ]
    }

    fn default_model(&self) -> &str {
        DEFAULT_MODEL
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        chat_completions(&self.client, &self.base_url, &self.api_key, request).await
    }
}

/// One round trip against a `/chat/completions` endpoint. Shared between
/// the OpenAI and DeepSeek adapters.
pub(crate) async fn chat_completions(
    client: &Client,
    base_url: &str,
    api_key: &str,
    request: ChatRequest,
) -> Result<ChatResponse> {
    let body = build_request(&request);

    let response = client
        .post(format!("{base_url}/chat/completions"))
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .map_err(transport_error)?;

    let status = response.status().as_u16();
    if !response.status().is_success() {
        let retry_after = extract_retry_after(response.headers());
        let body = response.text().await.unwrap_or_default();
        return Err(parse_error(status, &body, retry_after));
    }

    let api_response: CompletionsResponse = response.json().await.map_err(transport_error)?;

    let choice = api_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AgentError::Api(ApiError::InvalidResponse("empty choices".to_string())))?;

    Ok(ChatResponse {
        text: choice.message.content,
        model: api_response.model,
        usage: api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        }),
    })
}

fn build_request(request: &ChatRequest) -> CompletionsRequest {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &request.system {
        messages.push(WireMessage {
            role: "system".to_string(),
            content: system.clone(),
        });
    }
    messages.push(WireMessage {
        role: "user".to_string(),
        content: request.prompt.clone(),
    });

    CompletionsRequest {
        model: request.model.clone(),
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

fn parse_error(status: u16, body: &str, retry_after: Option<u32>) -> AgentError {
    match status {
        401 | 403 => AgentError::Api(ApiError::AuthenticationFailed),
        429 => AgentError::Api(ApiError::RateLimited(retry_after.unwrap_or(10))),
        _ => {
            let message = serde_json::from_str::<ErrorResponse>(body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.to_string());
            AgentError::Api(ApiError::ServerError { status, message })
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionsRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionsResponse {
    model: String,
    choices: Vec<Choice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
