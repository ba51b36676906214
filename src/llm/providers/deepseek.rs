// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! DeepSeek provider implementation
//!
//! DeepSeek exposes an OpenAI-compatible chat-completions API, so this
//! adapter only supplies its own endpoint and model list.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::llm::message::{ChatRequest, ChatResponse};
use crate::llm::provider::AiProvider;

use super::openai::chat_completions;
use super::http_client;

const DEEPSEEK_API_URL: &str = "https://api.deepseek.com";
const DEFAULT_MODEL: &str = "deepseek-chat";

/// DeepSeek provider
pub struct DeepSeekProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl DeepSeekProvider {
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or(DEEPSEEK_API_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait]
impl AiProvider for DeepSeekProvider {
    fn name(&self) -> &str {
        "deepseek"
    }

    fn available_models(&self) -> Vec<String> {
        vec!["deepseek-chat".to_string(), "deepseek-coder".to_string()]
    }

    fn default_model(&self) -> &str {
        DEFAULT_MODEL
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        chat_completions(&self.client, &self.base_url, &self.api_key, request).await
    }
}
