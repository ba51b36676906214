// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! The provider trait every vendor adapter implements.

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::message::{ChatRequest, ChatResponse};

/// A chat-capable LLM provider.
///
/// Adapters own their endpoint, headers, and wire format; callers only see
/// [`ChatRequest`] and [`ChatResponse`]. Adapters do not retry: transport
/// and API failures surface as normalized `ApiError`s after a single
/// attempt.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Provider name as used in configuration ("openai", "anthropic", ...).
    fn name(&self) -> &str;

    /// Models this adapter knows how to drive.
    fn available_models(&self) -> Vec<String>;

    /// Model the adapter falls back to when the configured one is unknown.
    fn default_model(&self) -> &str;

    fn supports_model(&self, model: &str) -> bool {
        self.available_models().iter().any(|m| m == model)
    }

    /// Sends one chat turn and awaits the full answer.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}

impl std::fmt::Debug for dyn AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiProvider")
            .field("name", &self.name())
            .finish()
    }
}
