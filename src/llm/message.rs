// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Request and response types shared by all provider adapters.

use serde::{Deserialize, Serialize};

/// A single chat turn sent to a provider.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier in the provider's naming scheme.
    pub model: String,
    /// The user's prompt text.
    pub prompt: String,
    /// Optional system prompt.
    pub system: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            max_tokens: 1000,
            temperature: 0.7,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// The provider's answer, normalized across vendors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant's text.
    pub text: String,
    /// Model that actually served the request.
    pub model: String,
    /// Token accounting when the provider reports it.
    pub usage: Option<Usage>,
}

/// Token usage for one chat turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ChatRequest::new("gpt-4", "hello")
            .with_system("be brief")
            .with_max_tokens(256)
            .with_temperature(0.2);

        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.system.as_deref(), Some("be brief"));
        assert_eq!(request.max_tokens, 256);
        assert!((request.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_usage_total() {
        let usage = Usage {
            prompt_tokens: 12,
            completion_tokens: 30,
        };
        assert_eq!(usage.total_tokens(), 42);
    }
}
