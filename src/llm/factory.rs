// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Maps provider names to adapter instances.

use std::sync::Arc;

use tracing::debug;

use crate::config::Settings;
use crate::error::{ApiError, Result};
use crate::llm::provider::AiProvider;
use crate::llm::providers::{AnthropicProvider, DeepSeekProvider, GoogleProvider, OpenAiProvider};

/// Provider names the factory can resolve.
pub const SUPPORTED_PROVIDERS: [&str; 4] = ["openai", "anthropic", "google", "deepseek"];

/// Creates provider adapters from settings.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Resolves `name` to an adapter. Unknown names fail with
    /// `UnknownProvider`; a known provider without a usable API key fails
    /// with `AuthenticationFailed`.
    pub fn create(name: &str, settings: &Settings) -> Result<Arc<dyn AiProvider>> {
        if !SUPPORTED_PROVIDERS.contains(&name) {
            return Err(ApiError::UnknownProvider(name.to_string()).into());
        }

        let api_key = settings
            .resolve_api_key(name)
            .ok_or(ApiError::AuthenticationFailed)?;
        let timeout_secs = settings.ai.timeout_secs;
        debug!(provider = name, "creating provider adapter");

        let provider: Arc<dyn AiProvider> = match name {
            "openai" => Arc::new(OpenAiProvider::new(
                api_key,
                settings.providers.openai.base_url.as_deref(),
                timeout_secs,
            )?),
            "anthropic" => Arc::new(AnthropicProvider::new(
                api_key,
                settings.providers.anthropic.base_url.as_deref(),
                timeout_secs,
            )?),
            "google" => Arc::new(GoogleProvider::new(
                api_key,
                settings.providers.google.base_url.as_deref(),
                timeout_secs,
            )?),
            "deepseek" => Arc::new(DeepSeekProvider::new(
                api_key,
                settings.providers.deepseek.base_url.as_deref(),
                timeout_secs,
            )?),
            _ => unreachable!("checked against SUPPORTED_PROVIDERS"),
        };
        Ok(provider)
    }
}
