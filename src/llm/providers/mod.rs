// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Vendor adapters.
//!
//! One file per vendor; each owns its wire format and error mapping.
//! DeepSeek speaks the OpenAI chat-completions dialect and reuses its
//! wire types.

pub mod anthropic;
pub mod deepseek;
pub mod google;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use deepseek::DeepSeekProvider;
pub use google::GoogleProvider;
pub use openai::OpenAiProvider;

use std::time::Duration;

use reqwest::Client;

use crate::error::{AgentError, ApiError, Result};

/// HTTP client with the per-turn timeout applied. Adapters share this so a
/// hung provider cannot stall a turn past `ai.timeout_secs`.
pub(crate) fn http_client(timeout_secs: u64) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Normalizes a transport-level failure. Timeouts and undecodable bodies
/// get their own kinds; everything else passes through as an HTTP error.
pub(crate) fn transport_error(err: reqwest::Error) -> AgentError {
    if err.is_timeout() {
        AgentError::Api(ApiError::Timeout)
    } else if err.is_decode() {
        AgentError::Api(ApiError::InvalidResponse(err.to_string()))
    } else {
        AgentError::Http(err)
    }
}

/// Retry-After header in seconds, numeric form only.
pub(crate) fn extract_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u32> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u32>().ok())
}
