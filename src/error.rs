// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for Fred
//!
//! This module defines all error types used throughout the application.

use thiserror::Error;

/// Main error type for Fred operations
#[derive(Error, Debug)]
pub enum AgentError {
    /// API-related errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// File manager errors
    #[error("File error: {0}")]
    File(#[from] FileError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// API-specific error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication failed (invalid or missing API key)
    #[error("Authentication failed: invalid or missing API key")]
    AuthenticationFailed,

    /// Rate limited by the API
    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u32),

    /// Timeout waiting for response
    #[error("Request timed out")]
    Timeout,

    /// Invalid response from API
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// API returned an error
    #[error("API error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Unknown provider name in configuration
    #[error("Unknown AI provider: {0}")]
    UnknownProvider(String),
}

/// File manager error types
#[derive(Error, Debug)]
pub enum FileError {
    /// Resolved path escapes the workspace root
    #[error("Path escapes workspace: {0}")]
    PathTraversal(String),

    /// File or directory not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// File already exists and overwrite was not requested
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// File exceeds the configured size limit
    #[error("File too large: {size} bytes exceeds limit of {limit}")]
    TooLarge { size: u64, limit: u64 },

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(String),
}

/// Result type alias for Fred operations
pub type Result<T> = std::result::Result<T, AgentError>;

impl From<serde_yaml::Error> for AgentError {
    fn from(err: serde_yaml::Error) -> Self {
        AgentError::Yaml(err.to_string())
    }
}

impl AgentError {
    /// Stable error-kind string exposed in [`crate::agent::ResultRecord`].
    pub fn kind(&self) -> &'static str {
        match self {
            AgentError::Api(api) => match api {
                ApiError::AuthenticationFailed => "AuthError",
                ApiError::RateLimited(_) => "RateLimitError",
                ApiError::Timeout => "TimeoutError",
                ApiError::InvalidResponse(_) => "InvalidResponseError",
                ApiError::ServerError { .. } => "ProviderError",
                ApiError::UnknownProvider(_) => "UnknownProviderError",
            },
            AgentError::File(file) => match file {
                FileError::PathTraversal(_) => "PathTraversalError",
                FileError::NotFound(_) => "NotFoundError",
                FileError::AlreadyExists(_) => "AlreadyExistsError",
                FileError::TooLarge { .. } => "FileTooLargeError",
                FileError::NotADirectory(_) => "NotADirectoryError",
            },
            AgentError::Config(_) => "ConfigError",
            AgentError::InvalidInput(_) => "InvalidInputError",
            AgentError::Io(_) => "IoError",
            AgentError::Json(_) | AgentError::Yaml(_) => "InvalidResponseError",
            AgentError::Http(e) if e.is_timeout() => "TimeoutError",
            AgentError::Http(_) => "ProviderError",
        }
    }
}
