// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Fred - natural-language file agent.
//!
//! This crate exposes the runtime used by the `fred` CLI (`src/main.rs`):
//! - `interpreter`: rule-table classification of free text into intents
//! - `files`: workspace-confined file operations with backups
//! - `llm`: provider abstraction and vendor adapters
//!   (OpenAI/Anthropic/Google/DeepSeek)
//! - `agent`: the facade that turns one command into one [`ResultRecord`]
//! - `config`: layered settings (env > local secrets > shared file > defaults)

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod interpreter;
pub mod llm;
pub mod repl;

pub use agent::{FileAgent, ResultRecord};
pub use error::{AgentError, Result};
