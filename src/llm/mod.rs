// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! LLM provider abstraction and adapters.

pub mod factory;
pub mod message;
pub mod provider;
pub mod providers;

pub use factory::ProviderFactory;
pub use message::{ChatRequest, ChatResponse, Usage};
pub use provider::AiProvider;
