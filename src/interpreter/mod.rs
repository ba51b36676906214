// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Command interpreter
//!
//! Classifies free-form user text into an [`Intent`] with an ordered rule
//! table. Classification is a pure function of the input text: no
//! configuration, no filesystem, no network. Anything no rule claims falls
//! through to [`Intent::AiChat`] with the raw text.

pub mod rules;

use serde::Serialize;

/// What the user asked for, as understood by the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Intent {
    CreateFile { path: String, content: String },
    ReadFile { path: String },
    DeleteFile { path: String },
    CopyFile { source: String, dest: String },
    CreateDirectory { path: String },
    ListFiles { path: Option<String>, recursive: bool },
    System(SystemCommand),
    /// No file-operation rule matched; hand the text to the AI provider.
    AiChat { prompt: String },
}

/// Built-in commands handled without touching files or providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SystemCommand {
    Help,
    Status,
    Config,
    Exit,
}

/// Classifies `input` into an [`Intent`].
///
/// System commands are matched on the whole (trimmed, lowercased) input.
/// File-operation rules are tried in table order; the first rule whose
/// keywords match and whose extractor finds its arguments wins. A rule
/// whose keywords match but whose arguments are missing does not block
/// later rules.
pub fn classify(input: &str) -> Intent {
    let original = input.trim();
    let lowered = original.to_lowercase();

    if let Some(command) = system_command(&lowered) {
        return Intent::System(command);
    }

    for rule in rules::rules() {
        if let Some(intent) = rule.apply(original, &lowered) {
            return intent;
        }
    }

    Intent::AiChat {
        prompt: original.to_string(),
    }
}

fn system_command(lowered: &str) -> Option<SystemCommand> {
    match lowered {
        "help" | "h" | "帮助" => Some(SystemCommand::Help),
        "status" | "状态" => Some(SystemCommand::Status),
        "config" | "配置" => Some(SystemCommand::Config),
        "exit" | "quit" | "q" | "退出" => Some(SystemCommand::Exit),
        _ => None,
    }
}
