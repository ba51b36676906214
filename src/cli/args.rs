// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap

use clap::Parser;
use std::path::PathBuf;

use crate::config::Settings;

/// Fred - natural-language file agent for your terminal
#[derive(Parser, Debug)]
#[command(name = "fred")]
#[command(version, about = "Natural-language file agent for your terminal")]
pub struct Cli {
    /// Execute a single command and exit (interactive mode when omitted)
    #[arg(short, long)]
    pub command: Option<String>,

    /// Workspace directory override
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Config file path
    #[arg(short = 'f', long)]
    pub config: Option<PathBuf>,

    /// AI provider override (openai, anthropic, google, deepseek)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model override
    #[arg(short, long)]
    pub model: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Folds CLI overrides into the loaded settings. Flags beat every
    /// configuration layer, including environment variables.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(workspace) = &self.workspace {
            settings.files.workspace = workspace.clone();
        }
        if let Some(provider) = &self.provider {
            settings.ai.default_provider = provider.clone();
        }
        if let Some(model) = &self.model {
            settings.ai.default_model = model.clone();
        }
        if self.verbose {
            settings.logging.level = "debug".to_string();
        }
    }
}
