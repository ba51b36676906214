// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! The agent facade.
//!
//! [`FileAgent::execute`] takes one line of user text and always returns a
//! [`ResultRecord`]; failures from the interpreter, file manager, or
//! provider adapters are folded into the record instead of propagating.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{AgentError, Result};
use crate::files::{FileManager, OpReport};
use crate::interpreter::{self, Intent, SystemCommand};
use crate::llm::{AiProvider, ChatRequest, ProviderFactory};

/// System prompt for chat turns that fall through to the provider.
const SYSTEM_PROMPT: &str = "You are a file management assistant. You help users \
create, read, copy, delete and list files inside their workspace, and answer \
general questions. Reply in the language the user writes in.";

/// Uniform outcome of one executed command.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    pub success: bool,
    pub message: String,
    /// Structured data (file content, listing, chat metadata).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    /// Stable error kind string, set when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl ResultRecord {
    fn ok(message: impl Into<String>, payload: Option<serde_json::Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload,
            error_kind: None,
        }
    }

    fn failure(err: &AgentError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            payload: None,
            error_kind: Some(err.kind().to_string()),
        }
    }

    fn from_report(report: OpReport) -> Self {
        let payload = report
            .payload
            .as_ref()
            .and_then(|p| serde_json::to_value(p).ok());
        Self::ok(report.message, payload)
    }
}

/// Snapshot of the agent's effective configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AgentStatus {
    pub provider: String,
    pub model: String,
    pub workspace: PathBuf,
    pub backup_enabled: bool,
}

/// Executes natural-language commands against the workspace and, when
/// nothing matches, the configured AI provider.
pub struct FileAgent {
    settings: Settings,
    files: FileManager,
    // Resolved on the first chat turn so file operations work without a key.
    provider: OnceLock<Arc<dyn AiProvider>>,
}

impl FileAgent {
    pub fn new(settings: Settings) -> Result<Self> {
        let files = FileManager::new(&settings.files)?;
        Ok(Self {
            settings,
            files,
            provider: OnceLock::new(),
        })
    }

    /// Executes one command. Never returns an error: anything that goes
    /// wrong becomes a failed [`ResultRecord`].
    pub async fn execute(&self, command: &str) -> ResultRecord {
        let intent = interpreter::classify(command);
        debug!(?intent, "command classified");

        match self.dispatch(intent).await {
            Ok(record) => record,
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "command failed");
                ResultRecord::failure(&err)
            }
        }
    }

    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            provider: self.settings.ai.default_provider.clone(),
            model: self.settings.ai.default_model.clone(),
            workspace: self.files.workspace().to_path_buf(),
            backup_enabled: self.settings.files.backup_enabled,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    async fn dispatch(&self, intent: Intent) -> Result<ResultRecord> {
        match intent {
            Intent::CreateFile { path, content } => {
                // Interpreted creates overwrite; the prior content is backed
                // up by the file manager when backups are on.
                let report = self.files.create(&path, &content, true)?;
                Ok(ResultRecord::from_report(report))
            }
            Intent::ReadFile { path } => Ok(ResultRecord::from_report(self.files.read(&path)?)),
            Intent::DeleteFile { path } => {
                Ok(ResultRecord::from_report(self.files.delete(&path)?))
            }
            Intent::CopyFile { source, dest } => {
                Ok(ResultRecord::from_report(self.files.copy_file(&source, &dest)?))
            }
            Intent::CreateDirectory { path } => {
                Ok(ResultRecord::from_report(self.files.make_directory(&path)?))
            }
            Intent::ListFiles { path, recursive } => Ok(ResultRecord::from_report(
                self.files.list(path.as_deref(), None, recursive)?,
            )),
            Intent::System(command) => Ok(self.system(command)),
            Intent::AiChat { prompt } => self.chat(prompt).await,
        }
    }

    fn system(&self, command: SystemCommand) -> ResultRecord {
        match command {
            SystemCommand::Help => ResultRecord::ok(HELP_TEXT, None),
            SystemCommand::Status => {
                let status = self.status();
                let message = format!(
                    "provider: {} | model: {} | workspace: {} | backups: {}",
                    status.provider,
                    status.model,
                    status.workspace.display(),
                    if status.backup_enabled { "on" } else { "off" },
                );
                ResultRecord::ok(message, serde_json::to_value(&status).ok())
            }
            SystemCommand::Config => {
                let message = format!(
                    "provider: {}\nmodel: {}\nmax_tokens: {}\ntemperature: {}\ntimeout: {}s\n\
                     workspace: {}\nmax_file_size: {} MB\nbackups: {} ({})",
                    self.settings.ai.default_provider,
                    self.settings.ai.default_model,
                    self.settings.ai.max_tokens,
                    self.settings.ai.temperature,
                    self.settings.ai.timeout_secs,
                    self.settings.files.workspace.display(),
                    self.settings.files.max_file_size_mb,
                    if self.settings.files.backup_enabled {
                        "on"
                    } else {
                        "off"
                    },
                    self.settings.files.backup_dir.display(),
                );
                ResultRecord::ok(message, None)
            }
            SystemCommand::Exit => ResultRecord::ok("Bye.", None),
        }
    }

    async fn chat(&self, prompt: String) -> Result<ResultRecord> {
        let provider = self.provider()?;

        let mut model = self.settings.ai.default_model.clone();
        if !provider.supports_model(&model) {
            warn!(
                configured = %model,
                fallback = provider.default_model(),
                "configured model not supported, using provider default"
            );
            model = provider.default_model().to_string();
        }

        let request = ChatRequest::new(model, prompt)
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(self.settings.ai.max_tokens)
            .with_temperature(self.settings.ai.temperature);

        let response = provider.chat(request).await?;
        info!(
            provider = provider.name(),
            model = %response.model,
            tokens = response.usage.map(|u| u.total_tokens()).unwrap_or(0),
            "chat turn complete"
        );

        let payload = serde_json::json!({
            "provider": provider.name(),
            "model": response.model,
            "usage": response.usage,
        });
        Ok(ResultRecord::ok(response.text, Some(payload)))
    }

    /// The adapter for the configured provider, created on first use.
    fn provider(&self) -> Result<Arc<dyn AiProvider>> {
        if let Some(provider) = self.provider.get() {
            return Ok(provider.clone());
        }
        let provider =
            ProviderFactory::create(&self.settings.ai.default_provider, &self.settings)?;
        let _ = self.provider.set(provider.clone());
        Ok(provider)
    }
}

const HELP_TEXT: &str = "\
Commands are plain language, for example:
  创建一个名为\"test.txt\"的文件，内容是\"Hello\"
  create a file \"notes.md\" with content \"draft\"
  读取\"test.txt\" / show me \"notes.md\"
  复制\"a.txt\"到\"b.txt\" / copy \"a.txt\" to \"b.txt\"
  删除\"old.log\" / delete \"old.log\"
  列出所有文件 / list files (add 递归/recursively for subdirectories)
  创建\"docs\"文件夹 / create a directory \"docs\"

Anything else is sent to the AI provider.

System commands: help, status, config, exit";
