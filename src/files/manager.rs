// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! File manager with workspace confinement.
//!
//! Every operation resolves its path against the workspace root and rejects
//! anything that would land outside it. Destructive operations (overwrite,
//! delete, copy over an existing target) take a timestamped backup first
//! when backups are enabled.

use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::FilesConfig;
use crate::error::{AgentError, FileError, Result};

/// Outcome of a successful file operation.
#[derive(Debug, Clone, Serialize)]
pub struct OpReport {
    /// Human-readable summary, suitable for direct display.
    pub message: String,
    /// Structured data produced by the operation, if any.
    pub payload: Option<Payload>,
    /// Backup file written before a destructive operation.
    pub backup: Option<PathBuf>,
}

impl OpReport {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: None,
            backup: None,
        }
    }

    fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    fn with_backup(mut self, backup: Option<PathBuf>) -> Self {
        self.backup = backup;
        self
    }
}

/// Structured payloads carried by [`OpReport`].
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// File contents returned by a read.
    Content(String),
    /// Directory entries returned by a listing.
    Listing(Vec<EntryInfo>),
}

/// One entry in a directory listing.
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    /// Name of the entry (final path component).
    pub name: String,
    /// Path relative to the workspace root.
    pub path: PathBuf,
    /// Size in bytes, `None` for directories.
    pub size: Option<u64>,
    pub is_dir: bool,
    pub modified: Option<DateTime<Utc>>,
}

/// Performs file operations confined to a workspace directory.
pub struct FileManager {
    workspace: PathBuf,
    backup_enabled: bool,
    backup_dir: PathBuf,
    max_file_bytes: u64,
}

impl FileManager {
    /// Creates a manager rooted at the configured workspace, creating the
    /// workspace directory if it does not exist yet.
    pub fn new(config: &FilesConfig) -> Result<Self> {
        fs::create_dir_all(&config.workspace)?;
        let workspace = config.workspace.canonicalize()?;

        Ok(Self {
            workspace,
            backup_enabled: config.backup_enabled,
            backup_dir: config.backup_dir.clone(),
            max_file_bytes: config.max_file_size_mb * 1024 * 1024,
        })
    }

    /// The canonical workspace root.
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Writes `content` to `path`. Fails with `AlreadyExists` when the file
    /// exists and `overwrite` is false; otherwise an existing file is backed
    /// up before being replaced.
    pub fn create(&self, path: &str, content: &str, overwrite: bool) -> Result<OpReport> {
        let target = self.resolve(path)?;

        if content.len() as u64 > self.max_file_bytes {
            return Err(FileError::TooLarge {
                size: content.len() as u64,
                limit: self.max_file_bytes,
            }
            .into());
        }

        let existed = target.exists();
        if existed && !overwrite {
            return Err(FileError::AlreadyExists(path.to_string()).into());
        }

        let backup = if existed { self.backup(&target)? } else { None };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)?;
        info!(path = %target.display(), bytes = content.len(), "file written");

        let verb = if existed { "Overwrote" } else { "Created" };
        Ok(
            OpReport::new(format!("{} file '{}' ({} bytes)", verb, path, content.len()))
                .with_backup(backup),
        )
    }

    /// Reads a file and returns its contents.
    pub fn read(&self, path: &str) -> Result<OpReport> {
        let target = self.resolve(path)?;

        if !target.is_file() {
            return Err(FileError::NotFound(path.to_string()).into());
        }

        let size = target.metadata()?.len();
        if size > self.max_file_bytes {
            return Err(FileError::TooLarge {
                size,
                limit: self.max_file_bytes,
            }
            .into());
        }

        let content = fs::read_to_string(&target)?;
        debug!(path = %target.display(), bytes = size, "file read");

        Ok(OpReport::new(format!("Read file '{}' ({} bytes)", path, size))
            .with_payload(Payload::Content(content)))
    }

    /// Deletes a file, taking a backup first when backups are enabled.
    pub fn delete(&self, path: &str) -> Result<OpReport> {
        let target = self.resolve(path)?;

        if !target.is_file() {
            return Err(FileError::NotFound(path.to_string()).into());
        }

        let backup = self.backup(&target)?;
        fs::remove_file(&target)?;
        info!(path = %target.display(), "file deleted");

        Ok(OpReport::new(format!("Deleted file '{}'", path)).with_backup(backup))
    }

    /// Copies `source` to `dest`. An existing destination is backed up
    /// before being replaced.
    pub fn copy_file(&self, source: &str, dest: &str) -> Result<OpReport> {
        let from = self.resolve(source)?;
        let to = self.resolve(dest)?;

        if !from.is_file() {
            return Err(FileError::NotFound(source.to_string()).into());
        }

        let size = from.metadata()?.len();
        if size > self.max_file_bytes {
            return Err(FileError::TooLarge {
                size,
                limit: self.max_file_bytes,
            }
            .into());
        }

        let backup = if to.exists() { self.backup(&to)? } else { None };

        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&from, &to)?;
        info!(from = %from.display(), to = %to.display(), "file copied");

        Ok(
            OpReport::new(format!("Copied '{}' to '{}' ({} bytes)", source, dest, size))
                .with_backup(backup),
        )
    }

    /// Creates a directory (and any missing parents). Creating a directory
    /// that already exists succeeds.
    pub fn make_directory(&self, path: &str) -> Result<OpReport> {
        let target = self.resolve(path)?;

        if target.is_file() {
            return Err(FileError::NotADirectory(path.to_string()).into());
        }

        let existed = target.is_dir();
        fs::create_dir_all(&target)?;

        let message = if existed {
            format!("Directory '{}' already exists", path)
        } else {
            info!(path = %target.display(), "directory created");
            format!("Created directory '{}'", path)
        };
        Ok(OpReport::new(message))
    }

    /// Lists entries under `path` (the workspace root when `None`), filtered
    /// by an optional glob pattern on entry names. Recursive listings walk
    /// the whole subtree. Results are sorted by relative path.
    pub fn list(&self, path: Option<&str>, pattern: Option<&str>, recursive: bool) -> Result<OpReport> {
        let raw = path.unwrap_or(".");
        let target = self.resolve(raw)?;

        if !target.exists() {
            return Err(FileError::NotFound(raw.to_string()).into());
        }
        if !target.is_dir() {
            return Err(FileError::NotADirectory(raw.to_string()).into());
        }

        let matcher = match pattern {
            Some(p) => Some(
                glob::Pattern::new(p)
                    .map_err(|e| AgentError::InvalidInput(format!("invalid pattern '{}': {}", p, e)))?,
            ),
            None => None,
        };

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut entries = Vec::new();
        for entry in WalkDir::new(&target).min_depth(1).max_depth(max_depth) {
            let entry = entry.map_err(|e| AgentError::InvalidInput(e.to_string()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(m) = &matcher {
                if !m.matches(&name) {
                    continue;
                }
            }

            let meta = entry.metadata().ok();
            let is_dir = entry.file_type().is_dir();
            entries.push(EntryInfo {
                name,
                path: entry
                    .path()
                    .strip_prefix(&self.workspace)
                    .unwrap_or(entry.path())
                    .to_path_buf(),
                size: meta.as_ref().filter(|_| !is_dir).map(|m| m.len()),
                is_dir,
                modified: meta.and_then(|m| m.modified().ok()).map(DateTime::from),
            });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(
            OpReport::new(format!("Listed {} entries under '{}'", entries.len(), raw))
                .with_payload(Payload::Listing(entries)),
        )
    }

    /// Resolves a user-supplied path against the workspace root, rejecting
    /// anything that would escape it. Resolution is lexical: `..` components
    /// are folded before comparison so traversal is caught even when the
    /// target does not exist.
    fn resolve(&self, raw: &str) -> Result<PathBuf> {
        let candidate = Path::new(raw);
        let joined = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.workspace.join(candidate)
        };

        let mut resolved = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if !resolved.pop() {
                        return Err(FileError::PathTraversal(raw.to_string()).into());
                    }
                }
                other => resolved.push(other),
            }
        }

        if !resolved.starts_with(&self.workspace) {
            return Err(FileError::PathTraversal(raw.to_string()).into());
        }
        Ok(resolved)
    }

    /// Copies `target` into the backup directory as
    /// `{name}.{YYYYmmdd_HHMMSS}.bak`. Returns `None` when backups are
    /// disabled.
    fn backup(&self, target: &Path) -> Result<Option<PathBuf>> {
        if !self.backup_enabled {
            return Ok(None);
        }

        fs::create_dir_all(&self.backup_dir)?;
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let backup_path = self.backup_dir.join(format!("{}.{}.bak", name, stamp));

        fs::copy(target, &backup_path)?;
        debug!(backup = %backup_path.display(), "backup written");
        Ok(Some(backup_path))
    }
}
