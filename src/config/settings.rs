// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for Fred
//!
//! Settings are merged from three layers, highest precedence first:
//! process environment variables, the local secrets file
//! (`config.local.yaml`, next to the shared file), and the shared config
//! file (`config.yaml`). Anything unset falls back to built-in defaults.
//! The merged result is immutable for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Name of the local secrets overlay, resolved next to the shared file.
const LOCAL_OVERLAY: &str = "config.local.yaml";

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// AI defaults for chat turns
    #[serde(default)]
    pub ai: AiConfig,

    /// File manager configuration
    #[serde(default, alias = "file_manager")]
    pub files: FilesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Per-provider configurations
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// AI defaults applied to every chat turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Active provider: openai, anthropic, google, or deepseek
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model (falls back to the provider default if unsupported)
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum tokens for a response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// HTTP timeout for a single chat turn, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// File manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Workspace root; every operation must resolve beneath it
    #[serde(default = "default_workspace", alias = "default_workspace")]
    pub workspace: PathBuf,

    /// Maximum file size in megabytes for create/read
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Copy files to the backup directory before destructive operations
    #[serde(default = "default_true")]
    pub backup_enabled: bool,

    /// Where backup copies land
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Optional log file; console output when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Configuration for AI providers
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    /// OpenAI configuration
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Anthropic Claude configuration
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Google Gemini configuration
    #[serde(default)]
    pub google: GoogleConfig,

    /// DeepSeek configuration (OpenAI-compatible API)
    #[serde(default)]
    pub deepseek: DeepSeekConfig,
}

/// OpenAI-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key (if stored directly, not recommended outside config.local.yaml)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name for the API key
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,

    /// Default model to use
    #[serde(default = "default_openai_model")]
    pub default_model: String,

    /// Base URL for API (for custom endpoints)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Anthropic-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// API key (if stored directly, not recommended outside config.local.yaml)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name for the API key
    #[serde(default = "default_anthropic_api_key_env")]
    pub api_key_env: String,

    /// Default model to use
    #[serde(default = "default_anthropic_model")]
    pub default_model: String,

    /// Base URL for API (for custom endpoints)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Google Gemini configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// API key (if stored directly, not recommended outside config.local.yaml)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name for the API key
    #[serde(default = "default_google_api_key_env")]
    pub api_key_env: String,

    /// Default model to use
    #[serde(default = "default_google_model")]
    pub default_model: String,

    /// Base URL for API (for custom endpoints)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// DeepSeek configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepSeekConfig {
    /// API key (if stored directly, not recommended outside config.local.yaml)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name for the API key
    #[serde(default = "default_deepseek_api_key_env")]
    pub api_key_env: String,

    /// Default model to use
    #[serde(default = "default_deepseek_model")]
    pub default_model: String,

    /// Base URL for API (for custom endpoints)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

// Default value functions

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_workspace() -> PathBuf {
    PathBuf::from("./workspace")
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("./backups")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_anthropic_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_google_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_google_model() -> String {
    "gemini-pro".to_string()
}

fn default_deepseek_api_key_env() -> String {
    "DEEPSEEK_API_KEY".to_string()
}

fn default_deepseek_model() -> String {
    "deepseek-chat".to_string()
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            workspace: default_workspace(),
            max_file_size_mb: default_max_file_size_mb(),
            backup_enabled: true,
            backup_dir: default_backup_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_openai_api_key_env(),
            default_model: default_openai_model(),
            base_url: None,
        }
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_anthropic_api_key_env(),
            default_model: default_anthropic_model(),
            base_url: None,
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_google_api_key_env(),
            default_model: default_google_model(),
            base_url: None,
        }
    }
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_deepseek_api_key_env(),
            default_model: default_deepseek_model(),
            base_url: None,
        }
    }
}

impl Settings {
    /// Get the default shared config path (./config.yaml).
    pub fn default_path() -> PathBuf {
        PathBuf::from("config.yaml")
    }

    /// Load settings from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from a specific shared config path.
    ///
    /// The local secrets overlay (`config.local.yaml`, in the same
    /// directory) is deep-merged over the shared file before
    /// deserialization, and environment variables are applied last.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut merged = read_yaml_value(path)?;

        let local_path = path
            .parent()
            .map(|p| p.join(LOCAL_OVERLAY))
            .unwrap_or_else(|| PathBuf::from(LOCAL_OVERLAY));
        let local = read_yaml_value(&local_path)?;
        merged = deep_merge(merged, local);

        let mut settings: Settings = if merged.is_null() {
            Settings::default()
        } else {
            serde_yaml::from_value(merged)?
        };

        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Apply environment variable overrides, the highest-precedence layer.
    ///
    /// Keys follow the dotted config name uppercased with underscores,
    /// e.g. `ai.default_provider` becomes `AI_DEFAULT_PROVIDER`.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// The override logic behind [`Self::apply_env_overrides`], with the
    /// variable lookup injected so tests need not mutate the process
    /// environment.
    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("AI_DEFAULT_PROVIDER") {
            self.ai.default_provider = v;
        }
        if let Some(v) = lookup("AI_DEFAULT_MODEL") {
            self.ai.default_model = v;
        }
        if let Some(v) = lookup("AI_MAX_TOKENS") {
            match v.parse() {
                Ok(n) => self.ai.max_tokens = n,
                Err(_) => tracing::warn!("ignoring unparsable AI_MAX_TOKENS: {v}"),
            }
        }
        if let Some(v) = lookup("AI_TEMPERATURE") {
            match v.parse() {
                Ok(t) => self.ai.temperature = t,
                Err(_) => tracing::warn!("ignoring unparsable AI_TEMPERATURE: {v}"),
            }
        }
        if let Some(v) = lookup("FILE_MANAGER_DEFAULT_WORKSPACE") {
            self.files.workspace = PathBuf::from(v);
        }
        if let Some(v) = lookup("FILE_MANAGER_MAX_FILE_SIZE_MB") {
            match v.parse() {
                Ok(n) => self.files.max_file_size_mb = n,
                Err(_) => tracing::warn!("ignoring unparsable FILE_MANAGER_MAX_FILE_SIZE_MB: {v}"),
            }
        }
        if let Some(v) = lookup("FILE_MANAGER_BACKUP_ENABLED") {
            self.files.backup_enabled = matches!(v.as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(v) = lookup("FILE_MANAGER_BACKUP_DIR") {
            self.files.backup_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("LOGGING_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("LOGGING_FILE") {
            self.logging.file = Some(PathBuf::from(v));
        }
    }

    /// Resolve the API key for a provider: environment variable first,
    /// then the key stored in configuration (usually the local overlay).
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        let (env_name, stored) = match provider {
            "openai" => (
                self.providers.openai.api_key_env.as_str(),
                self.providers.openai.api_key.as_ref(),
            ),
            "anthropic" => (
                self.providers.anthropic.api_key_env.as_str(),
                self.providers.anthropic.api_key.as_ref(),
            ),
            "google" => (
                self.providers.google.api_key_env.as_str(),
                self.providers.google.api_key.as_ref(),
            ),
            "deepseek" => (
                self.providers.deepseek.api_key_env.as_str(),
                self.providers.deepseek.api_key.as_ref(),
            ),
            _ => return None,
        };

        if let Ok(key) = std::env::var(env_name) {
            if !key.is_empty() && !key.starts_with("your_") {
                return Some(key);
            }
        }

        stored
            .filter(|k| !k.is_empty() && !k.starts_with("your_"))
            .cloned()
    }

    /// Validate the merged settings, returning a list of issues.
    /// An empty list means the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let provider = self.ai.default_provider.as_str();
        if !crate::llm::factory::SUPPORTED_PROVIDERS.contains(&provider) {
            issues.push(format!("Invalid AI provider: {provider}"));
        } else if self.resolve_api_key(provider).is_none() {
            issues.push(format!("Missing API key for provider: {provider}"));
        }

        if self.files.max_file_size_mb == 0 {
            issues.push("file_manager.max_file_size_mb must be at least 1".to_string());
        }

        issues
    }
}

/// Read a YAML file into a value, treating a missing file as null.
fn read_yaml_value(path: &Path) -> Result<serde_yaml::Value> {
    if !path.exists() {
        return Ok(serde_yaml::Value::Null);
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(serde_yaml::Value::Null);
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Deep-merge two YAML values; `overlay` wins on conflicts.
fn deep_merge(base: serde_yaml::Value, overlay: serde_yaml::Value) -> serde_yaml::Value {
    use serde_yaml::Value;

    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Mapping(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.ai.default_provider, "openai");
        assert_eq!(settings.ai.max_tokens, 1000);
        assert_eq!(settings.ai.timeout_secs, 30);
        assert_eq!(settings.files.max_file_size_mb, 10);
        assert!(settings.files.backup_enabled);
    }

    #[test]
    fn test_provider_config_defaults() {
        let providers = ProvidersConfig::default();
        assert_eq!(providers.openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(providers.anthropic.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(providers.google.default_model, "gemini-pro");
        assert_eq!(providers.deepseek.default_model, "deepseek-chat");
        assert!(providers.deepseek.api_key.is_none());
    }

    #[test]
    fn test_load_from_nonexistent_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.yaml");

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.ai.default_provider, "openai");
    }

    #[test]
    fn test_load_shared_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "ai:\n  default_provider: anthropic\n  max_tokens: 512\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.ai.default_provider, "anthropic");
        assert_eq!(settings.ai.max_tokens, 512);
        // Unset keys keep their defaults
        assert!((settings.ai.temperature - 0.7).abs() < 0.001);
    }

    #[test]
    fn test_local_overlay_wins_over_shared() {
        let temp_dir = TempDir::new().unwrap();
        let shared = temp_dir.path().join("config.yaml");
        std::fs::write(
            &shared,
            "ai:\n  default_provider: openai\n  default_model: gpt-4\n",
        )
        .unwrap();
        std::fs::write(
            temp_dir.path().join("config.local.yaml"),
            "ai:\n  default_provider: deepseek\nproviders:\n  deepseek:\n    api_key: sk-local\n",
        )
        .unwrap();

        let settings = Settings::load_from(&shared).unwrap();
        // Overlay overrides the provider but leaves the model from the shared layer
        assert_eq!(settings.ai.default_provider, "deepseek");
        assert_eq!(settings.ai.default_model, "gpt-4");
        assert_eq!(settings.providers.deepseek.api_key.as_deref(), Some("sk-local"));
    }

    #[test]
    fn test_env_layer_beats_both_yaml_layers() {
        let temp_dir = TempDir::new().unwrap();
        let shared = temp_dir.path().join("config.yaml");
        std::fs::write(&shared, "ai:\n  default_provider: openai\n").unwrap();
        std::fs::write(
            temp_dir.path().join("config.local.yaml"),
            "ai:\n  default_provider: anthropic\n",
        )
        .unwrap();

        let mut settings = Settings::load_from(&shared).unwrap();
        settings.apply_overrides_from(|name| match name {
            "AI_DEFAULT_PROVIDER" => Some("deepseek".to_string()),
            _ => None,
        });

        assert_eq!(settings.ai.default_provider, "deepseek");
    }

    #[test]
    fn test_env_overrides_every_documented_key() {
        let vars: &[(&str, &str)] = &[
            ("AI_DEFAULT_PROVIDER", "google"),
            ("AI_DEFAULT_MODEL", "gemini-pro"),
            ("AI_MAX_TOKENS", "64"),
            ("AI_TEMPERATURE", "0.1"),
            ("FILE_MANAGER_DEFAULT_WORKSPACE", "/tmp/env-ws"),
            ("FILE_MANAGER_MAX_FILE_SIZE_MB", "3"),
            ("FILE_MANAGER_BACKUP_ENABLED", "false"),
            ("FILE_MANAGER_BACKUP_DIR", "/tmp/env-bak"),
            ("LOGGING_LEVEL", "trace"),
            ("LOGGING_FILE", "/tmp/env.log"),
        ];

        let mut settings = Settings::default();
        settings.apply_overrides_from(|name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        });

        assert_eq!(settings.ai.default_provider, "google");
        assert_eq!(settings.ai.default_model, "gemini-pro");
        assert_eq!(settings.ai.max_tokens, 64);
        assert!((settings.ai.temperature - 0.1).abs() < 0.001);
        assert_eq!(settings.files.workspace, PathBuf::from("/tmp/env-ws"));
        assert_eq!(settings.files.max_file_size_mb, 3);
        assert!(!settings.files.backup_enabled);
        assert_eq!(settings.files.backup_dir, PathBuf::from("/tmp/env-bak"));
        assert_eq!(settings.logging.level, "trace");
        assert_eq!(settings.logging.file, Some(PathBuf::from("/tmp/env.log")));
    }

    #[test]
    fn test_unparsable_numeric_override_is_ignored() {
        let mut settings = Settings::default();
        settings.apply_overrides_from(|name| {
            (name == "AI_MAX_TOKENS").then(|| "lots".to_string())
        });
        assert_eq!(settings.ai.max_tokens, 1000);
    }

    #[test]
    fn test_deep_merge_nested_maps() {
        let base: serde_yaml::Value =
            serde_yaml::from_str("a:\n  x: 1\n  y: 2\nb: keep").unwrap();
        let overlay: serde_yaml::Value = serde_yaml::from_str("a:\n  y: 3\nc: new").unwrap();

        let merged = deep_merge(base, overlay);
        assert_eq!(merged["a"]["x"], serde_yaml::Value::from(1));
        assert_eq!(merged["a"]["y"], serde_yaml::Value::from(3));
        assert_eq!(merged["b"], serde_yaml::Value::from("keep"));
        assert_eq!(merged["c"], serde_yaml::Value::from("new"));
    }

    #[test]
    fn test_resolve_api_key_from_stored() {
        let mut settings = Settings::default();
        settings.providers.deepseek.api_key = Some("sk-stored".to_string());
        settings.providers.deepseek.api_key_env = "FRED_TEST_UNSET_ENV_VAR".to_string();

        assert_eq!(
            settings.resolve_api_key("deepseek").as_deref(),
            Some("sk-stored")
        );
    }

    #[test]
    fn test_resolve_api_key_ignores_placeholder() {
        let mut settings = Settings::default();
        settings.providers.openai.api_key = Some("your_api_key_here".to_string());
        settings.providers.openai.api_key_env = "FRED_TEST_UNSET_ENV_VAR".to_string();

        assert!(settings.resolve_api_key("openai").is_none());
    }

    #[test]
    fn test_resolve_api_key_unknown_provider() {
        let settings = Settings::default();
        assert!(settings.resolve_api_key("hal9000").is_none());
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut settings = Settings::default();
        settings.ai.default_provider = "hal9000".to_string();

        let issues = settings.validate();
        assert!(issues.iter().any(|i| i.contains("Invalid AI provider")));
    }

    #[test]
    fn test_validate_missing_key() {
        let mut settings = Settings::default();
        settings.ai.default_provider = "google".to_string();
        settings.providers.google.api_key_env = "FRED_TEST_UNSET_ENV_VAR".to_string();

        let issues = settings.validate();
        assert!(issues.iter().any(|i| i.contains("Missing API key")));
    }

    #[test]
    fn test_file_manager_alias_section() {
        // The original config format named the section "file_manager"
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "file_manager:\n  default_workspace: /tmp/ws\n  backup_enabled: false\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.files.workspace, PathBuf::from("/tmp/ws"));
        assert!(!settings.files.backup_enabled);
    }
}
