// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::fs;

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fred::agent::FileAgent;
use fred::config::Settings;

fn settings_in(dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.files.workspace = dir.path().join("workspace");
    settings.files.backup_dir = dir.path().join("backups");
    settings
}

fn offline_agent(dir: &TempDir) -> FileAgent {
    let mut settings = settings_in(dir);
    settings.ai.default_provider = "deepseek".to_string();
    settings.providers.deepseek.api_key_env = "FRED_TEST_UNSET_ENV_VAR".to_string();
    FileAgent::new(settings).unwrap()
}

#[tokio::test]
async fn test_chinese_create_scenario_end_to_end() {
    let dir = TempDir::new().unwrap();
    let agent = offline_agent(&dir);

    let record = agent
        .execute(r#"创建一个名为"test.txt"的文件，内容是"Hello""#)
        .await;
    assert!(record.success, "{}", record.message);

    let written = fs::read_to_string(dir.path().join("workspace/test.txt")).unwrap();
    assert_eq!(written, "Hello");
}

#[tokio::test]
async fn test_missing_key_yields_auth_error_record() {
    let dir = TempDir::new().unwrap();
    let agent = offline_agent(&dir);

    let record = agent.execute("tell me a joke").await;
    assert!(!record.success);
    assert_eq!(record.error_kind.as_deref(), Some("AuthError"));
}

#[tokio::test]
async fn test_file_operations_work_without_api_key() {
    let dir = TempDir::new().unwrap();
    let agent = offline_agent(&dir);

    assert!(agent.execute(r#"create a file "a.txt""#).await.success);
    assert!(agent.execute(r#"copy "a.txt" to "b.txt""#).await.success);
    assert!(agent.execute("list files").await.success);
    assert!(agent.execute(r#"delete "b.txt""#).await.success);
}

#[tokio::test]
async fn test_oversized_create_reports_too_large() {
    let dir = TempDir::new().unwrap();
    let mut settings = settings_in(&dir);
    settings.files.max_file_size_mb = 1;
    settings.providers.openai.api_key_env = "FRED_TEST_UNSET_ENV_VAR".to_string();
    let agent = FileAgent::new(settings).unwrap();

    let content = "x".repeat(1024 * 1024 + 1);
    let record = agent
        .execute(&format!(r#"create a file "big.txt" with content "{content}""#))
        .await;
    assert!(!record.success);
    assert_eq!(record.error_kind.as_deref(), Some("FileTooLargeError"));
    assert!(!dir.path().join("workspace/big.txt").exists());
}

#[tokio::test]
async fn test_traversal_command_rejected() {
    let dir = TempDir::new().unwrap();
    let agent = offline_agent(&dir);

    let record = agent.execute(r#"读取"../../etc/passwd""#).await;
    assert!(!record.success);
    assert_eq!(record.error_kind.as_deref(), Some("PathTraversalError"));
}

#[tokio::test]
async fn test_delete_backs_up_before_removal() {
    let dir = TempDir::new().unwrap();
    let agent = offline_agent(&dir);

    agent
        .execute(r#"创建一个名为"gone.txt"的文件，内容是"bye""#)
        .await;
    let record = agent.execute(r#"删除"gone.txt""#).await;
    assert!(record.success);

    let backups: Vec<_> = fs::read_dir(dir.path().join("backups")).unwrap().collect();
    assert_eq!(backups.len(), 1);
}

#[tokio::test]
async fn test_chat_against_stub_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "gpt-3.5-turbo",
            "choices": [{"message": {"role": "assistant", "content": "Hi from stub"}}],
            "usage": {"prompt_tokens": 7, "completion_tokens": 3}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut settings = settings_in(&dir);
    settings.ai.default_provider = "openai".to_string();
    settings.providers.openai.api_key = Some("sk-test".to_string());
    settings.providers.openai.api_key_env = "FRED_TEST_UNSET_ENV_VAR".to_string();
    settings.providers.openai.base_url = Some(server.uri());
    let agent = FileAgent::new(settings).unwrap();

    let record = agent.execute("say hi").await;
    assert!(record.success, "{}", record.message);
    assert_eq!(record.message, "Hi from stub");

    let payload = record.payload.unwrap();
    assert_eq!(payload["provider"], "openai");
    assert_eq!(payload["usage"]["prompt_tokens"], 7);
}

#[tokio::test]
async fn test_unknown_model_falls_back_to_provider_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "deepseek-chat",
            "choices": [{"message": {"role": "assistant", "content": "ok"}}],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut settings = settings_in(&dir);
    settings.ai.default_provider = "deepseek".to_string();
    settings.ai.default_model = "not-a-real-model".to_string();
    settings.providers.deepseek.api_key = Some("sk-test".to_string());
    settings.providers.deepseek.api_key_env = "FRED_TEST_UNSET_ENV_VAR".to_string();
    settings.providers.deepseek.base_url = Some(server.uri());
    let agent = FileAgent::new(settings).unwrap();

    let record = agent.execute("anything").await;
    assert!(record.success, "{}", record.message);
    // The adapter's default model was used on the wire.
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "deepseek-chat");
}

#[tokio::test]
async fn test_status_reports_configuration() {
    let dir = TempDir::new().unwrap();
    let agent = offline_agent(&dir);

    let status = agent.status();
    assert_eq!(status.provider, "deepseek");
    assert!(status.backup_enabled);
    assert!(status.workspace.ends_with("workspace"));
}

#[tokio::test]
async fn test_execute_never_panics_on_odd_input() {
    let dir = TempDir::new().unwrap();
    let agent = offline_agent(&dir);

    for input in ["", "   ", "删除", r#"复制"only-one.txt""#, "créer \u{0} fichier"] {
        let _ = agent.execute(input).await;
    }
}
