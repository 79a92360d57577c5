//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::sync::Arc;

use savvybee_core::test_utils::{MockUpstreamServer, MOCK_TRANSCRIPTION};
use savvybee_core::{AIClient, Advisor, MockBackend, OpenAICompatibleBackend, PromptLibrary};

use crate::commands;

fn mock_advisor(mock: &MockBackend) -> Advisor {
    Advisor::with_client(AIClient::from(mock.clone())).unwrap()
}

// ========== Chat Command Tests ==========

#[tokio::test]
async fn test_run_chat() {
    let mock = MockBackend::new().with_reply("Skip the soda, fund the gym 🏋️");
    let reply = commands::run_chat(&mock_advisor(&mock), "Should I buy soda?")
        .await
        .unwrap();

    assert_eq!(reply, "Skip the soda, fund the gym 🏋️");
    assert_eq!(mock.text_calls(), 1);
}

#[tokio::test]
async fn test_run_chat_rejects_blank_message() {
    let mock = MockBackend::new();
    let err = commands::run_chat(&mock_advisor(&mock), "  ")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Send a message next time");
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn test_run_chat_upstream_failure() {
    let mock = MockBackend::new().failing("rate limited");
    let err = commands::run_chat(&mock_advisor(&mock), "hi")
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("rate limited"));
}

// ========== Transcribe Command Tests ==========

#[tokio::test]
async fn test_transcribe_file_against_mock_server() {
    let server = MockUpstreamServer::start().await;
    let backend = OpenAICompatibleBackend::with_api_key(&server.url(), "llama3-70b-8192", "gsk")
        .with_transcription(&server.url(), Some("sk"), "whisper-1");
    let advisor = Advisor::new(
        AIClient::from(backend),
        Arc::new(PromptLibrary::embedded_only().unwrap()),
        "llama3-70b-8192",
        "llama-3.2-11b-vision-preview",
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memo.webm");
    std::fs::write(&path, [0x1A, 0x45, 0xDF, 0xA3, 0x01]).unwrap();

    let text = commands::transcribe_file(&advisor, &path).await.unwrap();
    assert_eq!(text, MOCK_TRANSCRIPTION.trim());

    let uploads = server.uploads();
    assert_eq!(uploads[0].bytes, 5);
    assert_eq!(uploads[0].file_name.as_deref(), Some("recording.webm"));
}

#[tokio::test]
async fn test_transcribe_missing_file() {
    let mock = MockBackend::new();
    let dir = tempfile::tempdir().unwrap();

    let result = commands::transcribe_file(&mock_advisor(&mock), &dir.path().join("nope.webm")).await;
    assert!(result.is_err());
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn test_transcribe_empty_file() {
    let mock = MockBackend::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.webm");
    std::fs::write(&path, b"").unwrap();

    assert!(commands::transcribe_file(&mock_advisor(&mock), &path).await.is_err());
    assert_eq!(mock.total_calls(), 0);
}

// ========== Prompts Command Tests ==========

#[test]
fn test_format_prompt_list() {
    let library = PromptLibrary::embedded_only().unwrap();
    let listing = commands::format_prompt_list(&library);

    assert!(listing.contains("chat_persona"));
    assert!(listing.contains("analyze_receipt"));
    assert!(listing.contains("financial_summary"));
    assert!(listing.contains("vision"));
    assert!(!listing.contains("✓ Custom"));
}

#[test]
fn test_format_prompt_list_with_override() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("analyze_receipt.md"),
        "---\nid: analyze_receipt\nversion: 2\ntask_type: vision\ntemperature: 0.2\nmax_tokens: 800\n---\n\n# System\nBe precise.\n\n# User\nRead the receipt.\n",
    )
    .unwrap();

    let library = PromptLibrary::with_override_dir(dir.path().to_path_buf()).unwrap();
    let listing = commands::format_prompt_list(&library);

    assert!(listing.contains("✓ Custom"));
    assert!(listing.contains(&dir.path().display().to_string()));
}

// ========== Check Command Tests ==========

#[tokio::test]
async fn test_run_check_healthy() {
    let mock = MockBackend::new();
    let report = commands::run_check(&mock_advisor(&mock)).await;

    assert!(report.upstream_reachable);
    assert_eq!(report.host, "mock://localhost");
    assert_eq!(report.prompt_overrides, 0);
    assert_eq!(report.chat_model, "llama3-70b-8192");
}

#[tokio::test]
async fn test_run_check_unreachable() {
    let mock = MockBackend::new().failing("down");
    let report = commands::run_check(&mock_advisor(&mock)).await;

    assert!(!report.upstream_reachable);
    assert_eq!(mock.total_calls(), 0);
}
