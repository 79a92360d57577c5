//! Integration tests for savvybee-core
//!
//! These tests run the real OpenAI-compatible backend against the mock
//! upstream server and exercise the advisor → HTTP → extraction path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use savvybee_core::{
    ai::{AIBackend, OpenAICompatibleBackend, TextRequest},
    test_utils::{ChatBehavior, MockUpstreamServer, MOCK_TRANSCRIPTION},
    Advisor, AIClient, Error, ImageAttachment, PromptLibrary, ReceiptAnalysis,
};

fn backend(server: &MockUpstreamServer) -> OpenAICompatibleBackend {
    OpenAICompatibleBackend::with_api_key(&server.url(), "llama3-70b-8192", "gsk-test")
        .with_transcription(&server.url(), Some("sk-test"), "whisper-1")
}

fn advisor(server: &MockUpstreamServer) -> Advisor {
    Advisor::new(
        AIClient::from(backend(server)),
        Arc::new(PromptLibrary::embedded_only().unwrap()),
        "llama3-70b-8192",
        "llama-3.2-11b-vision-preview",
    )
}

// =============================================================================
// Upstream client
// =============================================================================

#[tokio::test]
async fn test_chat_completion_round_trip() {
    let server = MockUpstreamServer::start().await;
    let backend = backend(&server);

    let request = TextRequest::new("You are SavvyBee", "Is $12 lunch too much?", "llama3-70b-8192");
    let reply = backend.generate_text(&request).await.unwrap();

    // Echo mode returns the user message
    assert_eq!(reply, "Is $12 lunch too much?");

    let sent = server.chat_requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["model"], "llama3-70b-8192");
    assert_eq!(sent[0]["messages"][0]["role"], "system");
    assert_eq!(sent[0]["max_tokens"], 150);
    assert_eq!(
        server.chat_authorizations(),
        vec![Some("Bearer gsk-test".to_string())]
    );
}

#[tokio::test]
async fn test_upstream_500_is_an_error() {
    let server = MockUpstreamServer::start_with(ChatBehavior::Fail).await;
    let err = backend(&server)
        .generate_text(&TextRequest::new("s", "u", "m"))
        .await
        .unwrap_err();

    assert!(err.is_upstream());
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_null_content_is_an_error() {
    let server = MockUpstreamServer::start_with(ChatBehavior::NullContent).await;
    let err = backend(&server)
        .generate_text(&TextRequest::new("s", "u", "m"))
        .await
        .unwrap_err();

    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_slow_upstream_times_out_without_retry() {
    let server = MockUpstreamServer::start_with(ChatBehavior::Delay(Duration::from_secs(5))).await;
    let backend = backend(&server).with_timeout(Duration::from_millis(200));

    let started = Instant::now();
    let err = backend
        .generate_text(&TextRequest::new("s", "u", "m"))
        .await
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(matches!(err, Error::Http(ref e) if e.is_timeout()));
    assert!(err.is_upstream());
    assert_eq!(server.chat_requests().len(), 1);
}

#[tokio::test]
async fn test_health_check_against_mock() {
    let server = MockUpstreamServer::start().await;
    assert!(backend(&server).health_check().await);
}

#[tokio::test]
async fn test_transcription_upload() {
    let server = MockUpstreamServer::start().await;
    let text = backend(&server)
        .transcribe_audio(&[1u8; 64], "recording.webm", "en")
        .await
        .unwrap();

    assert_eq!(text, MOCK_TRANSCRIPTION.trim());

    let uploads = server.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].file_name.as_deref(), Some("recording.webm"));
    assert_eq!(uploads[0].bytes, 64);
    assert_eq!(uploads[0].model.as_deref(), Some("whisper-1"));
    assert_eq!(uploads[0].language.as_deref(), Some("en"));
    assert_eq!(uploads[0].response_format.as_deref(), Some("json"));
    assert_eq!(uploads[0].authorization.as_deref(), Some("Bearer sk-test"));
}

#[tokio::test]
async fn test_transcription_failure() {
    let server = MockUpstreamServer::start_with(ChatBehavior::Fail).await;
    let err = backend(&server)
        .transcribe_audio(b"abc", "recording.webm", "en")
        .await
        .unwrap_err();
    assert!(err.is_upstream());
}

// =============================================================================
// Advisor end to end
// =============================================================================

#[tokio::test]
async fn test_receipt_analysis_sends_image_and_extracts_json() {
    let reply = "Sure! Here is the breakdown:\n```json\n{\"merchantName\": \"Shoprite\", \"totalAmount\": \"₦12,400\"}\n```\nStay savvy!";
    let server = MockUpstreamServer::start_with_reply(reply).await;

    let analysis = advisor(&server)
        .analyze_receipt(ImageAttachment::new("image/png", b"fake-png".to_vec()))
        .await
        .unwrap();

    assert_eq!(analysis["merchantName"], "Shoprite");
    assert_eq!(analysis["totalAmount"], "₦12,400");

    let sent = &server.chat_requests()[0];
    assert_eq!(sent["model"], "llama-3.2-11b-vision-preview");
    let parts = sent["messages"][1]["content"].as_array().unwrap();
    assert_eq!(parts[0]["type"], "text");
    assert_eq!(parts[1]["type"], "image_url");
    assert!(parts[1]["image_url"]["url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_receipt_analysis_falls_back_on_prose() {
    let server = MockUpstreamServer::start_with_reply("I couldn't read that, sorry.").await;

    let analysis = advisor(&server)
        .analyze_receipt(ImageAttachment::new("image/jpeg", vec![0xFF, 0xD8]))
        .await
        .unwrap();

    assert_eq!(analysis, ReceiptAnalysis::fallback_value());
}

#[tokio::test]
async fn test_financial_summary_bare_object() {
    let server = MockUpstreamServer::start_with_reply(
        r#"{"healthImpact": "Walking to work saved you $40.", "extra": true}"#,
    )
    .await;

    let summary = advisor(&server).financial_summary(None).await.unwrap();

    // Off-schema objects pass through untouched
    assert_eq!(summary["healthImpact"], "Walking to work saved you $40.");
    assert_eq!(summary["extra"], true);
    assert!(summary.get("spendingPatterns").is_none());

    let sent = &server.chat_requests()[0];
    assert_eq!(sent["max_tokens"], 500);
}

#[tokio::test]
async fn test_advisor_transcribe() {
    let server = MockUpstreamServer::start().await;
    let text = advisor(&server).transcribe(&[0u8; 10]).await.unwrap();
    assert_eq!(text, MOCK_TRANSCRIPTION.trim());
    assert_eq!(server.uploads()[0].file_name.as_deref(), Some("recording.webm"));
}
