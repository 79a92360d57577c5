//! Chat and transcription command implementations

use std::path::Path;

use anyhow::{bail, Context, Result};
use savvybee_core::Advisor;
use tracing::debug;

use super::load_advisor;

/// Send one message and print the reply
pub async fn cmd_chat(message: &str) -> Result<()> {
    let (_, advisor) = load_advisor()?;
    let reply = run_chat(&advisor, message).await?;
    println!("{}", reply);
    Ok(())
}

pub async fn run_chat(advisor: &Advisor, message: &str) -> Result<String> {
    if message.trim().is_empty() {
        bail!("Send a message next time");
    }

    debug!(model = advisor.chat_model(), chars = message.len(), "Sending chat message");
    advisor
        .chat(message)
        .await
        .context("Chat request failed")
}

/// Transcribe a local audio file and print the text
pub async fn cmd_transcribe(file: &Path) -> Result<()> {
    let (_, advisor) = load_advisor()?;
    let text = transcribe_file(&advisor, file).await?;
    println!("{}", text);
    Ok(())
}

pub async fn transcribe_file(advisor: &Advisor, file: &Path) -> Result<String> {
    let audio = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    if audio.is_empty() {
        bail!("Audio file is empty: {}", file.display());
    }

    debug!(file = %file.display(), bytes = audio.len(), "Uploading audio for transcription");
    advisor
        .transcribe(&audio)
        .await
        .context("Transcription request failed")
}
