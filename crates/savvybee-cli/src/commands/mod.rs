//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `serve` - Web server command
//! - `chat` - One-shot chat and transcription commands
//! - `prompts` - Prompt library inspection commands
//! - `check` - Configuration and connectivity check

pub mod chat;
pub mod check;
pub mod prompts;
pub mod serve;

// Re-export command functions for main.rs
pub use chat::*;
pub use check::*;
pub use prompts::*;
pub use serve::*;

use anyhow::{Context, Result};
use savvybee_core::{Advisor, Settings};
use tracing::debug;

/// Load settings from the environment and build the production advisor
pub fn load_advisor() -> Result<(Settings, Advisor)> {
    let settings = Settings::from_env().context("Failed to load configuration")?;
    let advisor = Advisor::from_settings(&settings).context("Failed to load prompt library")?;
    debug!(
        chat_host = %settings.chat.host,
        chat_model = %settings.chat.model,
        "Advisor ready"
    );
    Ok((settings, advisor))
}
