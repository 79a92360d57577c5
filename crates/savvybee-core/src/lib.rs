//! SavvyBee Core Library
//!
//! Shared functionality for the SavvyBee financial assistant:
//! - Upstream AI client (chat completions + audio transcription)
//! - Structured-reply extraction with literal fallbacks
//! - Prompt library for customizable AI prompts
//! - Advisor combining prompts, models and the upstream client
//! - Environment-based configuration

pub mod advisor;
pub mod ai;
pub mod config;
pub mod error;
pub mod models;
pub mod prompts;

/// Test utilities including mock upstream server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{decode_image_payload, Advisor, TRANSCRIPTION_FILENAME, TRANSCRIPTION_LANGUAGE};
pub use ai::{AIBackend, AIClient, ImageAttachment, MockBackend, OpenAICompatibleBackend, TextRequest};
pub use config::Settings;
pub use error::{Error, Result};
pub use models::{FinancialSummary, ReceiptAnalysis};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
