//! Runtime configuration
//!
//! Everything is read from the process environment once at startup. API keys
//! have no defaults: a missing key is a startup error, never a per-request one.

use std::path::PathBuf;

use crate::error::{Error, Result};

pub const CHAT_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const CHAT_API_HOST_ENV: &str = "CHAT_API_HOST";
pub const CHAT_MODEL_ENV: &str = "CHAT_MODEL";
pub const RECEIPT_MODEL_ENV: &str = "RECEIPT_MODEL";
pub const TRANSCRIBE_API_KEY_ENV: &str = "TRANSCRIBE_API_KEY";
pub const TRANSCRIBE_API_HOST_ENV: &str = "TRANSCRIBE_API_HOST";
pub const TRANSCRIBE_MODEL_ENV: &str = "TRANSCRIBE_MODEL";
pub const ALLOWED_ORIGINS_ENV: &str = "SAVVYBEE_ALLOWED_ORIGINS";
pub const PROMPTS_DIR_ENV: &str = "SAVVYBEE_PROMPTS_DIR";

pub const DEFAULT_CHAT_HOST: &str = "https://api.groq.com/openai";
pub const DEFAULT_CHAT_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_RECEIPT_MODEL: &str = "llama-3.2-11b-vision-preview";
pub const DEFAULT_TRANSCRIBE_HOST: &str = "https://api.openai.com";
pub const DEFAULT_TRANSCRIBE_MODEL: &str = "whisper-1";

/// Text-generation service settings
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub host: String,
    pub api_key: String,
    /// Model for chat and financial summaries
    pub model: String,
    /// Vision-capable model for receipt analysis
    pub receipt_model: String,
}

/// Transcription service settings
#[derive(Debug, Clone)]
pub struct TranscriptionSettings {
    pub host: String,
    pub api_key: String,
    pub model: String,
}

/// All runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub chat: ChatSettings,
    pub transcription: TranscriptionSettings,
    /// CORS origins; empty means any origin
    pub allowed_origins: Vec<String>,
    /// Explicit prompt override directory
    pub prompts_dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| {
                Error::Config(format!("{} environment variable not set", key))
            })
        };
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let chat = ChatSettings {
            host: or_default(CHAT_API_HOST_ENV, DEFAULT_CHAT_HOST),
            api_key: require(CHAT_API_KEY_ENV)?,
            model: or_default(CHAT_MODEL_ENV, DEFAULT_CHAT_MODEL),
            receipt_model: or_default(RECEIPT_MODEL_ENV, DEFAULT_RECEIPT_MODEL),
        };

        let transcription = TranscriptionSettings {
            host: or_default(TRANSCRIBE_API_HOST_ENV, DEFAULT_TRANSCRIBE_HOST),
            api_key: require(TRANSCRIBE_API_KEY_ENV)?,
            model: or_default(TRANSCRIBE_MODEL_ENV, DEFAULT_TRANSCRIBE_MODEL),
        };

        let allowed_origins = get(ALLOWED_ORIGINS_ENV)
            .map(|s| parse_list(&s))
            .unwrap_or_default();

        Ok(Self {
            chat,
            transcription,
            allowed_origins,
            prompts_dir: get(PROMPTS_DIR_ENV).map(PathBuf::from),
        })
    }
}

/// Split a comma-separated list, dropping blanks
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let settings = Settings::from_lookup(lookup(&[
            (CHAT_API_KEY_ENV, "gsk-test"),
            (TRANSCRIBE_API_KEY_ENV, "sk-test"),
        ]))
        .unwrap();

        assert_eq!(settings.chat.host, DEFAULT_CHAT_HOST);
        assert_eq!(settings.chat.model, DEFAULT_CHAT_MODEL);
        assert_eq!(settings.chat.receipt_model, DEFAULT_RECEIPT_MODEL);
        assert_eq!(settings.transcription.host, DEFAULT_TRANSCRIBE_HOST);
        assert_eq!(settings.transcription.model, DEFAULT_TRANSCRIBE_MODEL);
        assert!(settings.allowed_origins.is_empty());
        assert!(settings.prompts_dir.is_none());
    }

    #[test]
    fn test_missing_chat_key_fails_fast() {
        let err = Settings::from_lookup(lookup(&[(TRANSCRIBE_API_KEY_ENV, "sk-test")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains(CHAT_API_KEY_ENV)));
    }

    #[test]
    fn test_missing_transcription_key_fails_fast() {
        let err = Settings::from_lookup(lookup(&[(CHAT_API_KEY_ENV, "gsk-test")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains(TRANSCRIBE_API_KEY_ENV)));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let err = Settings::from_lookup(lookup(&[
            (CHAT_API_KEY_ENV, "   "),
            (TRANSCRIBE_API_KEY_ENV, "sk-test"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            (CHAT_API_KEY_ENV, "gsk-test"),
            (TRANSCRIBE_API_KEY_ENV, "sk-test"),
            (CHAT_MODEL_ENV, "llama-3.1-8b-instant"),
            (TRANSCRIBE_API_HOST_ENV, "https://api.groq.com/openai"),
            (ALLOWED_ORIGINS_ENV, "http://localhost:5173, https://savvybee.app,"),
            (PROMPTS_DIR_ENV, "/etc/savvybee/prompts"),
        ]))
        .unwrap();

        assert_eq!(settings.chat.model, "llama-3.1-8b-instant");
        assert_eq!(settings.transcription.host, "https://api.groq.com/openai");
        assert_eq!(
            settings.allowed_origins,
            vec!["http://localhost:5173", "https://savvybee.app"]
        );
        assert_eq!(
            settings.prompts_dir,
            Some(PathBuf::from("/etc/savvybee/prompts"))
        );
    }
}
