//! Prompt Library
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in the override dir (`SAVVYBEE_PROMPTS_DIR`, or
//!    ~/.local/share/savvybee/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Each prompt is a markdown file with YAML frontmatter carrying the sampling
//! parameters, followed by `# System` and `# User` sections. All prompts are
//! loaded once when the library is built, so a broken override fails at
//! startup instead of on the first request.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const CHAT_PERSONA: &str = include_str!("../../../prompts/chat_persona.md");
    pub const ANALYZE_RECEIPT: &str = include_str!("../../../prompts/analyze_receipt.md");
    pub const FINANCIAL_SUMMARY: &str = include_str!("../../../prompts/financial_summary.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// SavvyBee persona for free-form chat
    ChatPersona,
    /// Receipt image analysis (JSON reply)
    AnalyzeReceipt,
    /// Monthly financial summary (JSON reply)
    FinancialSummary,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChatPersona => "chat_persona",
            Self::AnalyzeReceipt => "analyze_receipt",
            Self::FinancialSummary => "financial_summary",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[Self::ChatPersona, Self::AnalyzeReceipt, Self::FinancialSummary]
    }

    /// Look up a prompt ID by its string identifier
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|id| id.as_str() == s)
    }

    /// Get the default embedded content for this prompt
    fn default_content(&self) -> &'static str {
        match self {
            Self::ChatPersona => defaults::CHAT_PERSONA,
            Self::AnalyzeReceipt => defaults::ANALYZE_RECEIPT,
            Self::FinancialSummary => defaults::FINANCIAL_SUMMARY,
        }
    }
}

/// Which configured model a prompt runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Text-only chat model
    Chat,
    /// Vision-capable model (image attached)
    Vision,
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chat => write!(f, "chat"),
            Self::Vision => write!(f, "vision"),
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    /// Unique identifier
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
    pub task_type: TaskType,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Metadata from frontmatter
    pub metadata: PromptMetadata,
    /// The prompt content (system + user sections)
    pub content: String,
    /// Whether this came from an override file
    pub is_override: bool,
    /// Path to override file (if any)
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    /// Get the system section of the prompt
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    /// Get the user section of the prompt
    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// System section, required
    pub fn system(&self) -> Result<&str> {
        self.system_section().ok_or_else(|| {
            Error::Prompt(format!("Prompt {} has no # System section", self.metadata.id))
        })
    }

    /// User section, required
    pub fn user(&self) -> Result<&str> {
        self.user_section().ok_or_else(|| {
            Error::Prompt(format!("Prompt {} has no # User section", self.metadata.id))
        })
    }
}

/// Prompt library holding every known prompt
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    /// Override directory path
    override_dir: Option<PathBuf>,
    prompts: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Load prompts using the default override directory
    pub fn new() -> Result<Self> {
        Self::load(default_prompts_dir())
    }

    /// Load prompts with a custom override directory
    pub fn with_override_dir(path: PathBuf) -> Result<Self> {
        Self::load(Some(path))
    }

    /// Load embedded prompts only
    pub fn embedded_only() -> Result<Self> {
        Self::load(None)
    }

    fn load(override_dir: Option<PathBuf>) -> Result<Self> {
        let mut prompts = HashMap::new();
        for &id in PromptId::all() {
            prompts.insert(id, load_prompt(id, override_dir.as_deref())?);
        }
        Ok(Self {
            override_dir,
            prompts,
        })
    }

    /// Get a prompt by ID
    pub fn get(&self, id: PromptId) -> Result<&Prompt> {
        self.prompts
            .get(&id)
            .ok_or_else(|| Error::Prompt(format!("Prompt {} not loaded", id.as_str())))
    }

    /// List all prompts with their override status
    pub fn list(&self) -> Vec<PromptInfo> {
        PromptId::all()
            .iter()
            .filter_map(|&id| self.prompts.get(&id).map(|p| (id, p)))
            .map(|(id, prompt)| PromptInfo {
                id: id.as_str().to_string(),
                version: prompt.metadata.version,
                task_type: prompt.metadata.task_type,
                temperature: prompt.metadata.temperature,
                max_tokens: prompt.metadata.max_tokens,
                has_override: prompt.is_override,
                override_path: prompt.override_path.clone(),
            })
            .collect()
    }

    /// Get the override directory path
    pub fn override_dir(&self) -> Option<&PathBuf> {
        self.override_dir.as_ref()
    }
}

/// Information about a prompt for listing
#[derive(Debug, Clone)]
pub struct PromptInfo {
    /// Prompt identifier
    pub id: String,
    /// Version from metadata
    pub version: u32,
    pub task_type: TaskType,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Whether an override exists
    pub has_override: bool,
    /// Path to override file (if exists)
    pub override_path: Option<PathBuf>,
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("savvybee").join("prompts").join("overrides"))
}

/// Load a prompt (checking override first, then default)
fn load_prompt(id: PromptId, override_dir: Option<&Path>) -> Result<Prompt> {
    if let Some(dir) = override_dir {
        let override_path = dir.join(format!("{}.md", id.as_str()));
        if override_path.exists() {
            let content = fs::read_to_string(&override_path).map_err(|e| {
                Error::Prompt(format!(
                    "Failed to read prompt override {}: {}",
                    override_path.display(),
                    e
                ))
            })?;
            let (metadata, body) = parse_prompt(&content)?;
            tracing::info!(prompt = id.as_str(), path = %override_path.display(), "Using prompt override");
            return Ok(Prompt {
                metadata,
                content: body,
                is_override: true,
                override_path: Some(override_path),
            });
        }
    }

    let (metadata, body) = parse_prompt(id.default_content())?;
    Ok(Prompt {
        metadata,
        content: body,
        is_override: false,
        override_path: None,
    })
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    // Check for YAML frontmatter
    if !content.starts_with("---") {
        return Err(Error::Prompt(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    // Find end of frontmatter
    let rest = &content[3..];
    let end = rest.find("---").ok_or_else(|| {
        Error::Prompt("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::Prompt(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt content
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];

    // Find the next header or end of content
    let end = after_header.find("\n# ").unwrap_or(after_header.len());

    Some(after_header[..end].trim())
}
