//! Prompts-related command implementations

use std::fmt::Write;

use anyhow::{Context, Result};
use savvybee_core::config::PROMPTS_DIR_ENV;
use savvybee_core::prompts::{default_prompts_dir, PromptId, PromptLibrary};

/// Prompt library honoring `SAVVYBEE_PROMPTS_DIR` without requiring API keys
fn load_library() -> Result<PromptLibrary> {
    let library = match std::env::var(PROMPTS_DIR_ENV).ok().filter(|s| !s.trim().is_empty()) {
        Some(dir) => PromptLibrary::with_override_dir(dir.into()),
        None => PromptLibrary::new(),
    };
    library.context("Failed to load prompt library")
}

/// List all available prompts and their override status
pub fn cmd_prompts_list() -> Result<()> {
    let library = load_library()?;
    print!("{}", format_prompt_list(&library));

    println!();
    println!("To customize a prompt:");
    println!("  1. Copy the default to the override directory");
    println!("  2. Edit the file with your changes");
    println!("  3. Restart the server to use the new prompt");

    Ok(())
}

pub fn format_prompt_list(library: &PromptLibrary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Available Prompts:\n");
    let _ = writeln!(
        out,
        "{:<20} {:>7}  {:<8} {:>5} {:>6}  OVERRIDE",
        "ID", "VERSION", "TASK", "TEMP", "TOKENS"
    );
    let _ = writeln!(out, "{}", "-".repeat(65));

    for info in library.list() {
        let override_status = if info.has_override {
            "✓ Custom"
        } else {
            "Default"
        };
        let _ = writeln!(
            out,
            "{:<20} {:>7}  {:<8} {:>5.1} {:>6}  {}",
            info.id, info.version, info.task_type.to_string(), info.temperature, info.max_tokens, override_status
        );
    }

    let dir = library
        .override_dir()
        .cloned()
        .or_else(default_prompts_dir)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not available)".to_string());
    let _ = writeln!(out, "\nOverride directory: {}", dir);

    out
}

/// Show the content of a specific prompt
pub fn cmd_prompts_show(prompt_id: &str) -> Result<()> {
    let Some(id) = PromptId::parse(prompt_id) else {
        eprintln!("Unknown prompt ID: {}", prompt_id);
        eprintln!();
        eprintln!("Available prompts:");
        for id in PromptId::all() {
            eprintln!("  - {}", id.as_str());
        }
        return Ok(());
    };

    let library = load_library()?;
    let prompt = library.get(id)?;

    println!("Prompt: {}", prompt.metadata.id);
    println!("Version: {}", prompt.metadata.version);
    println!("Task Type: {}", prompt.metadata.task_type);
    println!(
        "Sampling: temperature {}, max tokens {}",
        prompt.metadata.temperature, prompt.metadata.max_tokens
    );
    println!(
        "Source: {}",
        if prompt.is_override {
            "Override"
        } else {
            "Default"
        }
    );

    if let Some(ref path) = prompt.override_path {
        println!("Override Path: {}", path.display());
    }

    println!();
    println!("--- Content ---");
    println!("{}", prompt.content);

    Ok(())
}
