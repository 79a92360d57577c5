//! SavvyBee CLI - Financial friend backed by hosted language models
//!
//! Usage:
//!   savvybee serve --port 5000          Start web server
//!   savvybee chat "Can I afford this?"  One chat turn
//!   savvybee transcribe --file memo.webm
//!   savvybee prompts list               Inspect prompt library
//!   savvybee check                      Validate configuration

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            static_dir,
        } => commands::cmd_serve(&host, port, static_dir.as_deref()).await,
        Commands::Chat { message } => commands::cmd_chat(&message.join(" ")).await,
        Commands::Transcribe { file } => commands::cmd_transcribe(&file).await,
        Commands::Prompts { action } => match action {
            PromptsAction::List => commands::cmd_prompts_list(),
            PromptsAction::Show { id } => commands::cmd_prompts_show(&id),
        },
        Commands::Check => commands::cmd_check().await,
    }
}
