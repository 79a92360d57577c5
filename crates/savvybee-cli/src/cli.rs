//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SavvyBee - your financial friend
#[derive(Parser)]
#[command(name = "savvybee")]
#[command(about = "Chat, receipt and voice assistant for personal finance", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Directory with the client build (served at / and as fallback)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Send one chat message and print the reply
    Chat {
        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Transcribe a local audio recording
    Transcribe {
        /// Audio file (webm, mp3, wav, ...)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Inspect the prompt library
    Prompts {
        #[command(subcommand)]
        action: PromptsAction,
    },

    /// Validate configuration and upstream reachability
    Check,
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List prompts and their override status
    List,

    /// Show a prompt's content
    Show {
        /// Prompt ID (e.g. chat_persona)
        id: String,
    },
}
