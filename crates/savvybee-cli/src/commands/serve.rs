//! Serve command implementation

use std::path::Path;

use anyhow::Result;
use savvybee_server::ServerConfig;

use super::load_advisor;

/// Start the web server
pub async fn cmd_serve(host: &str, port: u16, static_dir: Option<&Path>) -> Result<()> {
    let (settings, advisor) = load_advisor()?;

    println!("🐝 Starting SavvyBee web server...");
    println!("   Listening: http://{}:{}", host, port);
    println!("   Chat model: {}", settings.chat.model);
    println!("   Receipt model: {}", settings.chat.receipt_model);
    println!("   Transcription: {} ({})", settings.transcription.host, settings.transcription.model);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    if settings.allowed_origins.is_empty() {
        println!("   CORS: any origin");
    } else {
        println!("   CORS: {}", settings.allowed_origins.join(", "));
    }

    let config = ServerConfig::from_settings(&settings);
    let static_dir = static_dir.map(|p| p.to_string_lossy().into_owned());

    savvybee_server::serve_with_config(advisor, host, port, static_dir.as_deref(), config).await
}
