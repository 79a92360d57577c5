//! Check command implementation

use anyhow::{bail, Result};
use savvybee_core::{AIBackend, Advisor};
use tracing::{debug, warn};

/// Outcome of a connectivity check
#[derive(Debug)]
pub struct CheckReport {
    pub host: String,
    pub chat_model: String,
    pub receipt_model: String,
    pub prompt_overrides: usize,
    pub upstream_reachable: bool,
}

/// Validate configuration, prompts and upstream reachability
pub async fn cmd_check() -> Result<()> {
    let (settings, advisor) = super::load_advisor()?;
    println!("✅ Configuration loaded");
    println!("   Transcription: {} ({})", settings.transcription.host, settings.transcription.model);

    let report = run_check(&advisor).await;
    println!("✅ Prompts loaded ({} override(s))", report.prompt_overrides);
    println!("   Chat model: {}", report.chat_model);
    println!("   Receipt model: {}", report.receipt_model);

    if report.upstream_reachable {
        println!("✅ Upstream reachable: {}", report.host);
        Ok(())
    } else {
        bail!("Upstream not reachable: {}", report.host)
    }
}

pub async fn run_check(advisor: &Advisor) -> CheckReport {
    let client = advisor.client();
    debug!(host = client.host(), "Checking upstream");

    let report = CheckReport {
        host: client.host().to_string(),
        chat_model: advisor.chat_model().to_string(),
        receipt_model: advisor.receipt_model().to_string(),
        prompt_overrides: advisor
            .prompts()
            .list()
            .iter()
            .filter(|p| p.has_override)
            .count(),
        upstream_reachable: client.health_check().await,
    };

    if !report.upstream_reachable {
        warn!(host = %report.host, "Upstream health check failed");
    }
    report
}
