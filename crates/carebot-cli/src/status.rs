//! `carebot status` — show configuration and provider status.
//!
//! - Shows config path and gateway address
//! - Shows credential and model status for each provider

use anyhow::Result;
use colored::Colorize;

use carebot_core::config::{get_config_path, load_config, Config};
use carebot_providers::registry::{ProviderSpec, PROVIDERS};

/// Run the status command.
pub fn run() -> Result<()> {
    let config_path = get_config_path();
    let config = load_config(None);

    println!();
    println!("{}", "🩺 Carebot Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );
    println!(
        "  {:<18} {}:{}",
        "Gateway:".bold(),
        config.gateway.host,
        config.gateway.port
    );

    println!();
    println!("  {}", "Providers:".bold());
    for spec in PROVIDERS {
        println!("    {:<12} {}", spec.display_name, provider_status(&config, spec));
    }
    println!();

    Ok(())
}

/// One status line: key state plus the model that would be called.
fn provider_status(config: &Config, spec: &ProviderSpec) -> String {
    match config.providers.get_by_name(spec.name) {
        Some(provider) if provider.is_configured() => {
            let model = provider.model.as_deref().unwrap_or(spec.default_model);
            format!("{} (key set) {}", "✓".green(), model.dimmed())
        }
        _ => format!("{}", format!("· not configured (set {})", spec.env_key).dimmed()),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
