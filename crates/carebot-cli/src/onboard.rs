//! `carebot onboard` — write a default configuration file.
//!
//! Creates `~/.carebot/config.json` with defaults and the history
//! directory used by the console. Existing files are left untouched.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use carebot_core::config::{get_config_path, save_config, Config};
use carebot_core::utils::get_history_path;
use carebot_providers::PROVIDERS;

/// Run the onboard command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "🩺 Carebot — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();
    if write_default_config(&config_path)? {
        println!("  {} created config at {}", "✓".green(), config_path.display());
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }

    let history_dir = get_history_path();
    std::fs::create_dir_all(&history_dir)
        .with_context(|| format!("failed to create {}", history_dir.display()))?;

    println!();
    println!("  Add API keys to the config, or export:");
    for spec in PROVIDERS {
        println!("    {}", spec.env_key.bold());
    }
    println!();
    println!(
        "{}",
        "  Setup complete! Run `carebot serve` or `carebot chat` to start.".green()
    );
    println!();

    Ok(())
}

/// Write the default config unless a file already exists. Returns whether
/// a file was written.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
