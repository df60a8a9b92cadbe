//! Carebot CLI — entry point.
//!
//! # Commands
//!
//! - `carebot serve [--host H] [--port P]` — run the HTTP gateway
//! - `carebot chat [-m MESSAGE] [-u USER] [-s STATE]` — single-shot or console chat
//! - `carebot onboard` — write a default config
//! - `carebot status` — show configuration and provider status

mod helpers;
mod onboard;
mod repl;
mod server;
mod status;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use carebot_core::config::{load_config, Config};
use carebot_core::session::InMemorySessionStore;
use carebot_core::types::ChatState;
use carebot_providers::ProviderDispatcher;
use carebot_router::{ChatRequest, ConversationRouter};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🩺 Carebot — health assistant chat router
#[derive(Parser)]
#[command(name = "carebot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway (chat endpoint + widget page)
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Chat from the terminal (single-shot or interactive console)
    Chat {
        /// Single message (non-interactive). Omit for console mode.
        #[arg(short, long)]
        message: Option<String>,

        /// User identifier the session is keyed by
        #[arg(short, long, default_value = "console")]
        user: String,

        /// Chat state to start in (initial, symptom, doctor, patient)
        #[arg(short, long, default_value_t = ChatState::Initial)]
        state: ChatState,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Write a default configuration file
    Onboard,

    /// Show configuration and provider status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, logs } => {
            init_logging(logs);
            let mut config = load_config(None);
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            server::run(config).await
        }
        Commands::Chat {
            message,
            user,
            state,
            logs,
        } => {
            init_logging(logs);
            run_chat(message, &user, state).await
        }
        Commands::Onboard => onboard::run(),
        Commands::Status => status::run(),
    }
}

// ─────────────────────────────────────────────
// Chat command
// ─────────────────────────────────────────────

async fn run_chat(message: Option<String>, user_id: &str, state: ChatState) -> Result<()> {
    let config = load_config(None);
    let router = build_router(&config)?;

    match message {
        Some(msg) => {
            info!(user_id, state = %state, "processing single message");
            let reply = router
                .handle(ChatRequest::new(state, msg).with_user(user_id))
                .await;
            helpers::print_response(&reply.response, reply.model_used.as_deref());
        }
        None => repl::run(router, user_id, state).await?,
    }

    Ok(())
}

/// Build a `ConversationRouter` from the loaded configuration.
fn build_router(config: &Config) -> Result<ConversationRouter> {
    let dispatcher =
        ProviderDispatcher::new(&config.providers).context("failed to create provider dispatcher")?;
    Ok(ConversationRouter::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(dispatcher),
    ))
}

/// Debug output for every Carebot crate, `info` for dependencies.
const VERBOSE_FILTER: &str =
    "carebot=debug,carebot_core=debug,carebot_providers=debug,carebot_router=debug,info";

/// Initialize tracing/logging. `RUST_LOG` wins when set.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new(VERBOSE_FILTER)
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
