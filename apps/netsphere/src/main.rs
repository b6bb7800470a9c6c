//! # Netsphere - Network Diagram Engine
//!
//! The main binary for the Netsphere diagram state engine.
//!
//! This application provides:
//! - CLI interface for diagram operations
//! - Oracle round trips (free-text intent to validated mutations)
//! - Diagram document persistence and layout computation
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                 apps/netsphere (THE BINARY)                │
//! │                                                            │
//! │  ┌─────────────┐   ┌───────────────┐   ┌───────────────┐  │
//! │  │   CLI       │   │ Oracle Client │   │  Config       │  │
//! │  │  (clap)     │   │  (reqwest)    │   │  (toml + env) │  │
//! │  └──────┬──────┘   └───────┬───────┘   └───────┬───────┘  │
//! │         │                  │                   │          │
//! │         └──────────────────┼───────────────────┘          │
//! │                            ▼                               │
//! │                  ┌──────────────────┐                      │
//! │                  │  netsphere-core  │                      │
//! │                  │   (THE LOGIC)    │                      │
//! │                  └──────────────────┘                      │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Natural-language command through the oracle
//! netsphere command "Add a server named web1 and connect it to router1"
//!
//! # Structured payloads and file operations, no oracle involved
//! netsphere apply -f payload.json
//! netsphere export -o diagram.json
//! netsphere layout --seed 42
//! netsphere status
//! ```

use clap::Parser;
use netsphere::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — NETSPHERE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("NETSPHERE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "netsphere=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Netsphere startup banner.
fn print_banner() {
    println!(
        r#"
  ███╗   ██╗███████╗████████╗███████╗██████╗ ██╗  ██╗███████╗██████╗ ███████╗
  ████╗  ██║██╔════╝╚══██╔══╝██╔════╝██╔══██╗██║  ██║██╔════╝██╔══██╗██╔════╝
  ██╔██╗ ██║█████╗     ██║   ███████╗██████╔╝███████║█████╗  ██████╔╝█████╗
  ██║╚██╗██║██╔══╝     ██║   ╚════██║██╔═══╝ ██╔══██║██╔══╝  ██╔══██╗██╔══╝
  ██║ ╚████║███████╗   ██║   ███████║██║     ██║  ██║███████╗██║  ██║███████╗
  ╚═╝  ╚═══╝╚══════╝   ╚═╝   ╚══════╝╚═╝     ╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝╚══════╝

  Network Diagram Engine v{}

  Deterministic • Validated • Single-Writer
"#,
        env!("CARGO_PKG_VERSION")
    );
}
