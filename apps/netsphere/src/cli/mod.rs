//! # Netsphere CLI Module
//!
//! This module implements the CLI interface for Netsphere.
//!
//! ## Available Commands
//!
//! - `command` - Run a free-text intent through the oracle
//! - `apply` - Apply a structured payload file, no oracle involved
//! - `import` - Replace the diagram with a document file
//! - `merge` - Additively merge a document file into the diagram
//! - `export` - Write the diagram document to a file
//! - `layout` - Compute node positions for the current diagram
//! - `status` - Show diagram status

mod commands;

use crate::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Netsphere - Network Diagram Engine
///
/// A deterministic diagram state engine. Free-text intents are turned
/// into structured payloads by an external oracle; every payload is
/// validated against the store before a single mutation is applied.
#[derive(Parser, Debug)]
#[command(name = "netsphere")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the diagram document
    #[arg(short = 'D', long, global = true, default_value = "diagram.json")]
    pub diagram: PathBuf,

    /// Path to the configuration file
    #[arg(short = 'C', long, global = true, default_value = "netsphere.toml")]
    pub config: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a free-text intent through the oracle and apply the result
    Command {
        /// The intent, e.g. "Add a server named web1 and connect it to r1"
        text: String,
    },

    /// Apply a structured payload file directly, bypassing the oracle
    Apply {
        /// Path to the payload file (update or removal shape)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Replace the diagram with a document file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Additively merge a document file into the diagram
    Merge {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write the diagram document to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Compute node positions for the current diagram
    Layout {
        /// Jitter seed; the same seed reproduces the same layout
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Override the number of relaxation sweeps
        #[arg(short, long)]
        iterations: Option<usize>,
    },

    /// Show diagram status
    Status,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Command { text }) => {
            cmd_command(&cli.diagram, &cli.config, &text, json_mode).await
        }
        Some(Commands::Apply { file }) => cmd_apply(&cli.diagram, &file, json_mode),
        Some(Commands::Import { input }) => cmd_import(&cli.diagram, &input),
        Some(Commands::Merge { input }) => cmd_merge(&cli.diagram, &input),
        Some(Commands::Export { output }) => cmd_export(&cli.diagram, &output),
        Some(Commands::Layout { seed, iterations }) => cmd_layout(&cli.diagram, seed, iterations),
        Some(Commands::Status) => cmd_status(&cli.diagram, json_mode),
        None => {
            // No subcommand - show status by default
            cmd_status(&cli.diagram, json_mode)
        }
    }
}
