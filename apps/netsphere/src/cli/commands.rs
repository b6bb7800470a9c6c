//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands,
//! plus the diagram and history file helpers they share.

use crate::AppError;
use crate::config::OracleConfig;
use crate::oracle::{self, OracleClient, Turn};
use netsphere_core::{
    Diagram, Interpreter, codec,
    layout::{self, LayoutConfig},
    primitives::ORACLE_HISTORY_WINDOW,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE HELPERS
// =============================================================================

/// Load a diagram document from disk. A missing file is an empty
/// diagram, not an error; a present but malformed file is.
pub fn load_diagram(path: &Path) -> Result<Diagram, AppError> {
    let mut diagram = Diagram::new();
    if path.exists() {
        let raw = std::fs::read_to_string(path)?;
        let document = codec::parse_document(&raw)?;
        codec::import(&mut diagram, &document);
    }
    Ok(diagram)
}

/// Persist the diagram as the canonical JSON document.
pub fn save_diagram(path: &Path, diagram: &Diagram) -> Result<(), AppError> {
    std::fs::write(path, codec::export(diagram))?;
    Ok(())
}

/// Conversation history lives alongside the diagram document.
#[must_use]
pub fn history_path(diagram_path: &Path) -> PathBuf {
    diagram_path.with_extension("history.json")
}

/// Load prior oracle turns. Missing or unreadable history starts fresh
/// rather than blocking the command.
#[must_use]
pub fn load_history(path: &Path) -> Vec<Turn> {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(turns) => turns,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "discarding malformed history");
            Vec::new()
        }
    }
}

/// Persist oracle turns, keeping only the most recent window.
pub fn save_history(path: &Path, history: &[Turn]) -> Result<(), AppError> {
    let recent = if history.len() > ORACLE_HISTORY_WINDOW {
        &history[history.len() - ORACLE_HISTORY_WINDOW..]
    } else {
        history
    };
    let raw = serde_json::to_string_pretty(recent)
        .map_err(|e| AppError::Config(format!("cannot serialize history: {e}")))?;
    std::fs::write(path, raw)?;
    Ok(())
}

// =============================================================================
// COMMAND (ORACLE ROUND TRIP)
// =============================================================================

/// Run a free-text intent through the oracle and apply the validated
/// payload to the diagram.
pub async fn cmd_command(
    diagram_path: &Path,
    config_path: &Path,
    text: &str,
    json_mode: bool,
) -> Result<(), AppError> {
    let mut diagram = load_diagram(diagram_path)?;
    let prepared = Interpreter::prepare(&mut diagram, text)?;

    let config = OracleConfig::load(config_path).map_err(AppError::Config)?;
    let client = OracleClient::new(config.base_url, config.api_key, config.model);
    let system = oracle::build_system_prompt(&prepared.state_description, prepared.removal);

    let history_file = history_path(diagram_path);
    let mut history = load_history(&history_file);

    tracing::info!(removal = prepared.removal, "consulting oracle");
    let raw = client.complete(&system, &history, text).await?;
    tracing::debug!(response = %raw, "oracle response");

    let payload = Interpreter::parse_payload(&raw, prepared.removal)?;
    let outcome = Interpreter::apply(&mut diagram, &payload)?;

    save_diagram(diagram_path, &diagram)?;
    history.push(Turn {
        intent: text.to_string(),
        response: Some(raw),
    });
    save_history(&history_file, &history)?;

    if json_mode {
        let output = serde_json::json!({
            "summary": outcome.summary,
            "payload": outcome.payload,
            "node_count": diagram.node_count(),
            "edge_count": diagram.edge_count(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!("{}", outcome.summary);
    }
    Ok(())
}

// =============================================================================
// APPLY (STRUCTURED PAYLOAD, NO ORACLE)
// =============================================================================

/// Apply a payload file directly. Both update and removal shapes are
/// accepted; a file is already explicit about what it wants.
pub fn cmd_apply(diagram_path: &Path, file: &Path, json_mode: bool) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(file)?;
    let payload = Interpreter::parse_payload(&raw, true)?;

    let mut diagram = load_diagram(diagram_path)?;
    let outcome = Interpreter::apply(&mut diagram, &payload)?;
    save_diagram(diagram_path, &diagram)?;

    if json_mode {
        let output = serde_json::json!({
            "summary": outcome.summary,
            "node_count": diagram.node_count(),
            "edge_count": diagram.edge_count(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!("{}", outcome.summary);
    }
    Ok(())
}

// =============================================================================
// IMPORT / MERGE / EXPORT
// =============================================================================

/// Replace the diagram with a document file.
pub fn cmd_import(diagram_path: &Path, input: &Path) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(input)?;
    let document = codec::parse_document(&raw)?;

    let mut diagram = Diagram::new();
    codec::import(&mut diagram, &document);
    save_diagram(diagram_path, &diagram)?;

    println!(
        "Imported {} nodes and {} connections from {:?}",
        diagram.node_count(),
        diagram.edge_count(),
        input
    );
    Ok(())
}

/// Additively merge a document file into the diagram.
pub fn cmd_merge(diagram_path: &Path, input: &Path) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(input)?;
    let document = codec::parse_document(&raw)?;

    let mut diagram = load_diagram(diagram_path)?;
    let nodes_before = diagram.node_count();
    let edges_before = diagram.edge_count();
    codec::merge(&mut diagram, &document);
    save_diagram(diagram_path, &diagram)?;

    println!(
        "Merged {} new nodes and {} new connections from {:?}",
        diagram.node_count() - nodes_before,
        diagram.edge_count() - edges_before,
        input
    );
    Ok(())
}

/// Write the diagram document to a file.
pub fn cmd_export(diagram_path: &Path, output: &Path) -> Result<(), AppError> {
    let diagram = load_diagram(diagram_path)?;
    std::fs::write(output, codec::export(&diagram))?;

    println!(
        "Exported {} nodes and {} connections to {:?}",
        diagram.node_count(),
        diagram.edge_count(),
        output
    );
    Ok(())
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Compute node positions for the current diagram and print them as
/// JSON. Positions are ephemeral: they are never written back to the
/// diagram document.
pub fn cmd_layout(
    diagram_path: &Path,
    seed: u64,
    iterations: Option<usize>,
) -> Result<(), AppError> {
    let diagram = load_diagram(diagram_path)?;
    let mut config = LayoutConfig::default();
    if let Some(iterations) = iterations {
        config.iterations = iterations;
    }

    let positions = layout::compute(&diagram.snapshot(), &config, seed);
    println!(
        "{}",
        serde_json::to_string_pretty(&positions).unwrap_or_default()
    );
    Ok(())
}

// =============================================================================
// STATUS
// =============================================================================

/// Show diagram status.
pub fn cmd_status(diagram_path: &Path, json_mode: bool) -> Result<(), AppError> {
    let diagram = load_diagram(diagram_path)?;
    let snapshot = diagram.snapshot();

    if json_mode {
        let output = serde_json::json!({
            "diagram": diagram_path.to_string_lossy(),
            "node_count": diagram.node_count(),
            "edge_count": diagram.edge_count(),
            "description": snapshot.describe(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Netsphere Diagram Status");
    println!("========================");
    println!("Document: {:?}", diagram_path);
    println!();
    println!("Nodes:       {}", diagram.node_count());
    println!("Connections: {}", diagram.edge_count());
    println!();
    println!("{}", snapshot.describe());

    Ok(())
}
