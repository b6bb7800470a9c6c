//! # State Codec
//!
//! Serializes the graph store to the canonical JSON diagram document and
//! back, and merges incoming documents into a live store.
//!
//! Two deliberately different write paths exist:
//! - `import` is destructive: reset, then merge ("replace the whole
//!   diagram with this file").
//! - `merge` is additive and idempotent: it never alters or removes an
//!   existing node or connection ("the oracle told me about more of the
//!   diagram").

use crate::graph::Diagram;
use crate::types::{Details, DiagramError, EdgeKind, NodeType};
use serde::{Deserialize, Serialize};

// =============================================================================
// CANONICAL DOCUMENT
// =============================================================================

/// A node entry in the canonical document / Diagram Snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    /// Display label; tolerated as absent on input (defaults to the id).
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    #[serde(default)]
    pub details: Details,
}

/// A connection entry in the canonical document / Diagram Snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default)]
    pub kind: EdgeKind,
}

/// The canonical diagram document.
///
/// This is both the export format and the read-only Diagram Snapshot
/// projection of the store. Both top-level fields are mandatory: a
/// document missing either is malformed, not empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DiagramDocument {
    pub nodes: Vec<NodeRecord>,
    pub connections: Vec<ConnectionRecord>,
}

impl DiagramDocument {
    /// Render the snapshot as the textual state description handed to
    /// the oracle alongside a caller intent.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.nodes.is_empty() {
            return "The current diagram is empty. ".to_string();
        }

        let nodes = self
            .nodes
            .iter()
            .map(|n| format!("{} ({})", n.id, n.node_type))
            .collect::<Vec<_>>()
            .join(", ");
        let mut description =
            format!("The current diagram contains the following elements: Nodes: {nodes}. ");

        if !self.connections.is_empty() {
            let connections = self
                .connections
                .iter()
                .map(|c| format!("{} -> {}", c.source, c.target))
                .collect::<Vec<_>>()
                .join(", ");
            description.push_str(&format!("Connections: {connections}."));
        }
        description
    }
}

// =============================================================================
// EXPORT / PARSE
// =============================================================================

/// Serialize the store to the canonical JSON document.
#[must_use]
pub fn export(diagram: &Diagram) -> String {
    // DiagramDocument contains no map keys that can fail to serialize,
    // so this cannot error in practice; fall back to the empty document
    // rather than panicking.
    serde_json::to_string_pretty(&diagram.snapshot())
        .unwrap_or_else(|_| "{\"nodes\": [], \"connections\": []}".to_string())
}

/// Parse a canonical document, validating the top-level shape.
///
/// Missing or wrong-typed `nodes` / `connections` fields yield
/// `MalformedDocument`.
pub fn parse_document(input: &str) -> Result<DiagramDocument, DiagramError> {
    serde_json::from_str(input).map_err(|e| DiagramError::MalformedDocument(e.to_string()))
}

// =============================================================================
// IMPORT / MERGE
// =============================================================================

/// Replace the live store wholesale with the document's contents.
pub fn import(diagram: &mut Diagram, document: &DiagramDocument) {
    diagram.reset();
    merge(diagram, document);
}

/// Additively merge a document into the live store.
///
/// Nodes whose id is already present are left untouched, even when the
/// incoming attributes differ. Connections are inserted only when both
/// endpoints resolve to a node known after the node-merge step and the
/// unordered pair is not yet connected; existing connections are never
/// altered. Merging the same document twice is a no-op the second time.
pub fn merge(diagram: &mut Diagram, document: &DiagramDocument) {
    for node in &document.nodes {
        if diagram.contains_node(&node.id) {
            continue;
        }
        diagram.add_node(
            node.id.clone(),
            node.name.clone(),
            node.node_type,
            node.details.clone(),
        );
    }

    for conn in &document.connections {
        if diagram.edge_kind(&conn.source, &conn.target).is_some() {
            continue;
        }
        if !diagram.contains_node(&conn.source) || !diagram.contains_node(&conn.target) {
            tracing::warn!(
                source = %conn.source,
                target = %conn.target,
                "skipping merged connection with unresolved endpoint"
            );
            continue;
        }
        // Endpoints verified above; add_edge cannot fail here.
        let _ = diagram.add_edge(&conn.source, &conn.target, conn.kind.clone());
    }
}

// =============================================================================
// TESTS
// =============================================================================
