//! # Graph Store
//!
//! The single source of truth for a diagram: nodes, edges, and their
//! typed attributes.
//!
//! The store is an explicitly-owned instance with no process-wide state;
//! the interpreter, codec, and layout optimizer all receive it by handle,
//! so multiple independent diagram sessions can coexist.
//!
//! Insertion order is preserved for both nodes and edges — the snapshot
//! projection is stable for diffing but not sorted.

use crate::codec::{ConnectionRecord, DiagramDocument, NodeRecord};
use crate::types::{Details, DiagramError, Edge, EdgeKind, Node, NodeType};

// =============================================================================
// MUTATION RESULTS
// =============================================================================

/// Outcome of an `add_edge` call that passed endpoint validation.
///
/// Re-adding an existing pair is not an error: the edge keeps its
/// identity and only its style is updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeUpdate {
    /// A new edge was inserted for this pair.
    Inserted,
    /// The pair was already connected; only the kind was updated.
    Restyled,
}

// =============================================================================
// DIAGRAM STORE
// =============================================================================

/// The diagram graph store.
///
/// Invariants upheld after every mutation:
/// 1. Every edge endpoint is a node currently in the store.
/// 2. At most one edge exists per unordered node pair.
/// 3. Node ids are unique.
/// 4. Removing a node removes every incident edge.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    /// Nodes in insertion order.
    nodes: Vec<Node>,
    /// Edges in insertion order, identified by unordered endpoint pair.
    edges: Vec<Edge>,
}

impl Diagram {
    /// Create a new empty diagram.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Insert or overwrite a node record.
    ///
    /// Always succeeds; re-adding an existing id overwrites its name,
    /// type, and details in place (last write wins) while preserving the
    /// node's insertion position and its edges. An empty `name` defaults
    /// to the id.
    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        node_type: NodeType,
        details: Details,
    ) {
        let id = id.into();
        let mut name = name.into();
        if name.is_empty() {
            name = id.clone();
        }
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(existing) => {
                existing.name = name;
                existing.node_type = node_type;
                existing.details = details;
            }
            None => self.nodes.push(Node::new(id, name, node_type, details)),
        }
    }

    /// Connect two existing nodes.
    ///
    /// Fails with `UnknownEndpoint` if either id is absent, leaving the
    /// store unchanged. If the unordered pair is already connected, the
    /// existing edge's kind is updated instead of inserting a duplicate.
    /// Self-loops are permitted; the layout treats them as degenerate.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        kind: EdgeKind,
    ) -> Result<EdgeUpdate, DiagramError> {
        let mut missing = Vec::new();
        if !self.contains_node(source) {
            missing.push(source.to_string());
        }
        if !self.contains_node(target) {
            missing.push(target.to_string());
        }
        if !missing.is_empty() {
            return Err(DiagramError::UnknownEndpoint(missing));
        }

        if let Some(existing) = self.edges.iter_mut().find(|e| e.matches_pair(source, target)) {
            existing.kind = kind;
            return Ok(EdgeUpdate::Restyled);
        }

        self.edges.push(Edge {
            source: source.to_string(),
            target: target.to_string(),
            kind,
        });
        Ok(EdgeUpdate::Inserted)
    }

    /// Remove a node and every edge incident to it.
    ///
    /// Returns `false` (not an error) when the id is absent. The node and
    /// its incident edges go together, so no dangling edge can survive.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() == before {
            return false;
        }
        self.edges.retain(|e| !e.touches(id));
        true
    }

    /// Remove the edge between two nodes, matching either endpoint order.
    ///
    /// Returns `false` when no such edge exists.
    pub fn remove_edge(&mut self, source: &str, target: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| !e.matches_pair(source, target));
        self.edges.len() != before
    }

    /// Clear all nodes and edges.
    ///
    /// The interpreter only invokes this on an already-empty store when a
    /// fresh "create diagram" intent arrives, so user work is never
    /// silently discarded.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Check whether a node id is present.
    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The kind of the edge connecting two nodes, in either order.
    #[must_use]
    pub fn edge_kind(&self, a: &str, b: &str) -> Option<&EdgeKind> {
        self.edges.iter().find(|e| e.matches_pair(a, b)).map(|e| &e.kind)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // SNAPSHOT
    // =========================================================================

    /// Project the store into a read-only Diagram Snapshot.
    ///
    /// The snapshot is computed from the live store on every call, so a
    /// mutation can never leave a stale projection behind. Ordering
    /// follows insertion order.
    #[must_use]
    pub fn snapshot(&self) -> DiagramDocument {
        DiagramDocument {
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeRecord {
                    id: n.id.clone(),
                    name: n.name.clone(),
                    node_type: n.node_type,
                    details: n.details.clone(),
                })
                .collect(),
            connections: self
                .edges
                .iter()
                .map(|e| ConnectionRecord {
                    source: e.source.clone(),
                    target: e.target.clone(),
                    kind: e.kind.clone(),
                })
                .collect(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::Details;

    fn add(diagram: &mut Diagram, id: &str, node_type: NodeType) {
        diagram.add_node(id, id, node_type, Details::new());
    }

    #[test]
    fn add_and_lookup_node() {
        let mut diagram = Diagram::new();
        add(&mut diagram, "r1", NodeType::Router);

        assert!(diagram.contains_node("r1"));
        assert_eq!(diagram.node("r1").map(|n| n.node_type), Some(NodeType::Router));
        assert_eq!(diagram.node_count(), 1);
    }

    #[test]
    fn add_node_overwrites_existing_id() {
        let mut diagram = Diagram::new();
        diagram.add_node("r1", "Router 1", NodeType::Router, Details::new());
        diagram.add_node("r1", "Core Router", NodeType::Firewall, Details::new());

        assert_eq!(diagram.node_count(), 1);
        let node = diagram.node("r1").expect("node");
        assert_eq!(node.name, "Core Router");
        assert_eq!(node.node_type, NodeType::Firewall);
    }

    #[test]
    fn add_node_empty_name_defaults_to_id() {
        let mut diagram = Diagram::new();
        diagram.add_node("s1", "", NodeType::Server, Details::new());
        assert_eq!(diagram.node("s1").map(|n| n.name.as_str()), Some("s1"));
    }

    #[test]
    fn add_edge_rejects_missing_endpoint() {
        let mut diagram = Diagram::new();
        add(&mut diagram, "r1", NodeType::Router);
        add(&mut diagram, "c1", NodeType::Computer);

        assert!(diagram.add_edge("c1", "r1", EdgeKind::Standard).is_ok());

        let err = diagram
            .add_edge("c1", "r2", EdgeKind::Standard)
            .expect_err("missing endpoint");
        assert!(matches!(err, DiagramError::UnknownEndpoint(ref m) if m == &vec!["r2".to_string()]));

        // Store unchanged: no edge was added and r2 was not created.
        assert_eq!(diagram.edge_count(), 1);
        assert!(!diagram.contains_node("r2"));
    }

    #[test]
    fn add_edge_duplicate_pair_restyles() {
        let mut diagram = Diagram::new();
        add(&mut diagram, "a", NodeType::Generic);
        add(&mut diagram, "b", NodeType::Generic);

        assert_eq!(
            diagram.add_edge("a", "b", EdgeKind::Standard).expect("add"),
            EdgeUpdate::Inserted
        );
        // Reversed order is the same unordered pair.
        assert_eq!(
            diagram.add_edge("b", "a", EdgeKind::Thick).expect("add"),
            EdgeUpdate::Restyled
        );

        assert_eq!(diagram.edge_count(), 1);
        assert_eq!(diagram.edge_kind("a", "b"), Some(&EdgeKind::Thick));
    }

    #[test]
    fn edge_lookup_matches_either_order() {
        let mut diagram = Diagram::new();
        add(&mut diagram, "a", NodeType::Generic);
        add(&mut diagram, "b", NodeType::Generic);
        diagram.add_edge("a", "b", EdgeKind::Green).expect("add");

        assert_eq!(diagram.edge_kind("b", "a"), Some(&EdgeKind::Green));
    }

    #[test]
    fn remove_node_cascades_incident_edges() {
        let mut diagram = Diagram::new();
        add(&mut diagram, "a", NodeType::Router);
        add(&mut diagram, "b", NodeType::Computer);
        add(&mut diagram, "c", NodeType::Computer);
        diagram.add_edge("a", "b", EdgeKind::Standard).expect("add");
        diagram.add_edge("a", "c", EdgeKind::Standard).expect("add");
        diagram.add_edge("b", "c", EdgeKind::Standard).expect("add");

        assert!(diagram.remove_node("a"));

        assert!(!diagram.contains_node("a"));
        assert!(diagram.contains_node("b"));
        assert!(diagram.contains_node("c"));
        assert_eq!(diagram.edge_count(), 1);
        assert!(diagram.edges().all(|e| !e.touches("a")));
    }

    #[test]
    fn remove_node_missing_returns_false() {
        let mut diagram = Diagram::new();
        assert!(!diagram.remove_node("ghost"));
    }

    #[test]
    fn remove_edge_matches_either_order() {
        let mut diagram = Diagram::new();
        add(&mut diagram, "a", NodeType::Generic);
        add(&mut diagram, "b", NodeType::Generic);
        diagram.add_edge("a", "b", EdgeKind::Standard).expect("add");

        assert!(diagram.remove_edge("b", "a"));
        assert_eq!(diagram.edge_count(), 0);
        assert!(!diagram.remove_edge("a", "b"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut diagram = Diagram::new();
        add(&mut diagram, "a", NodeType::Generic);
        add(&mut diagram, "b", NodeType::Generic);
        diagram.add_edge("a", "b", EdgeKind::Standard).expect("add");

        diagram.reset();

        assert!(diagram.is_empty());
        assert_eq!(diagram.edge_count(), 0);
    }

    #[test]
    fn self_loop_is_permitted() {
        let mut diagram = Diagram::new();
        add(&mut diagram, "a", NodeType::Generic);

        assert_eq!(
            diagram.add_edge("a", "a", EdgeKind::Standard).expect("add"),
            EdgeUpdate::Inserted
        );
        assert_eq!(diagram.edge_count(), 1);
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let mut diagram = Diagram::new();
        add(&mut diagram, "z", NodeType::Server);
        add(&mut diagram, "a", NodeType::Router);
        diagram.add_edge("z", "a", EdgeKind::Dashed).expect("add");

        let snapshot = diagram.snapshot();
        let ids: Vec<_> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);
        assert_eq!(snapshot.connections.len(), 1);
        assert_eq!(snapshot.connections[0].kind, EdgeKind::Dashed);
    }
}
