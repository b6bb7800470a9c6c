//! # Command Interpreter
//!
//! Validation and application protocol for oracle-produced mutation
//! payloads.
//!
//! - Classify caller intent before the oracle is consulted
//! - Tolerantly extract a payload from free-form oracle text
//! - Validate the whole payload against the store before applying
//! - Never partially apply a command that fails validation

use crate::codec::{ConnectionRecord, NodeRecord};
use crate::graph::Diagram;
use crate::primitives::REMOVAL_KEYWORDS;
use crate::types::DiagramError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// INTENT CLASSIFICATION
// =============================================================================

/// A caller intent that passed pre-oracle screening and is ready to be
/// sent to the oracle together with a description of the current state.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCommand {
    /// The intent text, verbatim.
    pub intent: String,
    /// Whether the intent was classified as a removal. Removal payloads
    /// are only accepted for intents classified this way.
    pub removal: bool,
    /// Textual description of the current store, for oracle context.
    pub state_description: String,
}

// =============================================================================
// PAYLOAD SHAPES
// =============================================================================

/// An update payload: nodes to add and connections to create.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

/// An unordered endpoint pair, as named in a removal payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointPair {
    pub source: String,
    pub target: String,
}

/// A removal payload: node ids and connection pairs to delete.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RemovalRequest {
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub connections: Vec<EndpointPair>,
}

/// A classified oracle payload, ready for validation.
#[derive(Debug, Clone, PartialEq)]
pub enum OraclePayload {
    Update(UpdateRequest),
    Removal(RemovalRequest),
}

/// The result of a successfully applied command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    /// Human-readable summary enumerating every id actually added or
    /// removed, using the ids as supplied.
    pub summary: String,
    /// The applied payload, re-serialized for audit and history.
    pub payload: Value,
}

// =============================================================================
// INTERPRETER
// =============================================================================

/// The Interpreter turns oracle payloads into validated mutation
/// sequences against a [`Diagram`].
///
/// The Interpreter:
/// - Screens intents too vague to act on before any oracle round-trip
/// - Parses oracle output tolerantly (fenced block, then raw JSON)
/// - Validates every referenced id, then applies in payload order
pub struct Interpreter;

impl Interpreter {
    /// Screen a caller intent and prepare the oracle request context.
    ///
    /// Side effects on the store:
    /// - "create ... diagram" / "new ... diagram" against an empty store
    ///   resets it to a clean slate before anything else happens.
    ///
    /// Returns `DiagramError::AmbiguousIntent` if the intent matches the
    /// bare "add <word> [to <word>]" shape, which carries too little
    /// detail to act on.
    pub fn prepare(diagram: &mut Diagram, intent: &str) -> Result<PreparedCommand, DiagramError> {
        let lowered = intent.to_lowercase();
        if (lowered.contains("create") || lowered.contains("new"))
            && lowered.contains("diagram")
            && diagram.is_empty()
        {
            diagram.reset();
        }

        if is_vague_add(intent) {
            return Err(DiagramError::AmbiguousIntent(
                "Please specify what to add and how to connect it. Example: \
                 'Add a server named xyz and connect it to router1'"
                    .to_string(),
            ));
        }

        let removal = REMOVAL_KEYWORDS.iter().any(|kw| lowered.contains(kw));
        Ok(PreparedCommand {
            intent: intent.to_string(),
            removal,
            state_description: diagram.snapshot().describe(),
        })
    }

    /// Extract and classify a payload from raw oracle output.
    ///
    /// Tolerant-parse pipeline: strip a fenced ```json block if present,
    /// otherwise parse the whole trimmed response; then classify the
    /// resulting object. Singular `node`/`connection` keys are accepted
    /// as aliases for the plural forms. A `{"error": ...}` payload is
    /// surfaced verbatim as `AmbiguousIntent`. A removal payload is only
    /// honored when the intent was classified as a removal.
    pub fn parse_payload(raw: &str, removal: bool) -> Result<OraclePayload, DiagramError> {
        let body = extract_json(raw);
        let value: Value = serde_json::from_str(body)
            .map_err(|e| DiagramError::MalformedOracleResponse(e.to_string()))?;
        let Value::Object(mut object) = value else {
            return Err(DiagramError::MalformedOracleResponse(
                "expected a JSON object".to_string(),
            ));
        };

        if let Some(message) = object.get("error") {
            let message = match message {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(DiagramError::AmbiguousIntent(message));
        }

        // Key-name normalization: tolerate singular variants.
        for (singular, plural) in [("node", "nodes"), ("connection", "connections")] {
            if object.contains_key(singular) && !object.contains_key(plural) {
                if let Some(v) = object.remove(singular) {
                    object.insert(plural.to_string(), v);
                }
            }
        }

        if removal && object.contains_key("remove") {
            let request: RemovalRequest = object
                .remove("remove")
                .map(serde_json::from_value)
                .transpose()
                .map_err(|e| DiagramError::MalformedOracleResponse(e.to_string()))?
                .unwrap_or_default();
            return Ok(OraclePayload::Removal(request));
        }

        if object.contains_key("nodes") || object.contains_key("connections") {
            let request: UpdateRequest = serde_json::from_value(Value::Object(object))
                .map_err(|e| DiagramError::MalformedOracleResponse(e.to_string()))?;
            return Ok(OraclePayload::Update(request));
        }

        Err(DiagramError::MalformedOracleResponse(
            "no nodes, connections, or removals were specified".to_string(),
        ))
    }

    /// Validate a payload against the store, then apply it.
    ///
    /// Validation covers the whole payload before the first mutation:
    /// a single invalid reference aborts the entire command with the
    /// full list of offenders and leaves the store untouched. Once
    /// validation passes, per-item mutation failures are logged and
    /// excluded from the summary rather than aborting the command.
    pub fn apply(diagram: &mut Diagram, payload: &OraclePayload) -> Result<CommandOutcome, DiagramError> {
        match payload {
            OraclePayload::Update(request) => Self::apply_update(diagram, request),
            OraclePayload::Removal(request) => Self::apply_removal(diagram, request),
        }
    }

    fn apply_update(
        diagram: &mut Diagram,
        request: &UpdateRequest,
    ) -> Result<CommandOutcome, DiagramError> {
        // New nodes in the same payload are valid endpoints: the whole
        // payload is one transaction.
        let resolves = |id: &str| {
            diagram.contains_node(id) || request.nodes.iter().any(|n| n.id == id)
        };
        let invalid: Vec<String> = request
            .connections
            .iter()
            .filter(|c| !resolves(&c.source) || !resolves(&c.target))
            .map(|c| format!("{}-{}", c.source, c.target))
            .collect();
        if !invalid.is_empty() {
            return Err(DiagramError::UnknownEndpoint(invalid));
        }

        let mut added_nodes = Vec::new();
        for node in &request.nodes {
            diagram.add_node(
                node.id.clone(),
                node.name.clone(),
                node.node_type,
                node.details.clone(),
            );
            added_nodes.push(node.id.clone());
        }

        let mut added_connections = Vec::new();
        for conn in &request.connections {
            match diagram.add_edge(&conn.source, &conn.target, conn.kind.clone()) {
                Ok(_) => added_connections.push(format!("{}-{}", conn.source, conn.target)),
                Err(e) => {
                    tracing::warn!(
                        source = %conn.source,
                        target = %conn.target,
                        error = %e,
                        "connection rejected after validation, skipping"
                    );
                }
            }
        }

        let mut summary = "Updated diagram with: ".to_string();
        if !added_nodes.is_empty() {
            summary.push_str(&format!("nodes [{}] ", added_nodes.join(", ")));
        }
        if !added_connections.is_empty() {
            summary.push_str(&format!("connections [{}]", added_connections.join(", ")));
        }

        Ok(CommandOutcome {
            summary,
            payload: serde_json::to_value(request)
                .map_err(|e| DiagramError::MalformedOracleResponse(e.to_string()))?,
        })
    }

    fn apply_removal(
        diagram: &mut Diagram,
        request: &RemovalRequest,
    ) -> Result<CommandOutcome, DiagramError> {
        let mut missing: Vec<String> = request
            .nodes
            .iter()
            .filter(|id| !diagram.contains_node(id))
            .cloned()
            .collect();
        missing.extend(
            request
                .connections
                .iter()
                .filter(|c| diagram.edge_kind(&c.source, &c.target).is_none())
                .map(|c| format!("{}-{}", c.source, c.target)),
        );
        if !missing.is_empty() {
            return Err(DiagramError::MissingRemovalTarget(missing));
        }

        let mut removed_nodes = Vec::new();
        for id in &request.nodes {
            if diagram.remove_node(id) {
                removed_nodes.push(id.clone());
            } else {
                tracing::warn!(node = %id, "node vanished after validation, skipping");
            }
        }

        let mut removed_connections = Vec::new();
        for conn in &request.connections {
            if diagram.remove_edge(&conn.source, &conn.target) {
                removed_connections.push(format!("{}-{}", conn.source, conn.target));
            } else {
                tracing::warn!(
                    source = %conn.source,
                    target = %conn.target,
                    "connection vanished after validation, skipping"
                );
            }
        }

        let mut summary = "Removed: ".to_string();
        if !removed_nodes.is_empty() {
            summary.push_str(&format!("nodes [{}] ", removed_nodes.join(", ")));
        }
        if !removed_connections.is_empty() {
            summary.push_str(&format!("connections [{}]", removed_connections.join(", ")));
        }

        Ok(CommandOutcome {
            summary,
            payload: serde_json::to_value(request)
                .map_err(|e| DiagramError::MalformedOracleResponse(e.to_string()))?,
        })
    }
}

/// Matches intents of the bare shape "add <word>" or "add <word> to
/// <word>", which name a thing but say nothing about how to place or
/// connect it.
fn is_vague_add(intent: &str) -> bool {
    fn is_word(token: &str) -> bool {
        !token.is_empty() && token.chars().all(|c| c.is_alphanumeric() || c == '_')
    }

    let tokens: Vec<&str> = intent.split_whitespace().collect();
    match tokens.as_slice() {
        [add, word] => add.eq_ignore_ascii_case("add") && is_word(word),
        [add, word, to, tail] => {
            add.eq_ignore_ascii_case("add")
                && is_word(word)
                && to.eq_ignore_ascii_case("to")
                && is_word(tail)
        }
        _ => false,
    }
}

/// Extract the contents of a fenced ```json block, or fall back to the
/// trimmed input.
fn extract_json(raw: &str) -> &str {
    if let Some(start) = raw.find("```json") {
        let rest = &raw[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
    }
    raw.trim()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::{Details, EdgeKind, NodeType};

    fn store_with_router() -> Diagram {
        let mut diagram = Diagram::new();
        diagram.add_node("r1", "Router 1", NodeType::Router, Details::new());
        diagram
    }

    // -------------------------------------------------------------------------
    // Intent screening
    // -------------------------------------------------------------------------

    #[test]
    fn prepare_rejects_vague_add_intents() {
        let mut diagram = Diagram::new();
        for intent in ["add server", "Add xyz to network", "  ADD thing to box  "] {
            assert!(matches!(
                Interpreter::prepare(&mut diagram, intent),
                Err(DiagramError::AmbiguousIntent(_))
            ));
        }
    }

    #[test]
    fn prepare_accepts_detailed_intents() {
        let mut diagram = store_with_router();
        let prepared = Interpreter::prepare(
            &mut diagram,
            "Add a server named web1 and connect it to r1",
        )
        .expect("prepare");
        assert!(!prepared.removal);
        assert!(prepared.state_description.contains("r1 (router)"));
    }

    #[test]
    fn prepare_classifies_removal_intents() {
        let mut diagram = store_with_router();
        for intent in [
            "remove r1",
            "please DELETE the router",
            "get rid of everything old",
        ] {
            let prepared = Interpreter::prepare(&mut diagram, intent).expect("prepare");
            assert!(prepared.removal, "{intent}");
        }
    }

    #[test]
    fn prepare_resets_only_an_empty_store() {
        let mut diagram = store_with_router();
        Interpreter::prepare(&mut diagram, "create a new diagram with two switches")
            .expect("prepare");
        // Non-empty store is left alone.
        assert!(diagram.contains_node("r1"));
    }

    // -------------------------------------------------------------------------
    // Payload extraction
    // -------------------------------------------------------------------------

    #[test]
    fn parse_strips_fenced_block() {
        let raw = "Here you go:\n```json\n{\"nodes\": [{\"id\": \"a\"}], \"connections\": []}\n```\nDone.";
        let payload = Interpreter::parse_payload(raw, false).expect("parse");
        match payload {
            OraclePayload::Update(req) => assert_eq!(req.nodes[0].id, "a"),
            OraclePayload::Removal(_) => panic!("misclassified"),
        }
    }

    #[test]
    fn parse_accepts_bare_json() {
        let payload = Interpreter::parse_payload("  {\"nodes\": [], \"connections\": []} ", false)
            .expect("parse");
        assert_eq!(payload, OraclePayload::Update(UpdateRequest::default()));
    }

    #[test]
    fn parse_normalizes_singular_keys() {
        let raw = "{\"node\": [{\"id\": \"a\"}], \"connection\": []}";
        let payload = Interpreter::parse_payload(raw, false).expect("parse");
        match payload {
            OraclePayload::Update(req) => assert_eq!(req.nodes.len(), 1),
            OraclePayload::Removal(_) => panic!("misclassified"),
        }
    }

    #[test]
    fn parse_surfaces_error_payload_verbatim() {
        let err = Interpreter::parse_payload("{\"error\": \"need more detail\"}", false)
            .expect_err("error payload");
        assert!(matches!(err, DiagramError::AmbiguousIntent(msg) if msg == "need more detail"));
    }

    #[test]
    fn parse_rejects_non_json_blobs() {
        assert!(matches!(
            Interpreter::parse_payload("sure, I added the server for you!", false),
            Err(DiagramError::MalformedOracleResponse(_))
        ));
        assert!(matches!(
            Interpreter::parse_payload("[1, 2, 3]", false),
            Err(DiagramError::MalformedOracleResponse(_))
        ));
    }

    #[test]
    fn parse_ignores_removal_shape_for_non_removal_intents() {
        let raw = "{\"remove\": {\"nodes\": [\"r1\"]}}";
        assert!(matches!(
            Interpreter::parse_payload(raw, false),
            Err(DiagramError::MalformedOracleResponse(_))
        ));
        assert!(matches!(
            Interpreter::parse_payload(raw, true),
            Ok(OraclePayload::Removal(_))
        ));
    }

    // -------------------------------------------------------------------------
    // Validation and application
    // -------------------------------------------------------------------------

    #[test]
    fn update_with_new_node_as_endpoint_succeeds() {
        let mut diagram = store_with_router();
        let raw = "{\"nodes\":[{\"id\":\"s1\",\"type\":\"server\"}],\
                    \"connections\":[{\"source\":\"s1\",\"target\":\"r1\",\"type\":\"thick\"}]}";
        let payload = Interpreter::parse_payload(raw, false).expect("parse");
        let outcome = Interpreter::apply(&mut diagram, &payload).expect("apply");

        assert_eq!(diagram.node_count(), 2);
        assert_eq!(diagram.edge_kind("s1", "r1"), Some(&EdgeKind::Thick));
        assert_eq!(
            outcome.summary,
            "Updated diagram with: nodes [s1] connections [s1-r1]"
        );
    }

    #[test]
    fn update_with_unknown_endpoint_applies_nothing() {
        let mut diagram = store_with_router();
        let payload = OraclePayload::Update(UpdateRequest {
            nodes: vec![NodeRecord {
                id: "s1".to_string(),
                name: String::new(),
                node_type: NodeType::Server,
                details: Details::new(),
            }],
            connections: vec![ConnectionRecord {
                source: "s1".to_string(),
                target: "ghost".to_string(),
                kind: EdgeKind::Standard,
            }],
        });

        let err = Interpreter::apply(&mut diagram, &payload).expect_err("invalid endpoint");
        assert!(matches!(
            err,
            DiagramError::UnknownEndpoint(pairs) if pairs == vec!["s1-ghost".to_string()]
        ));
        // Validate-then-apply: not even the valid node landed.
        assert_eq!(diagram.node_count(), 1);
        assert!(!diagram.contains_node("s1"));
    }

    #[test]
    fn removal_of_missing_targets_applies_nothing() {
        let mut diagram = store_with_router();
        let payload = OraclePayload::Removal(RemovalRequest {
            nodes: vec!["r1".to_string()],
            connections: vec![EndpointPair {
                source: "x".to_string(),
                target: "y".to_string(),
            }],
        });

        let err = Interpreter::apply(&mut diagram, &payload).expect_err("missing connection");
        assert!(matches!(
            err,
            DiagramError::MissingRemovalTarget(items) if items == vec!["x-y".to_string()]
        ));
        assert!(diagram.contains_node("r1"));
    }

    #[test]
    fn removal_matches_connections_in_either_order() {
        let mut diagram = store_with_router();
        diagram.add_node("c1", "PC 1", NodeType::Computer, Details::new());
        diagram.add_edge("c1", "r1", EdgeKind::Standard).expect("add");

        let payload = OraclePayload::Removal(RemovalRequest {
            nodes: vec![],
            connections: vec![EndpointPair {
                source: "r1".to_string(),
                target: "c1".to_string(),
            }],
        });
        let outcome = Interpreter::apply(&mut diagram, &payload).expect("apply");

        assert_eq!(diagram.edge_count(), 0);
        assert_eq!(outcome.summary, "Removed: connections [r1-c1]");
    }

    #[test]
    fn removal_of_nodes_cascades_and_summarizes() {
        let mut diagram = store_with_router();
        diagram.add_node("c1", "PC 1", NodeType::Computer, Details::new());
        diagram.add_edge("c1", "r1", EdgeKind::Standard).expect("add");

        let payload = OraclePayload::Removal(RemovalRequest {
            nodes: vec!["r1".to_string()],
            connections: vec![],
        });
        let outcome = Interpreter::apply(&mut diagram, &payload).expect("apply");

        assert!(!diagram.contains_node("r1"));
        assert_eq!(diagram.edge_count(), 0);
        assert_eq!(outcome.summary, "Removed: nodes [r1] ");
    }

    #[test]
    fn outcome_carries_payload_for_audit() {
        let mut diagram = Diagram::new();
        let payload = Interpreter::parse_payload(
            "{\"nodes\": [{\"id\": \"a\", \"name\": \"A\"}], \"connections\": []}",
            false,
        )
        .expect("parse");
        let outcome = Interpreter::apply(&mut diagram, &payload).expect("apply");
        assert_eq!(outcome.payload["nodes"][0]["id"], "a");
    }
}
