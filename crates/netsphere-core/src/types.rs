//! # Core Type Definitions
//!
//! This module contains all core types for the Netsphere diagram engine:
//! - Typed node/edge vocabulary (`NodeType`, `EdgeKind`)
//! - Graph records (`Node`, `Edge`, `Scalar` detail values)
//! - Error types (`DiagramError`)
//!
//! ## Identity Rules
//!
//! - Node identity is a caller-chosen string id, unique across the store.
//! - Edge identity is the *unordered* pair of endpoint ids: `(a, b)` and
//!   `(b, a)` name the same edge.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// NODE TYPE
// =============================================================================

/// The fixed vocabulary of node types.
///
/// Parsing is case-insensitive and alias-aware (`client` → `Computer`,
/// `web_server` → `Server`, ...). Unknown values fall back to `Generic`
/// rather than failing, so external documents can never be rejected over
/// a type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Router,
    Switch,
    Server,
    Computer,
    Firewall,
    Cloud,
    Hub,
    EthernetSwitch,
    LoadBalancer,
    Database,
    WirelessAp,
    VoipPhone,
    Printer,
    Storage,
    #[default]
    Generic,
}

impl NodeType {
    /// Parse a type name, case-insensitively, mapping aliases and falling
    /// back to `Generic` for anything unrecognized.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "router" => Self::Router,
            "switch" => Self::Switch,
            "server" | "web_server" => Self::Server,
            "computer" | "client" => Self::Computer,
            "firewall" => Self::Firewall,
            "cloud" => Self::Cloud,
            "hub" => Self::Hub,
            "ethernet_switch" => Self::EthernetSwitch,
            "load_balancer" => Self::LoadBalancer,
            "database" | "db" | "database_server" => Self::Database,
            "wireless_ap" | "wifi" => Self::WirelessAp,
            "voip_phone" | "phone" => Self::VoipPhone,
            "printer" => Self::Printer,
            "storage" | "nas" => Self::Storage,
            _ => Self::Generic,
        }
    }

    /// The canonical snake_case name used in documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Router => "router",
            Self::Switch => "switch",
            Self::Server => "server",
            Self::Computer => "computer",
            Self::Firewall => "firewall",
            Self::Cloud => "cloud",
            Self::Hub => "hub",
            Self::EthernetSwitch => "ethernet_switch",
            Self::LoadBalancer => "load_balancer",
            Self::Database => "database",
            Self::WirelessAp => "wireless_ap",
            Self::VoipPhone => "voip_phone",
            Self::Printer => "printer",
            Self::Storage => "storage",
            Self::Generic => "generic",
        }
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<NodeType> for String {
    fn from(t: NodeType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// EDGE KIND
// =============================================================================

/// Connection style tag.
///
/// The fixed styles are `standard`, `dashed`, `thick`, `red`, `green`
/// and `wireless`. Unrecognized values are not errors: they pass through
/// as a literal style key (`Custom`) consumed by the render layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum EdgeKind {
    #[default]
    Standard,
    Dashed,
    Thick,
    Red,
    Green,
    Wireless,
    Custom(String),
}

impl EdgeKind {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "standard" => Self::Standard,
            "dashed" => Self::Dashed,
            "thick" => Self::Thick,
            "red" => Self::Red,
            "green" => Self::Green,
            "wireless" => Self::Wireless,
            other => Self::Custom(other.to_string()),
        }
    }

    /// The literal style key as written in documents.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Standard => "standard",
            Self::Dashed => "dashed",
            Self::Thick => "thick",
            Self::Red => "red",
            Self::Green => "green",
            Self::Wireless => "wireless",
            Self::Custom(s) => s,
        }
    }
}

impl From<String> for EdgeKind {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<EdgeKind> for String {
    fn from(k: EdgeKind) -> Self {
        k.as_str().to_string()
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// DETAIL VALUES
// =============================================================================

/// A scalar detail value attached to a node.
///
/// Details are display-only metadata; the store enforces no invariants
/// on their contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Open mapping from detail key to scalar value.
pub type Details = BTreeMap<String, Scalar>;

// =============================================================================
// NODE & EDGE RECORDS
// =============================================================================

/// A node in the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Caller-chosen unique identifier.
    pub id: String,
    /// Display label. Defaults to `id` when not supplied.
    pub name: String,
    /// Presentation type from the fixed vocabulary.
    pub node_type: NodeType,
    /// Display-only metadata.
    pub details: Details,
}

impl Node {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        node_type: NodeType,
        details: Details,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type,
            details,
        }
    }
}

/// An edge between two nodes.
///
/// Stored with the endpoint order it was supplied in, but identified by
/// the unordered pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

impl Edge {
    /// Whether this edge connects the given pair, in either order.
    #[must_use]
    pub fn matches_pair(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    /// Whether this edge touches the given node.
    #[must_use]
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors produced by the diagram engine.
///
/// All failures are local and descriptive: they enumerate the specific
/// offending identifiers and never abort the process. The worst outcome
/// is "command had no effect, here is why".
#[derive(Debug, Error)]
pub enum DiagramError {
    /// One or more connections reference node ids absent from the store
    /// (and, for command payloads, absent from the payload's own nodes).
    #[error("cannot create connections with missing endpoints: {}", .0.join(", "))]
    UnknownEndpoint(Vec<String>),

    /// An import/merge input failed top-level shape validation.
    #[error("malformed diagram document: {0}")]
    MalformedDocument(String),

    /// The oracle's output could not be parsed into a recognized payload.
    #[error("unrecognizable oracle response: {0}")]
    MalformedOracleResponse(String),

    /// The oracle declined via an error payload, or the pre-oracle
    /// too-little-detail heuristic fired.
    #[error("{0}")]
    AmbiguousIntent(String),

    /// A removal payload named nodes or connections absent from the store.
    #[error("cannot remove missing targets: {}", .0.join(", "))]
    MissingRemovalTarget(Vec<String>),

    /// A file read/write failed (app layer).
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================
