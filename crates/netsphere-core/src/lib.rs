//! # netsphere-core
//!
//! The deterministic diagram engine for Netsphere - THE LOGIC.
//!
//! This crate implements the diagram state engine: an insertion-ordered
//! entity/relationship graph store, a JSON state codec with merge,
//! import and export, a command interpreter that validates and applies
//! oracle-produced mutation payloads, and a force-directed layout
//! optimizer.
//!
//! ## Architectural Constraints
//!
//! The engine:
//! - Is the ONLY place where diagram state exists (stateful)
//! - Never calls out: oracle and render collaborators live in the app
//! - Validates whole payloads before applying any mutation
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod codec;
pub mod command;
pub mod graph;
pub mod layout;
pub mod primitives;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Details, DiagramError, Edge, EdgeKind, Node, NodeType, Scalar};

// =============================================================================
// RE-EXPORTS: Diagram Engine
// =============================================================================

pub use codec::{ConnectionRecord, DiagramDocument, NodeRecord};
pub use command::{
    CommandOutcome, EndpointPair, Interpreter, OraclePayload, PreparedCommand, RemovalRequest,
    UpdateRequest,
};
pub use graph::{Diagram, EdgeUpdate};
pub use layout::{Layout, LayoutConfig, Point};
