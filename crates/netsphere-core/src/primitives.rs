//! # Engine Constants
//!
//! Hardcoded runtime constants for the Netsphere diagram engine.
//!
//! The layout tuning values are explicit configuration, not magic
//! constants scattered through the optimizer: `LayoutConfig::default()`
//! is built from the values defined here.

// =============================================================================
// LAYOUT TUNING
// =============================================================================

/// Number of relaxation passes the layout optimizer runs.
///
/// Fixed-iteration by design: the optimizer is bounded, not convergent.
pub const LAYOUT_ITERATIONS: usize = 50;

/// Repulsion strength between every pair of nodes (force ∝ 1/distance²).
pub const LAYOUT_REPULSION: f64 = 0.001;

/// Attraction strength along edges (force ∝ distance).
pub const LAYOUT_ATTRACTION: f64 = 0.002;

/// Scale applied to the net force before moving a node each pass.
pub const LAYOUT_STEP: f64 = 0.1;

/// Distance floor used wherever a pairwise distance feeds a division.
pub const LAYOUT_MIN_DISTANCE: f64 = 0.01;

/// Horizontal clamp bounds for node positions in the unit square.
pub const LAYOUT_X_BOUNDS: (f64, f64) = (0.05, 0.95);

/// Vertical clamp bounds for node positions in the unit square.
pub const LAYOUT_Y_BOUNDS: (f64, f64) = (0.10, 0.90);

/// Seeded jitter half-width applied to initial x positions.
pub const LAYOUT_JITTER_X: f64 = 0.05;

/// Seeded jitter half-width applied to initial y positions.
pub const LAYOUT_JITTER_Y: f64 = 0.20;

// =============================================================================
// COMMAND PROTOCOL
// =============================================================================

/// How many prior intent/response turns the oracle is given.
pub const ORACLE_HISTORY_WINDOW: usize = 5;

/// Vocabulary that classifies an intent as a removal before the oracle
/// is consulted.
pub const REMOVAL_KEYWORDS: &[&str] = &["remove", "delete", "eliminate", "get rid of"];
