//! # Layout Optimizer
//!
//! Bounded force-directed placement for diagram rendering.
//!
//! Positions live in the unit square and are not part of persisted
//! state; the optimizer is a pure function of a snapshot and a seed, so
//! it can be recomputed on every render. Callers must snapshot the
//! store first rather than laying out a store that is being mutated.

use crate::codec::DiagramDocument;
use crate::primitives::{
    LAYOUT_ATTRACTION, LAYOUT_ITERATIONS, LAYOUT_JITTER_X, LAYOUT_JITTER_Y, LAYOUT_MIN_DISTANCE,
    LAYOUT_REPULSION, LAYOUT_STEP, LAYOUT_X_BOUNDS, LAYOUT_Y_BOUNDS,
};
use serde::Serialize;
use std::collections::BTreeMap;

// =============================================================================
// TYPES
// =============================================================================

/// A node position in the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Node id to position mapping for one render.
pub type Layout = BTreeMap<String, Point>;

/// Tunable parameters of the relaxation.
///
/// The defaults are sized for the small diagrams this engine targets;
/// they are configuration, not invariants, and callers may override any
/// of them per render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Number of relaxation sweeps.
    pub iterations: usize,
    /// Repulsion coefficient; force falls off with squared distance.
    pub repulsion: f64,
    /// Attraction coefficient; force grows with distance.
    pub attraction: f64,
    /// Fraction of the accumulated force applied per sweep.
    pub step: f64,
    /// Distance floor guarding the repulsion term against coincident
    /// nodes.
    pub min_distance: f64,
    /// Horizontal clamp, `(lo, hi)`.
    pub x_bounds: (f64, f64),
    /// Vertical clamp, `(lo, hi)`.
    pub y_bounds: (f64, f64),
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: LAYOUT_ITERATIONS,
            repulsion: LAYOUT_REPULSION,
            attraction: LAYOUT_ATTRACTION,
            step: LAYOUT_STEP,
            min_distance: LAYOUT_MIN_DISTANCE,
            x_bounds: LAYOUT_X_BOUNDS,
            y_bounds: LAYOUT_Y_BOUNDS,
        }
    }
}

// =============================================================================
// COMPUTATION
// =============================================================================

/// Compute positions for every node in the snapshot.
///
/// Nodes start spread evenly across the horizontal axis with seeded
/// jitter, then relax under pairwise repulsion and edge attraction for
/// a fixed number of sweeps. Deterministic for a given snapshot, config
/// and seed.
#[must_use]
pub fn compute(snapshot: &DiagramDocument, config: &LayoutConfig, seed: u64) -> Layout {
    let ids: Vec<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
    let n = ids.len();
    if n == 0 {
        return Layout::new();
    }

    let mut rng = SplitMix64::new(seed);
    let mut positions: Vec<Point> = (0..n)
        .map(|i| {
            let x = (i as f64 + 1.0) / (n as f64 + 1.0) + rng.uniform(-LAYOUT_JITTER_X, LAYOUT_JITTER_X);
            let y = 0.5 + rng.uniform(-LAYOUT_JITTER_Y, LAYOUT_JITTER_Y);
            Point {
                x: x.clamp(0.1, 0.9),
                y: y.clamp(0.1, 0.9),
            }
        })
        .collect();

    if n > 1 {
        let index: BTreeMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
        for conn in &snapshot.connections {
            let (Some(&a), Some(&b)) = (
                index.get(conn.source.as_str()),
                index.get(conn.target.as_str()),
            ) else {
                continue;
            };
            if a == b {
                continue;
            }
            neighbors[a].push(b);
            neighbors[b].push(a);
        }

        for _ in 0..config.iterations {
            for i in 0..n {
                let mut force_x = 0.0;
                let mut force_y = 0.0;

                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let dx = positions[i].x - positions[j].x;
                    let dy = positions[i].y - positions[j].y;
                    let distance = dx.hypot(dy).max(config.min_distance);
                    let force = config.repulsion / (distance * distance);
                    force_x += dx * force;
                    force_y += dy * force;
                }

                for &j in &neighbors[i] {
                    let dx = positions[j].x - positions[i].x;
                    let dy = positions[j].y - positions[i].y;
                    let distance = dx.hypot(dy).max(config.min_distance);
                    let force = config.attraction * distance;
                    force_x += dx * force;
                    force_y += dy * force;
                }

                // Positions update within the sweep, so later nodes see
                // earlier nodes' fresh positions.
                positions[i] = Point {
                    x: (positions[i].x + force_x * config.step)
                        .clamp(config.x_bounds.0, config.x_bounds.1),
                    y: (positions[i].y + force_y * config.step)
                        .clamp(config.y_bounds.0, config.y_bounds.1),
                };
            }
        }
    }

    ids.iter()
        .zip(positions)
        .map(|(id, p)| ((*id).to_string(), p))
        .collect()
}

// =============================================================================
// SEEDED JITTER
// =============================================================================

/// SplitMix64 generator for reproducible initial jitter.
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform sample in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + unit * (hi - lo)
    }
}

// =============================================================================
// TESTS
// =============================================================================
