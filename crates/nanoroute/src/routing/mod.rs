//! Routing engine: spanning tree → co-tree pairing → rotation system → trail.
//!
//! Purpose
//! - Compute one closed traversal that uses every edge once in each direction
//!   and can be folded as a single strand, with as few kissing-loop junctions
//!   as the chosen spanning tree allows.
//!
//! Stages
//! - `tree`: greedy-degree and randomized spanning trees; saved form.
//! - `cotree`: components of the non-tree edges and their edge pairings.
//! - `rotation`: per-vertex half-edge order with pairs spliced in, plus the
//!   kissing-loop half-edges left over.
//! - `trail`: the single walk over the finished rotation.
//! - `search`: one attempt per tree, and the randomized trial search.
//!
//! Every unpaired co-tree edge costs two kissing-loop half-edges, so the score
//! of a tree is twice the number of co-tree components with an odd edge count.

mod cotree;
mod rotation;
mod search;
mod trail;
mod tree;

pub use cotree::{components, pair_component, partition, CoTreeComponent, EdgePairing, Partition};
pub use rotation::{build as build_rotation, KissingLoopSet, RotationSystem};
pub use search::{
    check_preconditions, route, route_saved, route_with_tree, run_trial, trial_seed, RouteCfg,
    RouteStats, Routing, TreeStrategy,
};
pub use trail::{extract as extract_trail, step as trail_step, Trail};
pub use tree::{greedy_degree, randomized as randomized_tree, SavedTree, SpanningTree};

#[cfg(test)]
mod tests;
