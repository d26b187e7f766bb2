//! Routing attempts and the randomized spanning-tree search.
//!
//! One attempt is a pure function of the graph and a spanning tree:
//! partition → rotation → trail. The search draws trees with the randomized
//! strategy, one reproducible seed per trial, and folds the results in trial
//! order, so a parallel run returns exactly what a sequential run returns.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::error::RouteError;
use crate::graph::Graph;

use super::cotree::partition;
use super::rotation::{build, KissingLoopSet, RotationSystem};
use super::trail::{extract, Trail};
use super::tree::{greedy_degree, randomized, SavedTree, SpanningTree};

/// How the spanning tree is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeStrategy {
    /// One deterministic greedy-degree attempt.
    Greedy,
    /// Randomized trials up to the budget.
    Randomized,
}

/// Search configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteCfg {
    pub strategy: TreeStrategy,
    /// Trial budget for the randomized strategy.
    pub trials: usize,
    /// Base seed; trial `i` uses `trial_seed(seed, i)`.
    pub seed: u64,
    /// Scores that stop the search immediately. Empirical cutoff, not an
    /// optimality bound.
    pub early_exit_scores: Vec<usize>,
    /// Evaluate each batch of trials on the rayon pool.
    pub parallel: bool,
    pub batch_size: usize,
}

impl Default for RouteCfg {
    fn default() -> Self {
        Self {
            strategy: TreeStrategy::Randomized,
            trials: 2000,
            seed: 0,
            early_exit_scores: vec![0, 2],
            parallel: true,
            batch_size: 64,
        }
    }
}

impl RouteCfg {
    fn validate(&self) -> Result<(), RouteError> {
        if self.strategy == TreeStrategy::Randomized && self.trials == 0 {
            return Err(RouteError::invalid_config("trials must be > 0"));
        }
        if self.batch_size == 0 {
            return Err(RouteError::invalid_config("batch_size must be > 0"));
        }
        Ok(())
    }
}

/// Summary of the attempt (and search) that produced a routing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStats {
    /// Kissing-loop half-edges.
    pub score: usize,
    pub components: usize,
    pub pairs: usize,
    pub unpaired: usize,
    /// Trials evaluated by the search (1 for a single attempt).
    pub trials_run: usize,
    /// Index of the winning trial, if the result came from the search.
    pub best_trial: Option<usize>,
    pub early_exit: bool,
}

/// Result of routing: the artifacts handed to downstream consumers.
#[derive(Clone, Debug)]
pub struct Routing {
    pub tree: SpanningTree,
    pub rotation: RotationSystem,
    pub kissing: KissingLoopSet,
    pub trail: Trail,
    pub stats: RouteStats,
}

impl Routing {
    pub fn score(&self) -> usize {
        self.kissing.len()
    }
}

/// Reject graphs that cannot be routed at all.
pub fn check_preconditions(graph: &Graph) -> Result<(), RouteError> {
    if graph.edge_count() == 0 {
        return Err(RouteError::EmptyGraph);
    }
    let reached = graph.reachable_count();
    if reached != graph.vertex_count() {
        return Err(RouteError::Disconnected {
            reached,
            total: graph.vertex_count(),
        });
    }
    Ok(())
}

/// One routing attempt for a fixed spanning tree.
pub fn route_with_tree(graph: &Graph, tree: SpanningTree) -> Result<Routing, RouteError> {
    let Some(start) = tree.first_half_edge(graph) else {
        return Err(RouteError::EmptyGraph);
    };
    let partition = partition(graph, &tree);
    let (rotation, kissing) = build(graph, &tree, &partition)?;
    let trail = extract(graph, &rotation, &kissing, start)?;
    let stats = RouteStats {
        score: kissing.len(),
        components: partition.components.len(),
        pairs: partition.pair_count(),
        unpaired: partition.unpaired_count(),
        trials_run: 1,
        best_trial: None,
        early_exit: false,
    };
    trace!(
        score = stats.score,
        components = stats.components,
        "routing attempt"
    );
    Ok(Routing {
        tree,
        rotation,
        kissing,
        trail,
        stats,
    })
}

/// Re-derive the routing of a saved spanning tree.
pub fn route_saved(graph: &Graph, saved: &SavedTree) -> Result<Routing, RouteError> {
    check_preconditions(graph)?;
    let tree = SpanningTree::load(graph, saved)?;
    route_with_tree(graph, tree)
}

/// Seed of trial `index` under base seed `seed` (SplitMix64-style mixing).
pub fn trial_seed(seed: u64, index: u64) -> u64 {
    fn mix(mut x: u64) -> u64 {
        x ^= x >> 30;
        x = x.wrapping_mul(0xbf58476d1ce4e5b9);
        x ^= x >> 27;
        x = x.wrapping_mul(0x94d049bb133111eb);
        x ^ (x >> 31)
    }
    mix(seed ^ mix(index.wrapping_add(0x9e3779b97f4a7c15)))
}

/// One randomized trial, replayable from its seed.
pub fn run_trial(graph: &Graph, seed: u64) -> Result<Routing, RouteError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let tree = randomized(graph, &mut rng)?;
    route_with_tree(graph, tree)
}

/// Route `graph` according to `cfg`, returning the best attempt.
pub fn route(graph: &Graph, cfg: &RouteCfg) -> Result<Routing, RouteError> {
    cfg.validate()?;
    check_preconditions(graph)?;
    match cfg.strategy {
        TreeStrategy::Greedy => {
            let routing = route_with_tree(graph, greedy_degree(graph)?)?;
            info!(score = routing.score(), "greedy routing");
            Ok(routing)
        }
        TreeStrategy::Randomized => search(graph, cfg),
    }
}

fn search(graph: &Graph, cfg: &RouteCfg) -> Result<Routing, RouteError> {
    let mut best: Option<(usize, Routing)> = None;
    let mut trials_run = 0;
    let mut early_exit = false;
    let mut next = 0;
    'batches: while next < cfg.trials {
        let end = (next + cfg.batch_size).min(cfg.trials);
        let eval = |i: usize| {
            let seed = trial_seed(cfg.seed, i as u64);
            (i, seed, run_trial(graph, seed))
        };
        let results: Vec<_> = if cfg.parallel {
            (next..end).into_par_iter().map(eval).collect()
        } else {
            (next..end).map(eval).collect()
        };
        next = end;
        for (index, seed, result) in results {
            let routing = result.map_err(|e| RouteError::Trial {
                index,
                seed,
                source: Box::new(e),
            })?;
            trials_run = index + 1;
            let score = routing.score();
            if best.as_ref().map_or(true, |(_, b)| score < b.score()) {
                debug!(trial = index, score, "new best routing");
                best = Some((index, routing));
            }
            if cfg.early_exit_scores.contains(&score) {
                early_exit = true;
                break 'batches;
            }
        }
    }

    let Some((index, mut routing)) = best else {
        return Err(RouteError::invalid_config("no trials were run"));
    };
    routing.stats.trials_run = trials_run;
    routing.stats.best_trial = Some(index);
    routing.stats.early_exit = early_exit;
    if early_exit {
        info!(
            trials = trials_run,
            best_trial = index,
            score = routing.score(),
            "search stopped early"
        );
    } else if routing.score() > 0 {
        warn!(
            trials = trials_run,
            best_trial = index,
            score = routing.score(),
            "trial budget exhausted"
        );
    }
    Ok(routing)
}
