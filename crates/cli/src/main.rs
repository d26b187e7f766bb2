mod mesh;
mod provenance;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nanoroute::prelude::*;
use nanoroute::routing::RouteStats;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nanoroute-cli")]
#[command(about = "Route a single strand through a polyhedral mesh")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Route a mesh and write the routing report plus provenance sidecar
    Route {
        /// Mesh file (.obj or .json)
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Re-derive the routing from a saved spanning tree instead of searching
        #[arg(long)]
        tree: Option<PathBuf>,
        #[arg(long, default_value_t = 2000)]
        trials: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Single greedy-degree attempt
        #[arg(long)]
        greedy: bool,
        /// Evaluate trials on the calling thread
        #[arg(long)]
        sequential: bool,
        /// Spend the whole trial budget
        #[arg(long)]
        no_early_exit: bool,
    },
    /// Search for a spanning tree and save only the tree
    Tree {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 2000)]
        trials: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        greedy: bool,
    },
    /// Print a small provenance JSON block
    Report,
}

/// What downstream builders read: tree, breaks and strand path.
#[derive(Serialize)]
struct RouteReport {
    score: usize,
    stats: RouteStats,
    tree: SavedTree,
    kissing: Vec<usize>,
    trail: Vec<usize>,
    strand_vertices: Vec<usize>,
}

impl RouteReport {
    fn new(graph: &Graph, routing: &Routing) -> Self {
        Self {
            score: routing.score(),
            stats: routing.stats.clone(),
            tree: routing.tree.save(),
            kissing: routing.kissing.iter().map(|h| h.0).collect(),
            trail: routing.trail.iter().map(|h| h.0).collect(),
            strand_vertices: routing
                .trail
                .vertices(graph)
                .into_iter()
                .map(|v| v.0)
                .collect(),
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Route {
            input,
            out,
            tree,
            trials,
            seed,
            greedy,
            sequential,
            no_early_exit,
        } => {
            let mut cfg = config(trials, seed, greedy);
            cfg.parallel = !sequential;
            if no_early_exit {
                cfg.early_exit_scores.clear();
            }
            route_mesh(&input, &out, tree.as_deref(), &cfg)
        }
        Action::Tree {
            input,
            out,
            trials,
            seed,
            greedy,
        } => save_tree(&input, &out, &config(trials, seed, greedy)),
        Action::Report => report(),
    }
}

fn config(trials: usize, seed: u64, greedy: bool) -> RouteCfg {
    RouteCfg {
        strategy: if greedy {
            TreeStrategy::Greedy
        } else {
            TreeStrategy::Randomized
        },
        trials,
        seed,
        ..RouteCfg::default()
    }
}

fn load_graph(input: &Path) -> Result<Graph> {
    let mesh = mesh::load(input)?;
    let graph = mesh.to_graph()?;
    tracing::info!(
        input = %input.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "mesh loaded"
    );
    Ok(graph)
}

fn route_mesh(input: &Path, out: &Path, tree: Option<&Path>, cfg: &RouteCfg) -> Result<()> {
    let graph = load_graph(input)?;
    let routing = match tree {
        Some(tree_path) => {
            let text = fs::read_to_string(tree_path)
                .with_context(|| format!("reading saved tree {}", tree_path.display()))?;
            let saved: SavedTree = serde_json::from_str(&text)
                .with_context(|| format!("parsing saved tree {}", tree_path.display()))?;
            route_saved(&graph, &saved)?
        }
        None => route(&graph, cfg)?,
    };
    tracing::info!(
        score = routing.score(),
        trials = routing.stats.trials_run,
        trail_len = routing.trail.len(),
        "routed"
    );

    write_json(out, &RouteReport::new(&graph, &routing))?;
    let mut payload = provenance::Payload::new(serde_json::to_value(cfg)?)
        .with_input(input.to_string_lossy());
    if let Some(tree_path) = tree {
        payload = payload.with_input(tree_path.to_string_lossy());
    }
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

fn save_tree(input: &Path, out: &Path, cfg: &RouteCfg) -> Result<()> {
    let graph = load_graph(input)?;
    let routing = route(&graph, cfg)?;
    tracing::info!(score = routing.score(), "tree selected");
    write_json(out, &routing.tree.save())?;
    provenance::write_sidecar(
        out,
        provenance::Payload::new(serde_json::to_value(cfg)?).with_input(input.to_string_lossy()),
    )?;
    Ok(())
}

fn write_json<T: Serialize>(out: &Path, value: &T) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(out, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", out.display()))
}

fn report() -> Result<()> {
    let obj = provenance::block(serde_json::json!({}), &[]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
