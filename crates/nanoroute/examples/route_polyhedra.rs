//! Route the reference polyhedra and print score and strand vertex order.

use nanoroute::prelude::*;
use nanoroute::shapes;

fn main() -> Result<(), RouteError> {
    let cases = [
        ("tetrahedron", shapes::tetrahedron()),
        ("cube", shapes::cube()),
        ("octahedron", shapes::octahedron()),
        ("pentagonal prism", shapes::prism(5)),
    ];
    for (name, graph) in cases {
        let routing = route(&graph, &RouteCfg::default())?;
        let strand: Vec<usize> = routing
            .trail
            .vertices(&graph)
            .into_iter()
            .map(|v| v.0)
            .collect();
        println!(
            "{name}: {} trials, {} kissing-loop half-edges, strand {:?}",
            routing.stats.trials_run,
            routing.score(),
            strand
        );
    }
    Ok(())
}
