//! Routing tests: concrete polyhedra, hand-built splices, and properties over
//! random embedded graphs.

use super::*;
use crate::error::RouteError;
use crate::graph::{EdgeId, Graph, HalfEdgeId, VertexId};
use crate::shapes;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn edge(g: &Graph, a: usize, b: usize) -> EdgeId {
    g.edges()
        .find(|&e| {
            let (x, y) = g.endpoints(e);
            (x.0, y.0) == (a.min(b), a.max(b))
        })
        .expect("edge exists")
}

/// Half-edge from `a` towards `b`.
fn he(g: &Graph, a: usize, b: usize) -> HalfEdgeId {
    g.outward_half_edge(edge(g, a, b), VertexId(a)).unwrap()
}

fn tree_of(g: &Graph, pairs: &[(usize, usize)]) -> SpanningTree {
    SpanningTree::from_edges(g, pairs.iter().map(|&(a, b)| edge(g, a, b))).unwrap()
}

fn sequential(trials: usize, seed: u64) -> RouteCfg {
    RouteCfg {
        trials,
        seed,
        parallel: false,
        ..RouteCfg::default()
    }
}

/// Structural checks every routing must pass.
fn assert_valid(g: &Graph, r: &Routing) {
    let n = g.vertex_count();
    assert_eq!(r.tree.len(), n - 1);
    assert!(SpanningTree::from_edges(g, r.tree.edges().iter().copied()).is_ok());
    r.rotation.check_complete(g).unwrap();
    for v in g.vertices() {
        let mut got = r.rotation.rotation(v).to_vec();
        let mut want = g.native_order(v).to_vec();
        got.sort();
        want.sort();
        assert_eq!(got, want);
    }
    assert_eq!(r.trail.len(), 2 * g.edge_count());
    assert!(r.trail.covers(g));
    assert!(r.trail.is_closed(g, &r.rotation, &r.kissing));
    // Kissing loops come in whole edges, never on tree edges.
    for h in r.kissing.iter() {
        assert!(r.kissing.contains(g.twin(h)));
        assert!(!r.tree.contains(g.edge(h)));
    }
    assert_eq!(r.score(), r.kissing.len());
    assert_eq!(r.score() % 2, 0);
}

// ---------- spanning trees ----------

#[test]
fn greedy_tree_on_bowtie_is_star_at_hub() {
    let g = shapes::bowtie();
    let t = greedy_degree(&g).unwrap();
    assert_eq!(t.len(), 4);
    for &e in t.edges() {
        let (a, _) = g.endpoints(e);
        assert_eq!(a, VertexId(0));
    }
}

#[test]
fn greedy_tree_is_deterministic() {
    let g = shapes::octahedron();
    assert_eq!(greedy_degree(&g).unwrap(), greedy_degree(&g).unwrap());
}

#[test]
fn randomized_tree_spans() {
    let g = shapes::cube();
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let t = randomized_tree(&g, &mut rng).unwrap();
        assert_eq!(t.len(), 7);
    }
}

#[test]
fn tree_validation_rejects_non_trees() {
    let g = shapes::tetrahedron();
    let cycle = SpanningTree::from_edges(&g, [edge(&g, 0, 1), edge(&g, 1, 2), edge(&g, 0, 2)]);
    assert!(matches!(cycle, Err(RouteError::InvalidTree { .. })));
    let short = SpanningTree::from_edges(&g, [edge(&g, 0, 1), edge(&g, 1, 2)]);
    assert!(matches!(short, Err(RouteError::InvalidTree { .. })));
    let dup = SpanningTree::from_edges(&g, [edge(&g, 0, 1), edge(&g, 0, 1), edge(&g, 1, 2)]);
    assert!(matches!(dup, Err(RouteError::InvalidTree { .. })));
    let range = SpanningTree::load(&g, &SavedTree { edges: vec![0, 1, 99] });
    assert!(matches!(range, Err(RouteError::InvalidTree { .. })));
}

#[test]
fn disconnected_graph_fails_before_routing() {
    let g = Graph::from_neighbor_order(vec![vec![1], vec![0], vec![3], vec![2]]).unwrap();
    assert!(matches!(
        greedy_degree(&g),
        Err(RouteError::Disconnected {
            reached: 2,
            total: 4
        })
    ));
    let err = route(&g, &RouteCfg::default()).unwrap_err();
    assert!(matches!(err, RouteError::Disconnected { .. }));
    assert!(!err.is_inconsistency());
}

#[test]
fn empty_graph_fails_before_routing() {
    let g = Graph::from_neighbor_order(vec![vec![], vec![]]).unwrap();
    assert!(matches!(
        route(&g, &RouteCfg::default()),
        Err(RouteError::EmptyGraph)
    ));
}

#[test]
fn zero_trial_budget_is_rejected() {
    let g = shapes::tetrahedron();
    let cfg = RouteCfg {
        trials: 0,
        ..RouteCfg::default()
    };
    assert!(matches!(
        route(&g, &cfg),
        Err(RouteError::InvalidConfig { .. })
    ));
}

// ---------- co-tree partition ----------

#[test]
fn triangle_leaves_one_isolated_edge() {
    let g = shapes::triangle();
    let t = tree_of(&g, &[(0, 1), (1, 2)]);
    let p = partition(&g, &t);
    assert_eq!(p.components.len(), 1);
    assert_eq!(p.components[0].edges, vec![edge(&g, 0, 2)]);
    assert_eq!(
        p.pairings[0],
        vec![EdgePairing {
            first: edge(&g, 0, 2),
            second: None
        }]
    );
}

#[test]
fn bowtie_leftovers_stay_separate() {
    let g = shapes::bowtie();
    let t = tree_of(&g, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
    let p = partition(&g, &t);
    assert_eq!(p.components.len(), 2);
    assert!(p.components.iter().all(|c| c.edges.len() == 1));
    assert_eq!(p.unpaired_count(), 2);
    assert_eq!(p.pair_count(), 0);
}

#[test]
fn bowtie_leftovers_meeting_at_hub_are_paired() {
    let g = shapes::bowtie();
    let t = tree_of(&g, &[(0, 2), (1, 2), (0, 4), (3, 4)]);
    let p = partition(&g, &t);
    assert_eq!(p.components.len(), 1);
    assert_eq!(p.pair_count(), 1);
    assert_eq!(p.unpaired_count(), 0);
}

#[test]
fn odd_path_component_pairs_through_parent_edge() {
    // Path 0-1-2-3 as the co-tree of a star centred at 4.
    let g = Graph::from_neighbor_order(vec![
        vec![1, 4],
        vec![0, 2, 4],
        vec![1, 3, 4],
        vec![2, 4],
        vec![0, 1, 2, 3],
    ])
    .unwrap();
    let t = tree_of(&g, &[(4, 0), (4, 1), (4, 2), (4, 3)]);
    let comps = components(&g, &t);
    assert_eq!(comps.len(), 1);
    let pairs = pair_component(&g, &comps[0]);
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs.iter().filter(|p| p.is_pair()).count(), 1);
    for p in pairs.iter().filter(|p| p.is_pair()) {
        assert!(g.common_vertex(p.first, p.second.unwrap()).is_some());
    }
}

// ---------- rotation splicing ----------

#[test]
fn would_bisect_on_split_bowtie() {
    // Tree 0-2, 1-2, 0-4, 3-4 with edge 0-1 appended at both ends. The orbit
    // of 1->0 is {1->0, 0->2, 2->1}; 3->4 lies in the other orbit.
    let g = shapes::bowtie();
    let lists = vec![
        vec![he(&g, 0, 2), he(&g, 0, 4), he(&g, 0, 1)],
        vec![he(&g, 1, 2), he(&g, 1, 0)],
        vec![he(&g, 2, 1), he(&g, 2, 0)],
        vec![he(&g, 3, 4)],
        vec![he(&g, 4, 3), he(&g, 4, 0)],
    ];
    let rot = RotationSystem::from_lists(&g, lists).unwrap();
    assert!(!rot.would_bisect(&g, he(&g, 1, 0), he(&g, 3, 4)).unwrap());
    assert!(rot.would_bisect(&g, he(&g, 1, 0), he(&g, 0, 2)).unwrap());
    assert!(rot.would_bisect(&g, he(&g, 1, 0), he(&g, 2, 1)).unwrap());
    assert!(rot.would_bisect(&g, he(&g, 0, 1), he(&g, 3, 4)).unwrap());
    assert!(!rot.would_bisect(&g, he(&g, 0, 1), he(&g, 0, 2)).unwrap());
}

#[test]
fn would_bisect_on_tree_reaches_everything() {
    let g = shapes::cube();
    let t = greedy_degree(&g).unwrap();
    let rot = RotationSystem::from_tree(&g, &t);
    let start = t.first_half_edge(&g).unwrap();
    for &e in t.edges() {
        let (h0, h1) = g.half_edges(e);
        assert!(rot.would_bisect(&g, start, h0).unwrap());
        assert!(rot.would_bisect(&g, start, h1).unwrap());
    }
}

#[test]
fn splice_keeps_one_orbit_in_both_directions() {
    let g = shapes::bowtie();
    let t = tree_of(&g, &[(0, 2), (1, 2), (0, 4), (3, 4)]);
    let (e01, e03) = (edge(&g, 0, 1), edge(&g, 0, 3));

    // Marker outside the first orbit: the new half-edge goes after 0->1.
    let mut rot = RotationSystem::from_tree(&g, &t);
    rot.splice_pair(&g, e01, e03).unwrap();
    assert_eq!(
        rot.rotation(VertexId(0)),
        &[he(&g, 0, 2), he(&g, 0, 4), he(&g, 0, 1), he(&g, 0, 3)]
    );
    assert_eq!(rot.rotation(VertexId(3)), &[he(&g, 3, 0), he(&g, 3, 4)]);
    let kissing = rot.augment(&g).unwrap();
    assert!(kissing.is_empty());
    let trail = extract_trail(&g, &rot, &kissing, he(&g, 0, 2)).unwrap();
    assert_eq!(trail.len(), 12);
    assert_eq!(
        &trail.as_slice()[..4],
        &[he(&g, 0, 2), he(&g, 2, 1), he(&g, 1, 0), he(&g, 0, 3)]
    );

    // Marker inside the first orbit: the new half-edge goes before 0->3.
    let mut rot = RotationSystem::from_tree(&g, &t);
    rot.splice_pair(&g, e03, e01).unwrap();
    assert_eq!(
        rot.rotation(VertexId(0)),
        &[he(&g, 0, 2), he(&g, 0, 4), he(&g, 0, 1), he(&g, 0, 3)]
    );
    assert_eq!(rot.rotation(VertexId(1)), &[he(&g, 1, 0), he(&g, 1, 2)]);
    let kissing = rot.augment(&g).unwrap();
    let trail = extract_trail(&g, &rot, &kissing, he(&g, 0, 2)).unwrap();
    assert_eq!(trail.len(), 12);
    assert!(trail.covers(&g));
}

#[test]
fn duplicate_insertion_is_fatal() {
    let g = shapes::triangle();
    let mut rot = RotationSystem::empty(&g);
    rot.push(&g, he(&g, 0, 1)).unwrap();
    let err = rot.push(&g, he(&g, 0, 1)).unwrap_err();
    assert!(matches!(err, RouteError::DuplicateHalfEdge { .. }));
    assert!(err.is_inconsistency());
}

#[test]
fn pair_without_common_vertex_is_fatal() {
    let g = shapes::bowtie();
    let t = tree_of(&g, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
    let mut rot = RotationSystem::from_tree(&g, &t);
    let err = rot
        .splice_pair(&g, edge(&g, 1, 2), edge(&g, 3, 4))
        .unwrap_err();
    assert!(matches!(err, RouteError::PairWithoutCommonVertex { .. }));
}

#[test]
fn native_rotation_of_triangle_splits_the_trail() {
    // The planar triangle has two faces; walking it without kissing loops
    // closes after one face.
    let g = shapes::triangle();
    let lists = g.vertices().map(|v| g.native_order(v).to_vec()).collect();
    let rot = RotationSystem::from_lists(&g, lists).unwrap();
    rot.check_complete(&g).unwrap();
    let kissing = KissingLoopSet::new(g.half_edge_count());
    let err = extract_trail(&g, &rot, &kissing, he(&g, 0, 1)).unwrap_err();
    assert!(matches!(
        err,
        RouteError::TrailSplit {
            len: 3,
            expected: 6,
            ..
        }
    ));
    assert!(err.is_inconsistency());
}

#[test]
fn incomplete_rotation_is_reported() {
    let g = shapes::triangle();
    let t = tree_of(&g, &[(0, 1), (1, 2)]);
    let rot = RotationSystem::from_tree(&g, &t);
    assert!(matches!(
        rot.check_complete(&g),
        Err(RouteError::MissingHalfEdge { .. })
    ));
}

// ---------- end-to-end scenarios ----------

#[test]
fn triangle_routes_with_one_kissing_edge() {
    let g = shapes::triangle();
    let r = route(&g, &sequential(50, 1)).unwrap();
    assert_valid(&g, &r);
    assert_eq!(r.tree.len(), 2);
    assert_eq!(r.score(), 2);
    assert_eq!(r.kissing.edges().len(), 1);
    assert_eq!(r.trail.len(), 6);
    assert_eq!(r.stats.components, 1);
    assert_eq!(r.stats.unpaired, 1);
}

#[test]
fn tetrahedron_routes_within_early_exit_scores() {
    let g = shapes::tetrahedron();
    let r = route(&g, &RouteCfg::default()).unwrap();
    assert_valid(&g, &r);
    assert_eq!(r.tree.len(), 3);
    assert!(r.score() == 0 || r.score() == 2);
    assert_eq!(r.trail.len(), 12);
    assert!(r.stats.early_exit);
    assert_eq!(r.stats.best_trial, Some(0));
}

#[test]
fn bowtie_star_tree_costs_two_kissing_edges() {
    let g = shapes::bowtie();
    let t = tree_of(&g, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
    let r = route_with_tree(&g, t).unwrap();
    assert_valid(&g, &r);
    assert_eq!(r.score(), 4);
    assert_eq!(r.trail.len(), 12);
}

#[test]
fn bowtie_search_finds_covalent_routing() {
    let g = shapes::bowtie();
    let r = route(&g, &sequential(2000, 3)).unwrap();
    assert_valid(&g, &r);
    assert_eq!(r.score(), 0);
}

#[test]
fn greedy_strategy_routes_polyhedra() {
    for g in [shapes::cube(), shapes::octahedron(), shapes::prism(5)] {
        let cfg = RouteCfg {
            strategy: TreeStrategy::Greedy,
            ..RouteCfg::default()
        };
        let r = route(&g, &cfg).unwrap();
        assert_valid(&g, &r);
        assert_eq!(r.stats.trials_run, 1);
    }
}

#[test]
fn search_on_odd_cotree_polyhedra_never_reaches_zero() {
    // Cube: 12 - 7 = 5 co-tree edges; octahedron: 12 - 5 = 7.
    for g in [shapes::cube(), shapes::octahedron()] {
        let r = route(&g, &sequential(400, 11)).unwrap();
        assert_valid(&g, &r);
        assert!(r.score() >= 2);
    }
}

#[test]
fn parallel_and_sequential_search_agree() {
    let g = shapes::random_graph(5, 30, 25).unwrap();
    let cfg = RouteCfg {
        trials: 300,
        seed: 9,
        early_exit_scores: vec![],
        batch_size: 16,
        ..RouteCfg::default()
    };
    let par = route(&g, &cfg).unwrap();
    let seq = route(
        &g,
        &RouteCfg {
            parallel: false,
            ..cfg.clone()
        },
    )
    .unwrap();
    assert_eq!(par.trail, seq.trail);
    assert_eq!(par.stats, seq.stats);
    assert_eq!(par.stats.trials_run, 300);
}

#[test]
fn trial_replays_from_its_seed() {
    let g = shapes::random_graph(2, 20, 15).unwrap();
    let cfg = RouteCfg {
        trials: 40,
        seed: 77,
        early_exit_scores: vec![],
        parallel: false,
        ..RouteCfg::default()
    };
    let r = route(&g, &cfg).unwrap();
    let best = r.stats.best_trial.unwrap();
    let replay = run_trial(&g, trial_seed(cfg.seed, best as u64)).unwrap();
    assert_eq!(replay.trail, r.trail);
    assert_eq!(replay.tree, r.tree);
}

#[test]
fn saved_tree_round_trips_through_json() {
    let g = shapes::octahedron();
    let r = route(&g, &sequential(100, 4)).unwrap();
    let json = serde_json::to_string(&r.tree.save()).unwrap();
    let saved: SavedTree = serde_json::from_str(&json).unwrap();
    let again = route_saved(&g, &saved).unwrap();
    assert_eq!(again.tree, r.tree);
    assert_eq!(again.kissing, r.kissing);
    assert!(again.trail.is_cyclic_equivalent(&r.trail));
}

#[test]
fn cyclic_equivalence_accepts_rotation_and_reversal() {
    let g = shapes::tetrahedron();
    let r = route(&g, &sequential(10, 0)).unwrap();
    let mut rotated = r.trail.as_slice().to_vec();
    rotated.rotate_left(5);
    let rotated: Trail = serde_json::from_value(serde_json::json!({ "hedges": rotated })).unwrap();
    assert!(r.trail.is_cyclic_equivalent(&rotated));
    let mut reversed = r.trail.as_slice().to_vec();
    reversed.reverse();
    let reversed: Trail =
        serde_json::from_value(serde_json::json!({ "hedges": reversed })).unwrap();
    assert!(r.trail.is_cyclic_equivalent(&reversed));
    let mut swapped = r.trail.as_slice().to_vec();
    swapped.swap(0, 1);
    let swapped: Trail = serde_json::from_value(serde_json::json!({ "hedges": swapped })).unwrap();
    assert!(!r.trail.is_cyclic_equivalent(&swapped));
}

// ---------- properties over random embedded graphs ----------

fn arb_graph() -> impl Strategy<Value = Graph> {
    (any::<u64>(), 2usize..28, 0usize..40)
        .prop_map(|(seed, n, extra)| shapes::random_graph(seed, n, extra).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_random_tree_spans(g in arb_graph(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let t = randomized_tree(&g, &mut rng).unwrap();
        prop_assert_eq!(t.len(), g.vertex_count() - 1);
        prop_assert!(SpanningTree::from_edges(&g, t.edges().iter().copied()).is_ok());
    }

    #[test]
    fn prop_partition_covers_cotree_once(g in arb_graph(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let t = randomized_tree(&g, &mut rng).unwrap();
        let p = partition(&g, &t);
        let mut in_component = vec![0usize; g.edge_count()];
        let mut touched = vec![None; g.vertex_count()];
        for (ci, c) in p.components.iter().enumerate() {
            for &e in &c.edges {
                in_component[e.0] += 1;
                let (a, b) = g.endpoints(e);
                for v in [a, b] {
                    // Maximality: no vertex is shared by two components.
                    prop_assert!(touched[v.0].map_or(true, |o| o == ci));
                    touched[v.0] = Some(ci);
                }
            }
        }
        let mut in_pairing = vec![0usize; g.edge_count()];
        for (c, pairs) in p.components.iter().zip(&p.pairings) {
            let unpaired = pairs.iter().filter(|q| !q.is_pair()).count();
            prop_assert_eq!(unpaired, c.edges.len() % 2);
            for q in pairs {
                in_pairing[q.first.0] += 1;
                if let Some(s) = q.second {
                    in_pairing[s.0] += 1;
                    prop_assert!(g.common_vertex(q.first, s).is_some());
                }
            }
        }
        for e in g.edges() {
            let want = usize::from(!t.contains(e));
            prop_assert_eq!(in_component[e.0], want);
            prop_assert_eq!(in_pairing[e.0], want);
        }
    }

    #[test]
    fn prop_single_attempt_is_valid(g in arb_graph(), seed in any::<u64>()) {
        let r = run_trial(&g, seed).unwrap();
        assert_valid(&g, &r);
        prop_assert_eq!(r.score(), 2 * r.stats.unpaired);
    }

    #[test]
    fn prop_saved_tree_reproduces_trail(g in arb_graph(), seed in any::<u64>()) {
        let r = run_trial(&g, seed).unwrap();
        let again = route_saved(&g, &r.tree.save()).unwrap();
        prop_assert!(again.trail.is_cyclic_equivalent(&r.trail));
    }

    #[test]
    fn prop_larger_budget_never_worse(g in arb_graph(), seed in any::<u64>(), n in 1usize..12) {
        let small = route(&g, &sequential(n, seed)).unwrap();
        let large = route(&g, &sequential(n + 1, seed)).unwrap();
        prop_assert!(large.score() <= small.score());
    }
}
