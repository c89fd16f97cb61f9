use fdeb::algo::compat::{
    angle_compatibility, compatibility, edge_visibility, position_compatibility,
    scale_compatibility, visibility_compatibility,
};
use fdeb::{DegenerateGeometry, Edge, Graph, GraphConfig, Node, RandomSource, XorShift64Star};
use fdeb::{Vector2D, vector};

fn e(x0: f64, y0: f64, x1: f64, y1: f64) -> Edge {
    Edge::new("s", "t", vector(x0, y0), vector(x1, y1), 1.0)
}

fn load(segments: &[(Vector2D, Vector2D)], threshold: f64) -> Graph {
    let mut config = GraphConfig::default();
    config.bundling.compatibility_threshold = threshold;
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for (i, &(p, q)) in segments.iter().enumerate() {
        let (s, t) = (format!("s{i}"), format!("t{i}"));
        nodes.push((s.clone(), Node::at(p)));
        nodes.push((t.clone(), Node::at(q)));
        edges.push(Edge::new(s, t, p, q, 1.0));
    }
    let mut g = Graph::new(config).unwrap();
    g.set(nodes, edges).unwrap();
    g
}

#[test]
fn parallel_edges_are_mutually_compatible() {
    let a = e(0.0, 0.0, 10.0, 0.0);
    let b = e(0.0, 1.0, 10.0, 1.0);
    assert!((angle_compatibility(&a, &b) - 1.0).abs() < 1e-12);
    assert!((scale_compatibility(&a, &b) - 1.0).abs() < 1e-12);
    assert!((visibility_compatibility(&a, &b) - 1.0).abs() < 1e-12);
    assert!((position_compatibility(&a, &b) - 10.0 / 11.0).abs() < 1e-12);

    let g = load(
        &[
            (vector(0.0, 0.0), vector(10.0, 0.0)),
            (vector(0.0, 1.0), vector(10.0, 1.0)),
        ],
        0.5,
    );
    assert_eq!(g.edges()[0].compatible_edges(), &[1]);
    assert_eq!(g.edges()[1].compatible_edges(), &[0]);
}

#[test]
fn perpendicular_edges_are_incompatible() {
    let a = e(0.0, 0.0, 10.0, 0.0);
    let b = e(5.0, -5.0, 5.0, 5.0);
    assert!(angle_compatibility(&a, &b).abs() < 1e-12);
    assert!(compatibility(&a, &b).abs() < 1e-12);
}

#[test]
fn scale_and_position_scores() {
    let a = e(0.0, 0.0, 10.0, 0.0);
    let b = e(0.0, 5.0, 20.0, 5.0);
    // lavg = 15: 2 / (15/10 + 20/15)
    assert!((scale_compatibility(&a, &b) - 2.0 / (1.5 + 20.0 / 15.0)).abs() < 1e-12);

    let c = e(0.0, 10.0, 10.0, 10.0);
    assert!((position_compatibility(&a, &c) - 0.5).abs() < 1e-12);
}

#[test]
fn offset_edges_are_not_visible_to_each_other() {
    let a = e(0.0, 0.0, 10.0, 0.0);
    let b = e(20.0, 1.0, 30.0, 1.0);
    assert_eq!(edge_visibility(&a, &b), Ok(0.0));
    assert_eq!(visibility_compatibility(&a, &b), 0.0);
}

#[test]
fn zero_length_edges_score_zero() {
    let a = e(3.0, 3.0, 3.0, 3.0);
    let b = e(0.0, 0.0, 10.0, 0.0);
    assert_eq!(angle_compatibility(&a, &b), 0.0);
    assert_eq!(scale_compatibility(&a, &b), 0.0);
    assert_eq!(
        edge_visibility(&b, &a),
        Err(DegenerateGeometry::ZeroLengthEdge)
    );
    assert_eq!(
        edge_visibility(&a, &b),
        Err(DegenerateGeometry::CollapsedProjection)
    );
    let score = compatibility(&a, &b);
    assert!(score == 0.0, "score {score}");
}

#[test]
fn compatibility_lists_are_symmetric() {
    let mut rng = XorShift64Star::new(11);
    let mut p = || vector(rng.next_f64_unit() * 100.0, rng.next_f64_unit() * 100.0);
    let segments: Vec<(Vector2D, Vector2D)> = (0..40).map(|_| (p(), p())).collect();
    let g = load(&segments, 0.1);

    let mut any = false;
    for (i, edge) in g.edges().iter().enumerate() {
        for &j in edge.compatible_edges() {
            any = true;
            assert_ne!(i, j);
            assert!(
                g.edges()[j].compatible_edges().contains(&i),
                "{i} lists {j} but not the reverse"
            );
        }
    }
    assert!(any, "fixture should produce at least one compatible pair");
}

#[test]
fn rebuilding_lists_is_idempotent() {
    let mut g = load(
        &[
            (vector(0.0, 0.0), vector(10.0, 0.0)),
            (vector(0.0, 1.0), vector(10.0, 1.0)),
            (vector(0.0, 2.0), vector(10.0, 2.0)),
        ],
        0.5,
    );
    let before: Vec<Vec<usize>> = g
        .edges()
        .iter()
        .map(|e| e.compatible_edges().to_vec())
        .collect();
    g.build_compatibility_lists();
    let after: Vec<Vec<usize>> = g
        .edges()
        .iter()
        .map(|e| e.compatible_edges().to_vec())
        .collect();
    assert_eq!(before, after);
    assert_eq!(after[1], vec![0, 2]);
}

#[test]
fn raising_the_threshold_rebuilds_lists() {
    let mut g = load(
        &[
            (vector(0.0, 0.0), vector(10.0, 0.0)),
            (vector(0.0, 1.0), vector(10.0, 1.0)),
        ],
        0.5,
    );
    assert_eq!(g.edges()[0].compatible_edges(), &[1]);
    // 10/11 is below 0.95
    g.set_algorithm_params(0.1, 5, 90, 0.95, 3.0).unwrap();
    assert!(g.edges()[0].compatible_edges().is_empty());
}
