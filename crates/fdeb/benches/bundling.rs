use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use fdeb::{Edge, Graph, GraphConfig, Node, RandomSource, XorShift64Star, vector};
use std::hint::black_box;
use std::time::Duration;

#[derive(Debug, Clone)]
struct GraphSpec {
    nodes: Vec<(String, Node)>,
    links: Vec<(usize, usize, f64)>,
}

impl GraphSpec {
    fn build(&self) -> Graph {
        let edges = self
            .links
            .iter()
            .map(|&(s, t, w)| {
                let (ls, ns) = &self.nodes[s];
                let (lt, nt) = &self.nodes[t];
                Edge::new(ls.clone(), lt.clone(), ns.pos, nt.pos, w)
            })
            .collect();
        let mut config = GraphConfig::default();
        config.bundling.k = 0.1;
        config.bundling.cycles = 5;
        config.bundling.iterations_per_cycle = 30;
        config.bundling.smoothing_sigma = 3.0;
        config.bundling.step_size = 0.4;
        let mut g = Graph::new(config).expect("valid config");
        g.set(self.nodes.clone(), edges).expect("consistent fixture");
        g
    }
}

fn random_spec(name: &str, node_count: usize, edge_count: usize, seed: u64) -> GraphSpec {
    let mut rng = XorShift64Star::new(seed);
    let nodes = (0..node_count)
        .map(|i| {
            let pos = vector(rng.next_f64_unit() * 1000.0, rng.next_f64_unit() * 1000.0);
            (format!("{name}_n{i}"), Node::at(pos))
        })
        .collect();
    let pick = |rng: &mut XorShift64Star| (rng.next_f64_unit() * node_count as f64) as usize;
    let links = (0..edge_count)
        .map(|_| {
            let s = pick(&mut rng);
            let t = pick(&mut rng);
            (s, t, 1.0 + (rng.next_u64() % 5) as f64)
        })
        .collect();
    GraphSpec { nodes, links }
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_update");
    group.measurement_time(Duration::from_secs(5));
    for &n in &[50usize, 200] {
        let spec = random_spec("layout", n, n * 2, 7);
        group.bench_with_input(BenchmarkId::from_parameter(n), &spec, |b, spec| {
            b.iter_batched(
                || spec.build(),
                |mut g| {
                    for _ in 0..10 {
                        g.update(0.1);
                    }
                    black_box(g)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_compatibility(c: &mut Criterion) {
    let mut group = c.benchmark_group("compatibility_lists");
    for &m in &[100usize, 400] {
        let spec = random_spec("compat", m / 2, m, 11);
        let g = spec.build();
        group.bench_with_input(BenchmarkId::from_parameter(m), &g, |b, g| {
            b.iter_batched(
                || g.clone(),
                |mut g| {
                    g.build_compatibility_lists();
                    black_box(g)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_bundling(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_bundling");
    group.sample_size(10);
    for &m in &[50usize, 150] {
        let spec = random_spec("bundle", m / 2, m, 23);
        let g = spec.build();
        group.bench_with_input(BenchmarkId::from_parameter(m), &g, |b, g| {
            b.iter_batched(
                || g.clone(),
                |mut g| {
                    g.run_bundling();
                    black_box(g)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout, bench_compatibility, bench_bundling);
criterion_main!(benches);
