//! Graph state and the topology builder.

mod edge;
mod node;

pub use edge::Edge;
pub use node::Node;

use crate::algo::{BundlingParams, GraphConfig, LayoutParams, NetworkParams};
use crate::error::{Error, Result};
use crate::geom::{Vector2D, vector};
use crate::rng::{RandomSource, XorShift64Star};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// Owns the nodes and edges of one layout + bundling run.
///
/// Nodes live in an insertion-ordered label map, so each node also has a dense index used by the
/// pairwise force loops.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) config: GraphConfig,
    pub(crate) nodes: IndexMap<String, Node>,
    pub(crate) edges: Vec<Edge>,
    // Node indices of `edges[i]`'s (source, target).
    pub(crate) endpoints: Vec<(usize, usize)>,
    // Both orientations of every kept edge.
    pub(crate) adjacency: FxHashSet<(usize, usize)>,
    pub(crate) pinned: FxHashSet<String>,
    pub(crate) layout_center: Vector2D,
    pub(crate) n_iterations: usize,
    pub(crate) run: BundlingRun,
    loaded: bool,
}

/// Mutable counters of the bundling loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BundlingRun {
    pub(crate) step_size: f64,
    pub(crate) iterations_per_cycle: usize,
    pub(crate) iter: usize,
    pub(crate) cycles: usize,
}

impl BundlingRun {
    fn from_params(params: &BundlingParams) -> Self {
        Self {
            step_size: params.step_size,
            iterations_per_cycle: params.iterations_per_cycle,
            iter: params.iterations_per_cycle,
            cycles: params.cycles,
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        let config = GraphConfig::default();
        let run = BundlingRun::from_params(&config.bundling);
        Self {
            config,
            nodes: IndexMap::new(),
            edges: Vec::new(),
            endpoints: Vec::new(),
            adjacency: FxHashSet::default(),
            pinned: FxHashSet::default(),
            layout_center: Vector2D::zero(),
            n_iterations: 0,
            run,
            loaded: false,
        }
    }
}

impl Graph {
    pub fn new(config: GraphConfig) -> Result<Self> {
        config.validate()?;
        let run = BundlingRun::from_params(&config.bundling);
        Ok(Self {
            config,
            run,
            ..Self::default()
        })
    }

    /// Loads the topology, seeding initial node jitter from the configured `random_seed`.
    pub fn set<S>(
        &mut self,
        nodes: impl IntoIterator<Item = (S, Node)>,
        edges: Vec<Edge>,
    ) -> Result<()>
    where
        S: Into<String>,
    {
        let mut rng = XorShift64Star::new(self.config.random_seed);
        self.set_with_rng(nodes, edges, &mut rng)
    }

    /// Loads the topology: filters and normalizes edges, computes degrees, the adjacency set and
    /// the layout center, then builds the compatibility lists.
    ///
    /// May only be called once per graph. Edges naming unknown nodes are rejected before any
    /// state changes.
    pub fn set_with_rng<S, R>(
        &mut self,
        nodes: impl IntoIterator<Item = (S, Node)>,
        edges: Vec<Edge>,
        rng: &mut R,
    ) -> Result<()>
    where
        S: Into<String>,
        R: RandomSource + ?Sized,
    {
        if self.loaded {
            return Err(Error::AlreadyLoaded);
        }

        let mut nodes: IndexMap<String, Node> =
            nodes.into_iter().map(|(k, n)| (k.into(), n)).collect();
        let total = edges.len();
        let mut resolved = Vec::with_capacity(total);
        for e in edges {
            let (Some(s), Some(t)) = (
                nodes.get_index_of(&e.source_label),
                nodes.get_index_of(&e.target_label),
            ) else {
                return Err(Error::MissingEndpoint {
                    source_label: e.source_label,
                    target_label: e.target_label,
                });
            };
            resolved.push((e, (s, t)));
        }

        let range = self.config.initial_velocity_range;
        for node in nodes.values_mut() {
            node.degree = 0;
            node.vel = vector(rng.next_f64_signed() * range, rng.next_f64_signed() * range);
            node.acc = vector(rng.next_f64_signed() * range, rng.next_f64_signed() * range);
            node.force = Vector2D::zero();
        }

        resolved.retain(|(e, _)| e.width.is_finite() && e.width > 0.0);
        if resolved.len() < total {
            tracing::warn!(
                dropped = total - resolved.len(),
                "dropping edges with non-positive or non-finite weight"
            );
        }
        resolved.sort_by(|(a, _), (b, _)| a.width.total_cmp(&b.width));

        let kept = filter_edges(resolved, &self.config.network);

        let max_width = kept.iter().map(|(e, _)| e.width).fold(0.0_f64, f64::max);
        let scale = 1.0 / (max_width + 1.0);

        let mut edges = Vec::with_capacity(kept.len());
        let mut endpoints = Vec::with_capacity(kept.len());
        let mut adjacency = FxHashSet::default();
        for (mut e, (s, t)) in kept {
            e.width *= scale;
            edges.push(e);
            nodes[s].degree += 1;
            nodes[t].degree += 1;
            adjacency.insert((s, t));
            adjacency.insert((t, s));
            endpoints.push((s, t));
        }

        self.layout_center = bounding_box_center(nodes.values()).unwrap_or_else(Vector2D::zero);
        tracing::debug!(
            nodes = nodes.len(),
            edges_in = total,
            edges_kept = edges.len(),
            center = ?self.layout_center,
            "graph topology loaded"
        );

        self.nodes = nodes;
        self.edges = edges;
        self.endpoints = endpoints;
        self.adjacency = adjacency;
        self.loaded = true;

        self.build_compatibility_lists();
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Nodes with their labels, in insertion order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = (&str, &Node)> + '_ {
        self.nodes.iter().map(|(k, n)| (k.as_str(), n))
    }

    pub fn node(&self, label: &str) -> Option<&Node> {
        self.nodes.get(label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Kept edges, sorted by ascending weight.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Drawable polyline of every edge, in edge order.
    pub fn polylines(&self) -> Vec<Vec<Vector2D>> {
        self.edges.iter().map(Edge::polyline).collect()
    }

    /// Midpoint of the bounding box of the node positions at load time.
    pub fn layout_center(&self) -> Vector2D {
        self.layout_center
    }

    pub fn edge_opacity(&self) -> f64 {
        self.config.edge_opacity
    }

    /// Sets the edge filters. Only meaningful before [`Graph::set`].
    ///
    /// A non-positive value disables a filter; when both are positive the weight threshold wins.
    pub fn set_network_params(
        &mut self,
        edge_weight_threshold: f64,
        edge_percentage_threshold: f64,
    ) -> Result<()> {
        if self.loaded {
            return Err(Error::AlreadyLoaded);
        }
        let network =
            NetworkParams::from_thresholds(edge_weight_threshold, edge_percentage_threshold);
        network.validate()?;
        self.config.network = network;
        Ok(())
    }

    /// Sets the node placement constants.
    pub fn set_layout_params(&mut self, params: LayoutParams) -> Result<()> {
        params.validate()?;
        self.config.layout = params;
        Ok(())
    }

    /// Sets the bundling algorithm constants and restarts the cycle/iteration counters.
    ///
    /// If topology is already loaded and the compatibility threshold changed, the compatibility
    /// lists are rebuilt against the new threshold.
    pub fn set_algorithm_params(
        &mut self,
        k: f64,
        cycles: usize,
        iterations_per_cycle: usize,
        compatibility_threshold: f64,
        smoothing_sigma: f64,
    ) -> Result<()> {
        let mut bundling = self.config.bundling.clone();
        bundling.k = k;
        bundling.cycles = cycles;
        bundling.iterations_per_cycle = iterations_per_cycle;
        bundling.compatibility_threshold = compatibility_threshold;
        bundling.smoothing_sigma = smoothing_sigma;
        bundling.validate()?;

        let threshold_changed =
            self.config.bundling.compatibility_threshold != compatibility_threshold;
        self.config.bundling = bundling;
        self.run.cycles = cycles;
        self.run.iterations_per_cycle = iterations_per_cycle;
        self.run.iter = iterations_per_cycle;

        if self.loaded && threshold_changed {
            self.build_compatibility_lists();
        }
        Ok(())
    }

    /// Sets the bundling physics constants and restarts the step size.
    pub fn set_physics_params(
        &mut self,
        step_size: f64,
        min_edge_distance: f64,
        gravitation_center: Vector2D,
        gravitation_exponent: f64,
    ) -> Result<()> {
        let mut bundling = self.config.bundling.clone();
        bundling.step_size = step_size;
        bundling.min_edge_distance = min_edge_distance;
        bundling.gravitation_center = gravitation_center;
        bundling.gravitation_exponent = gravitation_exponent;
        bundling.validate()?;

        self.config.bundling = bundling;
        self.run.step_size = step_size;
        Ok(())
    }

    pub fn enable_gravitation(&mut self) {
        self.config.bundling.gravitation_enabled = true;
    }

    pub fn set_graphics_params(&mut self, edge_opacity: f64) {
        self.config.edge_opacity = edge_opacity;
    }

    /// Pins the given nodes: the layout phase never moves them. Replaces any previous set.
    ///
    /// Labels may be given before or after [`Graph::set`]; labels without a node are ignored.
    pub fn set_nodes_not_moved<S>(&mut self, labels: impl IntoIterator<Item = S>)
    where
        S: Into<String>,
    {
        self.pinned = labels.into_iter().map(Into::into).collect();
        if self.loaded {
            let unknown = self
                .pinned
                .iter()
                .filter(|l| !self.nodes.contains_key(l.as_str()))
                .count();
            if unknown > 0 {
                tracing::warn!(unknown, "pinned labels without a matching node");
            }
        }
    }

    pub fn nodes_not_moved(&self) -> impl Iterator<Item = &str> + '_ {
        self.pinned.iter().map(String::as_str)
    }

    pub(crate) fn pinned_mask(&self) -> Vec<bool> {
        self.nodes
            .keys()
            .map(|label| self.pinned.contains(label))
            .collect()
    }
}

/// Applies the network thresholds to edges sorted by ascending width, each paired with its
/// resolved endpoint indices.
fn filter_edges(
    mut sorted: Vec<(Edge, (usize, usize))>,
    network: &NetworkParams,
) -> Vec<(Edge, (usize, usize))> {
    let weight = network.edge_weight_threshold.filter(|t| *t > 0.0);
    let percentage = network.edge_percentage_threshold.filter(|p| *p > 0.0);
    match (weight, percentage) {
        (Some(threshold), _) => {
            sorted.retain(|(e, _)| e.width > threshold);
            sorted
        }
        (None, Some(percentage)) => {
            // The lightest edges survive, see `NetworkParams`.
            let keep = (percentage * sorted.len() as f64 / 100.0) as usize;
            sorted.truncate(keep);
            sorted
        }
        (None, None) => sorted,
    }
}

fn bounding_box_center<'a>(nodes: impl Iterator<Item = &'a Node>) -> Option<Vector2D> {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for n in nodes {
        min_x = min_x.min(n.pos.x);
        min_y = min_y.min(n.pos.y);
        max_x = max_x.max(n.pos.x);
        max_y = max_y.max(n.pos.y);
    }
    if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
        return None;
    }
    Some(vector((min_x + max_x) / 2.0, (min_y + max_y) / 2.0))
}
