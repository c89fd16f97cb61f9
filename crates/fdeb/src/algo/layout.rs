//! Force-directed node placement: repulsion, edge springs and a spring to the layout center,
//! integrated with explicit Euler steps.

use crate::algo::recover;
use crate::geom::{EPSILON, Vector2D, midpoint, unit_between};
use crate::graph::Graph;

/// Repulsion is scaled by the square of this reference length.
const REPULSION_SCALE: f64 = 128.0;

impl Graph {
    /// Runs one layout iteration of length `delta_t`.
    ///
    /// Forces are accumulated on every node that is not pinned, all nodes are integrated, and the
    /// edge snapshots are refreshed. There is no convergence test; the caller decides how many
    /// iterations to run.
    pub fn update(&mut self, delta_t: f64) {
        self.n_iterations += 1;
        if self.nodes.is_empty() {
            return;
        }

        let pinned = self.pinned_mask();
        let positions: Vec<Vector2D> = self.nodes.values().map(|n| n.pos).collect();

        self.accumulate_repulsion(&positions, &pinned);
        self.accumulate_springs(&positions, &pinned);
        self.accumulate_center_spring(&pinned);
        self.integrate(delta_t, &pinned);
        self.refresh_edges_from_nodes();
    }

    /// Runs `iterations` layout iterations, restarting the iteration counter first.
    pub fn run_layout(&mut self, iterations: usize, delta_t: f64) {
        let start = std::time::Instant::now();
        self.n_iterations = 0;
        while self.n_iterations < iterations {
            self.update(delta_t);
        }
        tracing::debug!(
            iterations,
            delta_t,
            elapsed = ?start.elapsed(),
            "node layout finished"
        );
    }

    /// Number of [`Graph::update`] calls since the counter was last reset.
    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }

    pub fn reset_iteration_count(&mut self) {
        self.n_iterations = 0;
    }

    /// Copies the current node positions into every edge's `start`/`end` and moves the first
    /// subdivision point to the new midpoint.
    ///
    /// Edges hold position snapshots, so this must run after nodes move. [`Graph::update`] calls
    /// it at the end of every iteration.
    pub fn refresh_edges_from_nodes(&mut self) {
        for (edge, &(s, t)) in self.edges.iter_mut().zip(&self.endpoints) {
            edge.start = self.nodes[s].pos;
            edge.end = self.nodes[t].pos;
            let mid = midpoint(edge.start, edge.end);
            match edge.subdivs.first_mut() {
                Some(first) => *first = mid,
                None => edge.subdivs.push(mid),
            }
        }
    }

    fn accumulate_repulsion(&mut self, positions: &[Vector2D], pinned: &[bool]) {
        let strength = self.config.layout.repulsion * REPULSION_SCALE * REPULSION_SCALE;
        let cap = self.config.layout.edge_length;

        for (i, node) in self.nodes.values_mut().enumerate() {
            if pinned[i] {
                continue;
            }
            for (j, &other) in positions.iter().enumerate() {
                if i == j || pinned[j] {
                    continue;
                }
                // Points from the other node towards this one.
                let Some((away, distance)) = recover("layout", unit_between(other, node.pos))
                else {
                    continue;
                };
                let d = distance.min(cap);
                node.force += away * (strength / (d * d));
            }
        }
    }

    fn accumulate_springs(&mut self, positions: &[Vector2D], pinned: &[bool]) {
        if self.adjacency.is_empty() {
            return;
        }
        let spring_k = self.config.layout.spring_k;
        let cap = self.config.layout.edge_length;

        for (i, node) in self.nodes.values_mut().enumerate() {
            if pinned[i] {
                continue;
            }
            for (j, &other) in positions.iter().enumerate() {
                if i == j || !self.adjacency.contains(&(i, j)) {
                    continue;
                }
                let Some((toward, distance)) = recover("layout", unit_between(node.pos, other))
                else {
                    continue;
                };
                node.force += toward * (spring_k * distance.min(cap));
            }
        }
    }

    fn accumulate_center_spring(&mut self, pinned: &[bool]) {
        let attraction = self.config.layout.attraction;
        let center = self.layout_center;

        for (i, node) in self.nodes.values_mut().enumerate() {
            if pinned[i] {
                continue;
            }
            let Some((outward, distance)) = recover("layout", unit_between(center, node.pos))
            else {
                continue;
            };
            node.force -= outward * (attraction * distance);
        }
    }

    fn integrate(&mut self, delta_t: f64, pinned: &[bool]) {
        for (i, node) in self.nodes.values_mut().enumerate() {
            if !pinned[i] {
                node.acc = if node.mass > EPSILON {
                    node.force / node.mass
                } else {
                    node.force
                };
                node.vel += node.acc * delta_t;
                node.pos += node.vel * delta_t;
            }
            node.clear_motion();
        }
    }
}
