//! Force-directed edge bundling.
//!
//! Subdivision points are pulled by springs along their own edge, by the matching points of
//! compatible edges, and optionally by a gravitation center. A run is a sequence of cycles; each
//! cycle iterates, then doubles the subdivision points and decays the step size and iteration
//! budget. A final Gaussian smoothing pass follows the last cycle.

use crate::algo::recover;
use crate::error::DegenerateGeometry;
use crate::geom::{EPSILON, Vector2D};
use crate::graph::{Edge, Graph};

impl Graph {
    /// Runs one bundling iteration over all edges and returns the iterations left in the cycle.
    pub fn iterate(&mut self) -> usize {
        if !self.edges.is_empty() {
            let params = &self.config.bundling;
            let mut forces: Vec<Vec<Vector2D>> = self
                .edges
                .iter()
                .map(|e| vec![Vector2D::zero(); e.subdivs.len()])
                .collect();

            for (edge, f) in self.edges.iter().zip(forces.iter_mut()) {
                add_spring_forces(edge, params.k, f);
                for &j in &edge.compatible_edges {
                    add_electrostatic_forces(edge, &self.edges[j], params.min_edge_distance, f);
                }
                if params.gravitation_enabled {
                    add_gravitational_forces(
                        edge,
                        params.gravitation_center,
                        params.gravitation_exponent,
                        f,
                    );
                }
            }

            let step = self.run.step_size;
            for (edge, f) in self.edges.iter_mut().zip(&forces) {
                edge.displace(f, step);
            }
        }

        self.run.iter = self.run.iter.saturating_sub(1);
        self.run.iter
    }

    /// Doubles the subdivision points of every edge.
    pub fn add_subdivisions(&mut self) {
        for e in &mut self.edges {
            e.double_subdivisions();
        }
    }

    /// Ends a cycle: halves the step size, shrinks the iteration budget to two thirds and returns
    /// the cycles left.
    pub fn update_cycle(&mut self) -> usize {
        let run = &mut self.run;
        run.step_size *= 0.5;
        run.iterations_per_cycle = 2 * run.iterations_per_cycle / 3;
        run.iter = run.iterations_per_cycle;
        run.cycles = run.cycles.saturating_sub(1);
        tracing::debug!(
            cycles_left = run.cycles,
            step_size = run.step_size,
            iterations = run.iterations_per_cycle,
            "bundling cycle finished"
        );
        run.cycles
    }

    /// Gaussian-smooths every edge's subdivision points. Not idempotent: each call blurs again.
    pub fn smooth(&mut self) {
        let sigma = self.config.bundling.smoothing_sigma;
        if sigma.is_nan() || sigma <= 0.0 {
            tracing::debug!(sigma, "smoothing skipped for non-positive sigma");
            return;
        }
        for e in &mut self.edges {
            e.smooth(sigma);
        }
    }

    /// Runs the whole bundling schedule: every cycle iterates until its budget is spent and then
    /// subdivides; smoothing runs once at the end.
    pub fn run_bundling(&mut self) {
        let start = std::time::Instant::now();
        let mut cycles = 0usize;
        loop {
            while self.iterate() > 0 {}
            self.add_subdivisions();
            cycles += 1;
            if self.update_cycle() == 0 {
                break;
            }
        }
        self.smooth();
        tracing::debug!(
            cycles,
            edges = self.edges.len(),
            elapsed = ?start.elapsed(),
            "edge bundling finished"
        );
    }

    /// Iterations left in the current cycle.
    pub fn remaining_iterations(&self) -> usize {
        self.run.iter
    }

    pub fn remaining_cycles(&self) -> usize {
        self.run.cycles
    }

    /// Current displacement per iteration.
    pub fn step_size(&self) -> f64 {
        self.run.step_size
    }
}

/// Discrete spring along the polyline: each point is pulled towards its two neighbors, the
/// fixed endpoints included.
fn add_spring_forces(edge: &Edge, k: f64, forces: &mut [Vector2D]) {
    let Some(kp) = recover("bundling", spring_constant(edge, k)) else {
        return;
    };
    let points = &edge.subdivs;
    let n = points.len();
    for (i, f) in forces.iter_mut().enumerate().take(n) {
        let prev = if i == 0 { edge.start } else { points[i - 1] };
        let next = if i + 1 == n { edge.end } else { points[i + 1] };
        *f += (prev + next - points[i] * 2.0) * kp;
    }
}

fn spring_constant(edge: &Edge, k: f64) -> std::result::Result<f64, DegenerateGeometry> {
    let length = edge.length();
    if length <= EPSILON {
        return Err(DegenerateGeometry::ZeroLengthEdge);
    }
    Ok(k / (length * (edge.subdivs.len() + 1) as f64))
}

/// Unit pull of each point towards the same-index point of `other`. `min_distance` is never
/// negative, so coincident points are skipped.
fn add_electrostatic_forces(
    edge: &Edge,
    other: &Edge,
    min_distance: f64,
    forces: &mut [Vector2D],
) {
    for ((f, &p), &q) in forces.iter_mut().zip(&edge.subdivs).zip(&other.subdivs) {
        let delta = q - p;
        let distance = delta.length();
        if distance > min_distance {
            *f += delta / distance;
        }
    }
}

fn add_gravitational_forces(
    edge: &Edge,
    center: Vector2D,
    exponent: f64,
    forces: &mut [Vector2D],
) {
    for (f, &p) in forces.iter_mut().zip(&edge.subdivs) {
        let delta = center - p;
        *f += delta * 0.1 * (delta.length() + 1.0).powf(exponent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::vector;

    #[test]
    fn spring_pulls_bent_midpoint_back_to_the_chord() {
        let mut e = Edge::new("a", "b", vector(0.0, 0.0), vector(10.0, 0.0), 1.0);
        e.subdivs[0] = vector(5.0, 4.0);
        let mut f = vec![Vector2D::zero()];
        add_spring_forces(&e, 1.0, &mut f);
        // kp = 1 / (10 * 2)
        assert!((f[0] - vector(0.0, -0.4)).length() < 1e-12);
    }

    #[test]
    fn zero_length_edge_gets_no_spring_force() {
        let e = Edge::new("a", "b", vector(1.0, 1.0), vector(1.0, 1.0), 1.0);
        let mut f = vec![Vector2D::zero()];
        add_spring_forces(&e, 1.0, &mut f);
        assert_eq!(f[0], Vector2D::zero());
    }

    #[test]
    fn electrostatic_force_is_unit_and_respects_min_distance() {
        let a = Edge::new("a", "b", vector(0.0, 0.0), vector(10.0, 0.0), 1.0);
        let b = Edge::new("c", "d", vector(0.0, 3.0), vector(10.0, 3.0), 1.0);
        let mut f = vec![Vector2D::zero()];
        add_electrostatic_forces(&a, &b, 1e-4, &mut f);
        assert!((f[0] - vector(0.0, 1.0)).length() < 1e-12);

        let mut g = vec![Vector2D::zero()];
        add_electrostatic_forces(&a, &b, 5.0, &mut g);
        assert_eq!(g[0], Vector2D::zero());
    }

    #[test]
    fn gravitation_pulls_towards_center() {
        let e = Edge::new("a", "b", vector(0.0, 2.0), vector(10.0, 2.0), 1.0);
        let mut f = vec![Vector2D::zero()];
        add_gravitational_forces(&e, vector(5.0, 0.0), 1.0, &mut f);
        // delta = (0, -2), |delta| + 1 = 3
        assert!((f[0] - vector(0.0, -0.6)).length() < 1e-12);
    }
}
