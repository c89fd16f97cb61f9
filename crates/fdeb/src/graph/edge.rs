use crate::error::{Error, Result};
use crate::geom::{Vector2D, midpoint};
use crate::graph::Node;
use indexmap::IndexMap;

// 1 / sqrt(2 * pi)
const INV_SQRT_2PI: f64 = 0.3989422804;

/// An edge between two labelled nodes, with its bundling polyline.
///
/// `start`/`end` are snapshots of the endpoint positions, not live references. After the layout
/// phase moves nodes they are refreshed by [`crate::Graph::refresh_edges_from_nodes`].
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub(crate) source_label: String,
    pub(crate) target_label: String,
    pub(crate) start: Vector2D,
    pub(crate) end: Vector2D,
    pub(crate) width: f64,
    pub(crate) subdivs: Vec<Vector2D>,
    pub(crate) compatible_edges: Vec<usize>,
}

impl Edge {
    /// Builds an edge with canonical direction and a single subdivision point at its midpoint.
    ///
    /// Edges are oriented so that they run towards increasing coordinates along their dominant
    /// axis; the labels are swapped together with the endpoints.
    pub fn new(
        source_label: impl Into<String>,
        target_label: impl Into<String>,
        start: Vector2D,
        end: Vector2D,
        width: f64,
    ) -> Self {
        let mut edge = Self {
            source_label: source_label.into(),
            target_label: target_label.into(),
            start,
            end,
            width,
            subdivs: Vec::new(),
            compatible_edges: Vec::new(),
        };
        edge.arrange_direction();
        edge.subdivs.push(midpoint(edge.start, edge.end));
        edge
    }

    /// Builds an edge from a node map, the way raw link lists are ingested: endpoints are copied
    /// from the nodes and the width is `multiplicity + 1`.
    pub fn from_nodes(
        nodes: &IndexMap<String, Node>,
        source_label: &str,
        target_label: &str,
        multiplicity: f64,
    ) -> Result<Self> {
        let (Some(source), Some(target)) = (nodes.get(source_label), nodes.get(target_label))
        else {
            return Err(Error::MissingEndpoint {
                source_label: source_label.to_string(),
                target_label: target_label.to_string(),
            });
        };
        Ok(Self::new(
            source_label,
            target_label,
            source.pos,
            target.pos,
            multiplicity + 1.0,
        ))
    }

    fn arrange_direction(&mut self) {
        let v = self.vector();
        let (ax, ay) = (v.x.abs(), v.y.abs());
        let swap = if ax > ay {
            self.end.x < self.start.x
        } else if ay > ax {
            self.end.y < self.start.y
        } else if ax > 0.0 {
            // Exact diagonal.
            self.end.x < self.start.x
        } else {
            self.target_label < self.source_label
        };
        if swap {
            std::mem::swap(&mut self.start, &mut self.end);
            std::mem::swap(&mut self.source_label, &mut self.target_label);
        }
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn target_label(&self) -> &str {
        &self.target_label
    }

    pub fn start(&self) -> Vector2D {
        self.start
    }

    pub fn end(&self) -> Vector2D {
        self.end
    }

    /// Normalized weight in `(0, 1]` once the edge has been loaded into a graph.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Interior control points, never empty.
    pub fn subdivs(&self) -> &[Vector2D] {
        &self.subdivs
    }

    /// Indices of the edges this one is attracted to while bundling.
    pub fn compatible_edges(&self) -> &[usize] {
        &self.compatible_edges
    }

    /// Vector from `start` to `end`.
    pub fn vector(&self) -> Vector2D {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.vector().length()
    }

    pub fn midpoint(&self) -> Vector2D {
        midpoint(self.start, self.end)
    }

    /// `start`, every subdivision point, then `end`.
    pub fn polyline(&self) -> Vec<Vector2D> {
        let mut points = Vec::with_capacity(self.subdivs.len() + 2);
        points.push(self.start);
        points.extend_from_slice(&self.subdivs);
        points.push(self.end);
        points
    }

    /// Doubles the number of subdivision points by resampling the current polyline.
    ///
    /// The polyline is parameterized by segment index, so every old segment covers the same
    /// share of the parameter range regardless of its length.
    pub(crate) fn double_subdivisions(&mut self) {
        let n = self.subdivs.len();
        if n == 0 {
            self.subdivs.push(self.midpoint());
            return;
        }

        let polyline = self.polyline();
        let target = 2 * n;
        let segment = (n + 1) as f64 / (target + 1) as f64;
        self.subdivs = (1..=target)
            .map(|k| {
                let t = k as f64 * segment;
                let idx = (t.floor() as usize).min(n);
                let frac = t - idx as f64;
                polyline[idx] + (polyline[idx + 1] - polyline[idx]) * frac
            })
            .collect();
    }

    /// Moves each subdivision point a fixed `step` along its accumulated force.
    pub(crate) fn displace(&mut self, forces: &[Vector2D], step: f64) {
        for (point, force) in self.subdivs.iter_mut().zip(forces) {
            let magnitude = force.length();
            if magnitude > crate::geom::EPSILON {
                *point += *force * step / magnitude;
            }
        }
    }

    /// Gaussian blur of the subdivision points, with the fixed endpoints as extra samples.
    pub(crate) fn smooth(&mut self, sigma: f64) {
        let n = self.subdivs.len();
        let smoothed = (0..n)
            .map(|i| {
                let mut weight = gauss_weight((i + 1) as f64, sigma);
                let mut total = weight;
                let mut acc = self.start * weight;

                for (j, &p) in self.subdivs.iter().enumerate() {
                    weight = gauss_weight(i.abs_diff(j) as f64, sigma);
                    acc += p * weight;
                    total += weight;
                }

                weight = gauss_weight((n - i + 1) as f64, sigma);
                acc += self.end * weight;
                total += weight;

                acc / total
            })
            .collect();
        self.subdivs = smoothed;
    }
}

fn gauss_weight(distance: f64, sigma: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * (distance / sigma).powi(2)).exp() / sigma
}
