//! Pairwise edge compatibility for bundling.
//!
//! Four scores in `[0, 1]` are multiplied; pairs at or above the configured threshold attract
//! each other while bundling. Degenerate geometry scores `0`.

use crate::algo::recover;
use crate::error::DegenerateGeometry;
use crate::geom::{EPSILON, VectorExt, midpoint, project_onto_line};
use crate::graph::{Edge, Graph};

/// `|cos|` of the angle between the two edges.
pub fn angle_compatibility(a: &Edge, b: &Edge) -> f64 {
    let (Ok(u), Ok(v)) = (a.vector().unit_vector(), b.vector().unit_vector()) else {
        return 0.0;
    };
    u.dot(v).abs()
}

/// Close to `1` for edges of similar length.
pub fn scale_compatibility(a: &Edge, b: &Edge) -> f64 {
    let (l1, l2) = (a.length(), b.length());
    let lavg = (l1 + l2) / 2.0;
    let lmin = l1.min(l2);
    if lavg > EPSILON && lmin > EPSILON {
        2.0 / (lavg / lmin + l1.max(l2) / lavg)
    } else {
        0.0
    }
}

/// Close to `1` when the midpoints are near relative to the average length.
pub fn position_compatibility(a: &Edge, b: &Edge) -> f64 {
    let lavg = (a.length() + b.length()) / 2.0;
    if lavg > EPSILON {
        lavg / (lavg + (a.midpoint() - b.midpoint()).length())
    } else {
        0.0
    }
}

/// How well `a`, projected onto `b`'s line, is centered on `b`.
pub fn edge_visibility(a: &Edge, b: &Edge) -> std::result::Result<f64, DegenerateGeometry> {
    let i0 = project_onto_line(a.start, b.start, b.end)?;
    let i1 = project_onto_line(a.end, b.start, b.end)?;
    let span = (i0 - i1).length();
    if span <= EPSILON {
        return Err(DegenerateGeometry::CollapsedProjection);
    }
    let offset = (b.midpoint() - midpoint(i0, i1)).length();
    Ok((1.0 - 2.0 * offset / span).max(0.0))
}

pub fn visibility_compatibility(a: &Edge, b: &Edge) -> f64 {
    let ab = recover("compatibility", edge_visibility(a, b)).unwrap_or(0.0);
    let ba = recover("compatibility", edge_visibility(b, a)).unwrap_or(0.0);
    ab.min(ba)
}

/// Product of the angle, scale, position and visibility scores.
pub fn compatibility(a: &Edge, b: &Edge) -> f64 {
    angle_compatibility(a, b)
        * scale_compatibility(a, b)
        * position_compatibility(a, b)
        * visibility_compatibility(a, b)
}

impl Graph {
    /// Rebuilds every edge's compatible-edge list from the current edge geometry.
    ///
    /// The relation is symmetric: `j` is listed by edge `i` exactly when `i` is listed by `j`.
    pub fn build_compatibility_lists(&mut self) {
        let threshold = self.config.bundling.compatibility_threshold;
        for e in &mut self.edges {
            e.compatible_edges.clear();
        }

        let n = self.edges.len();
        let mut pairs = 0usize;
        for i in 0..n {
            for j in (i + 1)..n {
                if compatibility(&self.edges[i], &self.edges[j]) >= threshold {
                    self.edges[i].compatible_edges.push(j);
                    self.edges[j].compatible_edges.push(i);
                    pairs += 1;
                }
            }
        }
        tracing::debug!(edges = n, pairs, threshold, "compatibility lists built");
    }
}
