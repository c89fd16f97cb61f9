use crate::geom::{Vector2D, vector};

/// Physical state of one node. Nodes are keyed by label in [`crate::Graph`]; the label is not
/// stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub pos: Vector2D,
    pub vel: Vector2D,
    pub acc: Vector2D,
    pub force: Vector2D,
    /// Number of incident edges that survived filtering.
    pub degree: usize,
    pub mass: f64,
    // Carried for hosts; the integrator only reads `mass`.
    pub radius: f64,
    pub repulsion: f64,
    pub stiffness: f64,
    pub damping: f64,
}

impl Default for Node {
    fn default() -> Self {
        Self::at(Vector2D::zero())
    }
}

impl Node {
    pub fn new(x: f64, y: f64) -> Self {
        Self::at(vector(x, y))
    }

    pub fn at(pos: Vector2D) -> Self {
        Self {
            pos,
            vel: Vector2D::zero(),
            acc: Vector2D::zero(),
            force: Vector2D::zero(),
            degree: 0,
            mass: 1.0,
            radius: 1.0,
            repulsion: 1.0,
            stiffness: 1.0,
            damping: 1.0,
        }
    }

    pub fn translate(&mut self, delta: Vector2D) {
        self.pos += delta;
    }

    pub(crate) fn clear_motion(&mut self) {
        self.vel = Vector2D::zero();
        self.acc = Vector2D::zero();
        self.force = Vector2D::zero();
    }
}
