#![forbid(unsafe_code)]

//! Headless force-directed node layout and edge bundling (FDEB).
//!
//! A [`Graph`] is loaded once with [`Graph::set`], laid out with repeated
//! [`Graph::update`] calls, and then bundled by the iterate / subdivide / cycle
//! loop followed by a final [`Graph::smooth`]. Renderers read node positions and
//! edge polylines back through [`Graph::nodes`] and [`Graph::edges`].

pub mod algo;
pub mod error;
pub mod geom;
pub mod graph;
pub mod rng;

pub use algo::{BundlingParams, GraphConfig, LayoutParams, NetworkParams};
pub use error::{DegenerateGeometry, Error, Result};
pub use geom::{Vector2D, VectorExt, vector};
pub use graph::{Edge, Graph, Node};
pub use rng::{RandomSource, XorShift64Star};
