pub mod bundling;
pub mod compat;
pub mod layout;

use crate::error::{DegenerateGeometry, Error, Result};
use crate::geom::Vector2D;
use serde::{Deserialize, Serialize};

/// Everything a [`crate::Graph`] needs before topology is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub network: NetworkParams,
    pub layout: LayoutParams,
    pub bundling: BundlingParams,
    /// Seed for the initial node velocity jitter.
    pub random_seed: u64,
    /// Initial velocity/acceleration components are drawn from `[-range, range)`.
    pub initial_velocity_range: f64,
    /// Carried for renderers only; the simulation never reads it.
    pub edge_opacity: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            network: NetworkParams::default(),
            layout: LayoutParams::default(),
            bundling: BundlingParams::default(),
            random_seed: 0,
            initial_velocity_range: 1.0,
            edge_opacity: 0.1,
        }
    }
}

impl GraphConfig {
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.layout.validate()?;
        self.bundling.validate()?;
        non_negative("initial_velocity_range", self.initial_velocity_range)?;
        finite("edge_opacity", self.edge_opacity)
    }
}

/// Edge filters applied once by [`crate::Graph::set`]. `None` disables a filter.
///
/// The weight filter keeps edges *heavier* than the threshold, while the percentage filter keeps
/// the *lightest* `percentage`% of edges. The asymmetry is long-standing behavior that downstream
/// output depends on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkParams {
    pub edge_weight_threshold: Option<f64>,
    pub edge_percentage_threshold: Option<f64>,
}

impl NetworkParams {
    /// Legacy convention: a non-positive value means "disabled", and the weight threshold wins
    /// when both are positive.
    pub fn from_thresholds(edge_weight_threshold: f64, edge_percentage_threshold: f64) -> Self {
        if edge_weight_threshold > 0.0 {
            Self {
                edge_weight_threshold: Some(edge_weight_threshold),
                edge_percentage_threshold: None,
            }
        } else if edge_percentage_threshold > 0.0 {
            Self {
                edge_weight_threshold: None,
                edge_percentage_threshold: Some(edge_percentage_threshold),
            }
        } else {
            Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(v) = self.edge_weight_threshold {
            finite("edge_weight_threshold", v)?;
        }
        if let Some(v) = self.edge_percentage_threshold {
            non_negative("edge_percentage_threshold", v)?;
        }
        Ok(())
    }
}

/// Constants of the node placement phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Coulomb-like repulsion between every pair of free nodes.
    pub repulsion: f64,
    /// Hooke constant of the springs along edges.
    pub spring_k: f64,
    /// Pull of every free node towards the layout center.
    pub attraction: f64,
    /// Distances are capped at this length before computing repulsion and spring forces.
    pub edge_length: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            repulsion: 1.0,
            spring_k: 0.1,
            attraction: 0.01,
            edge_length: 100.0,
        }
    }
}

impl LayoutParams {
    pub(crate) fn validate(&self) -> Result<()> {
        non_negative("repulsion", self.repulsion)?;
        non_negative("spring_k", self.spring_k)?;
        non_negative("attraction", self.attraction)?;
        positive("edge_length", self.edge_length)
    }
}

/// Constants of the edge bundling phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlingParams {
    /// Global spring constant `K`.
    pub k: f64,
    pub cycles: usize,
    /// Iterations of the first cycle (`I`); later cycles run `2I/3` of the previous one.
    pub iterations_per_cycle: usize,
    pub compatibility_threshold: f64,
    /// Width of the terminal Gaussian smoothing, in subdivision steps.
    pub smoothing_sigma: f64,
    /// Displacement `S` of a subdivision point per iteration, halved every cycle.
    pub step_size: f64,
    /// Electrostatic forces between points closer than this are ignored.
    pub min_edge_distance: f64,
    pub gravitation_enabled: bool,
    pub gravitation_center: Vector2D,
    pub gravitation_exponent: f64,
}

impl Default for BundlingParams {
    fn default() -> Self {
        Self {
            k: 0.000001,
            cycles: 6,
            iterations_per_cycle: 10,
            compatibility_threshold: 0.6,
            smoothing_sigma: 30.0,
            step_size: 0.000001,
            min_edge_distance: 1e-4,
            gravitation_enabled: false,
            gravitation_center: Vector2D::zero(),
            gravitation_exponent: -2.0,
        }
    }
}

impl BundlingParams {
    pub(crate) fn validate(&self) -> Result<()> {
        non_negative("k", self.k)?;
        finite("compatibility_threshold", self.compatibility_threshold)?;
        positive("smoothing_sigma", self.smoothing_sigma)?;
        non_negative("step_size", self.step_size)?;
        non_negative("min_edge_distance", self.min_edge_distance)?;
        finite("gravitation_center.x", self.gravitation_center.x)?;
        finite("gravitation_center.y", self.gravitation_center.y)?;
        finite("gravitation_exponent", self.gravitation_exponent)
    }
}

/// Drops a degenerate contribution, leaving a trace event behind.
pub(crate) fn recover<T>(
    phase: &'static str,
    r: std::result::Result<T, DegenerateGeometry>,
) -> Option<T> {
    match r {
        Ok(v) => Some(v),
        Err(err) => {
            tracing::trace!(phase, %err, "skipping degenerate contribution");
            None
        }
    }
}

fn finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}
