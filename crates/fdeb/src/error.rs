/// Geometry that an epsilon-guarded computation refused to divide by.
///
/// Simulation phases recover from these locally by dropping the contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DegenerateGeometry {
    #[error("edge has zero length")]
    ZeroLengthEdge,
    #[error("points coincide")]
    CoincidentPoints,
    #[error("projected span collapsed to a point")]
    CollapsedProjection,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("edge {source_label} -> {target_label} references a missing node")]
    MissingEndpoint {
        source_label: String,
        target_label: String,
    },
    #[error("graph topology is already loaded")]
    AlreadyLoaded,
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(#[from] DegenerateGeometry),
}

pub type Result<T> = std::result::Result<T, Error>;
