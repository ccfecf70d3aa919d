use thiserror::Error;

/// Top-level error type for the trace router.
#[derive(Debug, Error)]
pub enum TraceRouteError {
    #[error(transparent)]
    Problem(#[from] ProblemError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Errors reported by [`TraceProblem::validate`](crate::problem::TraceProblem::validate).
///
/// Solvers never raise these on their own; malformed input only degrades the
/// routed geometry.
#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("degenerate bounds: x in [{min_x}, {max_x}], y in [{min_y}, {max_y}]")]
    DegenerateBounds {
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
    },

    #[error("waypoint pair {index}: {which} point ({x}, {y}) is not on the bounds perimeter")]
    WaypointOffBoundary {
        index: usize,
        which: &'static str,
        x: f64,
        y: f64,
    },

    #[error("{name} must be a non-negative finite number, got {value}")]
    InvalidSpacing { name: &'static str, value: f64 },
}

/// Errors related to solver configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Errors raised by the random problem generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(
        "failed to place non-crossing waypoint pair {pair_index} after {attempts} attempts; \
         too many waypoint pairs may have been requested"
    )]
    WaypointPlacement { pair_index: usize, attempts: usize },

    #[error("invalid generator options: {0}")]
    InvalidOptions(String),
}

/// Convenience type alias for results using [`TraceRouteError`].
pub type Result<T> = std::result::Result<T, TraceRouteError>;
