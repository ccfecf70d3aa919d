pub mod containment;
pub mod cost;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod math;
pub mod path;
pub mod problem;
pub mod solver;
pub mod traces;
pub mod visualization;

pub use error::{Result, TraceRouteError};
pub use generator::{generate_random_problem, GeneratorOptions};
pub use problem::{OutputTrace, TraceProblem, WaypointPair};
pub use solver::{
    build_solver, try_build_solver, ElbowSolver, ElbowSolverConfig, OffsetSolver,
    OffsetSolverConfig, RoutingVariant, SolverPhase, TraceSolver,
};
pub use visualization::{visualize_trace_problem, GraphicsObject};
