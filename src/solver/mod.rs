//! Iterative local-search routing.
//!
//! Every solver follows the same state machine:
//! `Initialized → Stepping → Solved`. The initial geometry and output traces
//! exist from construction onward; each [`TraceSolver::step`] refines them
//! and `Solved` is terminal.

pub mod config;
mod elbow;
mod offset;
pub mod schedule;

pub use config::{ElbowSolverConfig, OffsetSolverConfig};
pub use elbow::ElbowSolver;
pub use offset::OffsetSolver;
pub use schedule::{SpacingSchedule, StepSchedule};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::problem::{OutputTrace, TraceProblem};
use crate::visualization::{visualize_trace_problem, GraphicsObject};

/// Lifecycle of a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverPhase {
    Initialized,
    Stepping,
    Solved,
}

/// Common interface of the routing solvers.
pub trait TraceSolver: Send {
    /// Advances the solve by one iteration. A no-op once solved.
    fn step(&mut self);

    fn phase(&self) -> SolverPhase;

    /// Number of completed local-search iterations.
    fn iteration(&self) -> u32;

    /// Cost of the current geometry.
    fn current_cost(&self) -> f64;

    fn problem(&self) -> &TraceProblem;

    /// One trace per waypoint pair, in pair order.
    fn output_traces(&self) -> &[OutputTrace];

    /// Title used for drawings.
    fn title(&self) -> &'static str;

    fn is_solved(&self) -> bool {
        self.phase() == SolverPhase::Solved
    }

    /// Steps until solved and returns the final traces.
    fn solve_to_completion(&mut self) -> Vec<OutputTrace> {
        while !self.is_solved() {
            self.step();
        }
        self.output_traces().to_vec()
    }

    /// Draws the problem with the current traces. Does not touch solver state.
    fn visualize(&self) -> GraphicsObject {
        visualize_trace_problem(self.problem(), self.output_traces(), self.title())
    }
}

/// Available routing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoutingVariant {
    /// Direct double-bend paths, no refinement.
    Minimal,
    /// Double-bend and U-bend paths refined by offset search.
    #[default]
    Full,
    /// Single free elbow per trace, refined by compass search.
    Angular,
}

/// Creates a solver for `variant` with its default configuration.
#[must_use]
pub fn build_solver(problem: TraceProblem, variant: RoutingVariant) -> Box<dyn TraceSolver> {
    match variant {
        RoutingVariant::Minimal => Box::new(OffsetSolver::from_parts(
            problem,
            OffsetSolverConfig::minimal(),
        )),
        RoutingVariant::Full => Box::new(OffsetSolver::new(problem)),
        RoutingVariant::Angular => Box::new(ElbowSolver::new(problem)),
    }
}

/// Validates `problem`, then creates a solver for `variant`.
///
/// # Errors
///
/// Returns `TraceRouteError::Problem` if the problem fails
/// [`TraceProblem::validate`].
pub fn try_build_solver(
    problem: TraceProblem,
    variant: RoutingVariant,
) -> Result<Box<dyn TraceSolver>> {
    problem.validate()?;
    Ok(build_solver(problem, variant))
}

/// Counts consecutive steps whose relative improvement falls below a
/// threshold.
#[derive(Debug, Clone)]
pub(crate) struct StagnationTracker {
    threshold: f64,
    limit: u32,
    last_cost: Option<f64>,
    stalled: u32,
}

impl StagnationTracker {
    pub(crate) fn new(threshold: f64, limit: u32) -> Self {
        Self {
            threshold,
            limit,
            last_cost: None,
            stalled: 0,
        }
    }

    /// Records the cost after a step. A zero previous cost counts as no
    /// improvement.
    pub(crate) fn record(&mut self, cost: f64) {
        if let Some(last) = self.last_cost {
            let improvement = if last > 0.0 { (last - cost) / last } else { 0.0 };
            if improvement < self.threshold {
                self.stalled += 1;
            } else {
                self.stalled = 0;
            }
        }
        self.last_cost = Some(cost);
    }

    pub(crate) fn is_stagnant(&self) -> bool {
        self.stalled >= self.limit
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tracing_subscriber::EnvFilter;

    use crate::geometry::{Bounds, Obstacle};
    use crate::math::distance_2d::segment_segment_distance_sq;
    use crate::math::{polyline_segments, Point2};
    use crate::problem::{shares_network, OutputTrace, TraceProblem, WaypointPair};

    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    pub fn square() -> Bounds {
        Bounds::new(0.0, 100.0, 0.0, 100.0)
    }

    pub fn pair(sx: f64, sy: f64, ex: f64, ey: f64) -> WaypointPair {
        WaypointPair::new(Point2::new(sx, sy), Point2::new(ex, ey))
    }

    /// Two pairs across the area from the left edge to the right edge.
    pub fn opposite_edges() -> TraceProblem {
        TraceProblem::new(
            square(),
            vec![pair(0.0, 30.0, 100.0, 30.0), pair(0.0, 70.0, 100.0, 70.0)],
            10.0,
            5.0,
        )
    }

    /// Two nested pairs on the top edge.
    pub fn shared_edge() -> TraceProblem {
        TraceProblem::new(
            square(),
            vec![pair(20.0, 100.0, 80.0, 100.0), pair(35.0, 100.0, 65.0, 100.0)],
            10.0,
            5.0,
        )
    }

    /// One pair along the top edge with an obstacle covering most of it.
    pub fn obstacle_on_edge() -> TraceProblem {
        TraceProblem::new(square(), vec![pair(5.0, 100.0, 95.0, 100.0)], 10.0, 5.0)
            .with_obstacles(vec![Obstacle::new(15.0, 85.0, 100.0, 120.0)])
    }

    /// Asserts every segment pair of every two outputs off a shared network is
    /// at least the preferred trace spacing apart.
    pub fn assert_min_spacing(problem: &TraceProblem, outputs: &[OutputTrace]) {
        let spacing_sq = problem.preferred_trace_to_trace_spacing.powi(2);
        for (i, a) in outputs.iter().enumerate() {
            for b in &outputs[i + 1..] {
                if shares_network(a.network_id.as_deref(), b.network_id.as_deref()) {
                    continue;
                }
                for (a1, a2) in polyline_segments(&a.points) {
                    for (b1, b2) in polyline_segments(&b.points) {
                        let d2 = segment_segment_distance_sq(&a1, &a2, &b1, &b2);
                        assert!(
                            d2 >= spacing_sq - 1e-6,
                            "segments {a1}-{a2} and {b1}-{b2} are at d² = {d2}"
                        );
                    }
                }
            }
        }
    }

    pub fn assert_endpoints(problem: &TraceProblem, outputs: &[OutputTrace]) {
        assert_eq!(outputs.len(), problem.waypoint_pairs.len());
        for (output, pair) in outputs.iter().zip(&problem.waypoint_pairs) {
            assert_eq!(&output.waypoint_pair, pair);
            assert_eq!(output.points.first(), Some(&pair.start));
            assert_eq!(output.points.last(), Some(&pair.end));
        }
    }
}
