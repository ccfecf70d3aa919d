use tracing::{debug, info, trace};

use super::config::OffsetSolverConfig;
use super::{SolverPhase, StagnationTracker, TraceSolver};
use crate::containment::resolve_nested_offsets;
use crate::cost::OffsetCostModel;
use crate::error::ConfigError;
use crate::path::{initial_double_bend_offset, is_same_side, BendDirection, LegStyle, PathShape};
use crate::problem::{OutputTrace, TraceProblem, WaypointPair};
use crate::traces::{OffsetTrace, TracePolyline};

/// Routes every pair as a double-bend or U-bend path and refines the scalar
/// offset of each trace by coordinate descent.
#[derive(Debug, Clone)]
pub struct OffsetSolver {
    problem: TraceProblem,
    config: OffsetSolverConfig,
    cost_model: OffsetCostModel,
    traces: Vec<OffsetTrace>,
    outputs: Vec<OutputTrace>,
    iteration: u32,
    phase: SolverPhase,
    stagnation: StagnationTracker,
    current_cost: f64,
}

impl OffsetSolver {
    /// Creates a solver with the full configuration.
    #[must_use]
    pub fn new(problem: TraceProblem) -> Self {
        Self::from_parts(problem, OffsetSolverConfig::full())
    }

    /// Creates a solver with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` if the configuration is invalid.
    pub fn with_config(problem: TraceProblem, config: OffsetSolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(problem, config))
    }

    pub(crate) fn from_parts(problem: TraceProblem, config: OffsetSolverConfig) -> Self {
        let cost_model = OffsetCostModel::with_params(&problem, config.cost);
        let mut traces: Vec<OffsetTrace> = problem
            .waypoint_pairs
            .iter()
            .map(|pair| initial_trace(pair, &problem, &config, &cost_model))
            .collect();

        if config.resolve_nesting {
            resolve_nested_offsets(
                &mut traces,
                &problem.waypoint_pairs,
                problem.preferred_trace_to_trace_spacing,
            );
        }

        let current_cost = cost_model.evaluate(&traces);
        let stagnation = StagnationTracker::new(config.stagnation_threshold, config.stagnation_limit);
        debug!(
            traces = traces.len(),
            obstacles = problem.obstacles.len(),
            cost = current_cost,
            "initialized offset solver"
        );

        let mut solver = Self {
            problem,
            config,
            cost_model,
            traces,
            outputs: Vec::new(),
            iteration: 0,
            phase: SolverPhase::Initialized,
            stagnation,
            current_cost,
        };
        solver.rebuild_outputs();
        solver
    }

    #[must_use]
    pub fn config(&self) -> &OffsetSolverConfig {
        &self.config
    }

    /// Current per-trace optimization state.
    #[must_use]
    pub fn traces(&self) -> &[OffsetTrace] {
        &self.traces
    }

    fn should_stop(&self) -> bool {
        !self.config.local_search
            || self.iteration >= self.config.max_iterations
            || self.stagnation.is_stagnant()
    }

    fn finish(&mut self) {
        self.phase = SolverPhase::Solved;
        info!(
            iteration = self.iteration,
            cost = self.current_cost,
            "offset solver finished"
        );
    }

    /// Tries `offset ± step` for each trace in turn and keeps the move only if
    /// it strictly lowers the total cost.
    fn optimize_step(&mut self) {
        let step = self.config.step_schedule.step_size(self.iteration);

        for i in 0..self.traces.len() {
            let original = self.traces[i].offset();
            let mut best_offset = original;
            let mut best_cost = self.cost_model.evaluate(&self.traces);

            for candidate in [original + step, original - step] {
                self.traces[i].set_offset(candidate);
                let cost = self.cost_model.evaluate(&self.traces);
                if cost < best_cost {
                    best_cost = cost;
                    best_offset = candidate;
                }
            }

            self.traces[i].set_offset(best_offset);
            if (best_offset - original).abs() > 0.0 {
                trace!(trace = i, offset = best_offset, cost = best_cost, "moved trace");
            }
        }

        debug!(iteration = self.iteration, step, "offset step");
    }

    fn rebuild_outputs(&mut self) {
        self.outputs = self
            .traces
            .iter()
            .zip(&self.problem.waypoint_pairs)
            .map(|(trace, pair)| OutputTrace {
                waypoint_pair: pair.clone(),
                points: trace.points().to_vec(),
                network_id: pair.network_id.clone(),
            })
            .collect();
    }
}

/// U-bend for nearly axis-aligned pairs, double bend otherwise.
///
/// A U-bend whose anchors share a boundary edge gets perpendicular legs;
/// one crossing the area keeps diagonal legs clear of the side edges.
fn initial_trace(
    pair: &WaypointPair,
    problem: &TraceProblem,
    config: &OffsetSolverConfig,
    cost_model: &OffsetCostModel,
) -> OffsetTrace {
    if config.use_u_bends && is_same_side(&pair.start, &pair.end) {
        let offset = problem.preferred_obstacle_to_trace_spacing * 2.0;
        let legs = if problem.bounds.shared_side(&pair.start, &pair.end).is_some() {
            LegStyle::Perpendicular
        } else {
            LegStyle::Diagonal
        };
        let u_bend = |bend| OffsetTrace::new(pair, PathShape::UBend { bend, legs }, offset);
        let positive = u_bend(BendDirection::Positive);
        let negative = u_bend(BendDirection::Negative);
        if cost_model.evaluate_isolated(&positive) < cost_model.evaluate_isolated(&negative) {
            positive
        } else {
            negative
        }
    } else {
        let offset = initial_double_bend_offset(&pair.start, &pair.end);
        OffsetTrace::new(pair, PathShape::DoubleBend, offset)
    }
}

impl TraceSolver for OffsetSolver {
    fn step(&mut self) {
        if self.phase == SolverPhase::Solved {
            return;
        }
        self.phase = SolverPhase::Stepping;
        if self.should_stop() {
            self.finish();
            return;
        }

        self.optimize_step();
        self.iteration += 1;
        self.current_cost = self.cost_model.evaluate(&self.traces);
        self.stagnation.record(self.current_cost);
        self.rebuild_outputs();
        debug!(iteration = self.iteration, cost = self.current_cost, "offset cost");

        if self.should_stop() {
            self.finish();
        }
    }

    fn phase(&self) -> SolverPhase {
        self.phase
    }

    fn iteration(&self) -> u32 {
        self.iteration
    }

    fn current_cost(&self) -> f64 {
        self.current_cost
    }

    fn problem(&self) -> &TraceProblem {
        &self.problem
    }

    fn output_traces(&self) -> &[OutputTrace] {
        &self.outputs
    }

    fn title(&self) -> &'static str {
        "Offset Trace Solver"
    }
}
