use std::f64::consts::FRAC_1_SQRT_2;

use tracing::{debug, info, trace};

use super::config::ElbowSolverConfig;
use super::{SolverPhase, StagnationTracker, TraceSolver};
use crate::containment::containment_lists;
use crate::cost::ElbowCostModel;
use crate::error::ConfigError;
use crate::math::Vector2;
use crate::problem::{OutputTrace, TraceProblem};
use crate::traces::{ElbowTrace, TracePolyline};

/// Unit moves tried for every elbow, axis-aligned first.
const COMPASS: [(f64, f64); 8] = [
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
];

/// Routes every pair through one free elbow and moves the elbows by compass
/// search while the trace spacing relaxes toward its preferred value.
#[derive(Debug, Clone)]
pub struct ElbowSolver {
    problem: TraceProblem,
    config: ElbowSolverConfig,
    cost_model: ElbowCostModel,
    traces: Vec<ElbowTrace>,
    outputs: Vec<OutputTrace>,
    iteration: u32,
    phase: SolverPhase,
    stagnation: StagnationTracker,
    current_cost: f64,
}

impl ElbowSolver {
    #[must_use]
    pub fn new(problem: TraceProblem) -> Self {
        Self::from_parts(problem, ElbowSolverConfig::default())
    }

    /// Creates a solver with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` if the configuration is invalid.
    pub fn with_config(problem: TraceProblem, config: ElbowSolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(problem, config))
    }

    fn from_parts(problem: TraceProblem, config: ElbowSolverConfig) -> Self {
        let cost_model = ElbowCostModel::with_params(&problem, config.cost);
        let stagnation = StagnationTracker::new(config.stagnation_threshold, config.stagnation_limit);
        let mut solver = Self {
            problem,
            config,
            cost_model,
            traces: Vec::new(),
            outputs: Vec::new(),
            iteration: 0,
            phase: SolverPhase::Initialized,
            stagnation,
            current_cost: 0.0,
        };
        solver.reset();
        solver
    }

    /// Places every elbow at its pair's midpoint and computes the containment
    /// relation. The relation is not updated afterwards.
    fn reset(&mut self) {
        let bounds = self.problem.bounds;
        self.iteration = 0;
        self.phase = SolverPhase::Initialized;
        self.stagnation = StagnationTracker::new(
            self.config.stagnation_threshold,
            self.config.stagnation_limit,
        );

        self.traces = self
            .problem
            .waypoint_pairs
            .iter()
            .map(|pair| ElbowTrace::new(pair, &bounds))
            .collect();

        let chords: Vec<_> = self.traces.iter().map(|t| *t.chord()).collect();
        for (trace, contains) in self
            .traces
            .iter_mut()
            .zip(containment_lists(&chords, bounds.perimeter()))
        {
            trace.set_contains(contains);
        }

        self.current_cost = self.cost_model.evaluate(&self.traces, self.effective_spacing());
        self.rebuild_outputs();
        debug!(
            traces = self.traces.len(),
            cost = self.current_cost,
            "initialized elbow solver"
        );
    }

    #[must_use]
    pub fn config(&self) -> &ElbowSolverConfig {
        &self.config
    }

    #[must_use]
    pub fn traces(&self) -> &[ElbowTrace] {
        &self.traces
    }

    /// Trace-trace spacing in effect at the current iteration.
    #[must_use]
    pub fn effective_spacing(&self) -> f64 {
        self.config
            .spacing_schedule
            .effective_spacing(self.problem.preferred_trace_to_trace_spacing, self.iteration)
    }

    fn should_stop(&self) -> bool {
        self.iteration >= self.config.max_iterations
            || (self.config.spacing_schedule.is_settled(self.iteration)
                && self.stagnation.is_stagnant())
    }

    fn finish(&mut self) {
        self.phase = SolverPhase::Solved;
        info!(
            iteration = self.iteration,
            cost = self.current_cost,
            "elbow solver finished"
        );
    }

    fn optimize_step(&mut self) {
        let step = self.config.step_schedule.step_size(self.iteration);
        let spacing = self.effective_spacing();
        let bounds = self.problem.bounds;
        let margin = self.config.elbow_margin;

        for i in 0..self.traces.len() {
            let original = self.traces[i].elbow();
            let mut best = original;
            let mut best_cost = self.cost_model.evaluate(&self.traces, spacing);

            for (dx, dy) in COMPASS {
                let moved = original + Vector2::new(dx, dy) * step;
                self.traces[i].set_elbow(bounds.clamp_inside(&moved, margin));
                let cost = self.cost_model.evaluate(&self.traces, spacing);
                if cost < best_cost {
                    best_cost = cost;
                    best = self.traces[i].elbow();
                }
            }

            self.traces[i].set_elbow(best);
            if best != original {
                trace!(trace = i, x = best.x, y = best.y, cost = best_cost, "moved elbow");
            }
        }

        debug!(iteration = self.iteration, step, spacing, "elbow step");
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

impl TraceSolver for ElbowSolver {
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
        self.current_cost = self.cost_model.evaluate(&self.traces, self.effective_spacing());
        if self.config.spacing_schedule.is_settled(self.iteration) {
            self.stagnation.record(self.current_cost);
        }
        self.rebuild_outputs();

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
        "Angular Trace Solver"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::solver::schedule::SpacingSchedule;
    use crate::solver::test_support::*;

    fn fixed_spacing(max_iterations: u32) -> ElbowSolverConfig {
        ElbowSolverConfig::default()
            .with_spacing_schedule(SpacingSchedule::constant())
            .with_max_iterations(max_iterations)
    }

    #[test]
    fn containment_is_computed_at_construction() {
        let solver = ElbowSolver::new(shared_edge());
        assert_eq!(solver.traces()[0].contains(), &[1]);
        assert!(solver.traces()[1].contains().is_empty());
        assert_endpoints(solver.problem(), solver.output_traces());
    }

    #[test]
    fn elbows_start_at_midpoints() {
        let problem = opposite_edges();
        let solver = ElbowSolver::new(problem.clone());
        for (trace, pair) in solver.traces().iter().zip(&problem.waypoint_pairs) {
            assert_eq!(trace.elbow(), nalgebra::center(&pair.start, &pair.end));
        }
    }

    #[test]
    fn cost_never_increases_with_fixed_spacing() {
        let problem = shared_edge();
        let mut solver = ElbowSolver::with_config(problem.clone(), fixed_spacing(200)).unwrap();
        let mut last = solver.current_cost();
        while !solver.is_solved() {
            solver.step();
            assert!(solver.current_cost() <= last + 1e-9);
            last = solver.current_cost();
            assert_endpoints(&problem, solver.output_traces());
        }
    }

    #[test]
    fn container_elbow_ends_up_deeper() {
        init_tracing();
        let problem = shared_edge();
        let mut solver = ElbowSolver::new(problem.clone());
        let outputs = solver.solve_to_completion();
        assert_endpoints(&problem, &outputs);

        let bounds = problem.bounds;
        let outer = solver.traces()[0].depth(&bounds);
        let inner = solver.traces()[1].depth(&bounds);
        assert!(outer > inner, "outer depth {outer} vs inner depth {inner}");
        let mut midpoints = vec![
            ElbowTrace::new(&problem.waypoint_pairs[0], &bounds),
            ElbowTrace::new(&problem.waypoint_pairs[1], &bounds),
        ];
        midpoints[0].set_contains(vec![1]);
        let initial = solver
            .cost_model
            .evaluate(&midpoints, solver.effective_spacing());
        assert!(solver.current_cost() < initial);
    }

    #[test]
    fn nested_pairs_keep_their_spacing() {
        init_tracing();
        for problem in [
            shared_edge(),
            TraceProblem::new(
                square(),
                vec![pair(10.0, 0.0, 90.0, 0.0), pair(30.0, 0.0, 70.0, 0.0)],
                10.0,
                5.0,
            ),
            TraceProblem::new(
                square(),
                vec![pair(0.0, 10.0, 0.0, 90.0), pair(0.0, 30.0, 0.0, 70.0)],
                10.0,
                5.0,
            ),
        ] {
            let mut solver = ElbowSolver::new(problem.clone());
            let outputs = solver.solve_to_completion();
            assert_endpoints(&problem, &outputs);
            assert_min_spacing(&problem, &outputs);

            let bounds = problem.bounds;
            let outer = solver.traces()[0].depth(&bounds);
            let inner = solver.traces()[1].depth(&bounds);
            assert!(outer >= inner + problem.preferred_trace_to_trace_spacing - 1e-3);
        }
    }

    #[test]
    fn elbows_stay_inside_the_bounds() {
        let problem = opposite_edges();
        let mut solver = ElbowSolver::with_config(problem.clone(), fixed_spacing(100)).unwrap();
        solver.solve_to_completion();
        for trace in solver.traces() {
            assert!(problem.bounds.distance_to_edge(&trace.elbow()) >= 0.001 - 1e-12);
        }
    }

    #[test]
    fn terminates_within_max_iterations() {
        let config = fixed_spacing(25).with_stagnation(0.0, u32::MAX);
        let mut solver = ElbowSolver::with_config(opposite_edges(), config).unwrap();
        let mut steps = 0;
        while !solver.is_solved() {
            solver.step();
            steps += 1;
        }
        assert_eq!(steps, 25);
        assert_eq!(solver.iteration(), 25);
    }

    #[test]
    fn stagnation_waits_for_the_spacing_schedule() {
        let config = ElbowSolverConfig::default()
            .with_spacing_schedule(SpacingSchedule {
                start_multiplier: 3.0,
                end_multiplier: 1.0,
                horizon: 30,
            })
            .with_max_iterations(500);
        let mut solver = ElbowSolver::with_config(opposite_edges(), config).unwrap();
        solver.solve_to_completion();
        assert!(solver.iteration() >= 30 + 10);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ElbowSolverConfig::default().with_min_angle(-5.0);
        assert!(ElbowSolver::with_config(opposite_edges(), config).is_err());
    }
}
