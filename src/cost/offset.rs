use serde::{Deserialize, Serialize};

use super::terms::{
    boundary_margin_penalty, polyline_obstacle_penalty, polyline_pair_penalty, Falloff,
    ProximityRule,
};
use crate::geometry::{Bounds, ObstacleEdge};
use crate::problem::{shares_network, TraceProblem};
use crate::traces::TracePolyline;

/// Constants of the offset-family cost function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OffsetCostParams {
    /// Interior vertices closer than this to the boundary are penalized.
    pub boundary_margin: f64,
    pub boundary_weight: f64,
    pub trace_hit_penalty: f64,
    pub trace_weight: f64,
    pub obstacle_hit_penalty: f64,
    pub obstacle_weight: f64,
}

impl Default for OffsetCostParams {
    fn default() -> Self {
        Self {
            boundary_margin: 0.5,
            boundary_weight: 5000.0,
            trace_hit_penalty: 1e6,
            trace_weight: 1000.0,
            obstacle_hit_penalty: 1e6,
            obstacle_weight: 100.0,
        }
    }
}

/// Scores a set of offset-family traces against one problem.
///
/// Terms: boundary margin for interior vertices, trace-trace spacing with a
/// squared-distance falloff, and trace-obstacle spacing. Intersections pay a
/// fixed penalty on top of the full spacing deficit.
#[derive(Debug, Clone)]
pub struct OffsetCostModel {
    bounds: Bounds,
    obstacle_edges: Vec<ObstacleEdge>,
    trace_rule: ProximityRule,
    obstacle_rule: ProximityRule,
    params: OffsetCostParams,
}

impl OffsetCostModel {
    #[must_use]
    pub fn new(problem: &TraceProblem) -> Self {
        Self::with_params(problem, OffsetCostParams::default())
    }

    #[must_use]
    pub fn with_params(problem: &TraceProblem, params: OffsetCostParams) -> Self {
        Self {
            bounds: problem.bounds,
            obstacle_edges: problem.obstacle_edges(),
            trace_rule: ProximityRule {
                spacing: problem.preferred_trace_to_trace_spacing,
                contact_tolerance_sq: 0.0,
                hit_penalty: params.trace_hit_penalty,
                weight: params.trace_weight,
                falloff: Falloff::SquaredDistance,
            },
            obstacle_rule: ProximityRule {
                spacing: problem.preferred_obstacle_to_trace_spacing,
                contact_tolerance_sq: 0.0,
                hit_penalty: params.obstacle_hit_penalty,
                weight: params.obstacle_weight,
                falloff: Falloff::SquaredDistance,
            },
            params,
        }
    }

    #[must_use]
    pub fn params(&self) -> &OffsetCostParams {
        &self.params
    }

    /// Total cost of `traces`.
    #[must_use]
    pub fn evaluate<T: TracePolyline>(&self, traces: &[T]) -> f64 {
        let mut total = 0.0;
        for (i, a) in traces.iter().enumerate() {
            total += self.evaluate_isolated(a);
            for b in &traces[i + 1..] {
                if shares_network(a.network_id(), b.network_id()) {
                    continue;
                }
                total += polyline_pair_penalty(a.points(), b.points(), &self.trace_rule);
            }
        }
        total
    }

    /// Cost of one trace against the bounds and obstacles only.
    #[must_use]
    pub fn evaluate_isolated<T: TracePolyline>(&self, trace: &T) -> f64 {
        boundary_margin_penalty(
            trace.points(),
            &self.bounds,
            self.params.boundary_margin,
            self.params.boundary_weight,
        ) + polyline_obstacle_penalty(
            trace.points(),
            trace.network_id(),
            &self.obstacle_edges,
            &self.obstacle_rule,
        )
    }
}
