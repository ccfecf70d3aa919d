use serde::{Deserialize, Serialize};

use super::terms::{polyline_obstacle_penalty, polyline_pair_penalty, Falloff, ProximityRule};
use crate::geometry::{Bounds, ObstacleEdge};
use crate::problem::{shares_network, TraceProblem};
use crate::traces::{ElbowTrace, TracePolyline};

/// Constants of the elbow-family cost function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElbowCostParams {
    /// Elbows sharper than this angle (degrees) are penalized.
    pub min_angle_deg: f64,
    pub angle_weight: f64,
    pub aversion_numerator: f64,
    pub aversion_softening: f64,
    pub aversion_weight: f64,
    /// Elbows within this distance of the boundary count as outside the area.
    pub out_of_area_margin: f64,
    pub out_of_area_penalty: f64,
    pub depth_weight: f64,
    pub contact_tolerance_sq: f64,
    pub hit_penalty: f64,
    /// Applied twice to every spacing deficit.
    pub collision_weight: f64,
}

impl Default for ElbowCostParams {
    fn default() -> Self {
        Self {
            min_angle_deg: 90.0,
            angle_weight: 10.0,
            aversion_numerator: 0.01,
            aversion_softening: 0.005,
            aversion_weight: 200.0,
            out_of_area_margin: 0.005,
            out_of_area_penalty: 1e7,
            depth_weight: 5000.0,
            contact_tolerance_sq: 1e-9,
            hit_penalty: 5e6,
            collision_weight: 500.0,
        }
    }
}

/// Scores a set of elbow traces against one problem.
///
/// Unlike the offset model the trace spacing is supplied per evaluation so
/// that the caller can relax it over time.
#[derive(Debug, Clone)]
pub struct ElbowCostModel {
    bounds: Bounds,
    obstacle_edges: Vec<ObstacleEdge>,
    obstacle_spacing: f64,
    params: ElbowCostParams,
}

impl ElbowCostModel {
    #[must_use]
    pub fn new(problem: &TraceProblem) -> Self {
        Self::with_params(problem, ElbowCostParams::default())
    }

    #[must_use]
    pub fn with_params(problem: &TraceProblem, params: ElbowCostParams) -> Self {
        Self {
            bounds: problem.bounds,
            obstacle_edges: problem.obstacle_edges(),
            obstacle_spacing: problem.preferred_obstacle_to_trace_spacing,
            params,
        }
    }

    #[must_use]
    pub fn params(&self) -> &ElbowCostParams {
        &self.params
    }

    fn rule(&self, spacing: f64) -> ProximityRule {
        ProximityRule {
            spacing,
            contact_tolerance_sq: self.params.contact_tolerance_sq,
            hit_penalty: self.params.hit_penalty,
            weight: self.params.collision_weight * 2.0,
            falloff: Falloff::Linear,
        }
    }

    /// Total cost of `traces` with trace-trace spacing `effective_spacing`.
    #[must_use]
    pub fn evaluate(&self, traces: &[ElbowTrace], effective_spacing: f64) -> f64 {
        let trace_rule = self.rule(effective_spacing);
        let obstacle_rule = self.rule(self.obstacle_spacing);

        let mut total = 0.0;
        for (i, trace) in traces.iter().enumerate() {
            total += self.shape_penalty(trace);
            total += self.depth_penalty(trace, traces, effective_spacing);

            for other in &traces[i + 1..] {
                if shares_network(trace.network_id(), other.network_id()) {
                    continue;
                }
                total += polyline_pair_penalty(trace.points(), other.points(), &trace_rule);
            }

            total += polyline_obstacle_penalty(
                trace.points(),
                trace.network_id(),
                &self.obstacle_edges,
                &obstacle_rule,
            );
        }
        total
    }

    /// Angle, boundary aversion and out-of-area terms of a single trace.
    fn shape_penalty(&self, trace: &ElbowTrace) -> f64 {
        let p = &self.params;
        let mut total = 0.0;

        let angle = trace.angle();
        if angle < p.min_angle_deg {
            total += (p.min_angle_deg - angle) * p.angle_weight;
        }

        let edge_distance = self.bounds.distance_to_edge(&trace.elbow());
        total += p.aversion_numerator / (edge_distance.max(0.0) + p.aversion_softening)
            * p.aversion_weight;

        if edge_distance < p.out_of_area_margin {
            total += p.out_of_area_penalty;
        }
        total
    }

    /// Penalizes containers that do not reach at least `spacing` deeper than
    /// each trace they contain.
    fn depth_penalty(&self, container: &ElbowTrace, traces: &[ElbowTrace], spacing: f64) -> f64 {
        if container.contains().is_empty() {
            return 0.0;
        }
        let depth = container.depth(&self.bounds);
        container
            .contains()
            .iter()
            .filter_map(|&j| traces.get(j))
            .map(|inner| {
                let required = inner.depth(&self.bounds) + spacing;
                if depth < required {
                    let deficit = required - depth;
                    deficit * deficit * self.params.depth_weight
                } else {
                    0.0
                }
            })
            .sum()
    }
}
