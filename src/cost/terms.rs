use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, ObstacleEdge};
use crate::math::distance_2d::segment_segment_distance_sq;
use crate::math::{polyline_segments, Point2};
use crate::problem::shares_network;

/// How a spacing deficit grows as two segments approach each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Falloff {
    /// `spacing² - d²`
    SquaredDistance,
    /// `(spacing - d)²`
    Linear,
}

/// Penalty applied to one pair of segments at squared distance `d²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityRule {
    pub spacing: f64,
    /// Squared distances at or below this count as contact.
    pub contact_tolerance_sq: f64,
    /// Fixed penalty added on contact.
    pub hit_penalty: f64,
    pub weight: f64,
    pub falloff: Falloff,
}

impl ProximityRule {
    fn deficit(&self, distance_sq: f64) -> f64 {
        match self.falloff {
            Falloff::SquaredDistance => self.spacing * self.spacing - distance_sq,
            Falloff::Linear => {
                let gap = self.spacing - distance_sq.max(0.0).sqrt();
                gap * gap
            }
        }
    }

    /// Penalty for a segment pair at squared distance `distance_sq`.
    ///
    /// Contact pays the hit penalty plus the zero-distance deficit, so the
    /// result never decreases as the distance shrinks.
    #[must_use]
    pub fn penalty(&self, distance_sq: f64) -> f64 {
        if distance_sq <= self.contact_tolerance_sq {
            self.hit_penalty + self.deficit(0.0) * self.weight
        } else if distance_sq < self.spacing * self.spacing {
            self.deficit(distance_sq) * self.weight
        } else {
            0.0
        }
    }
}

/// Sum of `(margin - distance) × weight` over interior vertices closer than
/// `margin` to the boundary. The two endpoints are exempt.
#[must_use]
pub fn boundary_margin_penalty(points: &[Point2], bounds: &Bounds, margin: f64, weight: f64) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    points[1..points.len() - 1]
        .iter()
        .map(|p| bounds.distance_to_edge(p))
        .filter(|&dist| dist < margin)
        .map(|dist| (margin - dist) * weight)
        .sum()
}

/// Proximity penalty between every segment of `a` and every segment of `b`.
#[must_use]
pub fn polyline_pair_penalty(a: &[Point2], b: &[Point2], rule: &ProximityRule) -> f64 {
    let mut total = 0.0;
    for (a1, a2) in polyline_segments(a) {
        for (b1, b2) in polyline_segments(b) {
            total += rule.penalty(segment_segment_distance_sq(&a1, &a2, &b1, &b2));
        }
    }
    total
}

/// Proximity penalty between a polyline and obstacle edges. Edges on the
/// polyline's own network are skipped.
#[must_use]
pub fn polyline_obstacle_penalty(
    points: &[Point2],
    network_id: Option<&str>,
    edges: &[ObstacleEdge],
    rule: &ProximityRule,
) -> f64 {
    let mut total = 0.0;
    for edge in edges {
        if shares_network(network_id, edge.network_id.as_deref()) {
            continue;
        }
        let (o1, o2) = edge.segment;
        for (s1, s2) in polyline_segments(points) {
            total += rule.penalty(segment_segment_distance_sq(&s1, &s2, &o1, &o2));
        }
    }
    total
}
