use serde::{Deserialize, Serialize};

use crate::error::ProblemError;
use crate::geometry::{Bounds, Obstacle, ObstacleEdge};
use crate::math::chord::count_chord_crossings;
use crate::math::{Chord, Point2, Vector2, BOUNDARY_EPSILON};

/// Returns whether two network ids are equal and non-empty.
///
/// Traces (and obstacles) on the same network are electrically one connection
/// and are exempt from mutual spacing penalties.
#[must_use]
pub fn shares_network(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if !a.is_empty() && a == b)
}

/// A required connection between two points on the bounds perimeter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointPair {
    #[serde(with = "crate::math::point_xy")]
    pub start: Point2,
    #[serde(with = "crate::math::point_xy")]
    pub end: Point2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
}

impl WaypointPair {
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self {
            start,
            end,
            network_id: None,
        }
    }

    #[must_use]
    pub fn with_network_id(mut self, network_id: impl Into<String>) -> Self {
        self.network_id = Some(network_id.into());
        self
    }

    /// Vector from `start` to `end`.
    #[must_use]
    pub fn delta(&self) -> Vector2 {
        self.end - self.start
    }

    /// Whether the pair runs mostly along x (`|Δx| > |Δy|`).
    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        let d = self.delta();
        d.x.abs() > d.y.abs()
    }

    /// Span of the pair along x, as `(min, max)`.
    #[must_use]
    pub fn x_span(&self) -> (f64, f64) {
        (self.start.x.min(self.end.x), self.start.x.max(self.end.x))
    }

    /// Span of the pair along y, as `(min, max)`.
    #[must_use]
    pub fn y_span(&self) -> (f64, f64) {
        (self.start.y.min(self.end.y), self.start.y.max(self.end.y))
    }

    /// The pair as a perimeter chord of `bounds`.
    #[must_use]
    pub fn chord(&self, bounds: &Bounds) -> Chord {
        bounds.chord(&self.start, &self.end)
    }
}

/// An immutable routing problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceProblem {
    pub bounds: Bounds,
    pub waypoint_pairs: Vec<WaypointPair>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    pub preferred_trace_to_trace_spacing: f64,
    pub preferred_obstacle_to_trace_spacing: f64,
}

impl TraceProblem {
    /// Creates a problem without obstacles.
    #[must_use]
    pub fn new(
        bounds: Bounds,
        waypoint_pairs: Vec<WaypointPair>,
        preferred_trace_to_trace_spacing: f64,
        preferred_obstacle_to_trace_spacing: f64,
    ) -> Self {
        Self {
            bounds,
            waypoint_pairs,
            obstacles: Vec::new(),
            preferred_trace_to_trace_spacing,
            preferred_obstacle_to_trace_spacing,
        }
    }

    #[must_use]
    pub fn with_obstacles(mut self, obstacles: Vec<Obstacle>) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// Outer edges of all obstacles, each tagged with its obstacle's network.
    #[must_use]
    pub fn obstacle_edges(&self) -> Vec<ObstacleEdge> {
        ObstacleEdge::collect(&self.obstacles)
    }

    /// Perimeter chords of all waypoint pairs, in pair order.
    #[must_use]
    pub fn chords(&self) -> Vec<Chord> {
        self.waypoint_pairs
            .iter()
            .map(|pair| pair.chord(&self.bounds))
            .collect()
    }

    /// Number of crossing waypoint-pair chords. Every crossing forces at least
    /// one trace intersection regardless of routing.
    #[must_use]
    pub fn chord_crossings(&self) -> usize {
        count_chord_crossings(&self.chords())
    }

    /// Checks the problem's preconditions.
    ///
    /// Solvers do not call this; they accept any input and route it as well as
    /// the cost model allows.
    ///
    /// # Errors
    ///
    /// - `ProblemError::DegenerateBounds` if the bounds have no area
    /// - `ProblemError::InvalidSpacing` if a spacing is negative or not finite
    /// - `ProblemError::WaypointOffBoundary` if a waypoint is not on the perimeter
    pub fn validate(&self) -> Result<(), ProblemError> {
        let b = &self.bounds;
        if !b.is_valid() {
            return Err(ProblemError::DegenerateBounds {
                min_x: b.min_x,
                max_x: b.max_x,
                min_y: b.min_y,
                max_y: b.max_y,
            });
        }

        for (name, value) in [
            (
                "preferred_trace_to_trace_spacing",
                self.preferred_trace_to_trace_spacing,
            ),
            (
                "preferred_obstacle_to_trace_spacing",
                self.preferred_obstacle_to_trace_spacing,
            ),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ProblemError::InvalidSpacing { name, value });
            }
        }

        for (index, pair) in self.waypoint_pairs.iter().enumerate() {
            for (which, p) in [("start", &pair.start), ("end", &pair.end)] {
                let on_boundary = b.side_of(p).is_some()
                    && p.x >= b.min_x - BOUNDARY_EPSILON
                    && p.x <= b.max_x + BOUNDARY_EPSILON
                    && p.y >= b.min_y - BOUNDARY_EPSILON
                    && p.y <= b.max_y + BOUNDARY_EPSILON;
                if !on_boundary {
                    return Err(ProblemError::WaypointOffBoundary {
                        index,
                        which,
                        x: p.x,
                        y: p.y,
                    });
                }
            }
        }

        Ok(())
    }
}

/// The routed result for one waypoint pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputTrace {
    pub waypoint_pair: WaypointPair,
    #[serde(with = "crate::math::point_xy::vec")]
    pub points: Vec<Point2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
}
