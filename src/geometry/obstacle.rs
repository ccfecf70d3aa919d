use serde::{Deserialize, Serialize};

use crate::math::{Point2, Segment};

/// Axis-aligned rectangular keep-out region.
///
/// Obstacles may lie partially or entirely outside the routing bounds. For cost
/// purposes only the four outer edges matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obstacle {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    #[serde(with = "crate::math::point_xy")]
    pub center: Point2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
}

impl Obstacle {
    /// Creates an obstacle from its extents; the center is derived.
    #[must_use]
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            center: Point2::new((min_x + max_x) * 0.5, (min_y + max_y) * 0.5),
            network_id: None,
        }
    }

    /// Assigns the obstacle to a network; traces on the same network may touch it.
    #[must_use]
    pub fn with_network_id(mut self, network_id: impl Into<String>) -> Self {
        self.network_id = Some(network_id.into());
        self
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// The four outer edges, counter-clockwise from `(min_x, min_y)`.
    #[must_use]
    pub fn outer_segments(&self) -> [Segment; 4] {
        let bl = Point2::new(self.min_x, self.min_y);
        let br = Point2::new(self.max_x, self.min_y);
        let tr = Point2::new(self.max_x, self.max_y);
        let tl = Point2::new(self.min_x, self.max_y);
        [(bl, br), (br, tr), (tr, tl), (tl, bl)]
    }

    /// Returns whether the interiors of the two rectangles overlap.
    /// Rectangles that only share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Obstacle) -> bool {
        !(self.max_x <= other.min_x
            || self.min_x >= other.max_x
            || self.max_y <= other.min_y
            || self.min_y >= other.max_y)
    }
}

/// One outer edge of an obstacle, tagged with the obstacle's network.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleEdge {
    pub segment: Segment,
    pub network_id: Option<String>,
}

impl ObstacleEdge {
    /// Flattens the outer edges of every obstacle.
    #[must_use]
    pub fn collect(obstacles: &[Obstacle]) -> Vec<ObstacleEdge> {
        obstacles
            .iter()
            .flat_map(|obstacle| {
                obstacle.outer_segments().into_iter().map(|segment| ObstacleEdge {
                    segment,
                    network_id: obstacle.network_id.clone(),
                })
            })
            .collect()
    }
}
