use serde::{Deserialize, Serialize};

use crate::math::{Chord, Point2, Vector2, BOUNDARY_EPSILON};

/// One of the four edges of a [`Bounds`] rectangle.
///
/// The y axis grows upward, so `Top` is the edge at `max_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundarySide {
    Top,
    Right,
    Bottom,
    Left,
}

impl BoundarySide {
    /// All sides in clockwise perimeter order, starting at the top edge.
    pub const CLOCKWISE: [BoundarySide; 4] = [
        BoundarySide::Top,
        BoundarySide::Right,
        BoundarySide::Bottom,
        BoundarySide::Left,
    ];

    /// Unit normal pointing from this edge into the routing area.
    #[must_use]
    pub fn inward(self) -> Vector2 {
        match self {
            BoundarySide::Top => Vector2::new(0.0, -1.0),
            BoundarySide::Right => Vector2::new(-1.0, 0.0),
            BoundarySide::Bottom => Vector2::new(0.0, 1.0),
            BoundarySide::Left => Vector2::new(1.0, 0.0),
        }
    }
}

/// Axis-aligned rectangular routing area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Creates new bounds. No ordering check is made here; see
    /// [`TraceProblem::validate`](crate::problem::TraceProblem::validate).
    #[must_use]
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Total length of the boundary.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        2.0 * self.width() + 2.0 * self.height()
    }

    /// Returns `true` when `min < max` holds on both axes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min_x < self.max_x && self.min_y < self.max_y
    }

    /// Signed distance from `p` to the nearest edge; negative outside.
    #[must_use]
    pub fn distance_to_edge(&self, p: &Point2) -> f64 {
        (p.x - self.min_x)
            .min(self.max_x - p.x)
            .min(p.y - self.min_y)
            .min(self.max_y - p.y)
    }

    /// Returns the edge `p` lies on (within [`BOUNDARY_EPSILON`]), checking
    /// top, right, bottom, left in that order so that corners resolve to the
    /// first matching edge.
    #[must_use]
    pub fn side_of(&self, p: &Point2) -> Option<BoundarySide> {
        BoundarySide::CLOCKWISE
            .into_iter()
            .find(|&side| self.offset_from(side, p).abs() < BOUNDARY_EPSILON)
    }

    /// Returns an edge both `a` and `b` lie on. Unlike [`side_of`](Self::side_of),
    /// a corner counts as lying on both of its edges.
    #[must_use]
    pub fn shared_side(&self, a: &Point2, b: &Point2) -> Option<BoundarySide> {
        BoundarySide::CLOCKWISE.into_iter().find(|&side| {
            self.offset_from(side, a).abs() < BOUNDARY_EPSILON
                && self.offset_from(side, b).abs() < BOUNDARY_EPSILON
        })
    }

    /// Unit normal pointing into the area from the edge `p` lies on, or the
    /// zero vector when `p` is not on the boundary.
    #[must_use]
    pub fn inward_direction(&self, p: &Point2) -> Vector2 {
        self.side_of(p).map_or_else(Vector2::zeros, BoundarySide::inward)
    }

    /// Maps a boundary point to its clockwise arc-length coordinate measured
    /// from the top-left corner.
    ///
    /// | edge   | coordinate              |
    /// |--------|-------------------------|
    /// | top    | `x - min_x`             |
    /// | right  | `W + (max_y - y)`       |
    /// | bottom | `W + H + (max_x - x)`   |
    /// | left   | `2W + H + (y - min_y)`  |
    ///
    /// Points off the boundary are projected to the nearest edge and clamped
    /// into that edge's coordinate range.
    #[must_use]
    pub fn perimeter_coordinate(&self, p: &Point2) -> f64 {
        let side = self.side_of(p).unwrap_or_else(|| self.nearest_side(p));
        let (w, h) = (self.width(), self.height());
        match side {
            BoundarySide::Top => (p.x - self.min_x).clamp(0.0, w),
            BoundarySide::Right => w + (self.max_y - p.y).clamp(0.0, h),
            BoundarySide::Bottom => w + h + (self.max_x - p.x).clamp(0.0, w),
            BoundarySide::Left => 2.0 * w + h + (p.y - self.min_y).clamp(0.0, h),
        }
    }

    /// Inverse of [`perimeter_coordinate`](Self::perimeter_coordinate).
    ///
    /// `t` is wrapped into `[0, perimeter)` first.
    #[must_use]
    pub fn point_at_perimeter_coordinate(&self, t: f64) -> Point2 {
        let (w, h) = (self.width(), self.height());
        let perimeter = self.perimeter();
        let t = if perimeter > 0.0 { t.rem_euclid(perimeter) } else { 0.0 };

        if t < w {
            Point2::new(self.min_x + t, self.max_y)
        } else if t < w + h {
            Point2::new(self.max_x, self.max_y - (t - w))
        } else if t < 2.0 * w + h {
            Point2::new(self.max_x - (t - w - h), self.min_y)
        } else {
            Point2::new(self.min_x, self.min_y + (t - 2.0 * w - h))
        }
    }

    /// Builds the perimeter chord of the segment `start → end`.
    #[must_use]
    pub fn chord(&self, start: &Point2, end: &Point2) -> Chord {
        Chord::new(self.perimeter_coordinate(start), self.perimeter_coordinate(end))
    }

    /// Corner points in counter-clockwise order starting at `(min_x, min_y)`.
    #[must_use]
    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.min_x, self.min_y),
            Point2::new(self.max_x, self.min_y),
            Point2::new(self.max_x, self.max_y),
            Point2::new(self.min_x, self.max_y),
        ]
    }

    /// Clamps `p` into the rectangle shrunk by `margin` on every side.
    #[must_use]
    pub fn clamp_inside(&self, p: &Point2, margin: f64) -> Point2 {
        Point2::new(
            p.x.max(self.min_x + margin).min(self.max_x - margin),
            p.y.max(self.min_y + margin).min(self.max_y - margin),
        )
    }

    /// Signed offset of `p` from the line carrying `side`.
    fn offset_from(&self, side: BoundarySide, p: &Point2) -> f64 {
        match side {
            BoundarySide::Top => p.y - self.max_y,
            BoundarySide::Right => p.x - self.max_x,
            BoundarySide::Bottom => p.y - self.min_y,
            BoundarySide::Left => p.x - self.min_x,
        }
    }

    fn nearest_side(&self, p: &Point2) -> BoundarySide {
        let mut best = BoundarySide::Top;
        let mut best_dist = f64::INFINITY;
        for side in BoundarySide::CLOCKWISE {
            let dist = self.offset_from(side, p).abs();
            if dist < best_dist {
                best = side;
                best_dist = dist;
            }
        }
        best
    }
}
