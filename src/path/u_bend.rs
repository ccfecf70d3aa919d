use serde::{Deserialize, Serialize};

use super::{BendDirection, PathStrategy};
use crate::math::{sign, Point2};

/// How a U-bend's legs leave the two anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LegStyle {
    /// 45° legs that meet the run `offset` inward along the major axis.
    #[default]
    Diagonal,
    /// Legs perpendicular to the pair, so the run spans the full pair.
    ///
    /// Nested perpendicular U-bends keep their legs as far apart as their
    /// anchors at every offset.
    Perpendicular,
}

/// Detour for nearly axis-aligned pairs.
///
/// A run parallel to the pair is placed `offset` away from the pair's midpoint
/// on the `bend` side and joined to each endpoint by a leg. Diagonal legs that
/// would pass each other collapse the path to a single apex above the
/// midpoint: `[start, apex, end]`.
#[derive(Debug, Clone, Copy)]
pub struct UBendPath {
    bend: BendDirection,
    legs: LegStyle,
}

impl UBendPath {
    #[must_use]
    pub fn new(bend: BendDirection, legs: LegStyle) -> Self {
        Self { bend, legs }
    }
}

impl PathStrategy for UBendPath {
    fn synthesize(&self, start: &Point2, end: &Point2, offset: f64) -> Vec<Point2> {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let dir = self.bend.sign();

        if dx.abs() > dy.abs() {
            let y_mid = (start.y + end.y) * 0.5 + offset * dir;
            if self.legs == LegStyle::Perpendicular {
                let (p1, p2) = (Point2::new(start.x, y_mid), Point2::new(end.x, y_mid));
                return vec![*start, p1, p2, *end];
            }

            let sx = sign(dx);
            let p1 = Point2::new(start.x + (y_mid - start.y).abs() * sx, y_mid);
            let p2 = Point2::new(end.x - (y_mid - end.y).abs() * sx, y_mid);

            let overshoot = if sx > 0.0 { p1.x > p2.x } else { p1.x < p2.x };
            if overshoot {
                let apex = Point2::new((start.x + end.x) * 0.5, y_mid);
                return vec![*start, apex, *end];
            }
            vec![*start, p1, p2, *end]
        } else {
            let x_mid = (start.x + end.x) * 0.5 + offset * dir;
            if self.legs == LegStyle::Perpendicular {
                let (p1, p2) = (Point2::new(x_mid, start.y), Point2::new(x_mid, end.y));
                return vec![*start, p1, p2, *end];
            }

            let sy = sign(dy);
            let p1 = Point2::new(x_mid, start.y + (x_mid - start.x).abs() * sy);
            let p2 = Point2::new(x_mid, end.y - (x_mid - end.x).abs() * sy);

            let overshoot = if sy > 0.0 { p1.y > p2.y } else { p1.y < p2.y };
            if overshoot {
                let apex = Point2::new(x_mid, (start.y + end.y) * 0.5);
                return vec![*start, apex, *end];
            }
            vec![*start, p1, p2, *end]
        }
    }
}
