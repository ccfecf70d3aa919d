mod double_bend;
mod u_bend;

pub use double_bend::DoubleBendPath;
pub use u_bend::{LegStyle, UBendPath};

use serde::{Deserialize, Serialize};

use crate::math::Point2;

/// Ratio below which the minor axis delta counts as negligible.
const SAME_SIDE_RATIO: f64 = 0.3;

/// Synthesizes a bent polyline for one waypoint pair.
///
/// The returned polyline always begins at `start` and ends at `end`.
pub trait PathStrategy {
    /// Builds the polyline for the given scalar offset.
    fn synthesize(&self, start: &Point2, end: &Point2, offset: f64) -> Vec<Point2>;
}

/// Side of the pair's midline a U-bend detours toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BendDirection {
    /// Toward increasing x or y.
    Positive,
    /// Toward decreasing x or y.
    Negative,
}

impl BendDirection {
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            BendDirection::Positive => 1.0,
            BendDirection::Negative => -1.0,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            BendDirection::Positive => BendDirection::Negative,
            BendDirection::Negative => BendDirection::Positive,
        }
    }
}

/// Shape family of an offset-parameterized trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathShape {
    DoubleBend,
    UBend { bend: BendDirection, legs: LegStyle },
}

impl PathShape {
    /// The U-bend direction, if any.
    #[must_use]
    pub fn bend(self) -> Option<BendDirection> {
        match self {
            PathShape::DoubleBend => None,
            PathShape::UBend { bend, .. } => Some(bend),
        }
    }
}

impl PathStrategy for PathShape {
    fn synthesize(&self, start: &Point2, end: &Point2, offset: f64) -> Vec<Point2> {
        match *self {
            PathShape::DoubleBend => DoubleBendPath.synthesize(start, end, offset),
            PathShape::UBend { bend, legs } => {
                UBendPath::new(bend, legs).synthesize(start, end, offset)
            }
        }
    }
}

/// Returns whether the pair is nearly axis-aligned, i.e. one axis delta is
/// less than 30% of the other. Such pairs are routed with a U-bend.
#[must_use]
pub fn is_same_side(start: &Point2, end: &Point2) -> bool {
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();
    dx < dy * SAME_SIDE_RATIO || dy < dx * SAME_SIDE_RATIO
}

/// Offset that places the diagonal run of a double-bend path halfway along
/// the minor axis.
#[must_use]
pub fn initial_double_bend_offset(start: &Point2, end: &Point2) -> f64 {
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();
    dx.min(dy) * 0.5
}
