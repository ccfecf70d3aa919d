use super::{Point2, TOLERANCE};

/// Strict segment-segment intersection test in 2D.
///
/// Solves `a1 + λ (a2 - a1) = b2 + γ (b1 - b2)` by Cramer's rule and reports a
/// crossing only when both parameters lie in the open interval `(0, 1)`.
/// Parallel segments (zero determinant), collinear overlaps and segments that
/// merely share an endpoint do not intersect.
#[must_use]
pub fn segments_intersect(a1: &Point2, a2: &Point2, b1: &Point2, b2: &Point2) -> bool {
    let det = (a2.x - a1.x) * (b2.y - b1.y) - (a2.y - a1.y) * (b2.x - b1.x);
    if det.abs() < TOLERANCE {
        return false;
    }
    let lambda = ((b2.y - b1.y) * (b2.x - a1.x) + (b1.x - b2.x) * (b2.y - a1.y)) / det;
    let gamma = ((a1.y - a2.y) * (b2.x - a1.x) + (a2.x - a1.x) * (b2.y - a1.y)) / det;
    0.0 < lambda && lambda < 1.0 && 0.0 < gamma && gamma < 1.0
}
