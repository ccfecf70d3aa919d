use super::intersect_2d::segments_intersect;
use super::Point2;

/// Returns the squared distance from point `p` to the line segment `s1 → s2`.
///
/// A zero-length segment degenerates to the point-to-point distance.
#[must_use]
pub fn point_segment_distance_sq(p: &Point2, s1: &Point2, s2: &Point2) -> f64 {
    let d = s2 - s1;
    let len_sq = d.norm_squared();

    if len_sq <= 0.0 {
        return nalgebra::distance_squared(p, s1);
    }

    // Project onto the infinite line, clamp to the segment.
    let t = ((p - s1).dot(&d) / len_sq).clamp(0.0, 1.0);
    nalgebra::distance_squared(p, &(s1 + d * t))
}

/// Returns the squared distance between segments `a1 → a2` and `b1 → b2`.
///
/// Properly crossing segments are at distance `0`. Otherwise the distance is
/// realized at an endpoint of one of the two segments.
#[must_use]
pub fn segment_segment_distance_sq(a1: &Point2, a2: &Point2, b1: &Point2, b2: &Point2) -> f64 {
    if segments_intersect(a1, a2, b1, b2) {
        return 0.0;
    }
    point_segment_distance_sq(a1, b1, b2)
        .min(point_segment_distance_sq(a2, b1, b2))
        .min(point_segment_distance_sq(b1, a1, a2))
        .min(point_segment_distance_sq(b2, a1, a2))
}
