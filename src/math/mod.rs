pub mod angle_2d;
pub mod chord;
pub mod distance_2d;
pub mod intersect_2d;
pub mod point_xy;

pub use chord::Chord;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// A finite line segment given by its two endpoints.
pub type Segment = (Point2, Point2);

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Distance within which a point counts as lying on a boundary edge, and two
/// perimeter coordinates count as coincident.
pub const BOUNDARY_EPSILON: f64 = 1e-6;

/// Sign of `value` as `-1.0`, `0.0` or `1.0`.
///
/// Unlike [`f64::signum`], zero maps to zero so that a zero axis delta
/// contributes no displacement.
#[must_use]
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Iterates over the consecutive segments of an open polyline.
pub fn polyline_segments(points: &[Point2]) -> impl Iterator<Item = Segment> + '_ {
    points.windows(2).map(|w| (w[0], w[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_of_zero_is_zero() {
        assert!(sign(0.0).abs() < TOLERANCE);
        assert!((sign(-0.0)).abs() < TOLERANCE);
        assert!((sign(3.5) - 1.0).abs() < TOLERANCE);
        assert!((sign(-0.1) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn polyline_segments_pairs_neighbours() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
        ];
        let segs: Vec<Segment> = polyline_segments(&pts).collect();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1], (pts[1], pts[2]));
        assert_eq!(polyline_segments(&pts[..1]).count(), 0);
    }
}
