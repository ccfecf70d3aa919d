use super::Point2;

/// Returns the interior angle at `vertex` between the arms to `a` and `b`, in
/// degrees within `[0, 180]`.
///
/// When either arm has zero length the angle is defined as `180` (a straight
/// pass-through), so a collapsed elbow is never penalized as sharp.
#[must_use]
pub fn interior_angle_deg(vertex: &Point2, a: &Point2, b: &Point2) -> f64 {
    let v1 = a - vertex;
    let v2 = b - vertex;
    let mag = v1.norm() * v2.norm();
    if mag <= 0.0 {
        return 180.0;
    }
    (v1.dot(&v2) / mag).clamp(-1.0, 1.0).acos().to_degrees()
}
