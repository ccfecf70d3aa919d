use super::PathStrategy;
use crate::math::{sign, Point2};

/// Straight run, 45° diagonal, straight run.
///
/// The axis with the larger delta is the through direction. The offset is the
/// distance travelled along the minor axis before the diagonal starts and is
/// clamped into `[0, minor delta]`; at either extreme one of the straight runs
/// vanishes and the path degenerates to a single bend.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleBendPath;

impl PathStrategy for DoubleBendPath {
    fn synthesize(&self, start: &Point2, end: &Point2, offset: f64) -> Vec<Point2> {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let (adx, ady) = (dx.abs(), dy.abs());
        let (sx, sy) = (sign(dx), sign(dy));

        let (p1, p2) = if adx > ady {
            let d = offset.min(ady).max(0.0);
            (
                Point2::new(start.x + d * sx, start.y + d * sy),
                Point2::new(end.x - (ady - d) * sx, start.y + d * sy),
            )
        } else {
            let d = offset.min(adx).max(0.0);
            (
                Point2::new(start.x + d * sx, start.y + d * sy),
                Point2::new(start.x + d * sx, end.y - (adx - d) * sy),
            )
        };

        vec![*start, p1, p2, *end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn horizontal_pair_bends_twice() {
        let pts = DoubleBendPath.synthesize(&p(0.0, 20.0), &p(100.0, 80.0), 30.0);
        assert_eq!(pts.len(), 4);
        assert_abs_diff_eq!(pts[1].x, 30.0);
        assert_abs_diff_eq!(pts[1].y, 50.0);
        assert_abs_diff_eq!(pts[2].x, 70.0);
        assert_abs_diff_eq!(pts[2].y, 50.0);
    }

    #[test]
    fn diagonal_legs_are_45_degrees() {
        let pts = DoubleBendPath.synthesize(&p(0.0, 20.0), &p(100.0, 80.0), 17.0);
        let first = pts[1] - pts[0];
        let last = pts[3] - pts[2];
        assert_abs_diff_eq!(first.x.abs(), first.y.abs(), epsilon = 1e-12);
        assert_abs_diff_eq!(last.x.abs(), last.y.abs(), epsilon = 1e-12);
        assert_abs_diff_eq!(pts[1].y, pts[2].y, epsilon = 1e-12);
    }

    #[test]
    fn vertical_pair_runs_along_y() {
        let pts = DoubleBendPath.synthesize(&p(20.0, 100.0), &p(60.0, 0.0), 10.0);
        assert_abs_diff_eq!(pts[1].x, 30.0);
        assert_abs_diff_eq!(pts[1].y, 90.0);
        assert_abs_diff_eq!(pts[2].x, 30.0);
        assert_abs_diff_eq!(pts[2].y, 30.0);
    }

    #[test]
    fn offset_is_clamped_to_minor_delta() {
        let (s, e) = (p(0.0, 20.0), p(100.0, 80.0));
        let over = DoubleBendPath.synthesize(&s, &e, 1000.0);
        let at_max = DoubleBendPath.synthesize(&s, &e, 60.0);
        assert_eq!(over, at_max);

        let under = DoubleBendPath.synthesize(&s, &e, -4.0);
        assert_eq!(under[1], s);
    }

    #[test]
    fn straight_pair_stays_on_the_axis() {
        let pts = DoubleBendPath.synthesize(&p(0.0, 50.0), &p(100.0, 50.0), 5.0);
        for q in &pts {
            assert_abs_diff_eq!(q.y, 50.0);
        }
    }
}
