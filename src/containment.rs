//! Nesting resolution between traces.

use tracing::trace;

use crate::math::Chord;
use crate::problem::WaypointPair;
use crate::traces::OffsetTrace;

/// Pushes U-bend traces that enclose another U-bend outward.
///
/// For every pair `i < j` whose traces share the same U-bend direction and
/// orientation, if one pair's span strictly contains the other's along the
/// major axis, the container's offset becomes `contained.offset + spacing`.
/// Pairs are visited once in index order, so a later pair may override an
/// earlier adjustment.
///
/// `traces` and `pairs` are parallel slices.
pub fn resolve_nested_offsets(traces: &mut [OffsetTrace], pairs: &[WaypointPair], spacing: f64) {
    let n = traces.len().min(pairs.len());
    for i in 0..n {
        for j in (i + 1)..n {
            let bend = traces[i].shape().bend();
            if bend.is_none() || bend != traces[j].shape().bend() {
                continue;
            }

            let (a, b) = (&pairs[i], &pairs[j]);
            let horizontal = a.is_horizontal();
            if horizontal != b.is_horizontal() {
                continue;
            }

            let (a_span, b_span) = if horizontal {
                (a.x_span(), b.x_span())
            } else {
                (a.y_span(), b.y_span())
            };

            let (container, contained) = if strictly_contains(a_span, b_span) {
                (i, j)
            } else if strictly_contains(b_span, a_span) {
                (j, i)
            } else {
                continue;
            };

            let offset = traces[contained].offset() + spacing;
            trace!(container, contained, offset, "nesting U-bend trace");
            traces[container].set_offset(offset);
        }
    }
}

fn strictly_contains(outer: (f64, f64), inner: (f64, f64)) -> bool {
    outer.0 < inner.0 && outer.1 > inner.1
}

/// For each chord, the indices of every other chord it contains.
///
/// The relation is computed from the perimeter coordinates alone and does not
/// depend on any routed geometry.
#[must_use]
pub fn containment_lists(chords: &[Chord], perimeter: f64) -> Vec<Vec<usize>> {
    chords
        .iter()
        .enumerate()
        .map(|(i, outer)| {
            chords
                .iter()
                .enumerate()
                .filter(|&(j, inner)| i != j && outer.contains(inner, perimeter))
                .map(|(j, _)| j)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::math::distance_2d::segment_segment_distance_sq;
    use crate::math::polyline_segments;
    use crate::path::{BendDirection, LegStyle, PathShape};
    use crate::traces::TracePolyline;
    use approx::assert_abs_diff_eq;

    fn top_pair(x0: f64, x1: f64) -> WaypointPair {
        WaypointPair::new(Point2::new(x0, 100.0), Point2::new(x1, 100.0))
    }

    fn u_bend(pair: &WaypointPair, bend: BendDirection, offset: f64) -> OffsetTrace {
        OffsetTrace::new(
            pair,
            PathShape::UBend {
                bend,
                legs: LegStyle::Perpendicular,
            },
            offset,
        )
    }

    #[test]
    fn container_is_pushed_past_contained() {
        let pairs = vec![top_pair(20.0, 80.0), top_pair(40.0, 60.0)];
        let mut traces: Vec<_> = pairs
            .iter()
            .map(|p| u_bend(p, BendDirection::Negative, 10.0))
            .collect();
        resolve_nested_offsets(&mut traces, &pairs, 10.0);
        assert_abs_diff_eq!(traces[0].offset(), 20.0);
        assert_abs_diff_eq!(traces[1].offset(), 10.0);
        assert_abs_diff_eq!(traces[0].points()[1].y, 80.0);
    }

    #[test]
    fn pushed_container_clears_the_contained_trace() {
        let pairs = vec![
            WaypointPair::new(Point2::new(20.0, 0.0), Point2::new(80.0, 0.0)),
            WaypointPair::new(Point2::new(30.0, 0.0), Point2::new(70.0, 0.0)),
        ];
        let mut traces: Vec<_> = pairs
            .iter()
            .map(|p| u_bend(p, BendDirection::Positive, 10.0))
            .collect();
        resolve_nested_offsets(&mut traces, &pairs, 10.0);

        for (a1, a2) in polyline_segments(traces[0].points()) {
            for (b1, b2) in polyline_segments(traces[1].points()) {
                let d2 = segment_segment_distance_sq(&a1, &a2, &b1, &b2);
                assert!(d2 >= 100.0 - 1e-9, "d² = {d2}");
            }
        }
    }

    #[test]
    fn contained_listed_first_still_moves_the_container() {
        let pairs = vec![top_pair(40.0, 60.0), top_pair(80.0, 20.0)];
        let mut traces: Vec<_> = pairs
            .iter()
            .map(|p| u_bend(p, BendDirection::Negative, 10.0))
            .collect();
        resolve_nested_offsets(&mut traces, &pairs, 5.0);
        assert_abs_diff_eq!(traces[0].offset(), 10.0);
        assert_abs_diff_eq!(traces[1].offset(), 15.0);
    }

    #[test]
    fn mismatched_bends_are_left_alone() {
        let pairs = vec![top_pair(20.0, 80.0), top_pair(40.0, 60.0)];
        let mut traces = vec![
            u_bend(&pairs[0], BendDirection::Negative, 10.0),
            u_bend(&pairs[1], BendDirection::Positive, 10.0),
        ];
        resolve_nested_offsets(&mut traces, &pairs, 10.0);
        assert_abs_diff_eq!(traces[0].offset(), 10.0);

        let mut doubles: Vec<_> = pairs
            .iter()
            .map(|p| OffsetTrace::new(p, PathShape::DoubleBend, 0.0))
            .collect();
        resolve_nested_offsets(&mut doubles, &pairs, 10.0);
        assert_abs_diff_eq!(doubles[0].offset(), 0.0);
    }

    #[test]
    fn shared_endpoint_is_not_strict_containment() {
        let pairs = vec![top_pair(20.0, 80.0), top_pair(20.0, 60.0)];
        let mut traces: Vec<_> = pairs
            .iter()
            .map(|p| u_bend(p, BendDirection::Negative, 10.0))
            .collect();
        resolve_nested_offsets(&mut traces, &pairs, 10.0);
        assert_abs_diff_eq!(traces[0].offset(), 10.0);
    }

    #[test]
    fn containment_lists_follow_chords() {
        let chords = [
            Chord::new(10.0, 300.0),
            Chord::new(50.0, 100.0),
            Chord::new(60.0, 90.0),
            Chord::new(320.0, 390.0),
        ];
        let lists = containment_lists(&chords, 400.0);
        assert_eq!(lists[0], vec![1, 2]);
        assert_eq!(lists[1], vec![2]);
        assert!(lists[2].is_empty());
        assert!(lists[3].is_empty());
    }
}
