//! Per-trace optimization state.
//!
//! A trace owns its optimization variables and the polyline derived from them.
//! The polyline is recomputed on every variable change and is never edited
//! directly, so it always starts at the pair's `start` and ends at its `end`.

use crate::geometry::Bounds;
use crate::math::angle_2d::interior_angle_deg;
use crate::math::{Chord, Point2};
use crate::path::{PathShape, PathStrategy};
use crate::problem::{OutputTrace, WaypointPair};

/// Read access to a routed polyline and its network.
pub trait TracePolyline {
    fn points(&self) -> &[Point2];

    fn network_id(&self) -> Option<&str>;
}

/// Trace parameterized by a single scalar offset (double-bend or U-bend).
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetTrace {
    start: Point2,
    end: Point2,
    offset: f64,
    shape: PathShape,
    network_id: Option<String>,
    points: Vec<Point2>,
}

impl OffsetTrace {
    #[must_use]
    pub fn new(pair: &WaypointPair, shape: PathShape, offset: f64) -> Self {
        let points = shape.synthesize(&pair.start, &pair.end, offset);
        Self {
            start: pair.start,
            end: pair.end,
            offset,
            shape,
            network_id: pair.network_id.clone(),
            points,
        }
    }

    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[must_use]
    pub fn shape(&self) -> PathShape {
        self.shape
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        self.end
    }

    /// Sets the offset and resynthesizes the polyline with the trace's shape.
    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
        self.points = self.shape.synthesize(&self.start, &self.end, offset);
    }
}

impl TracePolyline for OffsetTrace {
    fn points(&self) -> &[Point2] {
        &self.points
    }

    fn network_id(&self) -> Option<&str> {
        self.network_id.as_deref()
    }
}

/// Trace with one free elbow point: `[start, elbow, end]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElbowTrace {
    points: [Point2; 3],
    chord: Chord,
    contains: Vec<usize>,
    network_id: Option<String>,
}

impl ElbowTrace {
    /// Creates the trace with its elbow at the pair's midpoint and an empty
    /// containment list.
    #[must_use]
    pub fn new(pair: &WaypointPair, bounds: &Bounds) -> Self {
        let elbow = nalgebra::center(&pair.start, &pair.end);
        Self {
            points: [pair.start, elbow, pair.end],
            chord: pair.chord(bounds),
            contains: Vec::new(),
            network_id: pair.network_id.clone(),
        }
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        self.points[0]
    }

    #[must_use]
    pub fn elbow(&self) -> Point2 {
        self.points[1]
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        self.points[2]
    }

    pub fn set_elbow(&mut self, elbow: Point2) {
        self.points[1] = elbow;
    }

    #[must_use]
    pub fn chord(&self) -> &Chord {
        &self.chord
    }

    /// Indices of the traces whose chords this trace's chord contains.
    #[must_use]
    pub fn contains(&self) -> &[usize] {
        &self.contains
    }

    pub(crate) fn set_contains(&mut self, contains: Vec<usize>) {
        self.contains = contains;
    }

    /// Interior angle at the elbow in degrees.
    #[must_use]
    pub fn angle(&self) -> f64 {
        interior_angle_deg(&self.points[1], &self.points[0], &self.points[2])
    }

    /// How far the elbow reaches into the area: the smaller of its projections
    /// onto the inward normals at the two anchors.
    #[must_use]
    pub fn depth(&self, bounds: &Bounds) -> f64 {
        let [start, elbow, end] = self.points;
        let d1 = (elbow - start).dot(&bounds.inward_direction(&start));
        let d2 = (elbow - end).dot(&bounds.inward_direction(&end));
        d1.min(d2)
    }
}

impl TracePolyline for ElbowTrace {
    fn points(&self) -> &[Point2] {
        &self.points
    }

    fn network_id(&self) -> Option<&str> {
        self.network_id.as_deref()
    }
}

impl TracePolyline for OutputTrace {
    fn points(&self) -> &[Point2] {
        &self.points
    }

    fn network_id(&self) -> Option<&str> {
        self.network_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{BendDirection, LegStyle};
    use approx::assert_abs_diff_eq;

    fn square() -> Bounds {
        Bounds::new(0.0, 100.0, 0.0, 100.0)
    }

    #[test]
    fn offset_trace_resynthesizes_on_change() {
        let pair = WaypointPair::new(Point2::new(0.0, 20.0), Point2::new(100.0, 80.0));
        let mut trace = OffsetTrace::new(&pair, PathShape::DoubleBend, 30.0);
        assert_abs_diff_eq!(trace.points()[1].x, 30.0);

        trace.set_offset(10.0);
        assert_abs_diff_eq!(trace.offset(), 10.0);
        assert_abs_diff_eq!(trace.points()[1].x, 10.0);
        assert_eq!(trace.points()[0], pair.start);
        assert_eq!(trace.points()[3], pair.end);
    }

    #[test]
    fn offset_trace_keeps_its_shape() {
        let pair = WaypointPair::new(Point2::new(20.0, 100.0), Point2::new(80.0, 100.0))
            .with_network_id("n1");
        let shape = PathShape::UBend {
            bend: BendDirection::Negative,
            legs: LegStyle::Perpendicular,
        };
        let mut trace = OffsetTrace::new(&pair, shape, 10.0);
        trace.set_offset(12.0);
        assert_eq!(trace.shape(), shape);
        assert_abs_diff_eq!(trace.points()[1].x, 20.0);
        assert_abs_diff_eq!(trace.points()[1].y, 88.0);
        assert_eq!(trace.network_id(), Some("n1"));
    }

    #[test]
    fn elbow_trace_starts_at_midpoint() {
        let pair = WaypointPair::new(Point2::new(0.0, 40.0), Point2::new(60.0, 100.0));
        let trace = ElbowTrace::new(&pair, &square());
        assert_abs_diff_eq!(trace.elbow().x, 30.0);
        assert_abs_diff_eq!(trace.elbow().y, 70.0);
        assert!(trace.contains().is_empty());
        assert_abs_diff_eq!(trace.angle(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn elbow_depth_is_min_inward_projection() {
        let pair = WaypointPair::new(Point2::new(20.0, 100.0), Point2::new(80.0, 100.0));
        let mut trace = ElbowTrace::new(&pair, &square());
        trace.set_elbow(Point2::new(50.0, 70.0));
        assert_abs_diff_eq!(trace.depth(&square()), 30.0);

        // Left and top anchors: depth limited by the shallower projection.
        let corner = WaypointPair::new(Point2::new(0.0, 50.0), Point2::new(50.0, 100.0));
        let mut trace = ElbowTrace::new(&corner, &square());
        trace.set_elbow(Point2::new(10.0, 80.0));
        assert_abs_diff_eq!(trace.depth(&square()), 10.0);
    }

    #[test]
    fn elbow_angle_tracks_the_elbow() {
        let pair = WaypointPair::new(Point2::new(0.0, 50.0), Point2::new(50.0, 100.0));
        let mut trace = ElbowTrace::new(&pair, &square());
        trace.set_elbow(Point2::new(50.0, 50.0));
        assert_abs_diff_eq!(trace.angle(), 90.0, epsilon = 1e-9);
    }
}
