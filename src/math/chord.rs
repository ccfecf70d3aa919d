use serde::{Deserialize, Serialize};

use super::BOUNDARY_EPSILON;

/// A waypoint pair expressed as two perimeter coordinates.
///
/// Chords abstract away the routed geometry: two pairs whose chords cross can
/// never be routed inside the area without their traces crossing, and a chord
/// contained in another forces the inner trace to be nested inside the outer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub start: f64,
    pub end: f64,
}

impl Chord {
    /// Creates a chord from two perimeter coordinates.
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Returns the endpoints ordered so that the first is the smaller.
    #[must_use]
    pub fn normalized(&self) -> (f64, f64) {
        if self.start < self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Returns whether the endpoints of `self` and `other` strictly interleave
    /// around the perimeter cycle.
    ///
    /// With `(a, b)` and `(c, d)` normalized, the chords cross iff
    /// `a < c < b < d` or `c < a < d < b`. Chords sharing a coincident
    /// endpoint never cross, which also makes the relation irreflexive.
    #[must_use]
    pub fn crosses(&self, other: &Chord) -> bool {
        let (a, b) = self.normalized();
        let (c, d) = other.normalized();

        let coincident = |s: f64, t: f64| (s - t).abs() < BOUNDARY_EPSILON;
        if coincident(a, c) || coincident(a, d) || coincident(b, c) || coincident(b, d) {
            return false;
        }

        (a < c && c < b && b < d) || (c < a && a < d && d < b)
    }

    /// Returns whether both endpoints of `inner` lie strictly between the two
    /// endpoints of `self`.
    ///
    /// Coordinates are first wrapped into `[0, perimeter)`, then `self` is
    /// taken in its smaller-coordinate-first form.
    #[must_use]
    pub fn contains(&self, inner: &Chord, perimeter: f64) -> bool {
        let wrap = |t: f64| {
            if perimeter > 0.0 {
                t.rem_euclid(perimeter)
            } else {
                t
            }
        };
        let outer = Chord::new(wrap(self.start), wrap(self.end));
        let (lo, hi) = outer.normalized();
        let strictly_inside = |t: f64| t > lo && t < hi;
        strictly_inside(wrap(inner.start)) && strictly_inside(wrap(inner.end))
    }
}

/// Counts the crossing pairs among `chords`.
#[must_use]
pub fn count_chord_crossings(chords: &[Chord]) -> usize {
    let mut crossings = 0;
    for (i, a) in chords.iter().enumerate() {
        crossings += chords[i + 1..].iter().filter(|b| a.crosses(b)).count();
    }
    crossings
}

/// Returns whether `chord` crosses any chord in `existing`.
#[must_use]
pub fn would_cross_any(chord: &Chord, existing: &[Chord]) -> bool {
    existing.iter().any(|other| chord.crosses(other))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIMETER: f64 = 400.0;

    #[test]
    fn interleaved_chords_cross() {
        let a = Chord::new(10.0, 200.0);
        let b = Chord::new(100.0, 300.0);
        assert!(a.crosses(&b));
    }

    #[test]
    fn nested_chords_do_not_cross() {
        let outer = Chord::new(10.0, 300.0);
        let inner = Chord::new(50.0, 100.0);
        assert!(!outer.crosses(&inner));
        assert!(!inner.crosses(&outer));
    }

    #[test]
    fn disjoint_chords_do_not_cross() {
        assert!(!Chord::new(0.0, 50.0).crosses(&Chord::new(60.0, 90.0)));
    }

    #[test]
    fn crossing_is_symmetric_and_orientation_free() {
        let a = Chord::new(200.0, 10.0);
        let b = Chord::new(100.0, 300.0);
        assert_eq!(a.crosses(&b), b.crosses(&a));
        assert!(a.crosses(&b));
        assert!(Chord::new(10.0, 200.0).crosses(&Chord::new(300.0, 100.0)));
    }

    #[test]
    fn crossing_is_irreflexive() {
        let a = Chord::new(25.0, 175.0);
        assert!(!a.crosses(&a));
    }

    #[test]
    fn shared_endpoint_never_crosses() {
        let a = Chord::new(10.0, 200.0);
        let b = Chord::new(200.0 + 1e-9, 300.0);
        assert!(!a.crosses(&b));
    }

    #[test]
    fn containment_of_nested_chord() {
        let outer = Chord::new(300.0, 10.0);
        let inner = Chord::new(50.0, 100.0);
        assert!(outer.contains(&inner, PERIMETER));
        assert!(!inner.contains(&outer, PERIMETER));
    }

    #[test]
    fn containment_is_asymmetric_for_disjoint_and_nested_chords() {
        let chords = [
            Chord::new(10.0, 300.0),
            Chord::new(50.0, 100.0),
            Chord::new(120.0, 250.0),
            Chord::new(320.0, 390.0),
        ];
        for (i, a) in chords.iter().enumerate() {
            for (j, b) in chords.iter().enumerate() {
                if i == j || a.crosses(b) {
                    continue;
                }
                assert!(
                    !(a.contains(b, PERIMETER) && b.contains(a, PERIMETER)),
                    "chords {i} and {j} contain each other"
                );
            }
        }
    }

    #[test]
    fn containment_wraps_coordinates() {
        let outer = Chord::new(410.0, 700.0); // 10..300 after wrapping
        let inner = Chord::new(-350.0, 100.0); // 50..100 after wrapping
        assert!(outer.contains(&inner, PERIMETER));
    }

    #[test]
    fn shared_endpoint_is_not_contained() {
        let outer = Chord::new(10.0, 300.0);
        let inner = Chord::new(10.0, 100.0);
        assert!(!outer.contains(&inner, PERIMETER));
    }

    #[test]
    fn counts_crossings() {
        let chords = [
            Chord::new(0.0, 200.0),
            Chord::new(100.0, 300.0),
            Chord::new(150.0, 350.0),
            Chord::new(20.0, 40.0),
        ];
        // (0,1), (0,2) cross; (1,2) interleave: 100<150<300<350 → cross.
        assert_eq!(count_chord_crossings(&chords), 3);
        assert!(would_cross_any(&Chord::new(30.0, 60.0), &chords));
        assert!(!would_cross_any(&Chord::new(360.0, 390.0), &chords));
    }
}
