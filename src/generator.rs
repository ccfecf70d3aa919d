//! Seeded random problem generation.
//!
//! Waypoint pairs are drawn uniformly along the perimeter and rejected until
//! their chord crosses no earlier chord, so every generated problem is
//! routable without forced intersections. Obstacles are placed outside the
//! bounds against a random side.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GenerationError;
use crate::geometry::{BoundarySide, Bounds, Obstacle};
use crate::math::chord::would_cross_any;
use crate::math::Chord;
use crate::problem::{TraceProblem, WaypointPair};

/// Minimum perimeter separation of the two points of a pair, as a fraction of
/// the perimeter.
const MIN_PAIR_SEPARATION: f64 = 0.05;

/// Options for [`generate_random_problem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    pub num_waypoint_pairs: usize,
    pub num_obstacles: usize,
    pub seed: u64,
    pub bounds: Bounds,
    pub preferred_trace_to_trace_spacing: f64,
    pub preferred_obstacle_to_trace_spacing: f64,
    /// Minimum distance between a new waypoint and every earlier waypoint.
    pub min_spacing: Option<f64>,
    /// Placement attempts per waypoint pair and per obstacle.
    pub max_attempts: usize,
}

impl GeneratorOptions {
    #[must_use]
    pub fn new(num_waypoint_pairs: usize, num_obstacles: usize, seed: u64) -> Self {
        Self {
            num_waypoint_pairs,
            num_obstacles,
            seed,
            bounds: Bounds::new(0.0, 100.0, 0.0, 100.0),
            preferred_trace_to_trace_spacing: 10.0,
            preferred_obstacle_to_trace_spacing: 5.0,
            min_spacing: None,
            max_attempts: 1000,
        }
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    #[must_use]
    pub fn with_spacings(mut self, trace_to_trace: f64, obstacle_to_trace: f64) -> Self {
        self.preferred_trace_to_trace_spacing = trace_to_trace;
        self.preferred_obstacle_to_trace_spacing = obstacle_to_trace;
        self
    }

    #[must_use]
    pub fn with_min_spacing(mut self, min_spacing: f64) -> Self {
        self.min_spacing = Some(min_spacing);
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }
}

/// Generates a problem from `options`. The same options always produce the
/// same problem.
///
/// Obstacles are placed in order; the first one that finds no spot clear of
/// the others within `max_attempts` ends obstacle placement, so the problem
/// may hold fewer than `num_obstacles`.
///
/// # Errors
///
/// - `GenerationError::InvalidOptions` for degenerate bounds or a zero
///   attempt budget
/// - `GenerationError::WaypointPlacement` when a pair cannot be placed without
///   crossing an earlier one within the attempt budget
pub fn generate_random_problem(options: &GeneratorOptions) -> Result<TraceProblem, GenerationError> {
    let bounds = options.bounds;
    if !bounds.is_valid() {
        return Err(GenerationError::InvalidOptions(format!(
            "bounds must have positive area, got x in [{}, {}], y in [{}, {}]",
            bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y
        )));
    }
    if options.max_attempts == 0 {
        return Err(GenerationError::InvalidOptions(
            "max_attempts must be at least 1".into(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(options.seed);

    let mut pairs: Vec<WaypointPair> = Vec::with_capacity(options.num_waypoint_pairs);
    let mut chords: Vec<Chord> = Vec::with_capacity(options.num_waypoint_pairs);
    for pair_index in 0..options.num_waypoint_pairs {
        let (pair, chord) = place_pair(&mut rng, options, &pairs, &chords).ok_or(
            GenerationError::WaypointPlacement {
                pair_index,
                attempts: options.max_attempts,
            },
        )?;
        pairs.push(pair.with_network_id(format!("net{pair_index}")));
        chords.push(chord);
    }

    let mut obstacles: Vec<Obstacle> = Vec::with_capacity(options.num_obstacles);
    for index in 0..options.num_obstacles {
        let placed = (0..options.max_attempts).find_map(|_| {
            let side = BoundarySide::CLOCKWISE[rng.gen_range(0..4)];
            let candidate = obstacle_on_side(&mut rng, &bounds, side);
            (!obstacles.iter().any(|o| o.overlaps(&candidate))).then_some(candidate)
        });
        let Some(obstacle) = placed else {
            warn!(
                obstacle = index,
                attempts = options.max_attempts,
                "stopping obstacle placement; no free spot without overlap"
            );
            break;
        };
        obstacles.push(obstacle);
    }

    debug!(
        seed = options.seed,
        pairs = pairs.len(),
        obstacles = obstacles.len(),
        "generated problem"
    );

    Ok(TraceProblem::new(
        bounds,
        pairs,
        options.preferred_trace_to_trace_spacing,
        options.preferred_obstacle_to_trace_spacing,
    )
    .with_obstacles(obstacles))
}

fn place_pair(
    rng: &mut StdRng,
    options: &GeneratorOptions,
    pairs: &[WaypointPair],
    chords: &[Chord],
) -> Option<(WaypointPair, Chord)> {
    let bounds = &options.bounds;
    let perimeter = bounds.perimeter();
    let min_separation = perimeter * MIN_PAIR_SEPARATION;

    for _ in 0..options.max_attempts {
        let start = bounds.point_at_perimeter_coordinate(rng.gen::<f64>() * perimeter);
        let end = bounds.point_at_perimeter_coordinate(rng.gen::<f64>() * perimeter);
        let chord = bounds.chord(&start, &end);

        let gap = (chord.start - chord.end).abs();
        if gap.min(perimeter - gap) < min_separation {
            continue;
        }

        if let Some(min_spacing) = options.min_spacing {
            let too_close = pairs.iter().any(|pair| {
                [pair.start, pair.end].iter().any(|existing| {
                    nalgebra::distance(&start, existing) < min_spacing
                        || nalgebra::distance(&end, existing) < min_spacing
                })
            });
            if too_close {
                continue;
            }
        }

        if !would_cross_any(&chord, chords) {
            return Some((WaypointPair::new(start, end), chord));
        }
    }
    None
}

/// Rectangle outside `bounds` flush against `side`: depth 10-30% of the
/// smaller dimension, span 10-40% of the side.
fn obstacle_on_side(rng: &mut StdRng, bounds: &Bounds, side: BoundarySide) -> Obstacle {
    let (w, h) = (bounds.width(), bounds.height());
    let min_dim = w.min(h);
    let depth = min_dim * 0.1 + rng.gen::<f64>() * (min_dim * 0.3 - min_dim * 0.1);

    match side {
        BoundarySide::Top | BoundarySide::Bottom => {
            let span = w * 0.1 + rng.gen::<f64>() * (w * 0.4 - w * 0.1);
            let min_x = bounds.min_x + rng.gen::<f64>() * (w - span);
            let (min_y, max_y) = if side == BoundarySide::Top {
                (bounds.max_y, bounds.max_y + depth)
            } else {
                (bounds.min_y - depth, bounds.min_y)
            };
            Obstacle::new(min_x, min_x + span, min_y, max_y)
        }
        BoundarySide::Right | BoundarySide::Left => {
            let span = h * 0.1 + rng.gen::<f64>() * (h * 0.4 - h * 0.1);
            let min_y = bounds.min_y + rng.gen::<f64>() * (h - span);
            let (min_x, max_x) = if side == BoundarySide::Right {
                (bounds.max_x, bounds.max_x + depth)
            } else {
                (bounds.min_x - depth, bounds.min_x)
            };
            Obstacle::new(min_x, max_x, min_y, min_y + span)
        }
    }
}
