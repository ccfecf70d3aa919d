//! Display-agnostic drawing of a problem and its routed traces.
//!
//! Nothing here renders; [`GraphicsObject`] is a plain serializable description
//! of lines, rectangles and labeled points in problem coordinates.

use serde::Serialize;

use crate::math::Point2;
use crate::problem::{OutputTrace, TraceProblem};

const DEFAULT_COLOR: &str = "rgba(0, 0, 0, 0.5)";
const BOUNDS_COLOR: &str = "rgba(0, 0, 0, 0.1)";
const OBSTACLE_FILL: &str = "rgba(128, 128, 128, 0.3)";
const OBSTACLE_STROKE: &str = "rgba(128, 128, 128, 0.8)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CoordinateSystem {
    /// y grows upward.
    #[default]
    Cartesian,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicsLine {
    #[serde(with = "crate::math::point_xy::vec")]
    pub points: Vec<Point2>,
    pub stroke_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicsRect {
    #[serde(with = "crate::math::point_xy")]
    pub center: Point2,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicsPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub color: String,
}

/// A drawing of one problem state.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicsObject {
    pub title: String,
    pub coordinate_system: CoordinateSystem,
    pub lines: Vec<GraphicsLine>,
    pub rects: Vec<GraphicsRect>,
    pub points: Vec<GraphicsPoint>,
}

/// Stable hue for a network id; translucent black for traces without one.
#[must_use]
pub fn network_color(network_id: Option<&str>) -> String {
    match network_id {
        Some(id) if !id.is_empty() => format!("hsl({}, 100%, 50%)", network_hue(id)),
        _ => DEFAULT_COLOR.to_owned(),
    }
}

/// String hash over UTF-16 code units with 32-bit shift semantics, reduced to
/// a hue in `[0, 360)`.
#[allow(clippy::cast_possible_truncation)]
fn network_hue(id: &str) -> i64 {
    let mut hash: i64 = 0;
    for unit in id.encode_utf16() {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        hash = i64::from(unit) * 779 + (shifted - hash);
    }
    hash.rem_euclid(360)
}

/// Draws the bounds outline, one labeled point per waypoint, one rectangle per
/// obstacle and one line per output trace.
#[must_use]
pub fn visualize_trace_problem(
    problem: &TraceProblem,
    outputs: &[OutputTrace],
    title: &str,
) -> GraphicsObject {
    let mut graphics = GraphicsObject {
        title: title.to_owned(),
        ..GraphicsObject::default()
    };

    let mut outline = problem.bounds.corners().to_vec();
    outline.push(outline[0]);
    graphics.lines.push(GraphicsLine {
        points: outline,
        stroke_color: BOUNDS_COLOR.to_owned(),
    });

    for pair in &problem.waypoint_pairs {
        let network = pair.network_id.as_deref();
        let color = network_color(network);
        for (name, p) in [("start", &pair.start), ("end", &pair.end)] {
            graphics.points.push(GraphicsPoint {
                x: p.x,
                y: p.y,
                label: format!("{name} {}", network.unwrap_or("")),
                color: color.clone(),
            });
        }
    }

    for obstacle in &problem.obstacles {
        graphics.rects.push(GraphicsRect {
            center: obstacle.center,
            width: obstacle.width(),
            height: obstacle.height(),
            fill: OBSTACLE_FILL.to_owned(),
            stroke: OBSTACLE_STROKE.to_owned(),
            label: obstacle
                .network_id
                .as_ref()
                .map(|id| format!("netId: {id}")),
        });
    }

    for trace in outputs {
        graphics.lines.push(GraphicsLine {
            points: trace.points.clone(),
            stroke_color: network_color(trace.network_id.as_deref()),
        });
    }

    graphics
}
