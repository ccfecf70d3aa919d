pub mod bounds;
pub mod obstacle;

pub use bounds::{BoundarySide, Bounds};
pub use obstacle::{Obstacle, ObstacleEdge};
