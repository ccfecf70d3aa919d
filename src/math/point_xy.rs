//! Serde adapter writing points as `{ "x": .., "y": .. }` objects.
//!
//! Use with `#[serde(with = "crate::math::point_xy")]` on a [`Point2`] field
//! and `#[serde(with = "crate::math::point_xy::vec")]` on a `Vec<Point2>`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Point2;

#[derive(Serialize, Deserialize)]
struct PointXy {
    x: f64,
    y: f64,
}

impl From<&Point2> for PointXy {
    fn from(p: &Point2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PointXy> for Point2 {
    fn from(p: PointXy) -> Self {
        Point2::new(p.x, p.y)
    }
}

pub fn serialize<S>(point: &Point2, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    PointXy::from(point).serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Point2, D::Error>
where
    D: Deserializer<'de>,
{
    PointXy::deserialize(deserializer).map(Point2::from)
}

pub mod vec {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::PointXy;
    use crate::math::Point2;

    pub fn serialize<S>(points: &[Point2], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(points.iter().map(PointXy::from))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Point2>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let points = Vec::<PointXy>::deserialize(deserializer)?;
        Ok(points.into_iter().map(Point2::from).collect())
    }
}
