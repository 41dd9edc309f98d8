//! Planar points and the distance/mean helpers both engines share.
//!
//! Coordinates live on the `[0, 100] x [0, 100]` plane by convention; nothing here
//! enforces it, so jittered generators may step slightly outside.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        euclidean(self, other)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Squared Euclidean distance; avoids the square root when only comparing.
#[inline]
pub fn squared_euclidean(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Euclidean distance between two points.
#[inline]
pub fn euclidean(a: &Point, b: &Point) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// Arithmetic mean of `points`, or `None` for an empty input.
pub fn centroid<'a, I>(points: I) -> Option<Point>
where
    I: IntoIterator<Item = &'a Point>,
{
    let (sum_x, sum_y, count) = points
        .into_iter()
        .fold((0.0, 0.0, 0usize), |(sx, sy, n), p| (sx + p.x, sy + p.y, n + 1));

    if count == 0 {
        return None;
    }
    let n = count as f64;
    Some(Point::new(sum_x / n, sum_y / n))
}
