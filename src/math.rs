//! Mathematical structs and functions.

use cgmath::prelude::*;
use cgmath::{Point2, Vector2};

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;

/// Computes the distance between two points.
pub fn distance(a: Point2d, b: Point2d) -> f64 {
    (b - a).magnitude()
}

/// Linearly interpolates between the two ends of a segment.
pub fn point_along(a: Point2d, b: Point2d, t: f64) -> Point2d {
    a + t * (b - a)
}

/// Computes the distance from a point to a line segment.
///
/// The projection parameter is clamped to the segment, and a zero-length
/// segment degrades to the point-to-point distance.
pub fn point_to_segment_distance(point: Point2d, a: Point2d, b: Point2d) -> f64 {
    let ab = b - a;
    let len_sq = ab.magnitude2();
    if len_sq == 0.0 {
        return distance(point, a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    distance(point, a + t * ab)
}
