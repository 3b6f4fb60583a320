use nalgebra::{point, Point2};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Rect {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Rect {
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> Rect {
        Rect { min, max }
    }

    pub fn from_center(center: Point2<f64>, width: f64, height: f64) -> Rect {
        let half = nalgebra::vector![width / 2.0, height / 2.0];
        Rect {
            min: center - half,
            max: center + half,
        }
    }

    /// Bounding box of a `width` x `height` box rotated by `heading` degrees.
    pub fn rotated(center: Point2<f64>, width: f64, height: f64, heading: f64) -> Rect {
        let (sin, cos) = heading.to_radians().sin_cos();
        Rect::from_center(
            center,
            width * cos.abs() + height * sin.abs(),
            width * sin.abs() + height * cos.abs(),
        )
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Overlap test. Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn contains(&self, p: Point2<f64>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn clamp(&self, p: Point2<f64>) -> Point2<f64> {
        point![
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y)
        ]
    }

    /// Corners in drawing order.
    pub fn corners(&self) -> [Point2<f64>; 4] {
        [
            self.min,
            point![self.max.x, self.min.y],
            self.max,
            point![self.min.x, self.max.y],
        ]
    }
}
