use crate::collision::Rect;
use nalgebra::{point, vector, Point2};
use serde::{Deserialize, Serialize};

/// Rectangular play field with its origin in the top-left corner, y down.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Arena {
    pub fn new(width: f64, height: f64) -> Arena {
        Arena { width, height }
    }

    pub fn center(&self) -> Point2<f64> {
        point![self.width / 2.0, self.height / 2.0]
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(point![0.0, 0.0], point![self.width, self.height])
    }

    /// Strictly inside. Points on an edge count as outside.
    pub fn contains(&self, p: Point2<f64>) -> bool {
        p.x > 0.0 && p.x < self.width && p.y > 0.0 && p.y < self.height
    }

    pub fn clamp(&self, p: Point2<f64>) -> Point2<f64> {
        self.bounds().clamp(p)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        log::debug!(
            "Arena resized from {}x{} to {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        self.width = width;
        self.height = height;
    }

    /// Walks from `origin` along `heading` (degrees, clockwise from +x) to
    /// the arena edge. Returns the hit point and its distance, which is 0
    /// when the origin is not inside the arena.
    pub fn cast_ray(&self, origin: Point2<f64>, heading: f64) -> (Point2<f64>, f64) {
        if !self.contains(origin) {
            return (origin, 0.0);
        }
        let (sin, cos) = heading.to_radians().sin_cos();
        let exit = |p: f64, d: f64, size: f64| {
            if d > 0.0 {
                (size - p) / d
            } else if d < 0.0 {
                -p / d
            } else {
                f64::INFINITY
            }
        };
        let distance = exit(origin.x, cos, self.width).min(exit(origin.y, sin, self.height));
        (origin + vector![cos, sin] * distance, distance)
    }
}
