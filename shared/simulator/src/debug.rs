use crate::collision::Rect;
use nalgebra::{vector, Point2, Vector4};
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Line {
    pub a: Point2<f64>,
    pub b: Point2<f64>,
    pub color: Vector4<f32>,
}

pub fn convert_color(c: u32) -> Vector4<f32> {
    let extract_color = |k: i64| -> f32 { ((c >> (k * 8)) & 0xff) as f32 / 255.0 };
    vector![extract_color(2), extract_color(1), extract_color(0), 1.0]
}

pub const RAY_COLOR: u32 = 0x0000ff;
pub const TARGET_COLOR: u32 = 0x00ff00;
pub const BOUNDS_COLOR: u32 = 0xffffff;
pub const AREA_COLOR: u32 = 0xff0000;

pub fn segment(a: Point2<f64>, b: Point2<f64>, color: u32) -> Line {
    Line {
        a,
        b,
        color: convert_color(color),
    }
}

pub fn outline(rect: &Rect, color: u32) -> Vec<Line> {
    let corners = rect.corners();
    (0..corners.len())
        .map(|i| segment(corners[i], corners[(i + 1) % corners.len()], color))
        .collect()
}
