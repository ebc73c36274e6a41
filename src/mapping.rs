use serde::{Deserialize, Serialize};

use crate::config::{AngularConfig, ValueRange};

/// A point on the canvas, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Affine rescale of `input` from `from` onto `to`, absolute position in `to`.
pub fn linear_map(input: f64, from: ValueRange, to: ValueRange) -> f64 {
    linear_delta(input, from, to) + to.start
}

/// Same scale as [`linear_map`] but relative to `to.start`, i.e. the distance
/// travelled from the start of the output range.
pub fn linear_delta(input: f64, from: ValueRange, to: ValueRange) -> f64 {
    (input - from.start) / from.width() * to.width()
}

/// Angle in degrees (0 = positive x axis, clockwise) and radius to an
/// absolute canvas point around `center`.
pub fn polar_to_cartesian(angle_degrees: f64, radius: f64, center: Point) -> Point {
    let (cos, sin) = direction(angle_degrees);
    Point::new(center.x + radius * cos, center.y + radius * sin)
}

/// Unit direction vector for an angle in degrees.
pub fn direction(angle_degrees: f64) -> (f64, f64) {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    (cos, sin)
}

/// Where `value` sits on the dial, in degrees. Ticks, the fill arc and the
/// needle all go through this one mapping so they always agree.
pub fn value_to_angle(value: f64, range: ValueRange, angles: AngularConfig) -> f64 {
    linear_map(value, range, angles.as_range())
}
