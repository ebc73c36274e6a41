use serde::{Deserialize, Serialize};

use crate::config::{Color, GaugeNumerics, NeedleColors, NeedleStyle, StrokeCap};
use crate::mapping::{polar_to_cartesian, value_to_angle, Point};
use crate::scene::{CirclePaint, Primitive, Scene};

pub const NEEDLE_WIDTH: f64 = 10.0;
const TIP_INSET_DIVISOR: f64 = 20.0;
const TIP_CIRCLE_DIVISOR: f64 = 50.0;
const RING_DIVISOR: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeedleSpec {
    pub center: Point,
    pub tip: Point,
    pub tip_angle: f64,
    pub width: f64,
    pub color: Color,
    pub tip_radius: f64,
    pub ring_radius: f64,
    pub ring_width: f64,
    pub ring_color: Color,
}

impl NeedleSpec {
    /// Ring, then the needle line, then the tip circle.
    pub fn add_to(&self, scene: &mut Scene, style: &NeedleStyle) {
        if style.has_ring {
            scene.add_command(Primitive::Circle {
                center: self.center,
                radius: self.ring_radius,
                paint: CirclePaint::Stroke {
                    width: self.ring_width,
                },
                color: self.ring_color,
            });
        }
        scene.add_command(Primitive::Line {
            start: self.center,
            end: self.tip,
            width: self.width,
            cap: StrokeCap::Round,
            color: self.color,
        });
        if style.tip_has_circle {
            scene.add_command(Primitive::Circle {
                center: self.tip,
                radius: self.tip_radius,
                paint: CirclePaint::Fill,
                color: self.color,
            });
        }
    }
}

/// The tip sits on the value's angle, `size / 20` in from the rim.
pub fn plan_needle(
    numerics: &GaugeNumerics,
    style: &NeedleStyle,
    colors: &NeedleColors,
    value: f64,
    size: f64,
    center: Point,
) -> NeedleSpec {
    let tip_angle = value_to_angle(value, numerics.value_range, numerics.angles);
    let tip_radius = size / 2.0 - size / TIP_INSET_DIVISOR;

    NeedleSpec {
        center,
        tip: polar_to_cartesian(tip_angle, tip_radius, center),
        tip_angle,
        width: NEEDLE_WIDTH,
        color: colors.needle,
        tip_radius: size / TIP_CIRCLE_DIVISOR,
        ring_radius: size / RING_DIVISOR,
        ring_width: style.ring_width,
        ring_color: colors.ring,
    }
}
