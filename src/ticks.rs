use std::collections::HashMap;

use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::{Color, GaugeNumerics, StrokeCap, TickColors};
use crate::mapping::{polar_to_cartesian, value_to_angle, Point};
use crate::scene::{Primitive, Scene};

// Insets from the rim, as divisors of the drawing size.
const OUTER_INSET_DIVISOR: f64 = 40.0;
const MAJOR_INNER_INSET_DIVISOR: f64 = 5.0;
const MINOR_INNER_INSET_DIVISOR: f64 = 6.0;
const LABEL_INSET_DIVISOR: f64 = 4.25;

const MAJOR_WIDTH_DIVISOR: f64 = 500.0;
const MINOR_WIDTH_DIVISOR: f64 = 700.0;
const BOUNDARY_WIDTH_FACTOR: f64 = 4.0;

/// Extra distance a label is pushed along its tick, towards the center.
pub const LABEL_NUDGE: f64 = 15.0;
pub const LABEL_FONT_RATIO: f64 = 1.0 / 15.0;

/// Per-tick color override: receives every enumerated `(value, color)` pair
/// and returns the pairs to draw with.
pub type TickColorRemap<'a> = &'a dyn Fn(Vec<(i64, Color)>) -> Vec<(i64, Color)>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickLabel {
    pub text: String,
    pub anchor: Point,
    pub font_size_ratio: f64,
    pub font_size: f64,
    pub color: Color,
}

/// One graduation. Only minor ticks (which includes every major tick) are drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: i64,
    pub angle_degrees: f64,
    pub is_minor: bool,
    pub is_major: bool,
    /// A major tick sitting exactly on the start or end of the sweep.
    pub is_boundary: bool,
    /// Outer end, near the rim.
    pub start: Point,
    /// Inner end, towards the center.
    pub end: Point,
    pub width: f64,
    pub color: Color,
    pub label: Option<TickLabel>,
}

impl Tick {
    pub fn add_to(&self, scene: &mut Scene) {
        if self.is_minor {
            scene.add_command(Primitive::Line {
                start: self.start,
                end: self.end,
                width: self.width,
                cap: StrokeCap::Butt,
                color: self.color,
            });
        }
        if let Some(label) = &self.label {
            scene.add_command(Primitive::Text {
                anchor: label.anchor,
                text: label.text.clone(),
                font_size_ratio: label.font_size_ratio,
                font_size: label.font_size,
                color: label.color,
            });
        }
    }
}

/// Minor/major classification of an integer value. Steps must be positive.
pub(crate) fn classify(value: i64, minor_step: i32, major_step: i32) -> (bool, bool) {
    debug_assert!(minor_step > 0 && major_step > 0);
    let is_minor = value % minor_step as i64 == 0;
    let is_major = is_minor && value % major_step as i64 == 0;
    (is_minor, is_major)
}

/// Enumerates the integer values in `[floor(start), ceil(end)]` and places a
/// tick for each one. `size` is the drawing size the dial fills.
pub(crate) fn plan_ticks(
    numerics: &GaugeNumerics,
    colors: &TickColors,
    has_labels: bool,
    size: f64,
    center: Point,
    remap: TickColorRemap<'_>,
) -> Vec<Tick> {
    let range = numerics.value_range;
    let angles = numerics.angles;
    let first = range.start.floor() as i64;
    let last = range.end.ceil() as i64;

    let base: Vec<(i64, Color)> = (first..=last).map(|v| (v, colors.minor)).collect();
    let expected = base.len();
    let remapped: HashMap<i64, Color> = remap(base).into_iter().collect();
    let missing = (first..=last).filter(|v| !remapped.contains_key(v)).count();
    if missing > 0 {
        warn!(
            "tick color provider dropped {missing} of {expected} ticks, using the minor tick color for them"
        );
    }

    let rim = size / 2.0;
    let outer_radius = rim - size / OUTER_INSET_DIVISOR;
    let label_radius = rim - size / LABEL_INSET_DIVISOR - LABEL_NUDGE;
    let major_width = size / MAJOR_WIDTH_DIVISOR;
    let minor_width = size / MINOR_WIDTH_DIVISOR;

    (first..=last)
        .map(|value| {
            let angle = value_to_angle(value as f64, range, angles);
            let (is_minor, is_major) =
                classify(value, numerics.ticks.minor_step, numerics.ticks.major_step);
            let rounded = angle.round() as i64;
            let is_boundary = is_major
                && (rounded == angles.start_angle as i64 || rounded == angles.total_angle());

            let inner_radius = if is_major {
                rim - size / MAJOR_INNER_INSET_DIVISOR
            } else {
                rim - size / MINOR_INNER_INSET_DIVISOR
            };
            let base_width = if is_major { major_width } else { minor_width };
            let width = if is_boundary {
                base_width * BOUNDARY_WIDTH_FACTOR
            } else {
                base_width
            };
            let color = if is_major {
                colors.major
            } else {
                remapped.get(&value).copied().unwrap_or(colors.minor)
            };
            let label = (has_labels && is_major).then(|| TickLabel {
                text: value.to_string(),
                anchor: polar_to_cartesian(angle, label_radius, center),
                font_size_ratio: LABEL_FONT_RATIO,
                font_size: size * LABEL_FONT_RATIO,
                color: colors.major_label,
            });

            trace!("tick {value} at {angle:.2} deg minor={is_minor} major={is_major}");
            Tick {
                value,
                angle_degrees: angle,
                is_minor,
                is_major,
                is_boundary,
                start: polar_to_cartesian(angle, outer_radius, center),
                end: polar_to_cartesian(angle, inner_radius, center),
                width,
                color,
                label,
            }
        })
        .collect()
}
