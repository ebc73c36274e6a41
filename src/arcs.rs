use serde::{Deserialize, Serialize};

use crate::config::{ArcColors, ArcStyle, Color, GaugeNumerics, StrokeCap, ValueRange};
use crate::mapping::{value_to_angle, Point};
use crate::scene::{Primitive, Scene};

/// The arc circle spans this fraction of the drawing size.
pub const ARC_SIZE_FRACTION: f64 = 0.9;
const MAX_STROKE_DIVISOR: f64 = 15.0;

/// Recomputes arc colors from the base colors, the current value and the
/// value range, e.g. for red/yellow/green zones.
pub type ArcColorRemap<'a> = &'a dyn Fn(ArcColors, f64, ValueRange) -> ArcColors;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSpec {
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub color: Color,
    pub alpha: f64,
    pub stroke_width: f64,
    pub cap: StrokeCap,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcPlan {
    pub center: Point,
    pub radius: f64,
    /// Full sweep, drawn first.
    pub track: ArcSpec,
    /// From the start angle to the value's angle.
    pub fill: ArcSpec,
}

impl ArcPlan {
    pub fn add_to(&self, scene: &mut Scene) {
        for arc in [&self.track, &self.fill] {
            scene.add_command(Primitive::Arc {
                center: self.center,
                radius: self.radius,
                start_angle: arc.start_angle,
                sweep_angle: arc.sweep_angle,
                width: arc.stroke_width,
                cap: arc.cap,
                color: arc.color,
                alpha: arc.alpha,
            });
        }
    }
}

/// `min(configured, size / 15)`, or `size / 15` when nothing is configured.
pub fn stroke_width(style: &ArcStyle, size: f64) -> f64 {
    let max = size / MAX_STROKE_DIVISOR;
    match style.stroke_width {
        Some(width) if width < max => width,
        _ => max,
    }
}

/// Fill opacity: `value / range.end` when progressive alpha is on and the
/// ratio is a valid opacity, otherwise fully opaque. Out-of-range ratios are
/// not clamped.
pub fn fill_alpha(style: &ArcStyle, value: f64, range: ValueRange) -> f64 {
    let ratio = value / range.end;
    if style.has_progressive_alpha && (0.0..=1.0).contains(&ratio) {
        ratio
    } else {
        1.0
    }
}

pub fn plan_arcs(
    numerics: &GaugeNumerics,
    style: &ArcStyle,
    colors: ArcColors,
    value: f64,
    size: f64,
    center: Point,
    remap: ArcColorRemap<'_>,
) -> ArcPlan {
    let range = numerics.value_range;
    let angles = numerics.angles;
    let colors = remap(colors, value, range);
    let width = stroke_width(style, size);
    let start_angle = angles.start_angle as f64;

    ArcPlan {
        center,
        radius: size * ARC_SIZE_FRACTION / 2.0,
        track: ArcSpec {
            start_angle,
            sweep_angle: angles.sweep_angle as f64,
            color: colors.off,
            alpha: 1.0,
            stroke_width: width,
            cap: style.cap,
        },
        fill: ArcSpec {
            start_angle,
            sweep_angle: value_to_angle(value, range, angles) - start_angle,
            color: colors.on,
            alpha: fill_alpha(style, value, range),
            stroke_width: width,
            cap: style.cap,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AngularConfig, GaugeColors};

    fn numerics(start: f64, end: f64) -> GaugeNumerics {
        GaugeNumerics::builder()
            .value_range(ValueRange::new(start, end))
            .angles(AngularConfig::new(120, 300))
            .build()
    }

    fn unchanged(colors: ArcColors, _: f64, _: ValueRange) -> ArcColors {
        colors
    }

    fn plan(numerics: &GaugeNumerics, style: &ArcStyle, value: f64) -> ArcPlan {
        plan_arcs(
            numerics,
            style,
            GaugeColors::default().arc,
            value,
            300.0,
            Point::new(150.0, 150.0),
            &unchanged,
        )
    }

    #[test]
    fn test_fill_sweep_endpoints() {
        let numerics = numerics(10.0, 20.0);
        let style = ArcStyle::default();
        assert!(plan(&numerics, &style, 10.0).fill.sweep_angle.abs() < 1e-9);
        assert!((plan(&numerics, &style, 20.0).fill.sweep_angle - 300.0).abs() < 1e-9);
        let track = plan(&numerics, &style, 15.0).track;
        assert_eq!(track.start_angle, 120.0);
        assert_eq!(track.sweep_angle, 300.0);
    }

    #[test]
    fn test_fill_sweep_midpoint() {
        let plan = plan(&numerics(0.0, 100.0), &ArcStyle::default(), 50.0);
        assert!((plan.fill.sweep_angle - 150.0).abs() < 1e-9);
        assert_eq!(plan.fill.start_angle, 120.0);
    }

    #[test]
    fn test_stroke_width_is_capped() {
        let size = 300.0;
        assert_eq!(stroke_width(&ArcStyle::default(), size), 20.0);
        let thin = ArcStyle::builder().stroke_width(12.0).build();
        assert_eq!(stroke_width(&thin, size), 12.0);
        let thick = ArcStyle::builder().stroke_width(35.0).build();
        assert_eq!(stroke_width(&thick, size), 20.0);
    }

    #[test]
    fn test_progressive_alpha() {
        let style = ArcStyle::default();
        let range = ValueRange::new(0.0, 100.0);
        assert_eq!(fill_alpha(&style, 25.0, range), 0.25);
        assert_eq!(fill_alpha(&style, 100.0, range), 1.0);

        let flat = ArcStyle::builder().has_progressive_alpha(false).build();
        assert_eq!(fill_alpha(&flat, 25.0, range), 1.0);
    }

    #[test]
    fn test_alpha_outside_unit_interval_is_opaque() {
        let style = ArcStyle::default();
        let negative = ValueRange::new(-50.0, 50.0);
        assert_eq!(fill_alpha(&style, -10.0, negative), 1.0);
        let below_zero_end = ValueRange::new(-100.0, -10.0);
        assert_eq!(fill_alpha(&style, -50.0, below_zero_end), 1.0);
    }

    #[test]
    fn test_color_remap_sees_value_and_range() {
        let banded = |colors: ArcColors, value: f64, range: ValueRange| -> ArcColors {
            let on = if value <= range.end / 4.0 {
                Color::RED
            } else if value <= range.end / 2.0 {
                Color::YELLOW
            } else {
                Color::GREEN
            };
            ArcColors { on, ..colors }
        };
        let numerics = numerics(0.0, 100.0);
        let style = ArcStyle::default();
        let base = GaugeColors::default().arc;
        let center = Point::new(150.0, 150.0);
        let low = plan_arcs(&numerics, &style, base, 10.0, 300.0, center, &banded);
        let high = plan_arcs(&numerics, &style, base, 90.0, 300.0, center, &banded);
        assert_eq!(low.fill.color, Color::RED);
        assert_eq!(high.fill.color, Color::GREEN);
        assert_eq!(high.track.color, base.off);
    }

    #[test]
    fn test_both_arcs_share_cap_and_width() {
        let style = ArcStyle::builder().cap(StrokeCap::Butt).build();
        let plan = plan(&numerics(0.0, 100.0), &style, 40.0);
        assert_eq!(plan.track.cap, StrokeCap::Butt);
        assert_eq!(plan.fill.cap, StrokeCap::Butt);
        assert_eq!(plan.track.stroke_width, plan.fill.stroke_width);
        assert!((plan.radius - 135.0).abs() < 1e-9);
    }
}
