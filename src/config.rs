use std::fmt;

use bon::Builder;
use serde::{Deserialize, Serialize};

// ============================================================================
// COLOR CONFIGURATION
// ============================================================================

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const RED: Color = Color::new(0xff, 0x00, 0x00);
    pub const YELLOW: Color = Color::new(0xff, 0xff, 0x00);
    pub const ORANGE: Color = Color::new(0xff, 0x80, 0x00);
    pub const GREEN: Color = Color::new(0x00, 0xff, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

/// Colors of the unfilled (`off`) and filled (`on`) value arcs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcColors {
    pub off: Color,
    pub on: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeedleColors {
    pub needle: Color,
    pub ring: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickColors {
    pub minor: Color,
    pub major: Color,
    pub major_label: Color,
}

/// Every color slot of a gauge. Nothing is looked up from an ambient theme;
/// the default palette below is what a gauge gets unless the host overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
pub struct GaugeColors {
    #[builder(default = palette::PRIMARY)]
    pub border: Color,
    #[builder(default = palette::TERTIARY)]
    pub center_circle: Color,
    #[builder(default = palette::PRIMARY)]
    pub value_text: Color,
    #[builder(default = ArcColors { off: palette::INVERSE_PRIMARY, on: palette::PRIMARY })]
    pub arc: ArcColors,
    #[builder(default = NeedleColors { needle: palette::PRIMARY, ring: palette::TERTIARY_CONTAINER })]
    pub needle: NeedleColors,
    #[builder(default = TickColors {
        minor: palette::INVERSE_PRIMARY,
        major: palette::PRIMARY,
        major_label: palette::PRIMARY,
    })]
    pub ticks: TickColors,
}

impl Default for GaugeColors {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Default palette.
pub mod palette {
    use super::Color;

    pub const PRIMARY: Color = Color::new(0x67, 0x50, 0xa4);
    pub const INVERSE_PRIMARY: Color = Color::new(0xd0, 0xbc, 0xff);
    pub const TERTIARY: Color = Color::new(0x7d, 0x52, 0x60);
    pub const TERTIARY_CONTAINER: Color = Color::new(0xff, 0xd8, 0xe4);
    pub const BACKGROUND: Color = Color::new(0xff, 0xfb, 0xfe);
}

// ============================================================================
// NUMERICS
// ============================================================================

/// Closed range of gauge values. `start` must be strictly less than `end`;
/// a zero-width range makes every mapping divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub start: f64,
    pub end: f64,
}

impl ValueRange {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Inclusive at both ends.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.start && value <= self.end
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Angular geometry in degrees. 0 is 3 o'clock and angles grow clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngularConfig {
    pub start_angle: i32,
    /// Valid values are 1..=360.
    pub sweep_angle: i32,
}

impl AngularConfig {
    pub const fn new(start_angle: i32, sweep_angle: i32) -> Self {
        Self {
            start_angle,
            sweep_angle,
        }
    }

    /// Widened so any `start_angle` is usable.
    pub const fn total_angle(&self) -> i64 {
        self.start_angle as i64 + self.sweep_angle as i64
    }

    /// The angle span as a range, for feeding into the linear mappings.
    pub fn as_range(&self) -> ValueRange {
        ValueRange::new(self.start_angle as f64, self.total_angle() as f64)
    }
}

/// Tick steps in value units. `major_step` should be a multiple of
/// `minor_step` for regular graduations; this is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickConfig {
    pub minor_step: i32,
    pub major_step: i32,
}

impl TickConfig {
    pub const fn new(minor_step: i32, major_step: i32) -> Self {
        Self {
            minor_step,
            major_step,
        }
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            minor_step: 2,
            major_step: 10,
        }
    }
}

/// The numbers a gauge is drawn from: where values live, where the dial
/// sits on the circle, and how it is graduated.
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
pub struct GaugeNumerics {
    pub value_range: ValueRange,
    pub angles: AngularConfig,
    #[builder(default)]
    pub ticks: TickConfig,
}

// ============================================================================
// STYLE CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Visual style of the value arcs and of the major tick labels.
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
pub struct ArcStyle {
    #[builder(default = true)]
    pub has_arcs: bool,
    /// Fade the fill arc by `value / range.end`.
    #[builder(default = true)]
    pub has_progressive_alpha: bool,
    #[builder(default = true)]
    pub big_ticks_has_labels: bool,
    #[builder(default)]
    pub cap: StrokeCap,
    /// Upper-bounded by `size / 15` when set.
    pub stroke_width: Option<f64>,
}

impl Default for ArcStyle {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Visual style of the needle.
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
pub struct NeedleStyle {
    #[builder(default = true)]
    pub has_needle: bool,
    #[builder(default = true)]
    pub tip_has_circle: bool,
    /// Stroke ring around the needle's pivot.
    #[builder(default = true)]
    pub has_ring: bool,
    #[builder(default = 20.0)]
    pub ring_width: f64,
}

impl Default for NeedleStyle {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
pub struct GaugeStyle {
    #[builder(default = true)]
    pub has_border: bool,
    #[builder(default = true)]
    pub has_value_text: bool,
    #[builder(default = 20.0)]
    pub border_width: f64,
    #[builder(default)]
    pub arc_style: ArcStyle,
    #[builder(default)]
    pub needle_style: NeedleStyle,
}

impl Default for GaugeStyle {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_contains_is_inclusive() {
        let range = ValueRange::new(10.0, 20.0);
        assert!(range.contains(10.0));
        assert!(range.contains(20.0));
        assert!(range.contains(15.5));
        assert!(!range.contains(9.999));
        assert!(!range.contains(20.001));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn test_total_angle() {
        let angles = AngularConfig::new(120, 300);
        assert_eq!(angles.total_angle(), 420);
        assert_eq!(angles.as_range(), ValueRange::new(120.0, 420.0));
    }

    #[test]
    fn test_total_angle_near_i32_max() {
        let angles = AngularConfig::new(i32::MAX - 100, 300);
        assert_eq!(angles.total_angle(), i32::MAX as i64 + 200);
        assert_eq!(angles.as_range().width(), 300.0);
    }

    #[test]
    fn test_style_defaults() {
        let style = GaugeStyle::default();
        assert!(style.has_border);
        assert!(style.has_value_text);
        assert_eq!(style.border_width, 20.0);
        assert!(style.arc_style.has_arcs);
        assert!(style.arc_style.has_progressive_alpha);
        assert!(style.arc_style.big_ticks_has_labels);
        assert_eq!(style.arc_style.cap, StrokeCap::Round);
        assert_eq!(style.arc_style.stroke_width, None);
        assert!(style.needle_style.has_needle);
        assert!(style.needle_style.tip_has_circle);
        assert!(style.needle_style.has_ring);
        assert_eq!(style.needle_style.ring_width, 20.0);
    }

    #[test]
    fn test_builder_overrides_single_field() {
        let style = GaugeStyle::builder()
            .has_border(false)
            .arc_style(ArcStyle::builder().stroke_width(35.0).build())
            .build();
        assert!(!style.has_border);
        assert!(style.has_value_text);
        assert_eq!(style.arc_style.stroke_width, Some(35.0));

        let numerics = GaugeNumerics::builder()
            .value_range(ValueRange::new(0.0, 100.0))
            .angles(AngularConfig::new(120, 300))
            .build();
        assert_eq!(numerics.ticks, TickConfig::new(2, 10));
    }

    #[test]
    fn test_default_palette() {
        let colors = GaugeColors::default();
        assert_eq!(colors.arc.on, palette::PRIMARY);
        assert_eq!(colors.arc.off, palette::INVERSE_PRIMARY);
        assert_eq!(colors.ticks.minor, palette::INVERSE_PRIMARY);
        assert_eq!(colors.needle.ring, palette::TERTIARY_CONTAINER);
    }
}
