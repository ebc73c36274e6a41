use std::fmt;
use std::sync::Arc;

use bon::Builder;
use log::{debug, warn};

use crate::arcs::plan_arcs;
use crate::config::{ArcColors, Color, GaugeColors, GaugeNumerics, GaugeStyle, ValueRange};
use crate::error::{GaugeError, Result};
use crate::mapping::Point;
use crate::needle::plan_needle;
use crate::scene::{CirclePaint, Primitive, PrimitiveSink, Scene};
use crate::ticks::plan_ticks;

const VALUE_TEXT_FONT_RATIO: f64 = 1.0 / 20.0;
const VALUE_TEXT_OFFSET_DIVISOR: f64 = 8.0;
const UNIT_TEXT_OFFSET_DIVISOR: f64 = 7.0;
const CENTER_DOT_DIVISOR: f64 = 50.0;

// ============================================================================
// COLOR HOOKS
// ============================================================================

type TickColorFn = dyn Fn(Vec<(i64, Color)>) -> Vec<(i64, Color)> + Send + Sync;
type ArcColorFn = dyn Fn(ArcColors, f64, ValueRange) -> ArcColors + Send + Sync;

/// Remaps individual tick colors before drawing. Receives every enumerated
/// `(value, color)` pair, starting from the minor tick color.
#[derive(Clone)]
pub struct TicksColorProvider(Arc<TickColorFn>);

impl TicksColorProvider {
    pub fn new(f: impl Fn(Vec<(i64, Color)>) -> Vec<(i64, Color)> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for TicksColorProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TicksColorProvider(..)")
    }
}

/// Recomputes arc colors from `(base colors, value, range)` before drawing.
#[derive(Clone)]
pub struct ArcColorsProvider(Arc<ArcColorFn>);

impl ArcColorsProvider {
    pub fn new(f: impl Fn(ArcColors, f64, ValueRange) -> ArcColors + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for ArcColorsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ArcColorsProvider(..)")
    }
}

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    pub numerics: GaugeNumerics,
    #[builder(default)]
    pub style: GaugeStyle,
    #[builder(default)]
    pub colors: GaugeColors,
    /// Unit drawn under the value text, like `%` or `km/h`.
    #[builder(default, into)]
    pub value_unit: String,
    /// Maximum fractional digits of the value text.
    #[builder(default = 2)]
    pub fraction_digits: usize,
    pub ticks_color_provider: Option<TicksColorProvider>,
    pub arc_colors_provider: Option<ArcColorsProvider>,
}

/// A gauge definition. Holds no per-draw state: every call to
/// [`Gauge::compose`] recomputes all geometry from its arguments.
#[derive(Debug, Clone)]
pub struct Gauge {
    config: GaugeConfig,
}

impl Gauge {
    pub fn new(config: GaugeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    /// Checks the preconditions of a draw call.
    pub fn validate(&self, value: f64) -> Result<()> {
        let numerics = &self.config.numerics;
        let range = numerics.value_range;
        if !range.contains(value) {
            return Err(GaugeError::ValueOutOfRange { value, range });
        }
        let sweep_angle = numerics.angles.sweep_angle;
        if !(1..=360).contains(&sweep_angle) {
            return Err(GaugeError::SweepAngleOutOfRange { sweep_angle });
        }
        let ticks = numerics.ticks;
        if ticks.minor_step <= 0 {
            return Err(GaugeError::NonPositiveTickStep {
                which: "minor",
                step: ticks.minor_step,
            });
        }
        if ticks.major_step <= 0 {
            return Err(GaugeError::NonPositiveTickStep {
                which: "major",
                step: ticks.major_step,
            });
        }
        Ok(())
    }

    /// Composes the gauge for `value` on a square canvas of edge
    /// `canvas_size`. Draw order: border, value text, ticks, arcs, needle,
    /// center dot.
    pub fn compose(&self, value: f64, canvas_size: f64) -> Result<Scene> {
        if let Err(err) = self.validate(value) {
            warn!("refusing to compose gauge: {err}");
            return Err(err);
        }

        let GaugeConfig {
            numerics,
            style,
            colors,
            ..
        } = &self.config;
        let safe_size = canvas_size - style.border_width;
        let center = Point::new(canvas_size / 2.0, canvas_size / 2.0);
        let mut scene = Scene::new(canvas_size);

        if style.has_border {
            scene.add_command(Primitive::Circle {
                center,
                radius: safe_size / 2.0,
                paint: CirclePaint::Stroke {
                    width: style.border_width,
                },
                color: colors.border,
            });
        }

        if style.has_value_text {
            self.add_value_text(&mut scene, value, canvas_size, safe_size, center);
        }

        let remap_ticks = |ticks: Vec<(i64, Color)>| match &self.config.ticks_color_provider {
            Some(provider) => (provider.0)(ticks),
            None => ticks,
        };
        let ticks = plan_ticks(
            numerics,
            &colors.ticks,
            style.arc_style.big_ticks_has_labels,
            safe_size,
            center,
            &remap_ticks,
        );
        for tick in &ticks {
            tick.add_to(&mut scene);
        }

        if style.arc_style.has_arcs {
            let remap_arcs = |base: ArcColors, value: f64, range: ValueRange| {
                match &self.config.arc_colors_provider {
                    Some(provider) => (provider.0)(base, value, range),
                    None => base,
                }
            };
            plan_arcs(
                numerics,
                &style.arc_style,
                colors.arc,
                value,
                safe_size,
                center,
                &remap_arcs,
            )
            .add_to(&mut scene);
        }

        if style.needle_style.has_needle {
            plan_needle(
                numerics,
                &style.needle_style,
                &colors.needle,
                value,
                safe_size,
                center,
            )
            .add_to(&mut scene, &style.needle_style);
        }

        scene.add_command(Primitive::Circle {
            center,
            radius: safe_size / CENTER_DOT_DIVISOR,
            paint: CirclePaint::Fill,
            color: colors.center_circle,
        });

        debug!(
            "composed gauge value={value} size={canvas_size} ticks={} primitives={}",
            ticks.len(),
            scene.len()
        );
        Ok(scene)
    }

    /// Composes and replays straight into `sink`. Nothing reaches the sink
    /// when validation fails.
    pub fn render(&self, value: f64, canvas_size: f64, sink: &mut impl PrimitiveSink) -> Result<()> {
        let scene = self.compose(value, canvas_size)?;
        scene.replay(sink);
        Ok(())
    }

    fn add_value_text(
        &self,
        scene: &mut Scene,
        value: f64,
        canvas_size: f64,
        safe_size: f64,
        center: Point,
    ) {
        let color = self.config.colors.value_text;
        let font_size = safe_size * VALUE_TEXT_FONT_RATIO;
        scene.add_command(Primitive::Text {
            anchor: center.offset(0.0, canvas_size / VALUE_TEXT_OFFSET_DIVISOR),
            text: format_value(value, self.config.fraction_digits),
            font_size_ratio: VALUE_TEXT_FONT_RATIO,
            font_size,
            color,
        });
        let unit = self.config.value_unit.trim();
        if !unit.is_empty() {
            scene.add_command(Primitive::Text {
                anchor: center.offset(0.0, canvas_size / UNIT_TEXT_OFFSET_DIVISOR),
                text: unit.to_string(),
                font_size_ratio: VALUE_TEXT_FONT_RATIO,
                font_size,
                color,
            });
        }
    }
}

/// At most `fraction_digits` fractional digits, trailing zeros dropped.
pub fn format_value(value: f64, fraction_digits: usize) -> String {
    let mut text = format!("{value:.fraction_digits$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}
