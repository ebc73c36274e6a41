use serde::{Deserialize, Serialize};

use crate::config::{Color, StrokeCap};
use crate::mapping::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CirclePaint {
    Fill,
    Stroke { width: f64 },
}

/// One drawing command. Angles are degrees, clockwise from 3 o'clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Circle {
        center: Point,
        radius: f64,
        paint: CirclePaint,
        color: Color,
    },
    Line {
        start: Point,
        end: Point,
        width: f64,
        cap: StrokeCap,
        color: Color,
    },
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        sweep_angle: f64,
        width: f64,
        cap: StrokeCap,
        color: Color,
        alpha: f64,
    },
    /// Text centered on `anchor`. `font_size` is `font_size_ratio` applied to
    /// the gauge's drawing size, so backends that only scale can ignore it.
    Text {
        anchor: Point,
        text: String,
        font_size_ratio: f64,
        font_size: f64,
        color: Color,
    },
}

/// Anything that can consume primitives in order: a raster canvas, an SVG
/// writer, a test recorder.
pub trait PrimitiveSink {
    fn draw(&mut self, primitive: &Primitive);
}

impl PrimitiveSink for Vec<Primitive> {
    fn draw(&mut self, primitive: &Primitive) {
        self.push(primitive.clone());
    }
}

/// Ordered primitive list for one gauge draw; later primitives paint on top.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Square canvas edge the scene was composed for.
    pub size: f64,
    commands: Vec<Primitive>,
}

impl Scene {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn add_command(&mut self, command: Primitive) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[Primitive] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Feed every primitive to `sink`, in draw order.
    pub fn replay(&self, sink: &mut impl PrimitiveSink) {
        for command in &self.commands {
            sink.draw(command);
        }
    }
}
