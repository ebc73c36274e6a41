pub mod arcs;
pub mod config;
pub mod error;
pub mod gauge;
pub mod mapping;
pub mod needle;
pub mod raster;
pub mod scene;
pub mod ticks;

pub use config::{
    palette, AngularConfig, ArcColors, ArcStyle, Color, GaugeColors, GaugeNumerics, GaugeStyle,
    NeedleColors, NeedleStyle, StrokeCap, TickColors, TickConfig, ValueRange,
};
pub use error::{GaugeError, Result};
pub use gauge::{format_value, ArcColorsProvider, Gauge, GaugeConfig, TicksColorProvider};
pub use mapping::{linear_delta, linear_map, polar_to_cartesian, value_to_angle, Point};
pub use scene::{CirclePaint, Primitive, PrimitiveSink, Scene};
