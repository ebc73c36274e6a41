use thiserror::Error;

use crate::config::ValueRange;

/// Precondition violations detected before any primitive is emitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GaugeError {
    #[error("gauge value {value} is out of gauge value range {range}")]
    ValueOutOfRange { value: f64, range: ValueRange },

    #[error("sweep angle {sweep_angle} must be from 1 to 360")]
    SweepAngleOutOfRange { sweep_angle: i32 },

    #[error("{which} tick step must be positive, got {step}")]
    NonPositiveTickStep { which: &'static str, step: i32 },
}

pub type Result<T> = std::result::Result<T, GaugeError>;
