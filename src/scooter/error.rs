//! Error types for scooter construction and mutation.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScooterError {
    #[error("battery level {0} is outside 0-100")]
    InvalidBatteryLevel(f64),

    #[error("unknown scooter type '{0}', known types: {1}")]
    UnknownVariant(String, String),

    #[error("missing required parameter '{param}' for scooter type '{tag}'")]
    MissingParameter { tag: String, param: &'static str },

    #[error("parameter '{param}' for scooter type '{tag}' has the wrong type")]
    InvalidParameter { tag: String, param: &'static str },
}
