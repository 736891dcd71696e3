//! Scooter variants, their pricing and their construction.
//!
//! A [`Scooter`] carries the attributes shared by every variant plus a
//! [`ScooterKind`] holding the one attribute specific to its variant.
//! Pricing is dispatched on the kind, see [`pricing`].

use std::fmt;

use crate::Money;
use crate::model::ScooterId;

mod error;
pub use error::ScooterError;

pub mod factory;
pub mod pricing;

pub use factory::{ExtraParams, ParamValue, ScooterFactory, ScooterSpec};
pub use pricing::{cost, hourly_rate};

/// The variant of a scooter, with its distinguishing attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum ScooterKind {
    /// Urban scooter, discounted on long rentals.
    City { max_speed: f64 },
    /// Terrain scooter, surcharged for wear.
    OffRoad { tire_type: String },
    /// Lightweight scooter, flat discount.
    Foldable { weight: f64 },
}

impl ScooterKind {
    /// Factory tag of this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            ScooterKind::City { .. } => "city",
            ScooterKind::OffRoad { .. } => "off_road",
            ScooterKind::Foldable { .. } => "foldable",
        }
    }
}

/// A rentable scooter.
#[derive(Debug, Clone, PartialEq)]
pub struct Scooter {
    id: ScooterId,
    model: String,
    battery_level: f64,
    hourly_rate: Money,
    available: bool,
    kind: ScooterKind,
}

impl Scooter {
    /// Create an available scooter. Fails if `battery_level` is outside 0-100.
    pub fn new(
        id: impl Into<ScooterId>,
        model: impl Into<String>,
        battery_level: f64,
        hourly_rate: Money,
        kind: ScooterKind,
    ) -> Result<Self, ScooterError> {
        check_battery(battery_level)?;
        Ok(Self {
            id: id.into(),
            model: model.into(),
            battery_level,
            hourly_rate,
            available: true,
            kind,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn kind(&self) -> &ScooterKind {
        &self.kind
    }

    pub fn battery_level(&self) -> f64 {
        self.battery_level
    }

    /// Update the battery level. Out of range values are rejected and the
    /// previous level is kept.
    pub fn set_battery_level(&mut self, level: f64) -> Result<(), ScooterError> {
        check_battery(level)?;
        self.battery_level = level;
        Ok(())
    }

    pub fn hourly_rate(&self) -> Money {
        self.hourly_rate
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn mark_rented(&mut self) {
        self.available = false;
    }

    pub fn mark_returned(&mut self) {
        self.available = true;
    }

    pub fn max_speed(&self) -> Option<f64> {
        match self.kind {
            ScooterKind::City { max_speed } => Some(max_speed),
            _ => None,
        }
    }

    pub fn tire_type(&self) -> Option<&str> {
        match &self.kind {
            ScooterKind::OffRoad { tire_type } => Some(tire_type),
            _ => None,
        }
    }

    pub fn weight(&self) -> Option<f64> {
        match self.kind {
            ScooterKind::Foldable { weight } => Some(weight),
            _ => None,
        }
    }
}

// NaN fails the range check too
fn check_battery(level: f64) -> Result<(), ScooterError> {
    if (0.0..=100.0).contains(&level) {
        Ok(())
    } else {
        Err(ScooterError::InvalidBatteryLevel(level))
    }
}

impl fmt::Display for Scooter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ScooterKind::City { max_speed } => {
                write!(f, "City scooter: {}, max speed: {max_speed} km/h", self.model)
            }
            ScooterKind::OffRoad { tire_type } => {
                write!(f, "Off-road scooter: {}, tires: {tire_type}", self.model)
            }
            ScooterKind::Foldable { weight } => {
                write!(f, "Foldable scooter: {}, weight: {weight} kg", self.model)
            }
        }
    }
}
