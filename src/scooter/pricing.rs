//! Rental cost per scooter variant.
//!
//! | Variant  | Cost                                     |
//! |----------|------------------------------------------|
//! | City     | `rate * hours`, 10% off when `hours > 3` |
//! | OffRoad  | `rate * hours * 1.15`                    |
//! | Foldable | `rate * hours * 0.95`                    |
//!
//! Every function here is pure: the approval chain prices speculatively
//! before anything is committed. `hours` is not validated.

use super::{Scooter, ScooterKind};
use crate::Money;

const CITY_LONG_RENTAL_HOURS: f64 = 3.0;
const CITY_LONG_RENTAL_FACTOR: f64 = 0.9;
const OFF_ROAD_FACTOR: f64 = 1.15;
const FOLDABLE_FACTOR: f64 = 0.95;

impl ScooterKind {
    /// Cost of renting a scooter of this kind at `rate` per hour.
    pub fn rental_cost(&self, rate: Money, hours: f64) -> Money {
        let base = rate.scale(hours);
        match self {
            ScooterKind::City { .. } if hours > CITY_LONG_RENTAL_HOURS => {
                base.scale(CITY_LONG_RENTAL_FACTOR)
            }
            ScooterKind::City { .. } => base,
            ScooterKind::OffRoad { .. } => base.scale(OFF_ROAD_FACTOR),
            ScooterKind::Foldable { .. } => base.scale(FOLDABLE_FACTOR),
        }
    }
}

/// Cost of renting `scooter` for `hours`.
pub fn cost(scooter: &Scooter, hours: f64) -> Money {
    scooter.kind().rental_cost(scooter.hourly_rate(), hours)
}

/// Sort key for ordering scooters by price.
pub fn hourly_rate(scooter: &Scooter) -> Money {
    scooter.hourly_rate()
}
