//! Shared identifiers and plain value types.

use std::fmt;

/// Station identifier.
pub type StationId = String;

/// Scooter identifier, unique within a station's fleet.
pub type ScooterId = String;

/// Client identifier.
pub type ClientId = String;

/// Rental identifier.
pub type RentalId = String;

/// An operation against the rental registry, the inputs of the system.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Register a new client.
    RegisterClient {
        client: ClientId,
        name: String,
        phone: String,
    },
    /// Rent an available scooter from a station.
    Rent {
        rental: RentalId,
        client: ClientId,
        station: StationId,
        scooter: ScooterId,
        hours: f64,
    },
    /// Ask for a new duration on an open rental; goes through approval.
    ChangeRental { rental: RentalId, hours: f64 },
    /// Bring the scooter back and close the rental.
    Return { rental: RentalId },
    /// Update the battery level of a scooter.
    Charge {
        station: StationId,
        scooter: ScooterId,
        level: f64,
    },
}

/// Street address plus coordinates of a station.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    address: String,
    latitude: f64,
    longitude: f64,
}

impl Location {
    pub fn new(address: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            address: address.into(),
            latitude,
            longitude,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// `(latitude, longitude)`
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.address, self.latitude, self.longitude)
    }
}
