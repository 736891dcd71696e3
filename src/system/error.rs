//! Error types for registry operations.

use thiserror::Error;

use crate::model::{ClientId, RentalId, ScooterId, StationId};
use crate::scooter::ScooterError;
use crate::station::StationError;

/// Top-level error returned by [`RentalSystem::apply`](super::RentalSystem::apply).
#[derive(Debug, Error, PartialEq)]
pub enum SystemError {
    #[error("station {0} already exists")]
    DuplicateStation(StationId),

    #[error("client {0} is already registered")]
    DuplicateClient(ClientId),

    #[error("rental {0} already exists")]
    DuplicateRental(RentalId),

    #[error("station {0} not found")]
    StationNotFound(StationId),

    #[error("client {0} not found")]
    ClientNotFound(ClientId),

    #[error("rental {0} not found")]
    RentalNotFound(RentalId),

    #[error("scooter {1} not found at station {0}")]
    ScooterNotFound(StationId, ScooterId),

    #[error("{0}")]
    Station(#[from] StationError),

    #[error("{0}")]
    Scooter(#[from] ScooterError),
}
