use crate::Money;
use crate::model::{ClientId, ScooterId, StationId};

/// A registered client.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub name: String,
    pub phone: String,
}

/// An open rental: who rents which scooter, for how long and at what cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Rental {
    pub client: ClientId,
    pub station: StationId,
    pub scooter: ScooterId,
    pub hours: f64,
    pub cost: Money,
}

impl Rental {
    /// Apply an approved change of duration.
    pub fn reprice(&mut self, hours: f64, cost: Money) {
        self.hours = hours;
        self.cost = cost;
    }
}
