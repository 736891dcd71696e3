//! Rental registry.
//!
//! The system owns stations, clients and open rentals, validates every id
//! it is handed, and routes rental changes through the [`ApprovalChain`].
//! Also supports async stream of operations.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::approval::{ApprovalChain, Decision, RentalChangeRequest};
use crate::model::{ClientId, Operation, RentalId, StationId};
use crate::scooter;
use crate::station::RentalStation;

mod state;
pub use state::{Client, Rental};

mod error;
pub use error::SystemError;

/// The rental registry.
pub struct RentalSystem {
    /// Ordered so reports list stations by id
    stations: BTreeMap<StationId, RentalStation>,
    clients: HashMap<ClientId, Client>,
    /// Open rentals (returned rentals are evicted)
    rentals: HashMap<RentalId, Rental>,
    approvals: ApprovalChain,
}

/// Public API
impl RentalSystem {
    pub fn new() -> Self {
        Self::with_approvals(ApprovalChain::default())
    }

    pub fn with_approvals(approvals: ApprovalChain) -> Self {
        Self {
            stations: BTreeMap::new(),
            clients: HashMap::new(),
            rentals: HashMap::new(),
            approvals,
        }
    }

    /// Run the system with the given operation stream
    pub async fn run(&mut self, mut stream: impl Stream<Item = Operation> + Unpin) {
        while let Some(op) = stream.next().await {
            // a rejected operation must not stop the system
            let _ = self.apply(op);
        }
    }

    pub fn station(&self, id: &str) -> Option<&RentalStation> {
        self.stations.get(id)
    }

    pub fn stations(&self) -> impl Iterator<Item = &RentalStation> + '_ {
        self.stations.values()
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.get(id)
    }

    pub fn rental(&self, id: &str) -> Option<&Rental> {
        self.rentals.get(id)
    }

    /// Open rentals, in no particular order.
    pub fn rentals(&self) -> impl Iterator<Item = (&RentalId, &Rental)> + '_ {
        self.rentals.iter()
    }

    pub fn add_station(&mut self, station: RentalStation) -> Result<(), SystemError> {
        if self.stations.contains_key(station.id()) {
            return Err(SystemError::DuplicateStation(station.id().to_string()));
        }
        info!(station = station.id(), "station added");
        self.stations.insert(station.id().to_string(), station);
        Ok(())
    }

    /// Mutable access for fleet management (adding and removing scooters).
    pub fn station_mut(&mut self, id: &str) -> Result<&mut RentalStation, SystemError> {
        self.stations
            .get_mut(id)
            .ok_or_else(|| SystemError::StationNotFound(id.to_string()))
    }

    pub fn register_client(
        &mut self,
        id: impl Into<ClientId>,
        name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<(), SystemError> {
        let id = id.into();
        if self.clients.contains_key(&id) {
            return Err(SystemError::DuplicateClient(id));
        }
        self.clients.insert(
            id,
            Client {
                name: name.into(),
                phone: phone.into(),
            },
        );
        Ok(())
    }

    /// Open a rental:
    /// - Ensure the rental ID is unique and the client is registered
    /// - Ensure the scooter is at the station and available
    /// - Rent it and store the rental with its cost
    pub fn add_rental(
        &mut self,
        id: impl Into<RentalId>,
        client: &str,
        station: &str,
        scooter: &str,
        hours: f64,
    ) -> Result<(), SystemError> {
        let id = id.into();
        if self.rentals.contains_key(&id) {
            return Err(SystemError::DuplicateRental(id));
        }
        if !self.clients.contains_key(client) {
            return Err(SystemError::ClientNotFound(client.to_string()));
        }

        let rental_station = self.station_mut(station)?;
        if rental_station.scooter(scooter).is_none() {
            return Err(SystemError::ScooterNotFound(
                station.to_string(),
                scooter.to_string(),
            ));
        }
        let cost = rental_station.rent_scooter(scooter, hours)?;

        self.rentals.insert(
            id,
            Rental {
                client: client.to_string(),
                station: station.to_string(),
                scooter: scooter.to_string(),
                hours,
                cost,
            },
        );
        Ok(())
    }

    /// Ask the approval chain for a new rental duration:
    /// - Find the rental, its station and its scooter
    /// - Let the chain decide
    /// - On approval, rewrite hours and cost of the rental
    pub fn process_rental_change(
        &mut self,
        id: &str,
        hours: f64,
    ) -> Result<Decision, SystemError> {
        let (rental_id, rental) = self
            .rentals
            .get_key_value(id)
            .ok_or_else(|| SystemError::RentalNotFound(id.to_string()))?;
        let station = self
            .stations
            .get(&rental.station)
            .ok_or_else(|| SystemError::StationNotFound(rental.station.clone()))?;
        let rented = station.scooter(&rental.scooter).ok_or_else(|| {
            SystemError::ScooterNotFound(rental.station.clone(), rental.scooter.clone())
        })?;

        let decision = self.approvals.decide(&RentalChangeRequest {
            rental_id,
            hours,
            scooter: rented,
            client_id: &rental.client,
        });
        if decision.approved {
            let cost = decision
                .cost
                .unwrap_or_else(|| scooter::cost(rented, hours));
            if let Some(rental) = self.rentals.get_mut(id) {
                rental.reprice(hours, cost);
            }
            info!(rental = id, hours, cost = %cost, "rental changed");
        }
        Ok(decision)
    }

    /// Close a rental and make its scooter available again.
    pub fn return_rental(&mut self, id: &str) -> Result<Rental, SystemError> {
        let rental = self
            .rentals
            .get(id)
            .ok_or_else(|| SystemError::RentalNotFound(id.to_string()))?;
        let station = self
            .stations
            .get_mut(&rental.station)
            .ok_or_else(|| SystemError::StationNotFound(rental.station.clone()))?;
        station.return_scooter(&rental.scooter)?;

        // checked above
        let rental = self
            .rentals
            .remove(id)
            .ok_or_else(|| SystemError::RentalNotFound(id.to_string()))?;
        Ok(rental)
    }

    /// Set the battery level of a scooter at a station.
    pub fn charge_scooter(
        &mut self,
        station: &str,
        scooter: &str,
        level: f64,
    ) -> Result<(), SystemError> {
        let target = self
            .station_mut(station)?
            .scooter_mut(scooter)
            .ok_or_else(|| SystemError::ScooterNotFound(station.to_string(), scooter.to_string()))?;
        target.set_battery_level(level)?;
        Ok(())
    }

    /// Apply a single operation on top of the current state
    pub fn apply(&mut self, op: Operation) -> Result<(), SystemError> {
        match op {
            Operation::RegisterClient {
                client,
                name,
                phone,
            } => {
                let result = self.register_client(client.clone(), name, phone);
                Self::log_result("register", &client, &result);
                result
            }
            Operation::Rent {
                rental,
                client,
                station,
                scooter,
                hours,
            } => {
                let result = self.add_rental(rental.clone(), &client, &station, &scooter, hours);
                Self::log_result("rent", &rental, &result);
                result
            }
            Operation::ChangeRental { rental, hours } => {
                let result = self.process_rental_change(&rental, hours).map(|_| ());
                Self::log_result("change", &rental, &result);
                result
            }
            Operation::Return { rental } => {
                let result = self.return_rental(&rental).map(|_| ());
                Self::log_result("return", &rental, &result);
                result
            }
            Operation::Charge {
                station,
                scooter,
                level,
            } => {
                let result = self.charge_scooter(&station, &scooter, level);
                Self::log_result("charge", &scooter, &result);
                result
            }
        }
    }

    /// Totals followed by every station's report.
    pub fn system_report(&self) -> String {
        let mut report = String::new();
        // writing to a String cannot fail
        let _ = writeln!(report, "===== SYSTEM REPORT =====");
        let _ = writeln!(report, "Stations: {}", self.stations.len());
        let _ = writeln!(report, "Clients: {}", self.clients.len());
        let _ = writeln!(report, "Active rentals: {}", self.rentals.len());
        let _ = writeln!(report);
        for station in self.stations.values() {
            let _ = writeln!(report, "{}", station.report());
        }
        report
    }
}

/// Private API
impl RentalSystem {
    /// Small helper to log `apply` results
    fn log_result(op_type: &str, subject: &str, result: &Result<(), SystemError>) {
        match result {
            Ok(()) => info!(subject, "{op_type} applied"),
            Err(e) => info!(subject, reason = %e, "{op_type} skipped"),
        }
    }
}

impl Default for RentalSystem {
    fn default() -> Self {
        Self::new()
    }
}
