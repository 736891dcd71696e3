//! Rental stations and their fleets.

use std::fmt::Write;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::model::{Location, ScooterId, StationId};
use crate::scooter::{self, Scooter};
use crate::Money;

/// Errors raised by fleet operations on a station.
#[derive(Debug, Error, PartialEq)]
pub enum StationError {
    #[error("station {station} is full (capacity {capacity})")]
    StationFull { station: StationId, capacity: usize },

    #[error("scooter {1} is already at station {0}")]
    DuplicateScooter(StationId, ScooterId),

    #[error("scooter {1} not found at station {0}")]
    ScooterNotFound(StationId, ScooterId),

    #[error("scooter {0} is not available for rent")]
    ScooterUnavailable(ScooterId),

    #[error("scooter {0} is not rented")]
    ScooterNotRented(ScooterId),
}

/// Records station actions.
pub trait ActionLog: Send + Sync {
    fn log_action(&self, station: &str, action: &str);
}

/// Tells clients about station events.
pub trait Notifier: Send + Sync {
    fn notify(&self, station: &str, message: &str);
}

/// [`ActionLog`] writing `tracing` events.
#[derive(Debug, Default)]
pub struct TracingLog;

impl ActionLog for TracingLog {
    fn log_action(&self, station: &str, action: &str) {
        info!(station, "{action}");
    }
}

/// [`Notifier`] writing `tracing` events under the `notification` target.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, station: &str, message: &str) {
        info!(target: "notification", station, "{message}");
    }
}

/// A station holding a fleet of up to `capacity` scooters.
pub struct RentalStation {
    id: StationId,
    location: Location,
    capacity: usize,
    fleet: Vec<Scooter>,
    log: Arc<dyn ActionLog>,
    notifier: Arc<dyn Notifier>,
}

impl RentalStation {
    pub fn new(id: impl Into<StationId>, location: Location, capacity: usize) -> Self {
        Self {
            id: id.into(),
            location,
            capacity,
            fleet: Vec::new(),
            log: Arc::new(TracingLog),
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_log(mut self, log: Arc<dyn ActionLog>) -> Self {
        self.log = log;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn scooters(&self) -> &[Scooter] {
        &self.fleet
    }

    pub fn scooter(&self, id: &str) -> Option<&Scooter> {
        self.fleet.iter().find(|s| s.id() == id)
    }

    pub fn scooter_mut(&mut self, id: &str) -> Option<&mut Scooter> {
        self.fleet.iter_mut().find(|s| s.id() == id)
    }

    /// Add a scooter to the fleet:
    /// - Ensure there is room left
    /// - Ensure no scooter with the same id is already here
    pub fn add_scooter(&mut self, scooter: Scooter) -> Result<(), StationError> {
        if self.fleet.len() >= self.capacity {
            return Err(StationError::StationFull {
                station: self.id.clone(),
                capacity: self.capacity,
            });
        }
        if self.scooter(scooter.id()).is_some() {
            return Err(StationError::DuplicateScooter(
                self.id.clone(),
                scooter.id().to_string(),
            ));
        }

        self.log.log_action(
            &self.id,
            &format!("scooter {} added to station {}", scooter.model(), self.id),
        );
        self.notifier.notify(
            &self.id,
            &format!("scooter {} ready for rent at station {}", scooter.model(), self.id),
        );
        self.fleet.push(scooter);
        Ok(())
    }

    /// Take a scooter out of the fleet. A rented scooter stays until returned.
    pub fn remove_scooter(&mut self, id: &str) -> Result<Scooter, StationError> {
        let idx = self.position(id)?;
        if !self.fleet[idx].is_available() {
            return Err(StationError::ScooterUnavailable(id.to_string()));
        }
        let scooter = self.fleet.remove(idx);

        self.log.log_action(
            &self.id,
            &format!("scooter {} removed from station {}", scooter.model(), self.id),
        );
        Ok(scooter)
    }

    pub fn available_scooters(&self) -> impl Iterator<Item = &Scooter> + '_ {
        self.fleet.iter().filter(|s| s.is_available())
    }

    /// Available scooters, cheapest first.
    pub fn available_by_rate(&self) -> Vec<&Scooter> {
        let mut available: Vec<_> = self.available_scooters().collect();
        available.sort_by(|a, b| {
            scooter::hourly_rate(a)
                .value()
                .total_cmp(&scooter::hourly_rate(b).value())
        });
        available
    }

    /// Rent a scooter for `hours` and return the cost:
    /// - Ensure the scooter is in the fleet and available
    /// - Mark it rented
    pub fn rent_scooter(&mut self, id: &str, hours: f64) -> Result<Money, StationError> {
        let idx = self.position(id)?;
        let rented = &mut self.fleet[idx];

        if !rented.is_available() {
            return Err(StationError::ScooterUnavailable(id.to_string()));
        }

        rented.mark_rented();
        let cost = scooter::cost(rented, hours);
        let model = rented.model().to_string();

        self.log.log_action(
            &self.id,
            &format!("scooter {model} rented for {hours} hours, cost {cost}"),
        );
        self.notifier.notify(
            &self.id,
            &format!("rental confirmed: scooter {model}, cost {cost}"),
        );
        Ok(cost)
    }

    /// Bring a rented scooter back into the available pool.
    pub fn return_scooter(&mut self, id: &str) -> Result<(), StationError> {
        let idx = self.position(id)?;
        let returned = &mut self.fleet[idx];

        if returned.is_available() {
            return Err(StationError::ScooterNotRented(id.to_string()));
        }

        returned.mark_returned();
        let model = returned.model().to_string();
        self.log.log_action(&self.id, &format!("scooter {model} returned"));
        Ok(())
    }

    /// Human readable summary of the station.
    pub fn report(&self) -> String {
        let available: Vec<_> = self.available_scooters().collect();
        let mut report = String::new();
        // writing to a String cannot fail
        let _ = writeln!(report, "===== STATION {} =====", self.id);
        let _ = writeln!(report, "Address: {}", self.location);
        let _ = writeln!(report, "Capacity: {}", self.capacity);
        let _ = writeln!(
            report,
            "Available scooters: {}/{}",
            available.len(),
            self.fleet.len()
        );
        let _ = writeln!(report, "Available models:");
        for scooter in available {
            let _ = writeln!(report, "- {scooter}");
        }
        report
    }

    fn position(&self, id: &str) -> Result<usize, StationError> {
        self.fleet
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| StationError::ScooterNotFound(self.id.clone(), id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::scooter::ScooterKind;

    #[derive(Default)]
    struct Captured {
        lines: Mutex<Vec<String>>,
    }

    impl Captured {
        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl ActionLog for Captured {
        fn log_action(&self, _station: &str, action: &str) {
            self.lines.lock().unwrap().push(action.to_string());
        }
    }

    impl Notifier for Captured {
        fn notify(&self, _station: &str, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
    }

    fn city(id: &str, rate: f64) -> Scooter {
        Scooter::new(
            id,
            format!("City {id}"),
            90.0,
            Money::from_float(rate),
            ScooterKind::City { max_speed: 25.0 },
        )
        .unwrap()
    }

    fn station(capacity: usize) -> RentalStation {
        RentalStation::new("ST001", Location::new("10 Lenin St", 55.7558, 37.6173), capacity)
    }

    #[test]
    fn add_scooter_to_fleet() {
        let mut station = station(2);
        station.add_scooter(city("SC001", 95.0)).unwrap();
        assert_eq!(station.scooters().len(), 1);
        assert!(station.scooter("SC001").is_some());
    }

    #[test]
    fn add_scooter_over_capacity_fails() {
        let mut station = station(1);
        station.add_scooter(city("SC001", 95.0)).unwrap();

        let result = station.add_scooter(city("SC002", 95.0));
        assert_eq!(
            result,
            Err(StationError::StationFull {
                station: "ST001".to_string(),
                capacity: 1
            })
        );
        assert_eq!(station.scooters().len(), 1);
    }

    #[test]
    fn add_duplicate_scooter_fails() {
        let mut station = station(3);
        station.add_scooter(city("SC001", 95.0)).unwrap();

        let result = station.add_scooter(city("SC001", 50.0));
        assert_eq!(
            result,
            Err(StationError::DuplicateScooter(
                "ST001".to_string(),
                "SC001".to_string()
            ))
        );
    }

    #[test]
    fn remove_scooter() {
        let mut station = station(3);
        station.add_scooter(city("SC001", 95.0)).unwrap();

        let removed = station.remove_scooter("SC001").unwrap();
        assert_eq!(removed.id(), "SC001");
        assert!(station.scooters().is_empty());

        assert!(matches!(
            station.remove_scooter("SC001"),
            Err(StationError::ScooterNotFound(_, _))
        ));
    }

    #[test]
    fn remove_rented_scooter_fails() {
        let mut station = station(3);
        station.add_scooter(city("SC001", 95.0)).unwrap();
        station.rent_scooter("SC001", 1.0).unwrap();

        assert_eq!(
            station.remove_scooter("SC001"),
            Err(StationError::ScooterUnavailable("SC001".to_string()))
        );
        assert!(station.scooter("SC001").is_some());

        station.return_scooter("SC001").unwrap();
        assert_eq!(station.remove_scooter("SC001").unwrap().id(), "SC001");
    }

    #[test]
    fn rent_scooter_marks_unavailable_and_prices() {
        let mut station = station(3);
        station.add_scooter(city("SC001", 95.0)).unwrap();

        let cost = station.rent_scooter("SC001", 2.0).unwrap();
        assert_eq!(cost, Money::from_float(190.0));
        assert!(!station.scooter("SC001").unwrap().is_available());
        assert_eq!(station.available_scooters().count(), 0);
    }

    #[test]
    fn rent_unavailable_scooter_fails() {
        let mut station = station(3);
        station.add_scooter(city("SC001", 95.0)).unwrap();
        station.rent_scooter("SC001", 1.0).unwrap();

        assert_eq!(
            station.rent_scooter("SC001", 1.0),
            Err(StationError::ScooterUnavailable("SC001".to_string()))
        );
    }

    #[test]
    fn rent_missing_scooter_fails() {
        let mut station = station(3);
        assert_eq!(
            station.rent_scooter("SC404", 1.0),
            Err(StationError::ScooterNotFound(
                "ST001".to_string(),
                "SC404".to_string()
            ))
        );
    }

    #[test]
    fn return_scooter_makes_it_available() {
        let mut station = station(3);
        station.add_scooter(city("SC001", 95.0)).unwrap();
        station.rent_scooter("SC001", 1.0).unwrap();

        station.return_scooter("SC001").unwrap();
        assert!(station.scooter("SC001").unwrap().is_available());

        assert_eq!(
            station.return_scooter("SC001"),
            Err(StationError::ScooterNotRented("SC001".to_string()))
        );
    }

    #[test]
    fn available_by_rate_sorts_cheapest_first() {
        let mut station = station(4);
        station.add_scooter(city("SC001", 150.0)).unwrap();
        station.add_scooter(city("SC002", 80.0)).unwrap();
        station.add_scooter(city("SC003", 120.0)).unwrap();
        station.add_scooter(city("SC004", 10.0)).unwrap();
        station.rent_scooter("SC004", 1.0).unwrap();

        let ids: Vec<_> = station.available_by_rate().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["SC002", "SC003", "SC001"]);
    }

    #[test]
    fn available_by_rate_orders_nan_rates_last() {
        let mut station = station(200);
        for i in 0..200 {
            let rate = if i % 3 == 0 {
                f64::NAN
            } else {
                ((i * 37) % 101) as f64
            };
            station.add_scooter(city(&format!("SC{i:03}"), rate)).unwrap();
        }

        let rates: Vec<f64> = station
            .available_by_rate()
            .iter()
            .map(|s| s.hourly_rate().value())
            .collect();
        assert_eq!(rates.len(), 200);

        let (numbers, nans): (Vec<f64>, Vec<f64>) =
            rates.iter().copied().partition(|r| !r.is_nan());
        assert_eq!(nans.len(), 67);
        assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
        // every NaN sorts after every number
        assert!(rates[numbers.len()..].iter().all(|r| r.is_nan()));
    }

    #[test]
    fn log_and_notifier_are_injected() {
        let captured = Arc::new(Captured::default());
        let mut station = station(2)
            .with_log(captured.clone())
            .with_notifier(captured.clone());

        station.add_scooter(city("SC001", 95.0)).unwrap();
        station.rent_scooter("SC001", 2.0).unwrap();

        assert_eq!(
            captured.lines(),
            vec![
                "scooter City SC001 added to station ST001",
                "scooter City SC001 ready for rent at station ST001",
                "scooter City SC001 rented for 2 hours, cost 190.00",
                "rental confirmed: scooter City SC001, cost 190.00",
            ]
        );
    }

    #[test]
    fn report_lists_available_models() {
        let mut station = station(5);
        station.add_scooter(city("SC001", 95.0)).unwrap();
        station.add_scooter(city("SC002", 95.0)).unwrap();
        station.rent_scooter("SC002", 1.0).unwrap();

        let report = station.report();
        assert!(report.starts_with("===== STATION ST001 =====\n"));
        assert!(report.contains("Address: 10 Lenin St (55.7558, 37.6173)"));
        assert!(report.contains("Capacity: 5"));
        assert!(report.contains("Available scooters: 1/2"));
        assert!(report.contains("- City scooter: City SC001, max speed: 25 km/h"));
        assert!(!report.contains("City SC002,"));
    }
}
