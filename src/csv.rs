use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::scooter::{ExtraParams, ParamValue, ScooterError, ScooterFactory, ScooterSpec};
use crate::system::Rental;
use crate::{Location, Money, Operation, RentalId, RentalStation, Scooter, StationId};

/// Errors that can occur when reading csv inputs
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized operation type '{op_type}'")]
    UnrecognizedType { line: usize, op_type: String },

    #[error("line {line}: {op_type} missing {field}")]
    MissingField {
        line: usize,
        op_type: String,
        field: &'static str,
    },

    #[error("line {line}: {source}")]
    Scooter { line: usize, source: ScooterError },
}

#[derive(Debug, Deserialize)]
struct StationRow {
    station: StationId,
    capacity: usize,
    address: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct FleetRow {
    station: StationId,
    r#type: String,
    id: String,
    model: String,
    battery: f64,
    rate: f64,
    max_speed: Option<f64>,
    tire_type: Option<String>,
    weight: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OperationRow {
    r#type: String,
    id: Option<String>,
    client: Option<String>,
    station: Option<String>,
    scooter: Option<String>,
    hours: Option<f64>,
    name: Option<String>,
    phone: Option<String>,
    battery: Option<f64>,
}

#[derive(Debug, Serialize)]
struct RentalRow<'a> {
    rental: &'a str,
    client: &'a str,
    station: &'a str,
    scooter: &'a str,
    hours: String,
    cost: String,
}

fn open(path: &Path) -> Result<csv::Reader<File>, CsvError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })
}

/// Deserialize rows of `T`, pairing each with its 1-indexed line number (header is line 1)
fn rows<T: DeserializeOwned>(
    reader: csv::Reader<File>,
) -> impl Iterator<Item = Result<(usize, T), CsvError>> {
    reader
        .into_deserialize::<T>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2;
            result
                .map(|row| (line, row))
                .map_err(|source| CsvError::Parse { line, source })
        })
}

/// Read stations from a csv file with columns
/// `station,capacity,address,latitude,longitude`
pub fn read_stations(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<RentalStation, CsvError>>, CsvError> {
    Ok(rows::<StationRow>(open(path.as_ref())?).map(|result| {
        let (_, row) = result?;
        Ok(RentalStation::new(
            row.station,
            Location::new(row.address, row.latitude, row.longitude),
            row.capacity,
        ))
    }))
}

/// Read scooters from a csv file with columns
/// `station,type,id,model,battery,rate,max_speed,tire_type,weight`.
///
/// Empty extra columns are left out of the factory parameters, so the
/// factory decides whether the scooter type needs them.
pub fn read_fleet<'f>(
    path: impl AsRef<Path>,
    factory: &'f ScooterFactory,
) -> Result<impl Iterator<Item = Result<(StationId, Scooter), CsvError>> + 'f, CsvError> {
    Ok(rows::<FleetRow>(open(path.as_ref())?).map(move |result| {
        let (line, row) = result?;

        let mut params = ExtraParams::new();
        if let Some(max_speed) = row.max_speed {
            params.insert("max_speed".to_string(), ParamValue::Number(max_speed));
        }
        if let Some(tire_type) = row.tire_type {
            params.insert("tire_type".to_string(), ParamValue::Text(tire_type));
        }
        if let Some(weight) = row.weight {
            params.insert("weight".to_string(), ParamValue::Number(weight));
        }

        let spec = ScooterSpec {
            id: row.id,
            model: row.model,
            battery_level: row.battery,
            hourly_rate: Money::from_float(row.rate),
        };
        let scooter = factory
            .create(&row.r#type, spec, &params)
            .map_err(|source| CsvError::Scooter { line, source })?;
        Ok((row.station, scooter))
    }))
}

fn required<T>(
    value: Option<T>,
    line: usize,
    op_type: &str,
    field: &'static str,
) -> Result<T, CsvError> {
    value.ok_or_else(|| CsvError::MissingField {
        line,
        op_type: op_type.to_string(),
        field,
    })
}

/// Read operations from a csv file with columns
/// `type,id,client,station,scooter,hours,name,phone,battery`
pub fn read_operations(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Operation, CsvError>>, CsvError> {
    Ok(rows::<OperationRow>(open(path.as_ref())?).map(|result| {
        let (line, row) = result?;
        let op_type = row.r#type.as_str();
        match op_type {
            "register" => Ok(Operation::RegisterClient {
                client: required(row.id, line, op_type, "id")?,
                name: required(row.name, line, op_type, "name")?,
                phone: required(row.phone, line, op_type, "phone")?,
            }),
            "rent" => Ok(Operation::Rent {
                rental: required(row.id, line, op_type, "id")?,
                client: required(row.client, line, op_type, "client")?,
                station: required(row.station, line, op_type, "station")?,
                scooter: required(row.scooter, line, op_type, "scooter")?,
                hours: required(row.hours, line, op_type, "hours")?,
            }),
            "change" => Ok(Operation::ChangeRental {
                rental: required(row.id, line, op_type, "id")?,
                hours: required(row.hours, line, op_type, "hours")?,
            }),
            "return" => Ok(Operation::Return {
                rental: required(row.id, line, op_type, "id")?,
            }),
            "charge" => Ok(Operation::Charge {
                station: required(row.station, line, op_type, "station")?,
                scooter: required(row.scooter, line, op_type, "scooter")?,
                level: required(row.battery, line, op_type, "battery")?,
            }),
            other => Err(CsvError::UnrecognizedType {
                line,
                op_type: other.to_string(),
            }),
        }
    }))
}

/// Write rentals in csv format, sorted by rental id
pub fn write_rentals<'a>(
    writer: impl io::Write,
    rentals: impl IntoIterator<Item = (&'a RentalId, &'a Rental)>,
) -> Result<(), csv::Error> {
    let mut rentals: Vec<_> = rentals.into_iter().collect();
    rentals.sort_by(|a, b| a.0.cmp(b.0));

    let mut writer = csv::Writer::from_writer(writer);
    for (id, rental) in rentals {
        writer.serialize(RentalRow {
            rental: id,
            client: &rental.client,
            station: &rental.station,
            scooter: &rental.scooter,
            hours: rental.hours.to_string(),
            cost: rental.cost.to_string(),
        })?;
    }
    writer.flush()?;
    Ok(())
}
