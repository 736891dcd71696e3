use std::env;
use std::io;
use std::process::ExitCode;

use scoot_rent::csv::{read_fleet, read_operations, read_stations, write_rentals};
use scoot_rent::{RentalSystem, ScooterFactory};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: scoot-rent [--report] <stations.csv> <fleet.csv> <operations.csv>";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            "warn".parse().expect("static directive is valid"),
        ))
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let report = match args.iter().position(|a| a == "--report") {
        Some(idx) => {
            args.remove(idx);
            true
        }
        None => false,
    };
    let [stations_path, fleet_path, ops_path] = match <[String; 3]>::try_from(args) {
        Ok(paths) => paths,
        Err(_) => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    for path in [&stations_path, &fleet_path, &ops_path] {
        if !path.ends_with(".csv") {
            warn!(path, "input file seems to not be a csv file");
        }
    }

    let mut system = RentalSystem::new();

    match read_stations(&stations_path) {
        Ok(stations) => {
            for result in stations {
                match result.map(|station| system.add_station(station)) {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!("{e}"),
                    Err(e) => warn!("{e}"),
                }
            }
        }
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    }

    let factory = ScooterFactory::default();
    match read_fleet(&fleet_path, &factory) {
        Ok(fleet) => {
            for result in fleet {
                let added = result.map(|(station, scooter)| {
                    system
                        .station_mut(&station)
                        .and_then(|s| s.add_scooter(scooter).map_err(Into::into))
                });
                match added {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!("{e}"),
                    Err(e) => warn!("{e}"),
                }
            }
        }
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    }

    let operations = match read_operations(ops_path) {
        Ok(operations) => operations,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let (op_sender, op_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in operations {
            match result {
                Ok(op) => {
                    if op_sender.send(op).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    system.run(ReceiverStream::new(op_receiver)).await;

    if report {
        print!("{}", system.system_report());
    } else if let Err(e) = write_rentals(io::stdout().lock(), system.rentals()) {
        error!("failed to write rentals: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
