#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use fleetrent::application::Services;
use fleetrent::domain::client::ClientId;
use fleetrent::domain::clock::ManualClock;
use fleetrent::domain::ports::{ClientStore, RentalStore, SchemaManager, VehicleStore};
use fleetrent::domain::vehicle::VehicleId;
use rust_decimal_macros::dec;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::sync::Arc;

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap()
}

/// Services over `store` with a manual clock, schema initialized, plus one
/// client and one Model 3 at 50/h and 0.8/km.
pub async fn seeded<S>(store: S) -> (Services, Arc<ManualClock>, ClientId, VehicleId)
where
    S: SchemaManager + VehicleStore + ClientStore + RentalStore + Clone + 'static,
{
    let clock = Arc::new(ManualClock::new(epoch()));
    let services = Services::from_store(store, Box::new(clock.clone()));
    services.schema.initialize().await.unwrap();

    let client = services
        .clients
        .register_client("Ada Lovelace", "ada@example.com")
        .await
        .unwrap();
    let vehicle = services
        .fleet
        .add_vehicle("Model 3", dec!(50), dec!(0.8))
        .await
        .unwrap();

    (services, clock, client, vehicle)
}

pub fn write_vehicle_csv(path: &Path, rows: &[[&str; 3]]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["model", "hourly_rate", "per_km_rate"])?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}
