use crate::domain::ports::VehicleStoreBox;
use crate::domain::vehicle::{NewVehicle, Vehicle, VehicleId, VehicleRecord};
use crate::error::{ErrorKind, RentalError, Result};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Outcome of a bulk import. Rejected entries carry their 1-based position.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub imported: Vec<VehicleId>,
    pub rejected: Vec<(usize, RentalError)>,
}

/// The vehicle repository: adds vehicles to the fleet and lists them.
pub struct Fleet {
    vehicles: VehicleStoreBox,
}

impl Fleet {
    pub fn new(vehicles: VehicleStoreBox) -> Self {
        Self { vehicles }
    }

    /// Validates and stores a vehicle, returning the id the store assigned.
    pub async fn add_vehicle(
        &self,
        model: &str,
        hourly_rate: Decimal,
        per_km_rate: Decimal,
    ) -> Result<VehicleId> {
        let vehicle = NewVehicle::new(model, hourly_rate, per_km_rate)?;
        let id = self.vehicles.insert(vehicle).await?;
        info!(vehicle = %id, model, %hourly_rate, %per_km_rate, "vehicle added");
        Ok(id)
    }

    /// Every vehicle in id order. Each call re-reads the store.
    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        self.vehicles.all().await
    }

    pub async fn vehicle(&self, id: VehicleId) -> Result<Vehicle> {
        self.vehicles
            .get(id)
            .await?
            .ok_or(RentalError::VehicleNotFound(id))
    }

    /// Adds every valid record. Bad records are collected and skipped; a store
    /// failure aborts the import.
    pub async fn import_vehicles<I>(&self, records: I) -> Result<ImportSummary>
    where
        I: IntoIterator<Item = Result<VehicleRecord>>,
    {
        let mut summary = ImportSummary::default();
        for (index, record) in records.into_iter().enumerate() {
            let position = index + 1;
            let outcome = match record.and_then(NewVehicle::try_from) {
                Ok(vehicle) => self.vehicles.insert(vehicle).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(id) => summary.imported.push(id),
                Err(e) if e.kind() == ErrorKind::StoreUnavailable => return Err(e),
                Err(e) => {
                    warn!(position, error = %e, "skipping vehicle record");
                    summary.rejected.push((position, e));
                }
            }
        }
        info!(
            imported = summary.imported.len(),
            rejected = summary.rejected.len(),
            "vehicle import finished"
        );
        Ok(summary)
    }
}
