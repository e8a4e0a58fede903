use super::money::Rate;
use crate::error::RentalError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct VehicleId(pub i64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vehicle of the fleet together with the tariff it is rented at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub model: String,
    pub hourly_rate: Rate,
    pub per_km_rate: Rate,
}

/// An unvalidated vehicle as it arrives from an import file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VehicleRecord {
    pub model: String,
    pub hourly_rate: Decimal,
    pub per_km_rate: Decimal,
}

impl TryFrom<VehicleRecord> for NewVehicle {
    type Error = RentalError;

    fn try_from(record: VehicleRecord) -> Result<Self, Self::Error> {
        Self::new(record.model, record.hourly_rate, record.per_km_rate)
    }
}

/// A vehicle that has passed validation but has no identity yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    model: String,
    hourly_rate: Rate,
    per_km_rate: Rate,
}

impl NewVehicle {
    pub fn new(
        model: impl Into<String>,
        hourly_rate: Decimal,
        per_km_rate: Decimal,
    ) -> Result<Self, RentalError> {
        let model = model.into().trim().to_string();
        if model.is_empty() {
            return Err(RentalError::validation("vehicle model must not be empty"));
        }
        Ok(Self {
            model,
            hourly_rate: Rate::new(hourly_rate)?,
            per_km_rate: Rate::new(per_km_rate)?,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn hourly_rate(&self) -> Rate {
        self.hourly_rate
    }

    pub fn per_km_rate(&self) -> Rate {
        self.per_km_rate
    }

    pub fn with_id(self, id: VehicleId) -> Vehicle {
        Vehicle {
            id,
            model: self.model,
            hourly_rate: self.hourly_rate,
            per_km_rate: self.per_km_rate,
        }
    }
}
