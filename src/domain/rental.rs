use super::client::ClientId;
use super::money::{Distance, Money};
use super::vehicle::VehicleId;
use crate::error::RentalError;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RentalId(pub i64);

impl fmt::Display for RentalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalStatus {
    Open,
    Closed,
}

/// A rental session. Open while `ended_at` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rental {
    pub id: RentalId,
    pub client_id: ClientId,
    pub vehicle_id: VehicleId,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub distance: Option<Distance>,
    pub total_amount: Option<Money>,
}

impl Rental {
    pub fn status(&self) -> RentalStatus {
        if self.ended_at.is_some() {
            RentalStatus::Closed
        } else {
            RentalStatus::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.status() == RentalStatus::Open
    }
}

/// The row written when a rental starts.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRental {
    pub client_id: ClientId,
    pub vehicle_id: VehicleId,
    pub started_at: DateTime<Utc>,
}

impl NewRental {
    pub fn with_id(self, id: RentalId) -> Rental {
        Rental {
            id,
            client_id: self.client_id,
            vehicle_id: self.vehicle_id,
            started_at: self.started_at,
            ended_at: None,
            distance: None,
            total_amount: None,
        }
    }
}

/// The fields written when a rental is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentalClosure {
    pub ended_at: DateTime<Utc>,
    pub distance: Distance,
    pub total_amount: Money,
}

/// Serializes an instant as RFC 3339 in UTC with nanosecond precision.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RentalError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| RentalError::CorruptRecord(format!("bad timestamp {raw:?}: {e}")))
}
