//! Rental billing: elapsed hours at the hourly rate plus distance at the
//! per-kilometre rate.

use super::money::{Distance, Money, Rate};
use crate::error::{RentalError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const MICROS_PER_HOUR: Decimal = dec!(3600000000);
const MILLIS_PER_HOUR: Decimal = dec!(3600000);

/// The rates a rental is billed at, taken from its vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tariff {
    pub hourly_rate: Rate,
    pub per_km_rate: Rate,
}

impl Tariff {
    pub fn new(hourly_rate: Rate, per_km_rate: Rate) -> Self {
        Self {
            hourly_rate,
            per_km_rate,
        }
    }

    /// `elapsed_hours * hourly_rate + distance * per_km_rate`, unrounded.
    ///
    /// Fails with [`RentalError::Validation`] when the amount does not fit in a
    /// `Decimal`.
    pub fn charge(&self, elapsed_hours: Decimal, distance: Distance) -> Result<Money> {
        let time = elapsed_hours.checked_mul(self.hourly_rate.value());
        let km = distance.km().checked_mul(self.per_km_rate.value());
        time.zip(km)
            .and_then(|(time, km)| time.checked_add(km))
            .map(Money::new)
            .ok_or_else(|| {
                RentalError::validation(format!(
                    "charge for {elapsed_hours} h and {} km overflows",
                    distance.km()
                ))
            })
    }
}

/// Fractional hours between two instants. Negative if `end` precedes `start`.
pub fn elapsed_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    hours_in(end - start)
}

fn hours_in(delta: TimeDelta) -> Decimal {
    match delta.num_microseconds() {
        Some(micros) => Decimal::from(micros) / MICROS_PER_HOUR,
        // Only spans of ~290k years overflow microseconds.
        None => Decimal::from(delta.num_milliseconds()) / MILLIS_PER_HOUR,
    }
}
