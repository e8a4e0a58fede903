use crate::domain::vehicle::VehicleRecord;
use crate::error::{RentalError, Result};
use std::io::Read;

/// Reads vehicle records from a CSV source with a
/// `model,hourly_rate,per_km_rate` header.
///
/// Whitespace around fields is trimmed. Rows are decoded lazily, so a bad row
/// only fails its own item.
pub struct VehicleReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> VehicleReader<R> {
    /// Creates a `VehicleReader` over any `Read` source, such as an open import file.
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes vehicle records.
    ///
    /// Records are not validated here; rates and model are checked when a
    /// record is turned into a `NewVehicle`.
    pub fn vehicles(self) -> impl Iterator<Item = Result<VehicleRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(RentalError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reader_valid_stream() {
        let data = "model, hourly_rate, per_km_rate\nModel 3, 50, 0.8\nModel Y, 60.5, 0.95";
        let records: Vec<Result<VehicleRecord>> = VehicleReader::new(data.as_bytes()).vehicles().collect();

        assert_eq!(records.len(), 2);
        let first = records[0].as_ref().unwrap();
        assert_eq!(first.model, "Model 3");
        assert_eq!(first.hourly_rate, dec!(50));
        assert_eq!(first.per_km_rate, dec!(0.8));
        assert_eq!(records[1].as_ref().unwrap().hourly_rate, dec!(60.5));
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "model, hourly_rate, per_km_rate\nModel 3, fifty, 0.8\nModel S, 80, 1";
        let records: Vec<Result<VehicleRecord>> = VehicleReader::new(data.as_bytes()).vehicles().collect();

        assert!(matches!(records[0], Err(RentalError::Csv(_))));
        assert!(records[1].is_ok());
    }
}
