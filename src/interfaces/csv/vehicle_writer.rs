use crate::domain::vehicle::Vehicle;
use crate::error::Result;
use std::io::Write;

const HEADER: [&str; 4] = ["id", "model", "hourly_rate", "per_km_rate"];

/// Writes the fleet as CSV: `id,model,hourly_rate,per_km_rate`.
pub struct VehicleWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> VehicleWriter<W> {
    pub fn new(sink: W) -> Self {
        // The header is written by hand so an empty fleet still gets one.
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        Self { writer }
    }

    pub fn write_vehicles<I>(&mut self, vehicles: I) -> Result<()>
    where
        I: IntoIterator<Item = Vehicle>,
    {
        self.writer.write_record(HEADER)?;
        for vehicle in vehicles {
            self.writer.serialize(&vehicle)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
