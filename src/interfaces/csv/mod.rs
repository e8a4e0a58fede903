pub mod vehicle_reader;
pub mod vehicle_writer;
