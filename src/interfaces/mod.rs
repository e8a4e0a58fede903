//! Input and output formats used by the command line driver.

pub mod csv;
