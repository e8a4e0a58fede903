//! Domain model: fleet entities, money value objects, the billing formula and
//! the storage ports the application layer is written against.

pub mod billing;
pub mod client;
pub mod clock;
pub mod money;
pub mod ports;
pub mod rental;
pub mod vehicle;
