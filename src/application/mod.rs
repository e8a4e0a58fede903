//! Application layer: the services the driver calls.
//!
//! Each service owns boxed handles to the storage ports it needs and holds no
//! other state, so every call goes straight through to the store.

pub mod clients;
pub mod fleet;
pub mod rental;

use crate::domain::clock::ClockBox;
use crate::domain::ports::{ClientStore, RentalStore, SchemaManager, SchemaManagerBox, VehicleStore};
use clients::ClientDirectory;
use fleet::Fleet;
use rental::RentalEngine;

/// Every service wired to one store.
pub struct Services {
    pub schema: SchemaManagerBox,
    pub fleet: Fleet,
    pub clients: ClientDirectory,
    pub rentals: RentalEngine,
}

impl Services {
    /// Hands clones of `store` to each service. Clones must share state.
    pub fn from_store<S>(store: S, clock: ClockBox) -> Self
    where
        S: SchemaManager + VehicleStore + ClientStore + RentalStore + Clone + 'static,
    {
        Self {
            schema: Box::new(store.clone()),
            fleet: Fleet::new(Box::new(store.clone())),
            clients: ClientDirectory::new(Box::new(store.clone())),
            rentals: RentalEngine::new(
                Box::new(store.clone()),
                Box::new(store.clone()),
                Box::new(store),
            )
            .with_clock(clock),
        }
    }
}
