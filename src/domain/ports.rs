use super::billing::Tariff;
use super::client::{Client, ClientId, NewClient};
use super::rental::{NewRental, Rental, RentalClosure, RentalId};
use super::vehicle::{NewVehicle, Vehicle, VehicleId};
use crate::error::Result;
use async_trait::async_trait;

/// Creates the relations every other store operation depends on.
#[async_trait]
pub trait SchemaManager: Send + Sync {
    /// Safe to call on every start, whatever state the store is in.
    async fn initialize(&self) -> Result<()>;
}

#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn insert(&self, vehicle: NewVehicle) -> Result<VehicleId>;
    async fn get(&self, id: VehicleId) -> Result<Option<Vehicle>>;
    async fn exists(&self, id: VehicleId) -> Result<bool>;
    /// All vehicles, ordered by id.
    async fn all(&self) -> Result<Vec<Vehicle>>;
}

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn insert(&self, client: NewClient) -> Result<ClientId>;
    async fn get(&self, id: ClientId) -> Result<Option<Client>>;
    async fn exists(&self, id: ClientId) -> Result<bool>;
    /// All clients, ordered by id.
    async fn all(&self) -> Result<Vec<Client>>;
}

/// A rental joined with the tariff of its vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingSnapshot {
    pub rental: Rental,
    pub tariff: Tariff,
}

#[async_trait]
pub trait RentalStore: Send + Sync {
    async fn insert(&self, rental: NewRental) -> Result<RentalId>;
    async fn get(&self, id: RentalId) -> Result<Option<Rental>>;
    async fn billing_snapshot(&self, id: RentalId) -> Result<Option<BillingSnapshot>>;
    /// Writes the closing fields if, and only if, the rental is still open.
    /// Returns `false` when no open rental with this id was found.
    async fn close(&self, id: RentalId, closure: RentalClosure) -> Result<bool>;
    async fn all(&self) -> Result<Vec<Rental>>;
}

pub type SchemaManagerBox = Box<dyn SchemaManager>;
pub type VehicleStoreBox = Box<dyn VehicleStore>;
pub type ClientStoreBox = Box<dyn ClientStore>;
pub type RentalStoreBox = Box<dyn RentalStore>;
