use crate::domain::billing::Tariff;
use crate::domain::client::{Client, ClientId, NewClient};
use crate::domain::ports::{BillingSnapshot, ClientStore, RentalStore, SchemaManager, VehicleStore};
use crate::domain::rental::{NewRental, Rental, RentalClosure, RentalId};
use crate::domain::vehicle::{NewVehicle, Vehicle, VehicleId};
use crate::error::{RentalError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    initialized: bool,
    vehicles: BTreeMap<VehicleId, Vehicle>,
    clients: BTreeMap<ClientId, Client>,
    rentals: BTreeMap<RentalId, Rental>,
    last_vehicle_id: i64,
    last_client_id: i64,
    last_rental_id: i64,
}

impl Tables {
    fn ready(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(RentalError::store("schema has not been initialized"))
        }
    }
}

/// A thread-safe in-memory store holding all three relations.
///
/// Clones share the same tables, so one instance can be handed to every port.
/// Identities are assigned from per-relation counters and never reused, like
/// `AUTOINCREMENT` columns. Referential integrity is checked on rental insert.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates a new, empty store. [`SchemaManager::initialize`] must run before use.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SchemaManager for InMemoryStore {
    async fn initialize(&self) -> Result<()> {
        self.tables.write().await.initialized = true;
        Ok(())
    }
}

#[async_trait]
impl VehicleStore for InMemoryStore {
    async fn insert(&self, vehicle: NewVehicle) -> Result<VehicleId> {
        let mut tables = self.tables.write().await;
        tables.ready()?;
        tables.last_vehicle_id += 1;
        let id = VehicleId(tables.last_vehicle_id);
        tables.vehicles.insert(id, vehicle.with_id(id));
        Ok(id)
    }

    async fn get(&self, id: VehicleId) -> Result<Option<Vehicle>> {
        let tables = self.tables.read().await;
        tables.ready()?;
        Ok(tables.vehicles.get(&id).cloned())
    }

    async fn exists(&self, id: VehicleId) -> Result<bool> {
        let tables = self.tables.read().await;
        tables.ready()?;
        Ok(tables.vehicles.contains_key(&id))
    }

    async fn all(&self) -> Result<Vec<Vehicle>> {
        let tables = self.tables.read().await;
        tables.ready()?;
        Ok(tables.vehicles.values().cloned().collect())
    }
}

#[async_trait]
impl ClientStore for InMemoryStore {
    async fn insert(&self, client: NewClient) -> Result<ClientId> {
        let mut tables = self.tables.write().await;
        tables.ready()?;
        if tables.clients.values().any(|c| c.email == client.email()) {
            return Err(RentalError::DuplicateEmail(client.email().to_string()));
        }
        tables.last_client_id += 1;
        let id = ClientId(tables.last_client_id);
        tables.clients.insert(id, client.with_id(id));
        Ok(id)
    }

    async fn get(&self, id: ClientId) -> Result<Option<Client>> {
        let tables = self.tables.read().await;
        tables.ready()?;
        Ok(tables.clients.get(&id).cloned())
    }

    async fn exists(&self, id: ClientId) -> Result<bool> {
        let tables = self.tables.read().await;
        tables.ready()?;
        Ok(tables.clients.contains_key(&id))
    }

    async fn all(&self) -> Result<Vec<Client>> {
        let tables = self.tables.read().await;
        tables.ready()?;
        Ok(tables.clients.values().cloned().collect())
    }
}

#[async_trait]
impl RentalStore for InMemoryStore {
    async fn insert(&self, rental: NewRental) -> Result<RentalId> {
        let mut tables = self.tables.write().await;
        tables.ready()?;
        if !tables.clients.contains_key(&rental.client_id) {
            return Err(RentalError::ClientNotFound(rental.client_id));
        }
        if !tables.vehicles.contains_key(&rental.vehicle_id) {
            return Err(RentalError::VehicleNotFound(rental.vehicle_id));
        }
        tables.last_rental_id += 1;
        let id = RentalId(tables.last_rental_id);
        tables.rentals.insert(id, rental.with_id(id));
        Ok(id)
    }

    async fn get(&self, id: RentalId) -> Result<Option<Rental>> {
        let tables = self.tables.read().await;
        tables.ready()?;
        Ok(tables.rentals.get(&id).cloned())
    }

    async fn billing_snapshot(&self, id: RentalId) -> Result<Option<BillingSnapshot>> {
        let tables = self.tables.read().await;
        tables.ready()?;
        let Some(rental) = tables.rentals.get(&id) else {
            return Ok(None);
        };
        // Inner-join semantics: a rental whose vehicle vanished has no snapshot.
        Ok(tables
            .vehicles
            .get(&rental.vehicle_id)
            .map(|vehicle| BillingSnapshot {
                rental: rental.clone(),
                tariff: Tariff::new(vehicle.hourly_rate, vehicle.per_km_rate),
            }))
    }

    async fn close(&self, id: RentalId, closure: RentalClosure) -> Result<bool> {
        let mut tables = self.tables.write().await;
        tables.ready()?;
        match tables.rentals.get_mut(&id) {
            Some(rental) if rental.is_open() => {
                rental.ended_at = Some(closure.ended_at);
                rental.distance = Some(closure.distance);
                rental.total_amount = Some(closure.total_amount);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn all(&self) -> Result<Vec<Rental>> {
        let tables = self.tables.read().await;
        tables.ready()?;
        Ok(tables.rentals.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::{Distance, Money};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    async fn initialized() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.initialize().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_operations_require_initialize() {
        let store = InMemoryStore::new();
        let err = VehicleStore::all(&store).await.unwrap_err();
        assert!(matches!(err, RentalError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let store = initialized().await;
        let vehicle = NewVehicle::new("Model 3", dec!(50), dec!(0.8)).unwrap();
        VehicleStore::insert(&store, vehicle).await.unwrap();

        store.initialize().await.unwrap();
        assert_eq!(VehicleStore::all(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_vehicle_ids_are_sequential() {
        let store = initialized().await;
        let a = VehicleStore::insert(&store, NewVehicle::new("A", dec!(1), dec!(1)).unwrap())
            .await
            .unwrap();
        let b = VehicleStore::insert(&store, NewVehicle::new("B", dec!(2), dec!(2)).unwrap())
            .await
            .unwrap();
        assert_eq!((a, b), (VehicleId(1), VehicleId(2)));

        let all = VehicleStore::all(&store).await.unwrap();
        assert_eq!(all[0].model, "A");
        assert_eq!(all[1].model, "B");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = initialized().await;
        ClientStore::insert(&store, NewClient::new("Ada", "ada@example.com").unwrap())
            .await
            .unwrap();
        let err = ClientStore::insert(&store, NewClient::new("Ada 2", "ada@example.com").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RentalError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_rental_insert_enforces_references() {
        let store = initialized().await;
        let err = RentalStore::insert(
            &store,
            NewRental {
                client_id: ClientId(1),
                vehicle_id: VehicleId(1),
                started_at: Utc::now(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RentalError::ClientNotFound(ClientId(1))));
    }

    #[tokio::test]
    async fn test_close_only_matches_open_rentals() {
        let store = initialized().await;
        let client = ClientStore::insert(&store, NewClient::new("Ada", "ada@example.com").unwrap())
            .await
            .unwrap();
        let vehicle =
            VehicleStore::insert(&store, NewVehicle::new("Model Y", dec!(60), dec!(1)).unwrap())
                .await
                .unwrap();
        let id = RentalStore::insert(
            &store,
            NewRental {
                client_id: client,
                vehicle_id: vehicle,
                started_at: Utc::now(),
            },
        )
        .await
        .unwrap();

        let closure = RentalClosure {
            ended_at: Utc::now(),
            distance: Distance::new(dec!(10)).unwrap(),
            total_amount: Money::new(dec!(10)),
        };
        assert!(store.close(id, closure).await.unwrap());
        assert!(!store.close(id, closure).await.unwrap());
        assert!(!store.close(RentalId(99), closure).await.unwrap());

        let snapshot = store.billing_snapshot(id).await.unwrap().unwrap();
        assert_eq!(snapshot.rental.total_amount, Some(Money::new(dec!(10))));
        assert_eq!(snapshot.tariff.hourly_rate.value(), dec!(60));
    }
}
