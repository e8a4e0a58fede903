use fleetrent::domain::client::NewClient;
use fleetrent::domain::ports::{ClientStoreBox, SchemaManager, VehicleStoreBox};
use fleetrent::domain::vehicle::NewVehicle;
use fleetrent::infrastructure::in_memory::InMemoryStore;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_stores_as_trait_objects() {
    let store = InMemoryStore::new();
    store.initialize().await.unwrap();

    let vehicle_store: VehicleStoreBox = Box::new(store.clone());
    let client_store: ClientStoreBox = Box::new(store.clone());

    // Verify Send + Sync by spawning tasks
    let vs_handle = tokio::spawn(async move {
        let id = vehicle_store
            .insert(NewVehicle::new("Model 3", dec!(50), dec!(0.8)).unwrap())
            .await
            .unwrap();
        vehicle_store.get(id).await.unwrap().unwrap()
    });

    let cs_handle = tokio::spawn(async move {
        let id = client_store
            .insert(NewClient::new("Ada", "ada@example.com").unwrap())
            .await
            .unwrap();
        client_store.get(id).await.unwrap().unwrap()
    });

    let vehicle = vs_handle.await.unwrap();
    assert_eq!(vehicle.model, "Model 3");

    let client = cs_handle.await.unwrap();
    assert_eq!(client.email, "ada@example.com");

    // Both handles wrote into the same shared tables.
    assert!(fleetrent::domain::ports::VehicleStore::exists(&store, vehicle.id).await.unwrap());
    assert!(fleetrent::domain::ports::ClientStore::exists(&store, client.id).await.unwrap());
}
