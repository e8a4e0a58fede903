use crate::domain::client::{Client, ClientId, NewClient};
use crate::domain::ports::ClientStoreBox;
use crate::error::{RentalError, Result};
use tracing::info;

/// Registers the clients that rentals refer to.
pub struct ClientDirectory {
    clients: ClientStoreBox,
}

impl ClientDirectory {
    pub fn new(clients: ClientStoreBox) -> Self {
        Self { clients }
    }

    /// Fails with [`RentalError::DuplicateEmail`] if the email is taken.
    pub async fn register_client(&self, name: &str, email: &str) -> Result<ClientId> {
        let client = NewClient::new(name, email)?;
        let id = self.clients.insert(client).await?;
        info!(client = %id, "client registered");
        Ok(id)
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        self.clients.all().await
    }

    pub async fn client(&self, id: ClientId) -> Result<Client> {
        self.clients
            .get(id)
            .await?
            .ok_or(RentalError::ClientNotFound(id))
    }
}
