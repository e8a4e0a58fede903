use crate::domain::billing::elapsed_hours;
use crate::domain::client::ClientId;
use crate::domain::clock::{ClockBox, SystemClock};
use crate::domain::money::{Distance, Money};
use crate::domain::ports::{ClientStoreBox, RentalStoreBox, VehicleStoreBox};
use crate::domain::rental::{NewRental, Rental, RentalClosure, RentalId};
use crate::domain::vehicle::VehicleId;
use crate::error::{RentalError, Result};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Drives rentals through `open -> closed` and bills them on close.
///
/// The engine keeps no state of its own: every call reads and writes through
/// the injected stores, and the clock decides start and end instants.
pub struct RentalEngine {
    clients: ClientStoreBox,
    vehicles: VehicleStoreBox,
    rentals: RentalStoreBox,
    clock: ClockBox,
}

impl RentalEngine {
    /// Creates an engine using the system clock.
    ///
    /// # Arguments
    ///
    /// * `clients` - Used to check the renting client exists.
    /// * `vehicles` - Used to check the rented vehicle exists.
    /// * `rentals` - Where rentals are created and closed.
    pub fn new(
        clients: ClientStoreBox,
        vehicles: VehicleStoreBox,
        rentals: RentalStoreBox,
    ) -> Self {
        Self {
            clients,
            vehicles,
            rentals,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: ClockBox) -> Self {
        self.clock = clock;
        self
    }

    /// Opens a rental starting now.
    ///
    /// The client is checked before the vehicle, so a call where both are
    /// missing reports [`RentalError::ClientNotFound`]. Nothing limits how many
    /// rentals a client or vehicle may have open at once.
    pub async fn start_rental(&self, client_id: ClientId, vehicle_id: VehicleId) -> Result<RentalId> {
        if !self.clients.exists(client_id).await? {
            return Err(RentalError::ClientNotFound(client_id));
        }
        if !self.vehicles.exists(vehicle_id).await? {
            return Err(RentalError::VehicleNotFound(vehicle_id));
        }

        let started_at = self.clock.now();
        let id = self
            .rentals
            .insert(NewRental {
                client_id,
                vehicle_id,
                started_at,
            })
            .await?;

        info!(rental = %id, client = %client_id, vehicle = %vehicle_id, %started_at, "rental started");
        Ok(id)
    }

    /// Closes an open rental and returns the amount billed, unrounded.
    ///
    /// A rental can only be closed once; ending it again fails with
    /// [`RentalError::RentalAlreadyClosed`] and leaves the stored bill intact.
    pub async fn end_rental(&self, rental_id: RentalId, distance_km: Decimal) -> Result<Money> {
        let distance = Distance::new(distance_km)?;

        let snapshot = self
            .rentals
            .billing_snapshot(rental_id)
            .await?
            .ok_or(RentalError::RentalNotFound(rental_id))?;
        if !snapshot.rental.is_open() {
            return Err(RentalError::RentalAlreadyClosed(rental_id));
        }

        let ended_at = self.clock.now();
        let hours = elapsed_hours(snapshot.rental.started_at, ended_at);
        if hours.is_sign_negative() && !hours.is_zero() {
            warn!(
                rental = %rental_id,
                started_at = %snapshot.rental.started_at,
                %ended_at,
                "rental ends before it started; clock skew?"
            );
        }
        let total_amount = snapshot.tariff.charge(hours, distance)?;

        let closed = self
            .rentals
            .close(
                rental_id,
                RentalClosure {
                    ended_at,
                    distance,
                    total_amount,
                },
            )
            .await?;
        if !closed {
            // Someone else closed it between our read and our write.
            return Err(RentalError::RentalAlreadyClosed(rental_id));
        }

        info!(rental = %rental_id, %hours, km = %distance_km, total = %total_amount, "rental ended");
        Ok(total_amount)
    }

    pub async fn rental(&self, rental_id: RentalId) -> Result<Rental> {
        self.rentals
            .get(rental_id)
            .await?
            .ok_or(RentalError::RentalNotFound(rental_id))
    }

    /// All rentals, open and closed, in id order.
    pub async fn rentals(&self) -> Result<Vec<Rental>> {
        self.rentals.all().await
    }
}
