use crate::domain::billing::Tariff;
use crate::domain::client::{Client, ClientId, NewClient};
use crate::domain::money::{Distance, Money, Rate};
use crate::domain::ports::{BillingSnapshot, ClientStore, RentalStore, SchemaManager, VehicleStore};
use crate::domain::rental::{
    NewRental, Rental, RentalClosure, RentalId, format_timestamp, parse_timestamp,
};
use crate::domain::vehicle::{NewVehicle, Vehicle, VehicleId};
use crate::error::{RentalError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Table definitions, applied in order. Each is a no-op when the table exists.
const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS Vehicles (
        ID INTEGER PRIMARY KEY AUTOINCREMENT,
        Model TEXT NOT NULL,
        HourlyRate REAL NOT NULL,
        PerKmRate REAL NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Clients (
        ID INTEGER PRIMARY KEY AUTOINCREMENT,
        Name TEXT NOT NULL,
        Email TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Rentals (
        ID INTEGER PRIMARY KEY AUTOINCREMENT,
        ClientID INTEGER NOT NULL,
        VehicleID INTEGER NOT NULL,
        StartTime TEXT NOT NULL,
        EndTime TEXT,
        KilometersDriven REAL,
        TotalAmount REAL,
        FOREIGN KEY(ClientID) REFERENCES Clients(ID),
        FOREIGN KEY(VehicleID) REFERENCES Vehicles(ID)
    )
    "#,
];

const RENTAL_COLUMNS: &str = "Rentals.ID AS ID, Rentals.ClientID AS ClientID, \
     Rentals.VehicleID AS VehicleID, Rentals.StartTime AS StartTime, \
     Rentals.EndTime AS EndTime, Rentals.KilometersDriven AS KilometersDriven, \
     Rentals.TotalAmount AS TotalAmount";

/// A relational store backed by SQLite.
///
/// Every operation borrows a connection from the pool for its own duration, so
/// nothing is held between calls. Foreign keys are enforced on each connection.
/// `Clone` shares the underlying pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the database file at `path`, creating it (and its parent
    /// directory) if missing. Does not create tables; see [`SchemaManager`].
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!(path = %path.display(), "opened SQLite store");
        Ok(Self { pool })
    }

    /// Opens a private in-memory database. The pool is pinned to a single
    /// connection that never expires, since each SQLite memory connection is
    /// its own database.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// The underlying pool, for inspection and ad hoc queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SchemaManager for SqliteStore {
    async fn initialize(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for ddl in SCHEMA {
            sqlx::query(ddl).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        debug!("schema initialized");
        Ok(())
    }
}

#[async_trait]
impl VehicleStore for SqliteStore {
    async fn insert(&self, vehicle: NewVehicle) -> Result<VehicleId> {
        let result = sqlx::query(
            "INSERT INTO Vehicles (Model, HourlyRate, PerKmRate) VALUES (?, ?, ?)",
        )
        .bind(vehicle.model())
        .bind(to_real(vehicle.hourly_rate().value())?)
        .bind(to_real(vehicle.per_km_rate().value())?)
        .execute(&self.pool)
        .await?;

        Ok(VehicleId(result.last_insert_rowid()))
    }

    async fn get(&self, id: VehicleId) -> Result<Option<Vehicle>> {
        let row = sqlx::query("SELECT ID, Model, HourlyRate, PerKmRate FROM Vehicles WHERE ID = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_vehicle).transpose()
    }

    async fn exists(&self, id: VehicleId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Vehicles WHERE ID = ?")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn all(&self) -> Result<Vec<Vehicle>> {
        let rows = sqlx::query("SELECT ID, Model, HourlyRate, PerKmRate FROM Vehicles ORDER BY ID")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_vehicle).collect()
    }
}

#[async_trait]
impl ClientStore for SqliteStore {
    async fn insert(&self, client: NewClient) -> Result<ClientId> {
        let result = sqlx::query("INSERT INTO Clients (Name, Email) VALUES (?, ?)")
            .bind(client.name())
            .bind(client.email())
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    RentalError::DuplicateEmail(client.email().to_string())
                }
                other => RentalError::from(other),
            })?;

        Ok(ClientId(result.last_insert_rowid()))
    }

    async fn get(&self, id: ClientId) -> Result<Option<Client>> {
        let row = sqlx::query("SELECT ID, Name, Email FROM Clients WHERE ID = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_client).transpose()
    }

    async fn exists(&self, id: ClientId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Clients WHERE ID = ?")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn all(&self) -> Result<Vec<Client>> {
        let rows = sqlx::query("SELECT ID, Name, Email FROM Clients ORDER BY ID")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_client).collect()
    }
}

#[async_trait]
impl RentalStore for SqliteStore {
    async fn insert(&self, rental: NewRental) -> Result<RentalId> {
        // Reference checks and the insert share one transaction.
        let mut tx = self.pool.begin().await?;

        let client: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Clients WHERE ID = ?")
            .bind(rental.client_id.0)
            .fetch_one(&mut *tx)
            .await?;
        if client == 0 {
            return Err(RentalError::ClientNotFound(rental.client_id));
        }

        let vehicle: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Vehicles WHERE ID = ?")
            .bind(rental.vehicle_id.0)
            .fetch_one(&mut *tx)
            .await?;
        if vehicle == 0 {
            return Err(RentalError::VehicleNotFound(rental.vehicle_id));
        }

        let result = sqlx::query(
            "INSERT INTO Rentals (ClientID, VehicleID, StartTime) VALUES (?, ?, ?)",
        )
        .bind(rental.client_id.0)
        .bind(rental.vehicle_id.0)
        .bind(format_timestamp(rental.started_at))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(RentalId(result.last_insert_rowid()))
    }

    async fn get(&self, id: RentalId) -> Result<Option<Rental>> {
        let row = sqlx::query(&format!(
            "SELECT {RENTAL_COLUMNS} FROM Rentals WHERE Rentals.ID = ?"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_rental).transpose()
    }

    async fn billing_snapshot(&self, id: RentalId) -> Result<Option<BillingSnapshot>> {
        let row = sqlx::query(&format!(
            "SELECT {RENTAL_COLUMNS}, Vehicles.HourlyRate AS HourlyRate, \
             Vehicles.PerKmRate AS PerKmRate \
             FROM Rentals JOIN Vehicles ON Rentals.VehicleID = Vehicles.ID \
             WHERE Rentals.ID = ?"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(BillingSnapshot {
            rental: row_to_rental(&row)?,
            tariff: Tariff::new(
                rate_column(&row, "HourlyRate")?,
                rate_column(&row, "PerKmRate")?,
            ),
        }))
    }

    async fn close(&self, id: RentalId, closure: RentalClosure) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE Rentals SET EndTime = ?, KilometersDriven = ?, TotalAmount = ? \
             WHERE ID = ? AND EndTime IS NULL",
        )
        .bind(format_timestamp(closure.ended_at))
        .bind(to_real(closure.distance.km())?)
        .bind(to_real(closure.total_amount.value())?)
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn all(&self) -> Result<Vec<Rental>> {
        let rows = sqlx::query(&format!(
            "SELECT {RENTAL_COLUMNS} FROM Rentals ORDER BY Rentals.ID"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_rental).collect()
    }
}

fn to_real(value: Decimal) -> Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| RentalError::validation(format!("{value} does not fit a REAL column")))
}

fn from_real(raw: f64, column: &str) -> Result<Decimal> {
    Decimal::from_f64(raw)
        .ok_or_else(|| RentalError::CorruptRecord(format!("{column} holds non-finite {raw}")))
}

fn rate_column(row: &SqliteRow, column: &str) -> Result<Rate> {
    let value = from_real(row.try_get(column)?, column)?;
    Rate::new(value).map_err(|e| RentalError::CorruptRecord(format!("{column}: {e}")))
}

fn row_to_vehicle(row: &SqliteRow) -> Result<Vehicle> {
    Ok(Vehicle {
        id: VehicleId(row.try_get("ID")?),
        model: row.try_get("Model")?,
        hourly_rate: rate_column(row, "HourlyRate")?,
        per_km_rate: rate_column(row, "PerKmRate")?,
    })
}

fn row_to_client(row: &SqliteRow) -> Result<Client> {
    Ok(Client {
        id: ClientId(row.try_get("ID")?),
        name: row.try_get("Name")?,
        email: row.try_get("Email")?,
    })
}

fn row_to_rental(row: &SqliteRow) -> Result<Rental> {
    let started_at: String = row.try_get("StartTime")?;
    let ended_at: Option<String> = row.try_get("EndTime")?;
    let distance: Option<f64> = row.try_get("KilometersDriven")?;
    let total: Option<f64> = row.try_get("TotalAmount")?;

    Ok(Rental {
        id: RentalId(row.try_get("ID")?),
        client_id: ClientId(row.try_get("ClientID")?),
        vehicle_id: VehicleId(row.try_get("VehicleID")?),
        started_at: parse_timestamp(&started_at)?,
        ended_at: ended_at.as_deref().map(parse_timestamp).transpose()?,
        distance: distance
            .map(|km| {
                Distance::new(from_real(km, "KilometersDriven")?)
                    .map_err(|e| RentalError::CorruptRecord(format!("KilometersDriven: {e}")))
            })
            .transpose()?,
        total_amount: total
            .map(|amount| from_real(amount, "TotalAmount").map(Money::new))
            .transpose()?,
    })
}
