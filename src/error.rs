use crate::domain::client::ClientId;
use crate::domain::rental::RentalId;
use crate::domain::vehicle::VehicleId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RentalError>;

/// Coarse classification of a [`RentalError`], for callers that only care
/// about the category of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ValidationFailed,
    Conflict,
    StoreUnavailable,
    Input,
}

#[derive(Error, Debug)]
pub enum RentalError {
    #[error("client {0} not found")]
    ClientNotFound(ClientId),
    #[error("vehicle {0} not found")]
    VehicleNotFound(VehicleId),
    #[error("rental {0} not found")]
    RentalNotFound(RentalId),
    #[error("rental {0} is already closed")]
    RentalAlreadyClosed(RentalId),
    #[error("a client with email {0} already exists")]
    DuplicateEmail(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RentalError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn store(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::StoreUnavailable(err.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClientNotFound(_) | Self::VehicleNotFound(_) | Self::RentalNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Validation(_) => ErrorKind::ValidationFailed,
            Self::RentalAlreadyClosed(_) | Self::DuplicateEmail(_) => ErrorKind::Conflict,
            Self::StoreUnavailable(_) | Self::CorruptRecord(_) => ErrorKind::StoreUnavailable,
            Self::Csv(_) | Self::Io(_) => ErrorKind::Input,
        }
    }
}

#[cfg(feature = "storage-sqlite")]
impl From<sqlx::Error> for RentalError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreUnavailable(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            RentalError::ClientNotFound(ClientId(1)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            RentalError::RentalAlreadyClosed(RentalId(3)).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            RentalError::validation("negative rate").kind(),
            ErrorKind::ValidationFailed
        );
        assert_eq!(
            RentalError::store("connection refused").kind(),
            ErrorKind::StoreUnavailable
        );
    }

    #[test]
    fn test_messages_name_the_missing_entity() {
        assert_eq!(
            RentalError::ClientNotFound(ClientId(7)).to_string(),
            "client 7 not found"
        );
        assert_eq!(
            RentalError::VehicleNotFound(VehicleId(9)).to_string(),
            "vehicle 9 not found"
        );
    }
}
