pub mod artist;
pub mod genre;
pub mod schedule;
pub mod search;
pub mod show;
pub mod venue;

use sea_orm::TransactionError;
use thiserror::Error;

/// Failure taxonomy for the listing services. Persistence faults are carried
/// in `Db`; the remaining variants are user-visible outcomes with their own
/// notices.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Venue does not exist")]
    VenueNotFound(i64),
    #[error("Artist does not exist")]
    ArtistNotFound(i64),
    #[error("No artist with ID {0}")]
    NoSuchArtist(i64),
    #[error("No venue with ID {0}")]
    NoSuchVenue(i64),
    #[error("Enter a search keyword")]
    EmptySearchTerm,
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl From<TransactionError<ServiceError>> for ServiceError {
    fn from(err: TransactionError<ServiceError>) -> Self {
        match err {
            TransactionError::Connection(e) => ServiceError::Db(e),
            TransactionError::Transaction(e) => e,
        }
    }
}
