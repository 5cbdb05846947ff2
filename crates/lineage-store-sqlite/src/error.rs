//! Error type for `lineage-store-sqlite`.

use lineage_core::{model::PersonId, store::StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] lineage_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// An edge was created against a person id that does not exist.
  #[error("person not found: {0}")]
  PersonNotFound(PersonId),
}

impl StoreError for Error {
  fn missing_person(&self) -> Option<PersonId> {
    match self {
      Error::PersonNotFound(id) => Some(*id),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
