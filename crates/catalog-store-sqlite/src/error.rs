//! Error type for `catalog-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored identifier did not decode; the row was not written by us.
  #[error("corrupt identifier in store: {0:?}")]
  CorruptId(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Backend failures reach callers as the core's store error.
impl From<Error> for catalog_core::Error {
  fn from(err: Error) -> Self { catalog_core::Error::store(err) }
}
