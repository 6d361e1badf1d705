//! Error type for `alarmdb-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A primary-key or other constraint rejected an insert.
  #[error("constraint violation in table {table}: {message}")]
  Constraint { table: String, message: String },

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),
}

impl Error {
  /// Classify a failed insert into `table`.
  pub(crate) fn from_insert(table: &str, err: rusqlite::Error) -> Self {
    if err.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
      Error::Constraint {
        table:   table.to_owned(),
        message: err.to_string(),
      }
    } else {
      Error::Database(err)
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
