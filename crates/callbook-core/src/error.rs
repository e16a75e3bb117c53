//! Error types for `callbook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} must not be blank")]
  BlankField(&'static str),

  #[error("contact not found: {0}")]
  ContactNotFound(i64),

  #[error("operation {index} references {target}, which is not an earlier raw contact insert")]
  InvalidBackReference { index: usize, target: usize },

  #[error("batch contains no operations")]
  EmptyBatch,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
