//! Error type for `callbook-sync`.

use thiserror::Error;

use crate::reconcile::Direction;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("an {0} pass is already running")]
  AlreadyRunning(Direction),

  #[error("reading the address book failed: {0}")]
  ProviderRead(#[source] BoxError),

  #[error("contact store error: {0}")]
  Store(#[source] BoxError),

  #[error(transparent)]
  Core(#[from] callbook_core::Error),
}

impl Error {
  pub(crate) fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  pub(crate) fn provider_read<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::ProviderRead(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
