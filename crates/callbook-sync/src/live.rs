//! Live queries over a [`ContactStore`].

use std::sync::Arc;

use callbook_core::{
  contact::Contact,
  store::{ContactFilter, ContactStore},
};
use tokio::sync::watch;

use crate::{Error, Result};

/// A filtered, ordered view of the store that re-emits after every write.
///
/// The first [`next`](Self::next) returns the current rows immediately; each
/// later call waits for the store's change revision to move and then
/// re-runs the query. Dropping a pending `next` is safe: a change that was
/// already observed is not lost, the query simply runs on the next call.
pub struct LiveContacts<S> {
  store:   Arc<S>,
  filter:  ContactFilter,
  changes: watch::Receiver<u64>,
  stale:   bool,
}

impl<S: ContactStore> LiveContacts<S> {
  pub(crate) fn new(store: Arc<S>, filter: ContactFilter) -> Self {
    let changes = store.changes();
    Self { store, filter, changes, stale: true }
  }

  /// Run the query once without touching the change cursor.
  pub async fn current(&self) -> Result<Vec<Contact>> {
    self.store.list(&self.filter).await.map_err(Error::store)
  }

  /// The next emission, or `None` once the store can no longer report
  /// changes.
  pub async fn next(&mut self) -> Option<Result<Vec<Contact>>> {
    if !self.stale {
      self.changes.changed().await.ok()?;
      self.stale = true;
    }
    // Writes landing while the query runs will show up as a new change.
    drop(self.changes.borrow_and_update());
    let rows = self.current().await;
    self.stale = false;
    Some(rows)
  }
}
