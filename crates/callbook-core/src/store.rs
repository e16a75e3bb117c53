//! The `ContactStore` trait: the app's own contact list.
//!
//! Implemented by storage backends (e.g. `callbook-store-sqlite`). The
//! repository in `callbook-sync` builds live queries on top of
//! [`ContactStore::changes`].

use std::future::Future;

use tokio::sync::watch;

use crate::contact::Contact;

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Which contacts a [`ContactStore::list`] call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactFilter {
  All,
  /// Case-insensitive substring match against name or phone.
  Text(String),
}

impl ContactFilter {
  /// Map a user search string to a filter. Blank input (empty or only
  /// whitespace) selects [`ContactFilter::All`] rather than a text match.
  pub fn from_query(query: &str) -> Self {
    if query.trim().is_empty() {
      Self::All
    } else {
      Self::Text(query.to_owned())
    }
  }

  /// Whether `contact` passes this filter. Backends that cannot push the
  /// filter down to their query engine use this directly.
  pub fn matches(&self, contact: &Contact) -> bool {
    match self {
      Self::All => true,
      Self::Text(text) => {
        let needle = text.to_lowercase();
        contact.name.to_lowercase().contains(&needle)
          || contact.phone.to_lowercase().contains(&needle)
      }
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the app-owned contact store.
///
/// Every write is independently atomic; there are no multi-record
/// transactions. After each committed write the store bumps the revision
/// published by [`ContactStore::changes`], which is how live queries learn
/// they are stale.
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Contacts passing `filter`, ordered by name ascending (ties by id).
  fn list<'a>(
    &'a self,
    filter: &'a ContactFilter,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;

  /// Persist `contact` and return it with its assigned id.
  ///
  /// An id of [`UNASSIGNED_ID`](crate::contact::UNASSIGNED_ID) lets the store
  /// choose one; any other id replaces the row holding it, if there is one.
  fn insert(
    &self,
    contact: Contact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Overwrite name and phone of the contact with `contact.id`.
  fn update(
    &self,
    contact: Contact,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the contact with `id`.
  fn delete(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove every contact; returns how many were removed.
  fn delete_all(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// A receiver whose value changes after every committed write.
  fn changes(&self) -> watch::Receiver<u64>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_query_selects_all() {
    assert_eq!(ContactFilter::from_query(""), ContactFilter::All);
    assert_eq!(ContactFilter::from_query("  \t"), ContactFilter::All);
    assert_eq!(
      ContactFilter::from_query("lin"),
      ContactFilter::Text("lin".into())
    );
  }

  #[test]
  fn text_filter_ignores_case_and_checks_phone() {
    let linh = Contact::new("Linh", "0901234567");
    assert!(ContactFilter::Text("lin".into()).matches(&linh));
    assert!(ContactFilter::Text("LIN".into()).matches(&linh));
    assert!(ContactFilter::Text("1234".into()).matches(&linh));
    assert!(!ContactFilter::Text("huy".into()).matches(&linh));
  }
}
