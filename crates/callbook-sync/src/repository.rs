//! [`ContactRepository`]: the one entry point to the app's contact list.
//!
//! The UI and the reconciler both read through here, so there is a single
//! owner of the store and a single notion of "all contacts".

use std::sync::Arc;

use callbook_core::{
  contact::Contact,
  store::{ContactFilter, ContactStore},
};

use crate::{Error, Result, live::LiveContacts};

pub struct ContactRepository<S> {
  store: Arc<S>,
}

impl<S> Clone for ContactRepository<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: ContactStore> ContactRepository<S> {
  pub fn new(store: S) -> Self { Self::from_arc(Arc::new(store)) }

  pub fn from_arc(store: Arc<S>) -> Self { Self { store } }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Every contact, ordered by name.
  pub fn all_contacts(&self) -> LiveContacts<S> {
    LiveContacts::new(Arc::clone(&self.store), ContactFilter::All)
  }

  /// Contacts whose name or phone contains `query`, ignoring case.
  ///
  /// A blank query is the [`all_contacts`](Self::all_contacts) query, not a
  /// match against the empty string.
  pub fn search(&self, query: &str) -> LiveContacts<S> {
    LiveContacts::new(Arc::clone(&self.store), ContactFilter::from_query(query))
  }

  /// One read of [`all_contacts`](Self::all_contacts).
  pub async fn snapshot(&self) -> Result<Vec<Contact>> {
    self.all_contacts().current().await
  }

  // ── Writes ────────────────────────────────────────────────────────────────
  //
  // Callers observe the effect through live queries; the written row is not
  // handed back.

  pub async fn insert(&self, contact: Contact) -> Result<()> {
    let stored = self.store.insert(contact).await.map_err(Error::store)?;
    tracing::debug!(id = stored.id, name = %stored.name, "contact inserted");
    Ok(())
  }

  pub async fn update(&self, contact: Contact) -> Result<()> {
    let id = contact.id;
    self.store.update(contact).await.map_err(Error::store)?;
    tracing::debug!(id, "contact updated");
    Ok(())
  }

  /// Delete locally. The address book is never touched.
  pub async fn delete(&self, contact: &Contact) -> Result<()> {
    self.store.delete(contact.id).await.map_err(Error::store)?;
    tracing::debug!(id = contact.id, "contact deleted");
    Ok(())
  }

  pub async fn delete_all(&self) -> Result<u64> {
    let removed = self.store.delete_all().await.map_err(Error::store)?;
    tracing::debug!(removed, "all contacts deleted");
    Ok(removed)
  }

  // ── Form entry ────────────────────────────────────────────────────────────

  /// Add a contact from user input; fields are trimmed and must not be blank.
  pub async fn add_contact(&self, name: &str, phone: &str) -> Result<()> {
    self.insert(Contact::from_form(name, phone)?).await
  }

  /// Apply user input to `contact`; same validation as
  /// [`add_contact`](Self::add_contact).
  pub async fn edit_contact(&self, contact: &Contact, name: &str, phone: &str) -> Result<()> {
    self.update(contact.edited(name, phone)?).await
  }
}
