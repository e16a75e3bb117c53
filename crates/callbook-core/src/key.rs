//! Dedup keys: the only notion of identity shared by both stores.
//!
//! Neither store knows the other's identifiers, so two records are "the same
//! contact" exactly when their `(name, phone)` pairs are equal. Comparison is
//! by exact value: case and inner whitespace matter.

use serde::{Deserialize, Serialize};

use crate::{contact::Contact, provider::PhoneEntry};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupKey {
  pub name:  String,
  pub phone: String,
}

impl DedupKey {
  pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
    Self { name: name.into(), phone: phone.into() }
  }
}

impl std::fmt::Display for DedupKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "({}, {})", self.name, self.phone)
  }
}

/// Anything that can be compared across stores.
pub trait Keyed {
  fn dedup_key(&self) -> DedupKey;
}

impl Keyed for Contact {
  fn dedup_key(&self) -> DedupKey { key(self) }
}

impl Keyed for PhoneEntry {
  fn dedup_key(&self) -> DedupKey {
    DedupKey::new(&self.display_name, &self.number)
  }
}

/// The dedup key of a local contact. The id plays no part.
pub fn key(contact: &Contact) -> DedupKey {
  DedupKey::new(&contact.name, &contact.phone)
}
