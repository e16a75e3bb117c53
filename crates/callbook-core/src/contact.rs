//! The domain `Contact` and form-entry validation.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Id value meaning "not yet assigned by the local store".
pub const UNASSIGNED_ID: i64 = 0;

/// A contact as held by the local store.
///
/// `id` is local-store-assigned and meaningless anywhere else. The system
/// address book keeps its own identifiers, which are never mapped back here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
  pub id:    i64,
  pub name:  String,
  pub phone: String,
}

impl Contact {
  /// A contact the store has not seen yet; the store assigns the id on insert.
  pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
    Self {
      id:    UNASSIGNED_ID,
      name:  name.into(),
      phone: phone.into(),
    }
  }

  /// Build a new contact from user-entered text.
  ///
  /// Both fields are trimmed; a field that is blank after trimming is
  /// rejected.
  pub fn from_form(name: &str, phone: &str) -> Result<Self> {
    let (name, phone) = validate_form(name, phone)?;
    Ok(Self::new(name, phone))
  }

  /// Apply user-entered text to an existing contact, keeping its id.
  pub fn edited(&self, name: &str, phone: &str) -> Result<Self> {
    let (name, phone) = validate_form(name, phone)?;
    Ok(Self { id: self.id, name, phone })
  }

  pub fn is_assigned(&self) -> bool { self.id != UNASSIGNED_ID }
}

fn validate_form(name: &str, phone: &str) -> Result<(String, String)> {
  let name = name.trim();
  let phone = phone.trim();
  if name.is_empty() {
    return Err(Error::BlankField("name"));
  }
  if phone.is_empty() {
    return Err(Error::BlankField("phone"));
  }
  Ok((name.to_owned(), phone.to_owned()))
}
