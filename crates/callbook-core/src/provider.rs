//! The `ContactsProvider` trait: the system-level address book.
//!
//! The address book stores one logical contact as a grouping record (a "raw
//! contact") plus typed data rows that point at it. Writes are expressed as a
//! [`RawContactBatch`]: an ordered list of inserts where data rows refer to a
//! raw contact created earlier in the same batch by its operation index. A
//! provider applies a batch all-or-nothing.

use std::future::Future;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use crate::{Error, Result, contact::Contact};

// ─── Read model ──────────────────────────────────────────────────────────────

/// One phone data row, joined with its raw contact's display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneEntry {
  pub display_name: String,
  pub number:       String,
}

impl PhoneEntry {
  pub fn new(display_name: impl Into<String>, number: impl Into<String>) -> Self {
    Self {
      display_name: display_name.into(),
      number:       number.into(),
    }
  }
}

// ─── Data kinds ──────────────────────────────────────────────────────────────

/// MIME type discriminant of a data row.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, IntoStaticStr,
)]
pub enum DataKind {
  #[strum(serialize = "vnd.android.cursor.item/name")]
  StructuredName,
  #[strum(serialize = "vnd.android.cursor.item/phone_v2")]
  Phone,
}

/// Type label of a phone row, stored as its numeric code.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Display,
  EnumString,
  AsRefStr,
  IntoStaticStr,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PhoneType {
  Home,
  #[default]
  Mobile,
  Work,
  Other,
}

impl PhoneType {
  pub fn code(self) -> i64 {
    match self {
      Self::Home => 1,
      Self::Mobile => 2,
      Self::Work => 3,
      Self::Other => 7,
    }
  }
}

// ─── Write model ─────────────────────────────────────────────────────────────

/// Payload of a data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataRow {
  StructuredName { display_name: String },
  Phone { number: String, kind: PhoneType },
}

impl DataRow {
  pub fn kind(&self) -> DataKind {
    match self {
      Self::StructuredName { .. } => DataKind::StructuredName,
      Self::Phone { .. } => DataKind::Phone,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOp {
  /// Create a grouping record. No account is associated with it.
  InsertRawContact,
  /// Create a data row owned by the raw contact inserted by operation
  /// `raw_contact` of the same batch.
  InsertData { raw_contact: usize, row: DataRow },
}

/// An ordered group of inserts applied as one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContactBatch {
  ops: Vec<ProviderOp>,
}

impl RawContactBatch {
  pub fn new(ops: Vec<ProviderOp>) -> Self { Self { ops } }

  /// The three-operation batch that mirrors one local contact: a raw contact,
  /// its structured name, and a mobile phone row.
  pub fn for_contact(contact: &Contact) -> Self {
    let raw_contact = 0;
    Self::new(vec![
      ProviderOp::InsertRawContact,
      ProviderOp::InsertData {
        raw_contact,
        row: DataRow::StructuredName {
          display_name: contact.name.clone(),
        },
      },
      ProviderOp::InsertData {
        raw_contact,
        row: DataRow::Phone {
          number: contact.phone.clone(),
          kind:   PhoneType::Mobile,
        },
      },
    ])
  }

  pub fn ops(&self) -> &[ProviderOp] { &self.ops }

  /// Check that the batch is non-empty and every back-reference points at an
  /// earlier [`ProviderOp::InsertRawContact`].
  pub fn validate(&self) -> Result<()> {
    if self.ops.is_empty() {
      return Err(Error::EmptyBatch);
    }
    for (index, op) in self.ops.iter().enumerate() {
      if let ProviderOp::InsertData { raw_contact, .. } = op {
        let target = *raw_contact;
        let valid = target < index
          && matches!(self.ops[target], ProviderOp::InsertRawContact);
        if !valid {
          return Err(Error::InvalidBackReference { index, target });
        }
      }
    }
    Ok(())
  }

  /// First structured name in the batch, for logging.
  pub fn display_name(&self) -> Option<&str> {
    self.ops.iter().find_map(|op| match op {
      ProviderOp::InsertData {
        row: DataRow::StructuredName { display_name },
        ..
      } => Some(display_name.as_str()),
      _ => None,
    })
  }

  /// First phone number in the batch, for logging.
  pub fn phone_number(&self) -> Option<&str> {
    self.ops.iter().find_map(|op| match op {
      ProviderOp::InsertData {
        row: DataRow::Phone { number, .. },
        ..
      } => Some(number.as_str()),
      _ => None,
    })
  }
}

/// Row ids assigned to each operation of an applied batch, in batch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReceipt {
  pub row_ids: Vec<i64>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the system address book.
///
/// Callers are expected to hold whatever read/write grants the platform
/// requires before calling either method.
pub trait ContactsProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every phone row in the address book with its display name. No filtering.
  fn read_phones(
    &self,
  ) -> impl Future<Output = Result<Vec<PhoneEntry>, Self::Error>> + Send + '_;

  /// Apply `batch` atomically: either every operation lands or none does.
  fn apply_batch(
    &self,
    batch: RawContactBatch,
  ) -> impl Future<Output = Result<BatchReceipt, Self::Error>> + Send + '_;
}
