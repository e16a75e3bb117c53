//! In-memory stand-ins for the store and the address book, with knobs for
//! injecting failures and observing calls.

use std::{
  collections::HashSet,
  sync::{
    Mutex,
    atomic::{AtomicBool, AtomicI64, Ordering},
  },
};

use callbook_core::{
  contact::{Contact, UNASSIGNED_ID},
  provider::{BatchReceipt, ContactsProvider, PhoneEntry, RawContactBatch},
  store::{ContactFilter, ContactStore},
};
use thiserror::Error;
use tokio::sync::{Notify, Semaphore, watch};

#[derive(Debug, Error)]
pub enum FakeError {
  #[error("rejected: {0}")]
  Rejected(String),
  #[error("not found: {0}")]
  NotFound(i64),
  #[error("read permission denied")]
  ReadDenied,
}

// ─── Store ───────────────────────────────────────────────────────────────────

pub struct MemoryStore {
  contacts:     Mutex<Vec<Contact>>,
  next_id:      AtomicI64,
  changes:      watch::Sender<u64>,
  queries:      Mutex<Vec<ContactFilter>>,
  reject_names: Mutex<HashSet<String>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::with_contacts(&[]) }

  pub fn with_contacts(pairs: &[(&str, &str)]) -> Self {
    let contacts: Vec<Contact> = pairs
      .iter()
      .zip(1..)
      .map(|((name, phone), id)| Contact { id, name: (*name).into(), phone: (*phone).into() })
      .collect();
    let (changes, _) = watch::channel(0);
    Self {
      next_id: AtomicI64::new(contacts.len() as i64 + 1),
      contacts: Mutex::new(contacts),
      changes,
      queries: Mutex::new(Vec::new()),
      reject_names: Mutex::new(HashSet::new()),
    }
  }

  /// Make inserts of contacts with this name fail.
  pub fn reject_name(&self, name: &str) {
    self.reject_names.lock().unwrap().insert(name.to_owned());
  }

  /// Every filter passed to `list`, in call order.
  pub fn queries(&self) -> Vec<ContactFilter> { self.queries.lock().unwrap().clone() }

  pub fn pairs(&self) -> Vec<(String, String)> {
    let mut pairs: Vec<_> = self
      .contacts
      .lock()
      .unwrap()
      .iter()
      .map(|c| (c.name.clone(), c.phone.clone()))
      .collect();
    pairs.sort();
    pairs
  }

  fn notify(&self) { self.changes.send_modify(|rev| *rev += 1); }
}

impl ContactStore for MemoryStore {
  type Error = FakeError;

  async fn list(&self, filter: &ContactFilter) -> Result<Vec<Contact>, FakeError> {
    self.queries.lock().unwrap().push(filter.clone());
    let mut rows: Vec<Contact> = self
      .contacts
      .lock()
      .unwrap()
      .iter()
      .filter(|c| filter.matches(c))
      .cloned()
      .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    Ok(rows)
  }

  async fn insert(&self, mut contact: Contact) -> Result<Contact, FakeError> {
    if self.reject_names.lock().unwrap().contains(&contact.name) {
      return Err(FakeError::Rejected(contact.name));
    }
    {
      let mut contacts = self.contacts.lock().unwrap();
      if contact.id == UNASSIGNED_ID {
        contact.id = self.next_id.fetch_add(1, Ordering::SeqCst);
      } else {
        contacts.retain(|c| c.id != contact.id);
      }
      contacts.push(contact.clone());
    }
    self.notify();
    Ok(contact)
  }

  async fn update(&self, contact: Contact) -> Result<(), FakeError> {
    {
      let mut contacts = self.contacts.lock().unwrap();
      let slot = contacts
        .iter_mut()
        .find(|c| c.id == contact.id)
        .ok_or(FakeError::NotFound(contact.id))?;
      *slot = contact;
    }
    self.notify();
    Ok(())
  }

  async fn delete(&self, id: i64) -> Result<(), FakeError> {
    {
      let mut contacts = self.contacts.lock().unwrap();
      let before = contacts.len();
      contacts.retain(|c| c.id != id);
      if contacts.len() == before {
        return Err(FakeError::NotFound(id));
      }
    }
    self.notify();
    Ok(())
  }

  async fn delete_all(&self) -> Result<u64, FakeError> {
    let removed = {
      let mut contacts = self.contacts.lock().unwrap();
      let n = contacts.len() as u64;
      contacts.clear();
      n
    };
    self.notify();
    Ok(removed)
  }

  fn changes(&self) -> watch::Receiver<u64> { self.changes.subscribe() }
}

// ─── Provider ────────────────────────────────────────────────────────────────

pub struct FakeProvider {
  entries:       Mutex<Vec<PhoneEntry>>,
  batches:       Mutex<Vec<RawContactBatch>>,
  reject_phones: Mutex<HashSet<String>>,
  deny_reads:    AtomicBool,
  read_gate:     Option<Semaphore>,
  read_started:  Notify,
}

impl FakeProvider {
  pub fn new(pairs: &[(&str, &str)]) -> Self {
    Self {
      entries:       Mutex::new(pairs.iter().map(|(n, p)| PhoneEntry::new(*n, *p)).collect()),
      batches:       Mutex::new(Vec::new()),
      reject_phones: Mutex::new(HashSet::new()),
      deny_reads:    AtomicBool::new(false),
      read_gate:     None,
      read_started:  Notify::new(),
    }
  }

  /// Reads block until [`open_gate`](Self::open_gate) is called.
  pub fn gated(mut self) -> Self {
    self.read_gate = Some(Semaphore::new(0));
    self
  }

  pub fn open_gate(&self) {
    if let Some(gate) = &self.read_gate {
      gate.add_permits(1_000);
    }
  }

  /// Resolves once some read has started.
  pub async fn read_started(&self) { self.read_started.notified().await }

  pub fn deny_reads(&self) { self.deny_reads.store(true, Ordering::SeqCst); }

  /// Make batches carrying this phone number fail.
  pub fn reject_phone(&self, phone: &str) {
    self.reject_phones.lock().unwrap().insert(phone.to_owned());
  }

  /// Every batch passed to `apply_batch`, accepted or not.
  pub fn batches(&self) -> Vec<RawContactBatch> { self.batches.lock().unwrap().clone() }

  pub fn pairs(&self) -> Vec<(String, String)> {
    let mut pairs: Vec<_> = self
      .entries
      .lock()
      .unwrap()
      .iter()
      .map(|e| (e.display_name.clone(), e.number.clone()))
      .collect();
    pairs.sort();
    pairs
  }
}

impl ContactsProvider for FakeProvider {
  type Error = FakeError;

  async fn read_phones(&self) -> Result<Vec<PhoneEntry>, FakeError> {
    self.read_started.notify_one();
    if let Some(gate) = &self.read_gate {
      let _permit = gate.acquire().await.expect("gate closed");
    }
    if self.deny_reads.load(Ordering::SeqCst) {
      return Err(FakeError::ReadDenied);
    }
    Ok(self.entries.lock().unwrap().clone())
  }

  async fn apply_batch(&self, batch: RawContactBatch) -> Result<BatchReceipt, FakeError> {
    self.batches.lock().unwrap().push(batch.clone());
    let name = batch.display_name().unwrap_or_default().to_owned();
    let phone = batch.phone_number().unwrap_or_default().to_owned();
    if self.reject_phones.lock().unwrap().contains(&phone) {
      return Err(FakeError::Rejected(phone));
    }
    let mut entries = self.entries.lock().unwrap();
    entries.push(PhoneEntry::new(name, phone));
    let raw_contact_id = entries.len() as i64;
    Ok(BatchReceipt { row_ids: vec![raw_contact_id; batch.ops().len()] })
  }
}
