//! [`SqliteStore`]: the SQLite implementation of [`ContactStore`].

use std::{path::Path, sync::Arc};

use callbook_core::{
  contact::{Contact, UNASSIGNED_ID},
  store::{ContactFilter, ContactStore},
};
use tokio::sync::watch;

use crate::{
  Error, Result,
  encode::like_contains,
  schema::{CONTACTS_SCHEMA, SAMPLE_CONTACTS},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The app's contact list backed by a single SQLite file.
///
/// Cloning is cheap; the connection and the change channel are shared, so
/// every clone observes writes made through any other.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  changes: Arc<watch::Sender<u64>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, false).await
  }

  /// Open (or create) a store at `path`, writing [`SAMPLE_CONTACTS`] if the
  /// file did not hold a store before.
  pub async fn open_seeded(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, true).await
  }

  /// Open an empty in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, false).await
  }

  async fn init(conn: tokio_rusqlite::Connection, seed: bool) -> Result<Self> {
    let seeded = conn
      .call(move |conn| {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
        conn.execute_batch(CONTACTS_SCHEMA)?;

        if version != 0 || !seed {
          return Ok(false);
        }
        let tx = conn.transaction()?;
        {
          let mut stmt =
            tx.prepare("INSERT INTO contacts (name, phone_number) VALUES (?1, ?2)")?;
          for (name, phone) in SAMPLE_CONTACTS {
            stmt.execute(rusqlite::params![name, phone])?;
          }
        }
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if seeded {
      tracing::info!(count = SAMPLE_CONTACTS.len(), "seeded new contact store");
    }

    let (changes, _) = watch::channel(0);
    Ok(Self { conn, changes: Arc::new(changes) })
  }

  /// Bump the change revision so live queries re-run.
  fn notify(&self) { self.changes.send_modify(|rev| *rev += 1); }
}

fn read_contact(row: &rusqlite::Row<'_>) -> rusqlite::Result<Contact> {
  Ok(Contact {
    id:    row.get(0)?,
    name:  row.get(1)?,
    phone: row.get(2)?,
  })
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = Error;

  async fn list(&self, filter: &ContactFilter) -> Result<Vec<Contact>> {
    let pattern = match filter {
      ContactFilter::All => None,
      ContactFilter::Text(text) => Some(like_contains(text)),
    };

    let contacts = self
      .conn
      .call(move |conn| {
        let rows = if let Some(p) = pattern {
          let mut stmt = conn.prepare(
            "SELECT id, name, phone_number FROM contacts
             WHERE name LIKE ?1 ESCAPE '\\' OR phone_number LIKE ?1 ESCAPE '\\'
             ORDER BY name ASC, id ASC",
          )?;
          stmt
            .query_map(rusqlite::params![p], read_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT id, name, phone_number FROM contacts ORDER BY name ASC, id ASC",
          )?;
          stmt
            .query_map([], read_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    Ok(contacts)
  }

  async fn insert(&self, contact: Contact) -> Result<Contact> {
    let Contact { id, name, phone } = contact;

    let (id, name, phone) = self
      .conn
      .call(move |conn| {
        if id == UNASSIGNED_ID {
          conn.execute(
            "INSERT INTO contacts (name, phone_number) VALUES (?1, ?2)",
            rusqlite::params![name, phone],
          )?;
        } else {
          conn.execute(
            "INSERT OR REPLACE INTO contacts (id, name, phone_number) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, name, phone],
          )?;
        }
        Ok((conn.last_insert_rowid(), name, phone))
      })
      .await?;

    self.notify();
    Ok(Contact { id, name, phone })
  }

  async fn update(&self, contact: Contact) -> Result<()> {
    let id = contact.id;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE contacts SET name = ?2, phone_number = ?3 WHERE id = ?1",
          rusqlite::params![contact.id, contact.name, contact.phone],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(callbook_core::Error::ContactNotFound(id).into());
    }
    self.notify();
    Ok(())
  }

  async fn delete(&self, id: i64) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM contacts WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    if changed == 0 {
      return Err(callbook_core::Error::ContactNotFound(id).into());
    }
    self.notify();
    Ok(())
  }

  async fn delete_all(&self) -> Result<u64> {
    let removed = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM contacts", [])?))
      .await?;

    self.notify();
    Ok(removed as u64)
  }

  fn changes(&self) -> watch::Receiver<u64> { self.changes.subscribe() }
}
