//! [`SqliteAddressBook`]: a SQLite model of the system address book.

use std::path::Path;

use callbook_core::{
  contact::Contact,
  provider::{
    BatchReceipt, ContactsProvider, DataKind, PhoneEntry, ProviderOp, RawContactBatch,
  },
};

use crate::{
  Error, Result,
  encode::{encode_data_row, mimetype},
  schema::ADDRESS_BOOK_SCHEMA,
};

/// System-level contacts: raw contacts plus typed `data` rows.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteAddressBook {
  conn: tokio_rusqlite::Connection,
}

impl SqliteAddressBook {
  /// Open (or create) an address book at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory address book, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(ADDRESS_BOOK_SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn })
  }

  /// Create a contact directly in the address book, the way a user would in
  /// the system contacts app.
  pub async fn add_contact(&self, name: &str, phone: &str) -> Result<BatchReceipt> {
    let contact = Contact::from_form(name, phone)?;
    self.apply_batch(RawContactBatch::for_contact(&contact)).await
  }

  /// Row counts of `(raw_contacts, data)`.
  pub async fn counts(&self) -> Result<(u64, u64)> {
    let counts = self
      .conn
      .call(|conn| {
        let raw: i64 = conn.query_row("SELECT COUNT(*) FROM raw_contacts", [], |r| r.get(0))?;
        let data: i64 = conn.query_row("SELECT COUNT(*) FROM data", [], |r| r.get(0))?;
        Ok((raw as u64, data as u64))
      })
      .await?;
    Ok(counts)
  }

  #[cfg(test)]
  pub(crate) async fn execute_sql(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl ContactsProvider for SqliteAddressBook {
  type Error = Error;

  async fn read_phones(&self) -> Result<Vec<PhoneEntry>> {
    let name_mime = mimetype(DataKind::StructuredName);
    let phone_mime = mimetype(DataKind::Phone);

    let entries = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             COALESCE((SELECT n.data1 FROM data n
                       WHERE n.raw_contact_id = p.raw_contact_id AND n.mimetype = ?1
                       ORDER BY n._id LIMIT 1), ''),
             COALESCE(p.data1, '')
           FROM data p
           WHERE p.mimetype = ?2
           ORDER BY p._id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![name_mime, phone_mime], |row| {
            Ok(PhoneEntry {
              display_name: row.get(0)?,
              number:       row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(entries)
  }

  async fn apply_batch(&self, batch: RawContactBatch) -> Result<BatchReceipt> {
    batch.validate()?;
    let ops = batch.ops().to_vec();

    let row_ids = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut row_ids: Vec<i64> = Vec::with_capacity(ops.len());

        for op in ops {
          match op {
            ProviderOp::InsertRawContact => {
              tx.execute(
                "INSERT INTO raw_contacts (account_type, account_name) VALUES (NULL, NULL)",
                [],
              )?;
            }
            ProviderOp::InsertData { raw_contact, row } => {
              // `validate` guarantees the reference points backwards.
              let raw_contact_id = row_ids[raw_contact];
              let encoded = encode_data_row(row);
              tx.execute(
                "INSERT INTO data (raw_contact_id, mimetype, data1, data2)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                  raw_contact_id,
                  encoded.mimetype,
                  encoded.data1,
                  encoded.data2,
                ],
              )?;
            }
          }
          row_ids.push(tx.last_insert_rowid());
        }

        tx.commit()?;
        Ok(row_ids)
      })
      .await?;

    Ok(BatchReceipt { row_ids })
  }
}
