//! SQL schemas for the two databases.
//!
//! Each is executed at connection startup. `PRAGMA user_version` is 0 on a
//! brand-new file, which is how the local store decides whether to seed.

/// Local contact store DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const CONTACTS_SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS contacts (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    phone_number TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS contacts_name_idx ON contacts(name);

PRAGMA user_version = 1;
";

/// Address book DDL. A raw contact is a bare grouping record; everything
/// about it lives in `data` rows discriminated by `mimetype`.
pub const ADDRESS_BOOK_SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS raw_contacts (
    _id          INTEGER PRIMARY KEY AUTOINCREMENT,
    account_type TEXT,             -- NULL: not bound to any account
    account_name TEXT
);

CREATE TABLE IF NOT EXISTS data (
    _id            INTEGER PRIMARY KEY AUTOINCREMENT,
    raw_contact_id INTEGER NOT NULL REFERENCES raw_contacts(_id),
    mimetype       TEXT NOT NULL,
    data1          TEXT,           -- display name | phone number
    data2          INTEGER         -- phone type code
);

CREATE INDEX IF NOT EXISTS data_raw_contact_idx ON data(raw_contact_id);
CREATE INDEX IF NOT EXISTS data_mimetype_idx    ON data(mimetype);

PRAGMA user_version = 1;
";

/// Written into a freshly created local store when seeding is requested.
pub const SAMPLE_CONTACTS: &[(&str, &str)] = &[
  ("Manh", "0779421219"),
  ("Linh", "0901234567"),
  ("Huy", "0987654321"),
  ("Trang", "0911222333"),
  ("Tuan", "0933444555"),
];
