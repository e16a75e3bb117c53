//! SQLite backends for callbook.
//!
//! [`SqliteStore`] is the app's own contact list; [`SqliteAddressBook`] models
//! the system address book (raw contacts plus typed data rows). Both wrap
//! [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod address_book;
mod encode;
mod schema;
mod store;

pub mod error;

pub use address_book::SqliteAddressBook;
pub use error::{Error, Result};
pub use schema::SAMPLE_CONTACTS;
pub use store::SqliteStore;
