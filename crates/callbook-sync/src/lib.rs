//! Synchronisation between the app's contact list and the system address
//! book, plus the live query layer the UI reads from.
//!
//! - [`ContactRepository`] wraps a [`ContactStore`](callbook_core::store::ContactStore)
//!   and hands out [`LiveContacts`](live::LiveContacts) queries.
//! - [`SearchPipeline`] turns a rapidly changing search string into one
//!   debounced, always-current result list.
//! - [`Reconciler`] runs import (address book → app) and export
//!   (app → address book) passes keyed on [`DedupKey`](callbook_core::key::DedupKey).

pub mod error;
pub mod live;
pub mod pipeline;
pub mod reconcile;
pub mod repository;

pub use error::{Error, Result};
pub use pipeline::{PipelineConfig, Results, SearchPipeline};
pub use reconcile::{Direction, Reconciler, SyncConfig, SyncReport};
pub use repository::ContactRepository;

#[cfg(test)]
mod testing;
