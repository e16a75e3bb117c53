//! Reconciliation between the app's contacts and the system address book.
//!
//! A pass snapshots both sides once, diffs them by [`DedupKey`], and writes
//! whatever the target side is missing. Nothing is ever deleted or merged,
//! and the target snapshot does not observe the pass's own writes.
//!
//! [`DedupKey`]: callbook_core::key::DedupKey

mod export;
mod import;
pub mod plan;
mod report;

use std::sync::Arc;

use callbook_core::{provider::ContactsProvider, store::ContactStore};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use tokio::{
  sync::{Mutex, MutexGuard},
  task::JoinHandle,
};

pub use report::SyncReport;

use crate::{Error, Result, repository::ContactRepository};

/// Which way a pass copies contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  /// Address book → app.
  Import,
  /// App → address book.
  Export,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
  /// When the source side holds the same `(name, phone)` more than once,
  /// copy it only once per pass. Off by default: every qualifying source
  /// record is copied.
  pub collapse_source_duplicates: bool,
}

/// Runs import and export passes.
///
/// At most one pass per direction is in flight at a time; starting a second
/// one fails fast with [`Error::AlreadyRunning`]. An import and an export may
/// overlap.
pub struct Reconciler<S, P> {
  repo:         ContactRepository<S>,
  provider:     Arc<P>,
  config:       SyncConfig,
  import_guard: Mutex<()>,
  export_guard: Mutex<()>,
}

impl<S, P> Reconciler<S, P>
where
  S: ContactStore + 'static,
  P: ContactsProvider + 'static,
{
  pub fn new(repo: ContactRepository<S>, provider: Arc<P>, config: SyncConfig) -> Self {
    Self {
      repo,
      provider,
      config,
      import_guard: Mutex::new(()),
      export_guard: Mutex::new(()),
    }
  }

  pub fn repository(&self) -> &ContactRepository<S> { &self.repo }

  pub fn provider(&self) -> &Arc<P> { &self.provider }

  fn acquire(&self, direction: Direction) -> Result<MutexGuard<'_, ()>> {
    let guard = match direction {
      Direction::Import => &self.import_guard,
      Direction::Export => &self.export_guard,
    };
    guard.try_lock().map_err(|_| Error::AlreadyRunning(direction))
  }

  /// Launch an import pass in the background.
  ///
  /// `on_success` runs iff the pass completes and found something to copy
  /// (see [`SyncReport::has_work`]). Errors are logged, never returned.
  pub fn spawn_import<F>(self: &Arc<Self>, on_success: F) -> JoinHandle<Option<SyncReport>>
  where
    F: FnOnce(&SyncReport) + Send + 'static,
  {
    self.spawn_pass(Direction::Import, on_success)
  }

  /// Launch an export pass in the background; same contract as
  /// [`spawn_import`](Self::spawn_import).
  pub fn spawn_export<F>(self: &Arc<Self>, on_success: F) -> JoinHandle<Option<SyncReport>>
  where
    F: FnOnce(&SyncReport) + Send + 'static,
  {
    self.spawn_pass(Direction::Export, on_success)
  }

  fn spawn_pass<F>(
    self: &Arc<Self>,
    direction: Direction,
    on_success: F,
  ) -> JoinHandle<Option<SyncReport>>
  where
    F: FnOnce(&SyncReport) + Send + 'static,
  {
    let this = Arc::clone(self);
    tokio::spawn(async move {
      let outcome = match direction {
        Direction::Import => this.import().await,
        Direction::Export => this.export().await,
      };
      match outcome {
        Ok(report) => {
          if report.has_work() {
            on_success(&report);
          }
          Some(report)
        }
        Err(err) => {
          tracing::warn!(%direction, error = %err, "sync pass aborted");
          None
        }
      }
    })
  }
}
