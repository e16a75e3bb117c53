//! [`SearchPipeline`]: debounced, latest-wins search over the repository.
//!
//! Every query change restarts a quiescence timer. Only when the timer runs
//! out is a search issued, and issuing one drops the live subscription of the
//! previous search (including a read still in flight). A single driver task
//! publishes results, so a slow stale query can never overwrite a newer one.

use std::{
  future,
  ops::Deref,
  sync::{Arc, OnceLock},
  time::Duration,
};

use callbook_core::{contact::Contact, store::ContactStore};
use serde::Deserialize;
use tokio::{
  sync::watch,
  task::JoinHandle,
  time::{Instant, sleep},
};

use crate::{Result, live::LiveContacts, repository::ContactRepository};

/// One published result list, tagged with the query text that produced it.
///
/// Derefs to the contacts, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct Results {
  query:    String,
  contacts: Arc<[Contact]>,
}

impl Results {
  /// The search string that was issued for these results. This can lag
  /// behind [`SearchPipeline::query`] while a newer query is debouncing.
  pub fn query(&self) -> &str { &self.query }

  pub fn contacts(&self) -> &[Contact] { &self.contacts }
}

impl Deref for Results {
  type Target = [Contact];

  fn deref(&self) -> &[Contact] { &self.contacts }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
  /// Quiet period after the last query change before a search is issued.
  pub debounce_ms: u64,
}

impl Default for PipelineConfig {
  fn default() -> Self { Self { debounce_ms: 200 } }
}

pub struct SearchPipeline<S: ContactStore + 'static> {
  repo:     ContactRepository<S>,
  debounce: Duration,
  query:    watch::Sender<String>,
  results:  Arc<watch::Sender<Results>>,
  driver:   OnceLock<JoinHandle<()>>,
}

impl<S: ContactStore + 'static> SearchPipeline<S> {
  pub fn new(repo: ContactRepository<S>, config: &PipelineConfig) -> Self {
    let (query, _) = watch::channel(String::new());
    let (results, _) = watch::channel(Results::default());
    Self {
      repo,
      debounce: Duration::from_millis(config.debounce_ms),
      query,
      results: Arc::new(results),
      driver: OnceLock::new(),
    }
  }

  /// Replace the search string. Setting the same string again is a no-op and
  /// does not restart the debounce timer.
  pub fn set_query(&self, query: impl Into<String>) {
    let query = query.into();
    self.query.send_if_modified(|current| {
      if *current == query {
        return false;
      }
      *current = query;
      true
    });
  }

  pub fn query(&self) -> String { self.query.borrow().clone() }

  /// Subscribe to results. The first call starts the driver task, so it must
  /// be made from within a tokio runtime. Until the first search completes
  /// subscribers see an empty list.
  pub fn subscribe(&self) -> watch::Receiver<Results> {
    self.driver.get_or_init(|| {
      tokio::spawn(drive(
        self.repo.clone(),
        self.debounce,
        self.query.subscribe(),
        Arc::clone(&self.results),
      ))
    });
    self.results.subscribe()
  }
}

impl<S: ContactStore + 'static> Drop for SearchPipeline<S> {
  fn drop(&mut self) {
    if let Some(driver) = self.driver.get() {
      driver.abort();
    }
  }
}

async fn drive<S: ContactStore + 'static>(
  repo: ContactRepository<S>,
  debounce: Duration,
  mut query: watch::Receiver<String>,
  results: Arc<watch::Sender<Results>>,
) {
  let mut pending = Some(query.borrow_and_update().clone());
  let deadline = sleep(debounce);
  tokio::pin!(deadline);
  let mut live: Option<LiveContacts<S>> = None;
  let mut issued = String::new();

  loop {
    tokio::select! {
      changed = query.changed() => {
        if changed.is_err() {
          break;
        }
        pending = Some(query.borrow_and_update().clone());
        deadline.as_mut().reset(Instant::now() + debounce);
      }
      () = &mut deadline, if pending.is_some() => {
        if let Some(text) = pending.take() {
          tracing::debug!(query = %text, "issuing search");
          live = Some(repo.search(&text));
          issued = text;
        }
      }
      emission = next_emission(&mut live) => match emission {
        Some(Ok(contacts)) => {
          results.send_replace(Results {
            query:    issued.clone(),
            contacts: contacts.into(),
          });
        }
        Some(Err(err)) => tracing::warn!(error = %err, "search query failed"),
        None => live = None,
      },
    }
  }
}

async fn next_emission<S: ContactStore>(
  live: &mut Option<LiveContacts<S>>,
) -> Option<Result<Vec<Contact>>> {
  match live {
    Some(live) => live.next().await,
    None => future::pending().await,
  }
}
