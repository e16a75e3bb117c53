//! Import: address book → app.

use callbook_core::{
  contact::Contact,
  key::Keyed,
  provider::ContactsProvider,
  store::ContactStore,
};

use super::{Direction, Reconciler, SyncReport, plan};
use crate::{Error, Result};

impl<S, P> Reconciler<S, P>
where
  S: ContactStore + 'static,
  P: ContactsProvider + 'static,
{
  /// Copy address book entries the app does not have yet.
  ///
  /// A failed address book read or local snapshot aborts the pass before
  /// anything is written. Individual insert failures are logged, counted and
  /// skipped; the remaining entries are still inserted.
  pub async fn import(&self) -> Result<SyncReport> {
    let _guard = self.acquire(Direction::Import)?;
    let mut report = SyncReport::start(Direction::Import);

    let external = self
      .provider
      .read_phones()
      .await
      .map_err(Error::provider_read)?;
    let local = self.repo.snapshot().await?;

    let existing = plan::key_set(&local);
    let to_add = plan::missing(&external, &existing, self.config.collapse_source_duplicates);
    report.source_count = external.len();
    report.skipped = external.len() - to_add.len();

    for entry in to_add {
      let contact = Contact::new(&entry.display_name, &entry.number);
      match self.repo.insert(contact).await {
        Ok(()) => report.added += 1,
        Err(err) => {
          report.failed += 1;
          tracing::warn!(
            pass = %report.pass_id,
            key = %entry.dedup_key(),
            error = %err,
            "import insert failed"
          );
        }
      }
    }

    let report = report.finish();
    tracing::info!(
      pass = %report.pass_id,
      added = report.added,
      failed = report.failed,
      skipped = report.skipped,
      "import finished"
    );
    Ok(report)
  }
}
