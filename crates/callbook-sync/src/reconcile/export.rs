//! Export: app → address book.

use callbook_core::{
  key::Keyed,
  provider::{ContactsProvider, RawContactBatch},
  store::ContactStore,
};

use super::{Direction, Reconciler, SyncReport, plan};
use crate::{Error, Result};

impl<S, P> Reconciler<S, P>
where
  S: ContactStore + 'static,
  P: ContactsProvider + 'static,
{
  /// Write app contacts the address book does not have yet.
  ///
  /// Each contact goes out as its own three-operation batch. A rejected
  /// batch is logged and counted; the contact stays unsynced and is retried
  /// by the next pass because its key is still missing.
  pub async fn export(&self) -> Result<SyncReport> {
    let _guard = self.acquire(Direction::Export)?;
    let mut report = SyncReport::start(Direction::Export);

    let external = self
      .provider
      .read_phones()
      .await
      .map_err(Error::provider_read)?;
    let existing = plan::key_set(&external);
    let local = self.repo.snapshot().await?;

    let to_add = plan::missing(&local, &existing, self.config.collapse_source_duplicates);
    report.source_count = local.len();
    report.skipped = local.len() - to_add.len();

    for contact in to_add {
      let batch = RawContactBatch::for_contact(contact);
      match self.provider.apply_batch(batch).await {
        Ok(receipt) => {
          report.added += 1;
          tracing::debug!(
            pass = %report.pass_id,
            id = contact.id,
            raw_contact_id = ?receipt.row_ids.first(),
            "contact exported"
          );
        }
        Err(err) => {
          report.failed += 1;
          tracing::warn!(
            pass = %report.pass_id,
            id = contact.id,
            key = %contact.dedup_key(),
            error = %err,
            "export batch failed"
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
      "export finished"
    );
    Ok(report)
  }
}
