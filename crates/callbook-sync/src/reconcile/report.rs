use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::Direction;

/// What one reconciliation pass did.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
  pub pass_id:      Uuid,
  pub direction:    Direction,
  pub started_at:   DateTime<Utc>,
  pub finished_at:  DateTime<Utc>,
  /// Records read from the source side.
  pub source_count: usize,
  /// Source records not copied because the target already had their key
  /// (or, when collapsing, because an earlier duplicate was copied).
  pub skipped:      usize,
  pub added:        usize,
  pub failed:       usize,
}

impl SyncReport {
  pub(crate) fn start(direction: Direction) -> Self {
    let now = Utc::now();
    Self {
      pass_id: Uuid::new_v4(),
      direction,
      started_at: now,
      finished_at: now,
      source_count: 0,
      skipped: 0,
      added: 0,
      failed: 0,
    }
  }

  pub(crate) fn finish(mut self) -> Self {
    self.finished_at = Utc::now();
    self
  }

  /// Writes tried this pass, successful or not.
  pub fn attempted(&self) -> usize { self.added + self.failed }

  /// Whether the pass found anything to copy. This is the condition for the
  /// completion callback, in both directions.
  pub fn has_work(&self) -> bool { self.attempted() > 0 }
}

impl std::fmt::Display for SyncReport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}: {} added, {} failed, {} skipped of {}",
      self.direction, self.added, self.failed, self.skipped, self.source_count
    )
  }
}
