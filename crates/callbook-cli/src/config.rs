//! Layered configuration: defaults, then an optional TOML file, then
//! `CALLBOOK_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use callbook_sync::{PipelineConfig, SyncConfig};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// SQLite file holding the app's contacts.
  pub store_path:           PathBuf,
  /// SQLite file standing in for the system address book.
  pub address_book_path:    PathBuf,
  /// Write the sample contacts when the store file is first created.
  pub seed_sample_contacts: bool,
  pub sync:                 SyncConfig,
  pub search:               PipelineConfig,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      store_path:           PathBuf::from("~/.local/share/callbook/contacts.db"),
      address_book_path:    PathBuf::from("~/.local/share/callbook/address-book.db"),
      seed_sample_contacts: true,
      sync:                 SyncConfig::default(),
      search:               PipelineConfig::default(),
    }
  }
}

impl AppConfig {
  /// Load from `path` (missing file is fine) and the environment, e.g.
  /// `CALLBOOK_STORE_PATH` or `CALLBOOK_SYNC__COLLAPSE_SOURCE_DUPLICATES`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("CALLBOOK")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise configuration")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.address_book_path = expand_tilde(&cfg.address_book_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
