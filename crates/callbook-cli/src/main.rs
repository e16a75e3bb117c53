//! `callbook`: manage the local contact list and sync it with the system
//! address book.
//!
//! # Usage
//!
//! ```
//! callbook list
//! callbook add "Linh" 0901234567
//! callbook import
//! callbook --config ~/.config/callbook/callbook.toml browse
//! ```

mod config;
mod output;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, bail};
use callbook_core::{contact::Contact, provider::ContactsProvider as _};
use callbook_store_sqlite::{SqliteAddressBook, SqliteStore};
use callbook_sync::{ContactRepository, Reconciler, SearchPipeline, SyncReport};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "callbook", version, about = "Contact list with address book sync")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "callbook.toml")]
  config: PathBuf,

  /// Print results as JSON.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every contact, sorted by name.
  List,
  /// Contacts whose name or phone contains QUERY (case-insensitive).
  Search { query: String },
  /// Add a contact.
  Add { name: String, phone: String },
  /// Change a contact's name and/or phone.
  Edit {
    id:    i64,
    #[arg(long)]
    name:  Option<String>,
    #[arg(long)]
    phone: Option<String>,
  },
  /// Delete one contact by id.
  Delete { id: i64 },
  /// Delete every contact.
  Clear,
  /// Copy address book entries missing from the contact list.
  Import,
  /// Copy contacts missing from the address book.
  Export,
  /// Interactive search: each line read from stdin replaces the query.
  Browse,
  /// Inspect or edit the system address book directly.
  #[command(subcommand)]
  System(SystemCommand),
}

#[derive(Subcommand, Debug)]
enum SystemCommand {
  /// List every phone entry in the address book.
  List,
  /// Add an entry to the address book.
  Add { name: String, phone: String },
}

type AppReconciler = Reconciler<SqliteStore, SqliteAddressBook>;

// ─── Main ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let cfg = AppConfig::load(&args.config)?;

  for path in [&cfg.store_path, &cfg.address_book_path] {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }
  }

  let store = if cfg.seed_sample_contacts {
    SqliteStore::open_seeded(&cfg.store_path).await
  } else {
    SqliteStore::open(&cfg.store_path).await
  }
  .with_context(|| format!("failed to open store at {}", cfg.store_path.display()))?;

  let address_book = SqliteAddressBook::open(&cfg.address_book_path)
    .await
    .with_context(|| {
      format!("failed to open address book at {}", cfg.address_book_path.display())
    })?;

  tracing::debug!(
    store = %cfg.store_path.display(),
    address_book = %cfg.address_book_path.display(),
    "opened databases"
  );

  let repo = ContactRepository::new(store);
  let reconciler = Arc::new(Reconciler::new(
    repo.clone(),
    Arc::new(address_book),
    cfg.sync.clone(),
  ));

  run(args.command, args.json, &cfg, repo, reconciler).await
}

async fn run(
  command: Command,
  json: bool,
  cfg: &AppConfig,
  repo: ContactRepository<SqliteStore>,
  reconciler: Arc<AppReconciler>,
) -> anyhow::Result<()> {
  match command {
    Command::List => output::contacts(&repo.snapshot().await?, json),
    Command::Search { query } => {
      let live = repo.search(&query);
      let found = live.current().await?;
      output::contacts(&found, json)
    }
    Command::Add { name, phone } => {
      repo.add_contact(&name, &phone).await?;
      println!("Added {}", name.trim());
      Ok(())
    }
    Command::Edit { id, name, phone } => {
      let existing = find(&repo, id).await?;
      let name = name.unwrap_or_else(|| existing.name.clone());
      let phone = phone.unwrap_or_else(|| existing.phone.clone());
      repo.edit_contact(&existing, &name, &phone).await?;
      println!("Updated contact {id}");
      Ok(())
    }
    Command::Delete { id } => {
      let existing = find(&repo, id).await?;
      repo.delete(&existing).await?;
      println!("Deleted {}", existing.name);
      Ok(())
    }
    Command::Clear => {
      let removed = repo.delete_all().await?;
      println!("Deleted {removed} contacts");
      Ok(())
    }
    Command::Import => {
      let handle = reconciler.spawn_import(move |report: &SyncReport| {
        if !json {
          println!("Imported contacts from the address book ({report})");
        }
      });
      finish_pass(handle.await?, json)
    }
    Command::Export => {
      let handle = reconciler.spawn_export(move |report: &SyncReport| {
        if !json {
          println!("Exported contacts to the address book ({report})");
        }
      });
      finish_pass(handle.await?, json)
    }
    Command::Browse => browse(repo, cfg, json).await,
    Command::System(SystemCommand::List) => {
      let entries = reconciler.provider().read_phones().await?;
      output::phones(&entries, json)
    }
    Command::System(SystemCommand::Add { name, phone }) => {
      let receipt = reconciler.provider().add_contact(&name, &phone).await?;
      tracing::debug!(row_ids = ?receipt.row_ids, "address book entry written");
      println!("Added {} to the address book", name.trim());
      Ok(())
    }
  }
}

async fn find(repo: &ContactRepository<SqliteStore>, id: i64) -> anyhow::Result<Contact> {
  repo
    .snapshot()
    .await?
    .into_iter()
    .find(|c| c.id == id)
    .with_context(|| format!("no contact with id {id}"))
}

fn finish_pass(report: Option<SyncReport>, json: bool) -> anyhow::Result<()> {
  match report {
    Some(report) => output::report(&report, json),
    None => bail!("sync pass did not complete; see log for details"),
  }
}

// ─── Browse ───────────────────────────────────────────────────────────────────

/// Feed stdin lines into a [`SearchPipeline`] and print every result list it
/// publishes until stdin closes.
async fn browse(
  repo: ContactRepository<SqliteStore>,
  cfg: &AppConfig,
  json: bool,
) -> anyhow::Result<()> {
  let pipeline = SearchPipeline::new(repo, &cfg.search);
  let mut results = pipeline.subscribe();
  let mut lines = BufReader::new(tokio::io::stdin()).lines();

  eprintln!("Type to search; an empty line lists everything. Ctrl-D to quit.");
  loop {
    tokio::select! {
      line = lines.next_line() => {
        match line.context("failed to read stdin")? {
          Some(line) => pipeline.set_query(line),
          None => break,
        }
      }
      changed = results.changed() => {
        if changed.is_err() {
          break;
        }
        let current = results.borrow_and_update().clone();
        if !json {
          println!("── {:?} ──", current.query());
        }
        output::contacts(current.contacts(), json)?;
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory as _;

  use super::*;

  #[test]
  fn cli_definition_is_consistent() { Args::command().debug_assert(); }

  #[test]
  fn edit_accepts_partial_changes() {
    let args = Args::parse_from(["callbook", "edit", "3", "--phone", "0900000000"]);
    match args.command {
      Command::Edit { id, name, phone } => {
        assert_eq!(id, 3);
        assert_eq!(name, None);
        assert_eq!(phone.as_deref(), Some("0900000000"));
      }
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[test]
  fn json_flag_is_global() {
    let args = Args::parse_from(["callbook", "system", "list", "--json"]);
    assert!(args.json);
    assert!(matches!(args.command, Command::System(SystemCommand::List)));
  }

  #[test]
  fn defaults_without_file_or_env() {
    let cfg = AppConfig::load(std::path::Path::new("/nonexistent/callbook.toml")).unwrap();
    assert!(cfg.seed_sample_contacts);
    assert!(!cfg.sync.collapse_source_duplicates);
    assert_eq!(cfg.search.debounce_ms, 200);
    assert!(cfg.store_path.ends_with("contacts.db"));
  }
}
