//! Plain-text and JSON rendering of command results.

use callbook_core::{contact::Contact, provider::PhoneEntry};
use callbook_sync::SyncReport;

pub fn contacts(contacts: &[Contact], json: bool) -> anyhow::Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(contacts)?);
    return Ok(());
  }
  if contacts.is_empty() {
    println!("(no contacts)");
  }
  for c in contacts {
    println!("{:>5}  {:<24}  {}", c.id, c.name, c.phone);
  }
  Ok(())
}

pub fn phones(entries: &[PhoneEntry], json: bool) -> anyhow::Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(entries)?);
    return Ok(());
  }
  if entries.is_empty() {
    println!("(address book is empty)");
  }
  for e in entries {
    println!("{:<24}  {}", e.display_name, e.number);
  }
  Ok(())
}

pub fn report(report: &SyncReport, json: bool) -> anyhow::Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(report)?);
  } else if !report.has_work() {
    println!("{}: already up to date", report.direction);
  }
  Ok(())
}
