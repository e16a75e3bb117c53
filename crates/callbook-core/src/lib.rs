//! Core types and trait definitions for callbook.
//!
//! This crate knows nothing about SQLite or any other backend. The local
//! contact store and the system address book are both described here as
//! traits; `callbook-store-sqlite` implements them and `callbook-sync` drives
//! them.

pub mod contact;
pub mod error;
pub mod key;
pub mod provider;
pub mod store;

pub use error::{Error, Result};
