//! Reflect Core Library
//!
//! This crate provides the core functionality for Reflect, a personal
//! learning journal whose entries live in a single JSON file.
//!
//! # Architecture
//!
//! - **Entries file**: a top-level JSON array, the only source of truth
//! - **EntryStore**: reads the whole file, lets the caller change the
//!   collection in memory, and writes the whole file back
//!
//! Both the `reflect` CLI and the `reflect-server` HTTP API go through the
//! same store; they differ only in their source tag and default placement.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let store = config.store();
//!
//! let entry = store.create(EntryDraft::new("Day 1", "Learned ownership"),
//!                          CLI_SOURCE, config.cli_placement)?;
//! store.delete(entry.id)?;
//! ```
//!
//! # Modules
//!
//! - `store`: Entry store (main entry point)
//! - `models`: Entry, draft, id and placement types
//! - `error`: Typed errors for store writes
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use config::{Config, ServerConfig};
pub use error::{StoreError, StoreResult};
pub use models::{
    Entry, EntryDraft, EntryId, ParseEntryIdError, Placement, CLI_SOURCE, DEFAULT_TITLE,
    SERVER_SOURCE,
};
pub use store::{EntryStore, StoreOptions, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT};
