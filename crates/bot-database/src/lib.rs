//! SQLite persistence for the Mikasa bot.
//!
//! This crate provides:
//! - `Database`: on-disk store of three string collections
//!   (`processed_messages`, `processed_submissions`, `subscribers`)
//! - `Ledger`: "have I seen this event id" checks over the processed collections
//! - `Registry`: subscriber add/remove/query with uniqueness
//! - Database migrations
//!
//! # Architecture
//!
//! Each collection is a set of rows in `collection_entries`, ordered by
//! insertion. Whole-collection reads and replacements are available through
//! [`Database::get`] and [`Database::put`]; the ledger and registry use the
//! row-level operations so that a single insert never rewrites the
//! collection.
//!
//! ```ignore
//! let db = Database::open(&paths.database_file())?;
//! let ledger = Ledger::new(&db, Some(10_000));
//! if !ledger.has_seen(Collection::ProcessedMessages, &id)? {
//!     ledger.mark_seen(Collection::ProcessedMessages, &id)?;
//! }
//! ```
//!
//! `Database` holds a single connection and is not `Sync`; the bot drives
//! every mutation from one task.

mod collection;
mod db;
mod error;
mod ledger;
mod migrations;
mod registry;

pub use collection::Collection;
pub use db::{CollectionStats, Database};
pub use error::{DatabaseError, DatabaseResult};
pub use ledger::Ledger;
pub use migrations::{run_migrations, CURRENT_VERSION};
pub use registry::Registry;
