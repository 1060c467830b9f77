//! # Storage Layer
//!
//! This module defines the storage abstraction for SEO entries. The [`SeoStore`]
//! trait is the record-store contract the behavior depends on: look up one row
//! by owner key or by type-wide default, insert, update, delete.
//!
//! ## Store vs. Backend
//!
//! - [`StorageBackend`](backend::StorageBackend) is raw table I/O: load the
//!   whole table, save the whole table. Nothing else.
//! - [`EntryStore`](entry_store::EntryStore) implements [`SeoStore`] on top of
//!   any backend and owns the rules a database would enforce for us:
//!   - unique `(model_name, model_id)`, derived from the table schema,
//!   - one `is_global` row per `model_name` (no longer an index, see
//!     [`crate::schema`]),
//!   - row validation (required keys, column lengths),
//!   - id assignment,
//!   - the migration gate: a table with pending migrations is read-only.
//!
//! Constraint violations are returned as [`SeoError::Constraint`]; they are
//! never resolved by overwriting.
//!
//! ## Query Cache
//!
//! `find_one` accepts an optional duration. When given, the result (including
//! "no row") is remembered per query for that long. Any write through the same
//! store clears the cache; writes by other processes are not seen until the
//! cached result expires.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: `seo_content.json` in a data directory.
//! - [`memory::InMemoryStore`]: for testing logic without filesystem I/O.
//!
//! [`SeoError::Constraint`]: crate::error::SeoError::Constraint

use crate::error::Result;
use crate::model::{SeoEntry, SeoRow};
use crate::schema::AppliedMigration;
use std::time::Duration;

pub mod backend;
pub mod entry_store;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;

/// The two lookups the behavior performs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryQuery {
    /// The entry of one specific owner.
    ByOwner {
        owner_type: String,
        owner_id: String,
    },
    /// The type-wide default entry.
    GlobalFor { owner_type: String },
}

impl EntryQuery {
    pub fn by_owner(owner_type: impl Into<String>, owner_id: impl Into<String>) -> Self {
        EntryQuery::ByOwner {
            owner_type: owner_type.into(),
            owner_id: owner_id.into(),
        }
    }

    pub fn global_for(owner_type: impl Into<String>) -> Self {
        EntryQuery::GlobalFor {
            owner_type: owner_type.into(),
        }
    }

    pub fn matches(&self, row: &SeoRow) -> bool {
        match self {
            EntryQuery::ByOwner {
                owner_type,
                owner_id,
            } => !row.is_global && row.owner_type == *owner_type && row.owner_id == *owner_id,
            EntryQuery::GlobalFor { owner_type } => row.owner_type == *owner_type && row.is_global,
        }
    }
}

/// Report from the `migrate` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Names of the migrations applied by this run, in order.
    pub applied: Vec<String>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Abstract interface for SEO entry storage.
pub trait SeoStore {
    /// First row matching `query`, optionally served from the query cache.
    fn find_one(&self, query: &EntryQuery, cache: Option<Duration>) -> Result<Option<SeoEntry>>;

    /// Entry by surrogate id.
    fn get(&self, id: u64) -> Result<SeoEntry>;

    /// All rows, ordered by id.
    fn list(&self) -> Result<Vec<SeoRow>>;

    /// Rows whose title equals `title` exactly.
    fn find_by_title(&self, title: &str) -> Result<Vec<SeoRow>>;

    /// Insert a new entry, assigning its id.
    fn insert(&mut self, entry: &mut SeoEntry) -> Result<u64>;

    /// Write back a persisted entry.
    fn update(&mut self, entry: &mut SeoEntry) -> Result<()>;

    /// Remove a persisted entry. It becomes a new record again.
    fn delete(&mut self, entry: &mut SeoEntry) -> Result<()>;

    /// Insert or update as appropriate.
    fn save(&mut self, entry: &mut SeoEntry) -> Result<()> {
        if entry.is_new_record() {
            self.insert(entry).map(|_| ())
        } else {
            self.update(entry)
        }
    }

    /// Bring the table through every pending migration.
    fn migrate(&mut self) -> Result<MigrationReport>;

    /// Migrations the table has seen.
    fn applied_migrations(&self) -> Result<Vec<AppliedMigration>>;
}
