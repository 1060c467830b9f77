use crate::error::Result;
use crate::model::SeoRow;
use crate::schema::AppliedMigration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Full contents of one `seo_content` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoTable {
    /// Migrations this table has been brought through.
    #[serde(default)]
    pub migrations: Vec<AppliedMigration>,
    /// Next surrogate id to hand out.
    #[serde(default = "first_id")]
    pub next_id: u64,
    #[serde(default)]
    pub rows: Vec<SeoRow>,
}

fn first_id() -> u64 {
    1
}

impl Default for SeoTable {
    fn default() -> Self {
        Self {
            migrations: Vec::new(),
            next_id: first_id(),
            rows: Vec::new(),
        }
    }
}

impl SeoTable {
    /// A table that has never been written to.
    pub fn is_fresh(&self) -> bool {
        self.migrations.is_empty() && self.rows.is_empty()
    }

    pub fn row(&self, id: u64) -> Option<&SeoRow> {
        self.rows.iter().find(|r| r.id == id)
    }
}

/// Exclusive write access to a table, released on drop.
#[must_use = "the table is unlocked as soon as the guard is dropped"]
#[derive(Debug)]
pub struct TableLock {
    path: Option<PathBuf>,
}

impl TableLock {
    /// Guard for a backend that no other writer can reach.
    pub fn unshared() -> Self {
        Self { path: None }
    }

    /// Guard owning the lock file at `path`; the file is removed on drop.
    pub fn file(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }
}

impl Drop for TableLock {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "could not release table lock");
            }
        }
    }
}

/// Abstract interface for raw table I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while EntryStore handles the "what" (constraints, caching, migrations).
pub trait StorageBackend {
    /// Load the whole table. A missing table loads as empty.
    fn load_table(&self) -> Result<SeoTable>;

    /// Replace the whole table.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_table(&self, table: &SeoTable) -> Result<()>;

    /// Take exclusive write access. Writers hold this across the whole
    /// load, check and save sequence; a lock that cannot be taken is an error.
    fn lock(&self) -> Result<TableLock>;

    /// Human-readable location of the table, for messages.
    fn location(&self) -> String;
}
