use super::backend::{SeoTable, StorageBackend, TableLock};
use crate::error::{Result, SeoError};
use std::cell::{Cell, RefCell};

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the store is single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `StorageBackend` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    table: RefCell<SeoTable>,
    simulate_write_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend preloaded with `table`, e.g. to simulate a legacy table.
    pub fn with_table(table: SeoTable) -> Self {
        Self {
            table: RefCell::new(table),
            ..Self::default()
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful `save_table` calls.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl StorageBackend for MemBackend {
    fn load_table(&self) -> Result<SeoTable> {
        Ok(self.table.borrow().clone())
    }

    fn save_table(&self, table: &SeoTable) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(SeoError::Store("Simulated write error".to_string()));
        }
        *self.table.borrow_mut() = table.clone();
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn lock(&self) -> Result<TableLock> {
        Ok(TableLock::unshared())
    }

    fn location(&self) -> String {
        "memory://seo_content".to_string()
    }
}
