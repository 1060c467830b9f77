use super::backend::{SeoTable, StorageBackend};
use super::{EntryQuery, MigrationReport, SeoStore};
use crate::error::{Result, SeoError};
use crate::model::{SeoEntry, SeoRow};
use crate::schema::{self, AppliedMigration, TableLayout};
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct CachedRow {
    stored_at: Instant,
    ttl: Duration,
    row: Option<SeoRow>,
}

impl CachedRow {
    fn is_fresh(&self) -> bool {
        self.stored_at.elapsed() < self.ttl
    }
}

pub struct EntryStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    layout: TableLayout,
    cache: RefCell<HashMap<EntryQuery, CachedRow>>,
}

impl<B: StorageBackend> EntryStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            layout: TableLayout::current(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn location(&self) -> String {
        self.backend.location()
    }

    /// Drop every cached query result.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Loads the table for writing. Fresh tables are created at the current
    /// schema; tables with pending migrations are refused.
    fn load_writable(&self) -> Result<SeoTable> {
        let mut table = self.backend.load_table()?;
        if table.is_fresh() {
            table.migrations = schema::MIGRATIONS
                .iter()
                .map(|m| AppliedMigration::now(m.name))
                .collect();
            return Ok(table);
        }

        let pending = schema::pending(&table.migrations);
        if !pending.is_empty() {
            let names: Vec<_> = pending.iter().map(|m| m.name).collect();
            return Err(SeoError::Store(format!(
                "{} has pending migrations ({}); run migrate first",
                self.backend.location(),
                names.join(", ")
            )));
        }
        Ok(table)
    }

    fn check_row(&self, table: &SeoTable, row: &SeoRow, entry: &SeoEntry) -> Result<()> {
        let errors = entry.validate();
        if !errors.is_empty() {
            return Err(SeoError::Validation(errors));
        }

        for index in self.layout.unique_indexes() {
            let key: Option<Vec<String>> = index
                .columns
                .iter()
                .map(|c| schema::row_value(row, c))
                .collect();
            // NULLs never collide.
            let Some(key) = key else { continue };

            let taken = table.rows.iter().filter(|r| r.id != row.id).any(|other| {
                index
                    .columns
                    .iter()
                    .zip(&key)
                    .all(|(c, v)| schema::row_value(other, c).as_deref() == Some(v.as_str()))
            });
            if taken {
                let message = if index.columns == ["model_name", "model_id"] {
                    "The combination of Model Name and Model ID has already been taken.".to_string()
                } else {
                    format!("duplicate ({}) for unique index {}", key.join(", "), index.name)
                };
                tracing::warn!(index = index.name, id = row.id, "unique index violation");
                return Err(SeoError::Constraint(message));
            }
        }

        if row.is_global
            && table
                .rows
                .iter()
                .any(|r| r.id != row.id && r.is_global && r.owner_type == row.owner_type)
        {
            tracing::warn!(owner_type = %row.owner_type, "second global entry rejected");
            return Err(SeoError::Constraint(format!(
                "{} already has a global SEO entry",
                row.owner_type
            )));
        }

        Ok(())
    }

    fn write(&self, table: &SeoTable) -> Result<()> {
        self.clear_cache();
        self.backend.save_table(table)
    }
}

impl<B: StorageBackend> SeoStore for EntryStore<B> {
    fn find_one(&self, query: &EntryQuery, cache: Option<Duration>) -> Result<Option<SeoEntry>> {
        if cache.is_some() {
            if let Some(hit) = self.cache.borrow().get(query).filter(|c| c.is_fresh()) {
                tracing::debug!(?query, "query cache hit");
                return Ok(hit.row.clone().map(SeoEntry::from_row));
            }
        }

        let table = self.backend.load_table()?;
        let row = table.rows.into_iter().find(|r| query.matches(r));

        if let Some(ttl) = cache {
            self.cache.borrow_mut().insert(
                query.clone(),
                CachedRow {
                    stored_at: Instant::now(),
                    ttl,
                    row: row.clone(),
                },
            );
        }

        Ok(row.map(SeoEntry::from_row))
    }

    fn get(&self, id: u64) -> Result<SeoEntry> {
        let table = self.backend.load_table()?;
        let row = table.row(id).ok_or(SeoError::EntryNotFound(id))?;
        Ok(SeoEntry::from_row(row.clone()))
    }

    fn list(&self) -> Result<Vec<SeoRow>> {
        let mut rows = self.backend.load_table()?.rows;
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    fn find_by_title(&self, title: &str) -> Result<Vec<SeoRow>> {
        let table = self.backend.load_table()?;
        Ok(table
            .rows
            .into_iter()
            .filter(|r| r.text.title.as_deref() == Some(title))
            .collect())
    }

    fn insert(&mut self, entry: &mut SeoEntry) -> Result<u64> {
        if let Some(id) = entry.id() {
            return Err(SeoError::Store(format!("entry {id} is already persisted")));
        }

        let _lock = self.backend.lock()?;
        let mut table = self.load_writable()?;
        let id = table.next_id;
        let row = entry.to_row(id);
        self.check_row(&table, &row, entry)?;

        table.rows.push(row);
        table.next_id = id + 1;
        self.write(&table)?;

        entry.mark_persisted(id);
        tracing::info!(id, owner_type = %entry.owner_type, owner_id = %entry.owner_id, "seo entry inserted");
        Ok(id)
    }

    fn update(&mut self, entry: &mut SeoEntry) -> Result<()> {
        let id = entry
            .id()
            .ok_or_else(|| SeoError::Store("cannot update an entry that was never saved".into()))?;

        let _lock = self.backend.lock()?;
        let mut table = self.load_writable()?;
        let pos = table
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(SeoError::EntryNotFound(id))?;
        let row = entry.to_row(id);
        self.check_row(&table, &row, entry)?;

        table.rows[pos] = row;
        self.write(&table)?;

        entry.mark_persisted(id);
        tracing::info!(id, owner_type = %entry.owner_type, owner_id = %entry.owner_id, "seo entry updated");
        Ok(())
    }

    fn delete(&mut self, entry: &mut SeoEntry) -> Result<()> {
        let id = entry
            .id()
            .ok_or_else(|| SeoError::Store("cannot delete an entry that was never saved".into()))?;

        let _lock = self.backend.lock()?;
        let mut table = self.load_writable()?;
        let before = table.rows.len();
        table.rows.retain(|r| r.id != id);
        if table.rows.len() == before {
            return Err(SeoError::EntryNotFound(id));
        }
        self.write(&table)?;

        entry.mark_deleted();
        tracing::info!(id, owner_type = %entry.owner_type, owner_id = %entry.owner_id, "seo entry deleted");
        Ok(())
    }

    fn migrate(&mut self) -> Result<MigrationReport> {
        let _lock = self.backend.lock()?;
        let mut table = self.backend.load_table()?;
        let pending = schema::pending(&table.migrations);
        if pending.is_empty() {
            return Ok(MigrationReport::default());
        }

        // Validate the path from the recorded state before stamping anything.
        let mut layout = TableLayout::after(&table.migrations)?;
        let mut report = MigrationReport::default();
        for migration in pending {
            layout.apply(migration)?;
            table.migrations.push(AppliedMigration::now(migration.name));
            report.applied.push(migration.name.to_string());
            tracing::info!(migration = migration.name, "migration applied");
        }

        self.write(&table)?;
        Ok(report)
    }

    fn applied_migrations(&self) -> Result<Vec<AppliedMigration>> {
        Ok(self.backend.load_table()?.migrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GLOBAL_OWNER_ID;
    use crate::store::mem_backend::MemBackend;
    use crate::store::memory::InMemoryStore;

    fn page_entry(id: &str, title: &str) -> SeoEntry {
        let mut entry = SeoEntry::new("Page", id);
        entry.set_title(title);
        entry
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let mut store = InMemoryStore::new();
        let mut a = page_entry("1", "A");
        let mut b = page_entry("2", "B");
        assert_eq!(store.insert(&mut a).unwrap(), 1);
        assert_eq!(store.insert(&mut b).unwrap(), 2);
        assert_eq!(a.id(), Some(1));
        assert!(a.dirty_fields().is_empty());
    }

    #[test]
    fn first_write_stamps_every_migration() {
        let mut store = InMemoryStore::new();
        store.insert(&mut page_entry("1", "A")).unwrap();
        let applied = store.applied_migrations().unwrap();
        assert_eq!(applied.len(), schema::MIGRATIONS.len());
    }

    #[test]
    fn duplicate_owner_key_is_a_constraint_violation() {
        let mut store = InMemoryStore::new();
        store.insert(&mut page_entry("1", "A")).unwrap();
        let err = store.insert(&mut page_entry("1", "B")).unwrap_err();
        match err {
            SeoError::Constraint(msg) => assert!(msg.contains("Model Name and Model ID")),
            other => panic!("expected constraint violation, got {other:?}"),
        }
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn same_id_under_another_type_is_fine() {
        let mut store = InMemoryStore::new();
        store.insert(&mut page_entry("1", "A")).unwrap();
        let mut post = SeoEntry::new("Post", "1");
        store.insert(&mut post).unwrap();
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn second_global_entry_per_type_is_rejected() {
        let mut store = InMemoryStore::new();
        store.insert(&mut SeoEntry::global_default("Page")).unwrap();

        let mut other = SeoEntry::new("Page", "defaults-2");
        other.is_global = true;
        assert!(matches!(
            store.insert(&mut other),
            Err(SeoError::Constraint(_))
        ));

        store.insert(&mut SeoEntry::global_default("Post")).unwrap();
    }

    #[test]
    fn many_instance_rows_per_type_are_fine() {
        let mut store = InMemoryStore::new();
        for i in 0..3 {
            store.insert(&mut page_entry(&i.to_string(), "")).unwrap();
        }
        assert_eq!(store.list().unwrap().len(), 3);
    }

    #[test]
    fn invalid_rows_are_not_written() {
        let mut store = InMemoryStore::new();
        let mut entry = page_entry("1", &"x".repeat(300));
        let err = store.insert(&mut entry).unwrap_err();
        assert!(matches!(err, SeoError::Validation(ref e) if e[0].field == "title"));
        assert!(entry.is_new_record());
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn update_writes_changes_back() {
        let mut store = InMemoryStore::new();
        let mut entry = page_entry("1", "Old");
        store.insert(&mut entry).unwrap();

        entry.set_title("New");
        store.update(&mut entry).unwrap();
        assert_eq!(store.get(1).unwrap().title(), Some("New"));
    }

    #[test]
    fn update_of_missing_row_fails() {
        let mut store = InMemoryStore::new();
        let mut entry = page_entry("1", "Old");
        store.insert(&mut entry).unwrap();

        let mut copy = store.get(1).unwrap();
        store.delete(&mut entry).unwrap();
        assert!(matches!(
            store.update(&mut copy),
            Err(SeoError::EntryNotFound(1))
        ));
    }

    #[test]
    fn delete_turns_entry_into_new_record() {
        let mut store = InMemoryStore::new();
        let mut entry = page_entry("1", "A");
        store.insert(&mut entry).unwrap();
        store.delete(&mut entry).unwrap();
        assert!(entry.is_new_record());
        assert!(store.list().unwrap().is_empty());
        assert!(store.delete(&mut entry).is_err());
    }

    #[test]
    fn find_one_by_owner_and_global() {
        let mut store = InMemoryStore::new();
        store.insert(&mut page_entry("1", "A")).unwrap();
        store.insert(&mut SeoEntry::global_default("Page")).unwrap();

        let own = store
            .find_one(&EntryQuery::by_owner("Page", "1"), None)
            .unwrap()
            .unwrap();
        assert_eq!(own.title(), Some("A"));

        let global = store
            .find_one(&EntryQuery::global_for("Page"), None)
            .unwrap()
            .unwrap();
        assert_eq!(global.owner_id, GLOBAL_OWNER_ID);

        assert!(store
            .find_one(&EntryQuery::global_for("Post"), None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn owner_keyed_like_the_global_row_does_not_resolve_it() {
        let mut store = InMemoryStore::new();
        store.insert(&mut SeoEntry::global_default("Page")).unwrap();

        assert!(store
            .find_one(&EntryQuery::by_owner("Page", GLOBAL_OWNER_ID), None)
            .unwrap()
            .is_none());
        assert!(store
            .find_one(&EntryQuery::global_for("Page"), None)
            .unwrap()
            .is_some());
    }

    #[test]
    fn cached_lookups_skip_the_backend_until_a_write() {
        let mut store = InMemoryStore::new();
        let query = EntryQuery::by_owner("Page", "1");
        let ttl = Some(Duration::from_secs(60));

        assert!(store.find_one(&query, ttl).unwrap().is_none());

        // Sneak a row in behind the store's back: the cached miss stays.
        let mut table = store.backend().load_table().unwrap();
        table.rows.push(page_entry("1", "Hidden").to_row(50));
        store.backend().save_table(&table).unwrap();
        assert!(store.find_one(&query, ttl).unwrap().is_none());
        assert!(store.find_one(&query, None).unwrap().is_some());

        // A write through the store clears the cache.
        store.insert(&mut page_entry("2", "B")).unwrap();
        assert!(store.find_one(&query, ttl).unwrap().is_some());
    }

    #[test]
    fn expired_cache_entries_are_reloaded() {
        let store = InMemoryStore::new();
        let query = EntryQuery::global_for("Page");
        assert!(store.find_one(&query, Some(Duration::ZERO)).unwrap().is_none());

        let mut table = store.backend().load_table().unwrap();
        table.rows.push(SeoEntry::global_default("Page").to_row(1));
        store.backend().save_table(&table).unwrap();

        assert!(store
            .find_one(&query, Some(Duration::ZERO))
            .unwrap()
            .is_some());
    }

    #[test]
    fn find_by_title_matches_exactly() {
        let mut store = InMemoryStore::new();
        store.insert(&mut page_entry("1", "Home")).unwrap();
        store.insert(&mut page_entry("2", "home")).unwrap();
        let rows = store.find_by_title("Home").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].owner_id, "1");
    }

    #[test]
    fn write_errors_propagate() {
        let mut store = InMemoryStore::new();
        store.backend().set_simulate_write_error(true);
        let mut entry = page_entry("1", "A");
        assert!(matches!(
            store.insert(&mut entry),
            Err(SeoError::Store(_))
        ));
        assert!(entry.is_new_record());
    }

    #[test]
    fn legacy_table_is_read_only_until_migrated() {
        let legacy = SeoTable {
            migrations: vec![AppliedMigration::now(schema::MIGRATIONS[0].name)],
            next_id: 2,
            rows: vec![page_entry("1", "Legacy").to_row(1)],
        };
        let mut store = EntryStore::with_backend(MemBackend::with_table(legacy));

        assert_eq!(store.list().unwrap().len(), 1);
        let err = store.insert(&mut page_entry("2", "B")).unwrap_err();
        assert!(err.to_string().contains("pending migrations"));

        let report = store.migrate().unwrap();
        assert_eq!(report.applied.len(), 2);
        assert!(store.migrate().unwrap().is_noop());

        assert_eq!(store.insert(&mut page_entry("2", "B")).unwrap(), 2);
    }

    #[test]
    fn migrate_creates_a_fresh_table() {
        let mut store = InMemoryStore::new();
        let report = store.migrate().unwrap();
        assert_eq!(report.applied.len(), 3);
        assert_eq!(store.backend().write_count(), 1);
    }
}
