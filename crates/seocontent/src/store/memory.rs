use super::entry_store::EntryStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = EntryStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        EntryStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::SeoEntry;
    use crate::store::SeoStore;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// Instance entry with only a title.
        pub fn with_title(mut self, owner_type: &str, owner_id: &str, title: &str) -> Self {
            let mut entry = SeoEntry::new(owner_type, owner_id);
            entry.set_title(title);
            self.store.insert(&mut entry).unwrap();
            self
        }

        /// Instance entry with all three fields.
        pub fn with_entry(
            mut self,
            owner_type: &str,
            owner_id: &str,
            title: &str,
            keywords: &str,
            description: &str,
        ) -> Self {
            let mut entry = SeoEntry::new(owner_type, owner_id);
            entry.set_title(title);
            entry.set_keywords(keywords);
            entry.set_description(description);
            self.store.insert(&mut entry).unwrap();
            self
        }

        /// Type-wide default entry with all three fields.
        pub fn with_global(
            mut self,
            owner_type: &str,
            title: &str,
            keywords: &str,
            description: &str,
        ) -> Self {
            let mut entry = SeoEntry::global_default(owner_type);
            entry.set_title(title);
            entry.set_keywords(keywords);
            entry.set_description(description);
            self.store.insert(&mut entry).unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;
    use crate::error::SeoError;
    use crate::store::{EntryQuery, SeoStore};

    #[test]
    fn test_get_not_found() {
        let store = InMemoryStore::new();
        match store.get(42) {
            Err(SeoError::EntryNotFound(id)) => assert_eq!(id, 42),
            _ => panic!("Expected EntryNotFound"),
        }
    }

    #[test]
    fn test_fixtures_coverage() {
        let fixture = StoreFixture::default()
            .with_title("Page", "1", "Home")
            .with_entry("Page", "2", "About", "about,us", "Who we are")
            .with_global("Page", "%%model_title%%", "", "Default");

        let rows = fixture.store.list().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].text.keywords.as_deref(), Some("about,us"));

        let global = fixture
            .store
            .find_one(&EntryQuery::global_for("Page"), None)
            .unwrap()
            .unwrap();
        assert_eq!(global.title(), Some("%%model_title%%"));
        assert!(global.is_global);
    }

    #[test]
    fn test_location() {
        assert_eq!(InMemoryStore::new().location(), "memory://seo_content");
    }
}
