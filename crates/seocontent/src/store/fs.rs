use super::entry_store::EntryStore;
use super::fs_backend::FsBackend;
use std::path::{Path, PathBuf};

/// Entry store persisted as `seo_content.json` under a data directory.
pub type FileStore = EntryStore<FsBackend>;

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        EntryStore::with_backend(FsBackend::new(root))
    }

    pub fn root(&self) -> &Path {
        self.backend.root()
    }
}
