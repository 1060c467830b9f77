use super::backend::{SeoTable, StorageBackend, TableLock};
use crate::error::{Result, SeoError};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const TABLE_FILENAME: &str = "seo_content.json";
pub const LOCK_FILENAME: &str = "seo_content.lock";

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);
const LOCK_RETRY: Duration = Duration::from_millis(5);

/// Stores the table as one JSON document under a data directory.
pub struct FsBackend {
    root: PathBuf,
    lock_timeout: Duration,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// How long a writer waits for another writer's lock before giving up.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn table_path(&self) -> PathBuf {
        self.root.join(TABLE_FILENAME)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(SeoError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_table(&self) -> Result<SeoTable> {
        let path = self.table_path();
        if !path.exists() {
            return Ok(SeoTable::default());
        }
        let content = fs::read_to_string(&path).map_err(SeoError::Io)?;
        let table: SeoTable = serde_json::from_str(&content).map_err(SeoError::Serialization)?;
        Ok(table)
    }

    fn save_table(&self, table: &SeoTable) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(table).map_err(SeoError::Serialization)?;

        let tmp_file = self.root.join(format!(".seo_content-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(SeoError::Io)?;
        fs::rename(&tmp_file, self.table_path()).map_err(SeoError::Io)?;
        Ok(())
    }

    fn lock(&self) -> Result<TableLock> {
        self.ensure_dir()?;
        let path = self.lock_path();
        let started = Instant::now();

        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let guard = TableLock::file(path);
                    // Owner pid, for diagnosing stale locks.
                    let _ = writeln!(file, "{}", std::process::id());
                    return Ok(guard);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if started.elapsed() >= self.lock_timeout {
                        tracing::warn!(path = %path.display(), "table lock timed out");
                        return Err(SeoError::Store(format!(
                            "{} is locked by another writer; remove {} if no writer is running",
                            self.location(),
                            path.display()
                        )));
                    }
                    thread::sleep(LOCK_RETRY);
                }
                Err(e) => return Err(SeoError::Io(e)),
            }
        }
    }

    fn location(&self) -> String {
        self.table_path().display().to_string()
    }
}
