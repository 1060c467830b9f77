//! # Scopes: Project vs Global
//!
//! A `seo_content` table lives in a data directory:
//!
//! - **Project**: `<project_root>/.seocontent/`, for a site's own records.
//! - **Global**: the OS-appropriate data directory (via the `directories`
//!   crate), shared by everything the user runs.
//!
//! ## Resolution
//!
//! [`initialize`] picks the data directory:
//! 1. `use_global` → global directory.
//! 2. `data_override` → that path (`.seocontent` is appended unless it already
//!    ends with it).
//! 3. Otherwise [`find_project_root`]: the nearest ancestor of `cwd` that has a
//!    `.seocontent` directory, stopping at `HOME` or the filesystem root.
//!    Nothing found → `cwd/.seocontent`.
//!
//! `SEOCONTENT_GLOBAL_DATA` overrides the global directory (used by tests).
//!
//! ## Configuration
//!
//! `seocontent.toml` is merged from the global directory and, in project
//! scope, the project directory (project wins). Environment variables
//! (`SEOCONTENT__*`) override both.

use crate::api::SeoApi;
use crate::config::{SeoConfig, CONFIG_FILENAME};
use crate::error::{Result, SeoError};
use crate::store::fs::FileStore;
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

pub const DATA_DIR_NAME: &str = ".seocontent";
pub const GLOBAL_DATA_ENV: &str = "SEOCONTENT_GLOBAL_DATA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Project,
    Global,
}

pub struct SeoContext {
    pub api: SeoApi<FileStore>,
    pub scope: Scope,
    pub data_dir: PathBuf,
}

/// Nearest ancestor of `cwd` (inclusive) with a `.seocontent` directory.
/// Stops at the home directory or the filesystem root.
pub fn find_project_root(cwd: &Path) -> Option<PathBuf> {
    let home_dir = BaseDirs::new().map(|bd| bd.home_dir().to_path_buf());
    let mut current = cwd.to_path_buf();

    loop {
        if current.join(DATA_DIR_NAME).is_dir() {
            return Some(current);
        }

        if let Some(ref home) = home_dir {
            if &current == home {
                return None;
            }
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent.to_path_buf(),
            _ => return None,
        }
    }
}

pub fn global_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(GLOBAL_DATA_ENV) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "seocontent", "seocontent")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SeoError::Settings("could not determine the global data directory".into()))
}

/// Data directory for a project path given explicitly.
pub fn project_data_dir(path: PathBuf) -> PathBuf {
    if path.file_name().is_some_and(|name| name == DATA_DIR_NAME) {
        path
    } else {
        path.join(DATA_DIR_NAME)
    }
}

/// `seocontent.toml` from the given directories, later ones overriding earlier ones.
pub fn load_config(dirs: &[PathBuf]) -> Result<SeoConfig> {
    Clapfig::builder()
        .app_name("seocontent")
        .file_name(CONFIG_FILENAME)
        .search_paths(dirs.iter().cloned().map(SearchPath::Path).collect())
        .search_mode(SearchMode::Merge)
        .load()
        .map_err(|e| SeoError::Settings(e.to_string()))
}

pub fn initialize(cwd: &Path, use_global: bool, data_override: Option<PathBuf>) -> Result<SeoContext> {
    initialize_with_global(global_data_dir()?, cwd, use_global, data_override)
}

/// [`initialize`] with an explicit global data directory.
pub fn initialize_with_global(
    global_dir: PathBuf,
    cwd: &Path,
    use_global: bool,
    data_override: Option<PathBuf>,
) -> Result<SeoContext> {
    let (scope, data_dir) = if use_global {
        (Scope::Global, global_dir.clone())
    } else {
        let dir = match data_override {
            Some(path) => project_data_dir(path),
            None => find_project_root(cwd)
                .map(|root| root.join(DATA_DIR_NAME))
                .unwrap_or_else(|| cwd.join(DATA_DIR_NAME)),
        };
        (Scope::Project, dir)
    };

    // Global operations must not pick up a project's settings.
    let config_dirs = match scope {
        Scope::Global => vec![global_dir],
        Scope::Project => vec![global_dir, data_dir.clone()],
    };
    let config = load_config(&config_dirs)?;
    tracing::debug!(?scope, data_dir = %data_dir.display(), "initialized seocontent context");

    let store = FileStore::new(data_dir.clone());
    Ok(SeoContext {
        api: SeoApi::new(store, config),
        scope,
        data_dir,
    })
}
