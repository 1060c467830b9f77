//! # Command Layer
//!
//! This module contains the **business logic** behind every operation the
//! clients offer. Each command lives in its own submodule as a `run` function
//! over a [`SeoStore`](crate::store::SeoStore) and plain Rust arguments.
//!
//! ## What Commands Do NOT Do
//!
//! Commands explicitly avoid:
//! - **Any I/O**: No stdout, stderr or terminal concerns
//! - **Argument parsing**: That's the CLI layer's job
//! - **Exit codes**: Return `Result`, let the caller decide
//!
//! ## Structured Returns
//!
//! Commands return [`CmdResult`], not strings:
//! - `affected_entries`: rows written or removed by the command
//! - `listed_entries`: rows to display
//! - `expanded`: the text produced by `expand`
//! - `published`: the title and meta tags produced by `preview`
//! - `properties`: key/value pairs (configuration, schema)
//! - `messages`: structured messages with levels
//!
//! ## Testing Strategy
//!
//! Command tests use `InMemoryStore` and the store fixtures; this is where
//! most of the behavior-level testing lives.
//!
//! ## Command Modules
//!
//! - [`list`]: List stored entries
//! - [`show`]: Show the entry that applies to one owner
//! - [`set`]: Create or edit an owner entry or a type-wide default
//! - [`delete`]: Remove an entry
//! - [`expand`]: Expand a template against a record
//! - [`preview`]: Resolve and publish a record's SEO fields
//! - [`check_title`]: Run the unique-title validation for a record
//! - [`migrate`]: Apply pending table migrations
//! - [`schema`]: Describe the table layout and migration state
//! - [`config`]: Show the resolved configuration
//! - [`helpers`]: Owner keys and environment building

use crate::model::SeoRow;
use crate::publish::MemorySink;
use serde::Serialize;

pub mod check_title;
pub mod config;
pub mod delete;
pub mod expand;
pub mod helpers;
pub mod list;
pub mod migrate;
pub mod preview;
pub mod schema;
pub mod set;
pub mod show;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_entries: Vec<SeoRow>,
    pub listed_entries: Vec<SeoRow>,
    pub expanded: Option<String>,
    pub published: Option<MemorySink>,
    pub properties: Vec<(String, String)>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_entries(mut self, rows: Vec<SeoRow>) -> Self {
        self.listed_entries = rows;
        self
    }

    pub fn with_affected_entries(mut self, rows: Vec<SeoRow>) -> Self {
        self.affected_entries = rows;
        self
    }

    pub fn with_properties(mut self, properties: Vec<(String, String)>) -> Self {
        self.properties = properties;
        self
    }

    /// True if any message is an error.
    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
