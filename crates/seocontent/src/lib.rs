//! # SeoContent Architecture
//!
//! SeoContent gives any record a title, meta keywords and a meta description
//! for search engines. Values live in one `seo_content` table keyed by the
//! owner's type and id. A per-type **global** entry acts as the default for
//! every record of that type that has no entry of its own.
//!
//! Stored values are templates: `%%model_title%% %%sep%% %%appParam_site%%`
//! is expanded against the owning record and the application environment each
//! time it is read.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (seocontent-cli crate)                                 │
//! │  - Parses arguments, prints results, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (key=value params, JSON records)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic, structured CmdResult returns             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Behavior (record.rs, behavior.rs, pattern.rs, publish.rs)  │
//! │  - Entry resolution, template expansion, lifecycle hooks    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/, schema.rs)                          │
//! │  - SeoStore trait over a raw StorageBackend                 │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Using the Behavior Directly
//!
//! Applications embed SeoContent by implementing [`record::SeoOwner`] for
//! their record type and wrapping it in a [`record::SeoRecord`]:
//!
//! - read `title()` / `keywords()` / `description()` for expanded values
//! - `set_*` to edit, then `notify_inserted` / `notify_updated` after the
//!   owner itself was saved
//! - `notify_deleted` removes the owner's entry
//! - `validate_title_uniqueness` before saving
//! - [`publish::register_all`] writes the values into a page's head
//!
//! ## No I/O Assumptions in Core
//!
//! Nothing from `api.rs` inward writes to stdout/stderr or exits the
//! process. Diagnostics go through `tracing`; the embedding application
//! decides whether and where they are recorded.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic for each command
//! - [`behavior`]: Entry resolution, dirty tracking and lifecycle hooks
//! - [`record`]: The owner trait and the record wrapper
//! - [`pattern`]: The `%%placeholder%%` engine
//! - [`environment`]: Template inputs (params, view params, config)
//! - [`publish`]: Title and meta tag registration
//! - [`store`]: Storage abstraction and implementations
//! - [`schema`]: Table layout and migrations
//! - [`model`]: Core data types (`SeoEntry`, `SeoRow`, `SeoField`)
//! - [`config`]: Configuration
//! - [`init`]: Data directory and configuration discovery
//! - [`error`]: Error types

pub mod api;
pub mod behavior;
pub mod commands;
pub mod config;
pub mod environment;
pub mod error;
pub mod init;
pub mod model;
pub mod pattern;
pub mod publish;
pub mod record;
pub mod schema;
pub mod store;

#[cfg(test)]
pub mod test_utils;
