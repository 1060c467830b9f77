//! # CLI Behavior
//!
//! This is **one possible client** for seocontent. It manages the
//! `seo_content` table of a project (or the global one with `--global`) and
//! lets you try templates against records given as JSON files.
//!
//! ## Addressing Entries
//!
//! An entry is addressed by owner type and id: `seocontent show Page 3`.
//! Leaving the id out (`show Page`) or passing `--global-default` to `set` and
//! `delete` addresses the type-wide default instead.
//!
//! ## Records
//!
//! `preview` and `check-title` take a record as a JSON object file. Its
//! attributes feed `%%model_*%%` placeholders and its `id` selects the entry.
//! `--param key=value` feeds `%%appParam_key%%`; `--separator` overrides
//! `%%sep%%`.
//!
//! ## Logging
//!
//! Library diagnostics go to stderr. `SEOCONTENT_LOG` takes an `EnvFilter`
//! directive; `-v` turns on debug output.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command dispatch
//! - `print`: Output formatting (tables, colors, messages)
//! - `setup`: Argument parsing via clap

mod commands;
mod print;
pub mod setup;

pub use commands::run;
