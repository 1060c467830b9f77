//! # SeoContent CLI
//!
//! The binary is thin: the CLI lives in `src/cli/`, while this file only
//! invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/seocontent/`: the library (behavior, templates, storage, commands)
//! - `crates/seocontent-cli/`: this tool, an administration client over a
//!   file-backed `seo_content` table
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/seocontent-cli/src/cli/)                 │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal output (print.rs)                               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/seocontent/src/api.rs)                   │
//! │  - Parses params and JSON records, dispatches to commands   │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward is UI agnostic. The CLI owns argument
//! parsing, logging setup, printing and exit codes.
//!
//! ## Testing Approach
//!
//! Business logic is tested in the library. Here, `tests/cli.rs` drives the
//! built binary with `assert_cmd` against temporary data directories, and the
//! argument parser and printers carry their own unit tests.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
