//! # CLI Layer
//!
//! The CLI layer is the **only** place in the workspace that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Decides exit codes
//! - Installs a tracing subscriber
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: clap, see `setup.rs`
//! 2. **Context Setup**: data directory, configuration and API via `seocontent::init`
//! 3. **Dispatch**: one `SeoApi` call per command
//! 4. **Output**: `print.rs`

use super::print;
use super::setup::{Cli, Commands, TemplateArgs};
use anyhow::{bail, Context, Result};
use clap::Parser;
use seocontent::api::{SeoApi, TemplateInput};
use seocontent::commands::set::FieldValues;
use seocontent::commands::CmdResult;
use seocontent::init::initialize;
use seocontent::store::fs::FileStore;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SEOCONTENT_LOG";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let ctx = initialize(&cwd, cli.global, cli.data.clone())?;
    tracing::debug!(data_dir = %ctx.data_dir.display(), scope = ?ctx.scope, "dispatching");

    let detailed = matches!(cli.command, Commands::Show { .. });
    let result = dispatch(ctx.api, cli.command)?;
    print::print_result(&result, detailed);

    if result.has_errors() {
        bail!("command reported errors");
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn dispatch(mut api: SeoApi<FileStore>, command: Commands) -> Result<CmdResult> {
    let result = match command {
        Commands::List { owner_type } => api.list_entries(owner_type.as_deref())?,
        Commands::Show {
            owner_type,
            owner_id,
        } => api.show_entry(&owner_type, owner_id.as_deref())?,
        Commands::Set {
            owner_type,
            owner_id,
            global_default: _,
            title,
            keywords,
            description,
        } => api.set_entry(
            &owner_type,
            owner_id.as_deref(),
            FieldValues {
                title,
                keywords,
                description,
            },
        )?,
        Commands::Delete {
            owner_type,
            owner_id,
            global_default: _,
        } => api.delete_entry(&owner_type, owner_id.as_deref())?,
        Commands::Expand {
            template,
            record,
            template_args,
        } => {
            let record = match record {
                Some(path) => read_record(&path)?,
                None => Value::Null,
            };
            api.expand(&template, &record, &template_input(template_args))?
        }
        Commands::Preview {
            owner_type,
            record,
            template_args,
        } => api.preview(
            &owner_type,
            read_record(&record)?,
            &template_input(template_args),
        )?,
        Commands::CheckTitle {
            owner_type,
            record,
            template_args,
        } => api.check_title(
            &owner_type,
            read_record(&record)?,
            &template_input(template_args),
        )?,
        Commands::Migrate => api.migrate()?,
        Commands::Schema => api.schema()?,
        Commands::Config => api.show_config()?,
    };
    Ok(result)
}

fn template_input(args: TemplateArgs) -> TemplateInput {
    TemplateInput {
        params: args.params,
        separator: args.separator,
    }
}

fn read_record(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading record {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing record {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seocontent::config::SeoConfig;

    #[test]
    fn read_record_reports_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(&path, "{ broken").unwrap();

        let err = read_record(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing record"));
        assert!(read_record(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn dispatch_set_then_show() {
        let dir = tempfile::tempdir().unwrap();
        let api = SeoApi::new(FileStore::new(dir.path()), SeoConfig::default());

        let cli = Cli::try_parse_from(["seocontent", "set", "Page", "--global-default", "--title", "%%model_title%%"]).unwrap();
        let result = dispatch(api, cli.command).unwrap();
        assert_eq!(result.affected_entries.len(), 1);

        let api = SeoApi::new(FileStore::new(dir.path()), SeoConfig::default());
        let cli = Cli::try_parse_from(["seocontent", "show", "Page"]).unwrap();
        let result = dispatch(api, cli.command).unwrap();
        assert_eq!(
            result.listed_entries[0].text.title.as_deref(),
            Some("%%model_title%%")
        );
    }
}
