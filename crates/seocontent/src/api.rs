//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for clients.
//!
//! It:
//! - **Dispatches** to the matching `commands::*::run`
//! - **Normalizes inputs**: `key=value` parameter strings, JSON records,
//!   behaviors configured from [`SeoConfig`]
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does not print, format or decide exit codes.
//!
//! ## Generic Over SeoStore
//!
//! `SeoApi<S: SeoStore>` is generic over the storage backend:
//! - Production: `SeoApi<FileStore>`
//! - Testing: `SeoApi<InMemoryStore>`

use crate::commands::{self, helpers, set::FieldValues, CmdResult};
use crate::config::SeoConfig;
use crate::environment::Environment;
use crate::error::Result;
use crate::record::{JsonRecord, SeoRecord};
use crate::store::SeoStore;
use serde_json::Value;

/// Template inputs supplied by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateInput {
    /// Raw `key=value` strings for `%%appParam_key%%`.
    pub params: Vec<String>,
    /// Overrides `%%sep%%` for this call.
    pub separator: Option<String>,
}

pub struct SeoApi<S: SeoStore> {
    store: S,
    config: SeoConfig,
}

impl<S: SeoStore> SeoApi<S> {
    pub fn new(store: S, config: SeoConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SeoConfig {
        &self.config
    }

    pub fn list_entries(&self, owner_type: Option<&str>) -> Result<CmdResult> {
        commands::list::run(&self.store, owner_type)
    }

    pub fn show_entry(&self, owner_type: &str, owner_id: Option<&str>) -> Result<CmdResult> {
        commands::show::run(&self.store, owner_type, owner_id)
    }

    pub fn set_entry(
        &mut self,
        owner_type: &str,
        owner_id: Option<&str>,
        values: FieldValues,
    ) -> Result<CmdResult> {
        commands::set::run(&mut self.store, owner_type, owner_id, values)
    }

    pub fn delete_entry(&mut self, owner_type: &str, owner_id: Option<&str>) -> Result<CmdResult> {
        commands::delete::run(&mut self.store, owner_type, owner_id)
    }

    /// Expands `template` against `record` (any JSON object; `null` for none).
    pub fn expand(
        &self,
        template: &str,
        record: &Value,
        input: &TemplateInput,
    ) -> Result<CmdResult> {
        let env = self.environment(input)?;
        commands::expand::run(&self.config.pattern_engine(), template, record, &env)
    }

    pub fn preview(
        &self,
        owner_type: &str,
        record: Value,
        input: &TemplateInput,
    ) -> Result<CmdResult> {
        let env = self.environment(input)?;
        let mut record = self.record(owner_type, record)?;
        commands::preview::run(&self.store, &mut record, &env)
    }

    pub fn check_title(
        &self,
        owner_type: &str,
        record: Value,
        input: &TemplateInput,
    ) -> Result<CmdResult> {
        let env = self.environment(input)?;
        let mut record = self.record(owner_type, record)?;
        commands::check_title::run(&self.store, &mut record, &env)
    }

    pub fn migrate(&mut self) -> Result<CmdResult> {
        commands::migrate::run(&mut self.store)
    }

    pub fn schema(&self) -> Result<CmdResult> {
        commands::schema::run(&self.store)
    }

    pub fn show_config(&self) -> Result<CmdResult> {
        commands::config::run(&self.config)
    }

    fn environment(&self, input: &TemplateInput) -> Result<Environment> {
        let params = input
            .params
            .iter()
            .map(|raw| helpers::parse_param(raw))
            .collect::<Result<Vec<_>>>()?;
        Ok(helpers::build_environment(
            &self.config,
            &params,
            input.separator.as_deref(),
        ))
    }

    fn record(&self, owner_type: &str, value: Value) -> Result<SeoRecord<JsonRecord>> {
        let owner = JsonRecord::from_value(owner_type, value)?;
        Ok(SeoRecord::with_behavior(
            owner,
            helpers::behavior_for(&self.config)?,
        ))
    }
}
