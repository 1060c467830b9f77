use crate::behavior::SeoBehavior;
use crate::config::SeoConfig;
use crate::environment::Environment;
use crate::error::{Result, SeoError};
use crate::model::SeoRow;
use crate::pattern::SEPARATOR_VIEW_PARAM;
use crate::store::EntryQuery;

/// `Page/3` for an owner entry, `Page (global)` for a type-wide default.
pub fn describe_query(query: &EntryQuery) -> String {
    match query {
        EntryQuery::ByOwner {
            owner_type,
            owner_id,
        } => format!("{owner_type}/{owner_id}"),
        EntryQuery::GlobalFor { owner_type } => format!("{owner_type} (global)"),
    }
}

pub fn describe_row(row: &SeoRow) -> String {
    if row.is_global {
        format!("{} (global)", row.owner_type)
    } else {
        format!("{}/{}", row.owner_type, row.owner_id)
    }
}

/// The query selecting an owner entry, or the global one when `owner_id` is `None`.
pub fn target(owner_type: &str, owner_id: Option<&str>) -> Result<EntryQuery> {
    if owner_type.is_empty() {
        return Err(SeoError::Config("owner type cannot be empty".to_string()));
    }
    Ok(match owner_id {
        Some("") => return Err(SeoError::Config("owner id cannot be empty".to_string())),
        Some(id) => EntryQuery::by_owner(owner_type, id),
        None => EntryQuery::global_for(owner_type),
    })
}

/// Splits `key=value`. The value may itself contain `=`.
pub fn parse_param(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(SeoError::Config(format!(
            "invalid parameter \"{raw}\", expected key=value"
        ))),
    }
}

/// Template environment: parameters, an optional separator override and the
/// configuration as `%%appConfig_*%%` source.
pub fn build_environment(
    config: &SeoConfig,
    params: &[(String, String)],
    separator: Option<&str>,
) -> Environment {
    let mut env = Environment::new()
        .with_params(params.iter().cloned())
        .with_config(config.clone());
    if let Some(sep) = separator {
        env = env.with_view_param(SEPARATOR_VIEW_PARAM, sep);
    }
    env
}

/// A fresh behavior configured from `config`.
pub fn behavior_for(config: &SeoConfig) -> Result<SeoBehavior> {
    Ok(SeoBehavior::attach(config.behavior_settings())?.with_engine(config.pattern_engine()))
}
