use crate::commands::CmdResult;
use crate::config::SeoConfig;
use crate::error::{Result, SeoError};

/// Every resolved setting as `key = value`, nested tables flattened with dots.
pub fn run(config: &SeoConfig) -> Result<CmdResult> {
    let table = toml::Value::try_from(config).map_err(|e| SeoError::Settings(e.to_string()))?;
    let mut properties = Vec::new();
    if let toml::Value::Table(t) = table {
        flatten("", &t, &mut properties);
    }
    Ok(CmdResult::default().with_properties(properties))
}

fn flatten(prefix: &str, table: &toml::value::Table, out: &mut Vec<(String, String)>) {
    for (key, value) in table {
        let key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(inner) => flatten(&key, inner, out),
            toml::Value::String(s) => out.push((key, s.clone())),
            other => out.push((key, other.to_string())),
        }
    }
}
