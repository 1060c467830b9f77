use crate::commands::{CmdMessage, CmdResult};
use crate::environment::{AttributeSource, Environment};
use crate::error::Result;
use crate::pattern::{delimit, find_placeholders, PatternEngine};

/// Expands `template` against `record` and reports the placeholders that
/// stayed unresolved.
pub fn run(
    engine: &PatternEngine,
    template: &str,
    record: &dyn AttributeSource,
    env: &Environment,
) -> Result<CmdResult> {
    let expanded = engine.expand(template, record, env)?;

    let mut result = CmdResult::default();
    let mut reported: Vec<String> = Vec::new();
    for key in find_placeholders(template) {
        if reported.contains(&key) {
            continue;
        }
        if engine.resolve(&key, record, env)?.is_none() {
            result.add_message(CmdMessage::warning(format!(
                "Unresolved placeholder {}",
                delimit(&key)
            )));
        }
        reported.push(key);
    }

    result.expanded = Some(expanded);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_and_reports_leftovers() {
        let record = json!({"title": "Home"});
        let env = Environment::new().with_param("site", "Acme");
        let result = run(
            &PatternEngine::new(),
            " %%model_title%% %%sep%% %%appParam_site%% %%model_missing%% %%model_missing%% ",
            &record,
            &env,
        )
        .unwrap();

        assert_eq!(
            result.expanded.as_deref(),
            Some("Home - Acme %%model_missing%% %%model_missing%%")
        );
        assert_eq!(result.messages.len(), 1);
        assert_eq!(
            result.messages[0].content,
            "Unresolved placeholder %%model_missing%%"
        );
    }

    #[test]
    fn plain_text_is_trimmed() {
        let result = run(
            &PatternEngine::new(),
            "  About us ",
            &json!({}),
            &Environment::new(),
        )
        .unwrap();
        assert_eq!(result.expanded.as_deref(), Some("About us"));
        assert!(result.messages.is_empty());
    }
}
