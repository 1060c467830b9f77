//! # Placeholder Language
//!
//! SEO texts may embed placeholders of the form `%%key%%`. The key's prefix
//! picks the strategy that produces the replacement:
//!
//! | Placeholder          | Replaced with                                      |
//! |----------------------|----------------------------------------------------|
//! | `%%model_title%%`    | attribute `title` of the owner record              |
//! | `%%appParam_site%%`  | parameter `site` from the [`Environment`]          |
//! | `%%appConfig_name%%` | configuration property `name`                      |
//! | `%%sep%%`            | view parameter `titleSeparator`, else the default  |
//!
//! Anything that does not resolve stays in the output verbatim, delimiters
//! included. Expansion is a single pass: replacement text is never scanned
//! for further placeholders.
//!
//! ```
//! use seocontent::environment::Environment;
//! use seocontent::pattern::PatternEngine;
//! use std::collections::HashMap;
//!
//! let mut page = HashMap::new();
//! page.insert("title".to_string(), "Home".to_string());
//!
//! let env = Environment::new()
//!     .with_param("site", "Acme")
//!     .with_view_param("titleSeparator", "|");
//!
//! let text = PatternEngine::new()
//!     .expand("%%model_title%% %%sep%% %%appParam_site%%", &page, &env)
//!     .unwrap();
//! assert_eq!(text, "Home | Acme");
//! ```

use crate::environment::{AttributeSource, Environment};
use crate::error::{Result, SeoError};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt;

pub const DELIMITER: &str = "%%";
pub const DEFAULT_SEPARATOR: &str = "-";
/// View parameter consulted for `%%sep%%`.
pub const SEPARATOR_VIEW_PARAM: &str = "titleSeparator";

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    let delim = regex::escape(DELIMITER);
    let first = regex::escape(&DELIMITER[..1]);
    Regex::new(&format!("{delim}([^{first}]+)(?:{delim}|$)")).expect("placeholder pattern")
});

// `<` followed by whitespace is literal text, not a tag opener.
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<[^\s>][^>]*(?:>|$)").expect("tag pattern"));

/// Which strategy a placeholder key selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverKind {
    ModelAttribute,
    AppParam,
    AppConfig,
    Separator,
}

impl ResolverKind {
    pub const ALL: [ResolverKind; 4] = [
        ResolverKind::ModelAttribute,
        ResolverKind::AppParam,
        ResolverKind::AppConfig,
        ResolverKind::Separator,
    ];

    /// Key prefix, or for the separator the whole key.
    pub fn prefix(self) -> &'static str {
        match self {
            ResolverKind::ModelAttribute => "model_",
            ResolverKind::AppParam => "appParam_",
            ResolverKind::AppConfig => "appConfig_",
            ResolverKind::Separator => "sep",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|k| *k != ResolverKind::Separator)
            .find(|k| k.prefix() == prefix)
    }
}

/// What a `model_` placeholder does when the owner lacks the attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingAttribute {
    /// Leave the placeholder unresolved.
    #[default]
    Absent,
    /// Fail with a configuration error.
    Error,
}

/// Inputs available to a resolver strategy.
pub struct PatternContext<'a> {
    pub owner: &'a dyn AttributeSource,
    pub env: &'a Environment,
    pub default_separator: &'a str,
}

/// A resolver strategy: argument and context in, replacement out.
pub type ResolveFn = fn(&str, &PatternContext<'_>) -> Option<String>;

fn resolve_model_attribute(name: &str, ctx: &PatternContext<'_>) -> Option<String> {
    ctx.owner.attribute(name)
}

fn resolve_app_param(key: &str, ctx: &PatternContext<'_>) -> Option<String> {
    ctx.env.param(key).map(str::to_string)
}

fn resolve_app_config(name: &str, ctx: &PatternContext<'_>) -> Option<String> {
    ctx.env.config().property(name)
}

fn resolve_separator(_: &str, ctx: &PatternContext<'_>) -> Option<String> {
    let sep = ctx
        .env
        .view_param(SEPARATOR_VIEW_PARAM)
        .unwrap_or(ctx.default_separator);
    Some(sep.to_string())
}

/// Removes markup tags so they cannot smuggle placeholders into a template.
pub fn strip_tags(input: &str) -> String {
    TAG_RE.replace_all(input, "").into_owned()
}

/// Every placeholder key in `template`, in order, duplicates kept.
pub fn find_placeholders(template: &str) -> Vec<String> {
    let sanitized = strip_tags(template);
    PLACEHOLDER_RE
        .captures_iter(&sanitized)
        .map(|c| c[1].to_string())
        .collect()
}

/// Splits a key into its strategy and the strategy's argument.
///
/// Keys with no known prefix come back unchanged with no strategy.
pub fn classify_key(key: &str) -> (Option<ResolverKind>, &str) {
    if key == ResolverKind::Separator.prefix() {
        return (Some(ResolverKind::Separator), "");
    }
    if let Some(pos) = key.find('_') {
        let (prefix, argument) = key.split_at(pos + 1);
        if let Some(kind) = ResolverKind::from_prefix(prefix) {
            return (Some(kind), argument);
        }
    }
    (None, key)
}

pub fn delimit(key: &str) -> String {
    format!("{DELIMITER}{key}{DELIMITER}")
}

/// Expands templates through a table of resolver strategies.
#[derive(Clone)]
pub struct PatternEngine {
    resolvers: HashMap<ResolverKind, ResolveFn>,
    separator: String,
    missing_attribute: MissingAttribute,
}

impl fmt::Debug for PatternEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.resolvers.keys().map(|k| k.prefix()).collect();
        kinds.sort_unstable();
        f.debug_struct("PatternEngine")
            .field("resolvers", &kinds)
            .field("separator", &self.separator)
            .field("missing_attribute", &self.missing_attribute)
            .finish()
    }
}

impl Default for PatternEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternEngine {
    /// Engine with the four built-in strategies.
    pub fn new() -> Self {
        let mut resolvers: HashMap<ResolverKind, ResolveFn> = HashMap::new();
        resolvers.insert(ResolverKind::ModelAttribute, resolve_model_attribute);
        resolvers.insert(ResolverKind::AppParam, resolve_app_param);
        resolvers.insert(ResolverKind::AppConfig, resolve_app_config);
        resolvers.insert(ResolverKind::Separator, resolve_separator);
        Self {
            resolvers,
            separator: DEFAULT_SEPARATOR.to_string(),
            missing_attribute: MissingAttribute::default(),
        }
    }

    /// Separator used when the view parameters define none.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_missing_attribute(mut self, policy: MissingAttribute) -> Self {
        self.missing_attribute = policy;
        self
    }

    pub fn with_resolver(mut self, kind: ResolverKind, resolve: ResolveFn) -> Self {
        self.resolvers.insert(kind, resolve);
        self
    }

    pub fn without_resolver(mut self, kind: ResolverKind) -> Self {
        self.resolvers.remove(&kind);
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    fn context<'a>(
        &'a self,
        owner: &'a dyn AttributeSource,
        env: &'a Environment,
    ) -> PatternContext<'a> {
        PatternContext {
            owner,
            env,
            default_separator: &self.separator,
        }
    }

    /// Value for one placeholder key, or `None` if it stays unresolved.
    pub fn resolve(
        &self,
        key: &str,
        owner: &dyn AttributeSource,
        env: &Environment,
    ) -> Result<Option<String>> {
        self.resolve_in(key, &self.context(owner, env))
    }

    fn resolve_in(&self, key: &str, ctx: &PatternContext<'_>) -> Result<Option<String>> {
        let (kind, argument) = classify_key(key);
        let Some(kind) = kind else {
            return Ok(None);
        };

        let resolve = self.resolvers.get(&kind).ok_or_else(|| {
            SeoError::Config(format!(
                "no resolver registered for placeholder prefix \"{}\"",
                kind.prefix()
            ))
        })?;

        let value = resolve(argument, ctx);
        if value.is_none()
            && kind == ResolverKind::ModelAttribute
            && self.missing_attribute == MissingAttribute::Error
            && !ctx.owner.has_attribute(argument)
        {
            return Err(SeoError::Config(format!(
                "owner has no attribute \"{}\" (placeholder {})",
                argument,
                delimit(key)
            )));
        }
        Ok(value)
    }

    /// Substitutes every resolvable placeholder in `template` and trims the result.
    pub fn expand(
        &self,
        template: &str,
        owner: &dyn AttributeSource,
        env: &Environment,
    ) -> Result<String> {
        if template.is_empty() {
            return Ok(String::new());
        }

        let ctx = self.context(owner, env);
        let mut replacements: HashMap<String, String> = HashMap::new();
        for key in find_placeholders(template) {
            let delimited = delimit(&key);
            if replacements.contains_key(&delimited) {
                continue;
            }
            match self.resolve_in(&key, &ctx)? {
                Some(value) => {
                    replacements.insert(delimited, value);
                }
                None => tracing::trace!(placeholder = %delimited, "placeholder left unresolved"),
            }
        }

        if replacements.is_empty() {
            return Ok(template.trim().to_string());
        }

        Ok(replace_literal(template, &replacements).trim().to_string())
    }
}

/// One left-to-right pass replacing any of the map's keys with its value.
fn replace_literal(haystack: &str, replacements: &HashMap<String, String>) -> String {
    let mut needles: Vec<&str> = replacements.keys().map(String::as_str).collect();
    // Longer needles first so a key never loses to one of its own prefixes.
    needles.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = needles
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");

    match Regex::new(&alternation) {
        Ok(re) => re
            .replace_all(haystack, |caps: &Captures<'_>| {
                replacements
                    .get(&caps[0])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned(),
        Err(_) => {
            // Only reachable past the regex size limit; fall back to sequential passes.
            let mut out = haystack.to_string();
            for needle in needles {
                out = out.replace(needle, &replacements[needle]);
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn page(title: &str) -> HashMap<String, String> {
        let mut attrs = HashMap::new();
        attrs.insert("title".to_string(), title.to_string());
        attrs
    }

    #[test]
    fn finds_keys_in_order_with_duplicates() {
        let keys = find_placeholders("%%model_title%% - %%sep%% %%model_title%%");
        assert_eq!(keys, vec!["model_title", "sep", "model_title"]);
    }

    #[test]
    fn finds_unterminated_placeholder_at_end() {
        assert_eq!(find_placeholders("Buy %%model_name"), vec!["model_name"]);
    }

    #[test]
    fn ignores_placeholders_hidden_in_tags() {
        let keys = find_placeholders(r#"<a title="%%appParam_secret%%">%%model_title%%</a>"#);
        assert_eq!(keys, vec!["model_title"]);
    }

    #[test]
    fn bare_less_than_is_not_a_tag() {
        assert_eq!(
            find_placeholders("Deals < 50 EUR %%model_title%%"),
            vec!["model_title"]
        );
        assert_eq!(strip_tags("a < b <i>c</i>"), "a < b c");
    }

    #[test]
    fn no_match_when_key_is_empty() {
        assert!(find_placeholders("100%%").is_empty());
        assert!(find_placeholders("%%%%").is_empty());
    }

    #[test]
    fn classify_known_prefixes() {
        assert_eq!(
            classify_key("model_title"),
            (Some(ResolverKind::ModelAttribute), "title")
        );
        assert_eq!(
            classify_key("appParam_site_name"),
            (Some(ResolverKind::AppParam), "site_name")
        );
        assert_eq!(
            classify_key("appConfig_name"),
            (Some(ResolverKind::AppConfig), "name")
        );
        assert_eq!(classify_key("sep"), (Some(ResolverKind::Separator), ""));
    }

    #[test]
    fn classify_unknown_prefix() {
        assert_eq!(classify_key("user_name"), (None, "user_name"));
        assert_eq!(classify_key("separator"), (None, "separator"));
        assert_eq!(classify_key("title"), (None, "title"));
    }

    #[test]
    fn expands_the_reference_example() {
        let env = Environment::new()
            .with_param("site", "Acme")
            .with_view_param(SEPARATOR_VIEW_PARAM, "|");
        let out = PatternEngine::new()
            .expand("%%model_title%% %%sep%% %%appParam_site%%", &page("Home"), &env)
            .unwrap();
        assert_eq!(out, "Home | Acme");
    }

    #[test]
    fn separator_falls_back_to_engine_default() {
        let env = Environment::new();
        let engine = PatternEngine::new();
        assert_eq!(engine.expand("a %%sep%% b", &page(""), &env).unwrap(), "a - b");

        let engine = PatternEngine::new().with_separator("::");
        assert_eq!(engine.expand("a %%sep%% b", &page(""), &env).unwrap(), "a :: b");
    }

    #[test]
    fn config_properties_resolve() {
        let mut config = BTreeMap::new();
        config.insert("name".to_string(), "Acme".to_string());
        let env = Environment::new().with_config(config);
        let out = PatternEngine::new()
            .expand("Welcome to %%appConfig_name%%", &page(""), &env)
            .unwrap();
        assert_eq!(out, "Welcome to Acme");
    }

    #[test]
    fn unresolved_placeholders_stay_verbatim() {
        let env = Environment::new();
        let out = PatternEngine::new()
            .expand(
                "%%model_missing%% %%appParam_nope%% %%user_name%% %%model_title%%",
                &page("Home"),
                &env,
            )
            .unwrap();
        assert_eq!(out, "%%model_missing%% %%appParam_nope%% %%user_name%% Home");
    }

    #[test]
    fn plain_text_is_only_trimmed() {
        let env = Environment::new();
        let engine = PatternEngine::new();
        assert_eq!(engine.expand("  Plain title \n", &page(""), &env).unwrap(), "Plain title");
        assert_eq!(engine.expand("", &page(""), &env).unwrap(), "");
    }

    #[test]
    fn replacement_values_are_not_rescanned() {
        let env = Environment::new().with_param("site", "Acme");
        let out = PatternEngine::new()
            .expand("%%model_title%%", &page("%%appParam_site%%"), &env)
            .unwrap();
        assert_eq!(out, "%%appParam_site%%");
    }

    #[test]
    fn expanding_expanded_output_is_stable() {
        let env = Environment::new().with_param("site", "Acme");
        let engine = PatternEngine::new();
        let once = engine
            .expand(" %%model_title%% %%sep%% %%appParam_site%% ", &page("Home"), &env)
            .unwrap();
        let twice = engine.expand(&once, &page("Home"), &env).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        let env = Environment::new();
        let out = PatternEngine::new()
            .expand("%%model_title%%, %%model_title%%!", &page("Go"), &env)
            .unwrap();
        assert_eq!(out, "Go, Go!");
    }

    #[test]
    fn markup_outside_placeholders_is_kept() {
        let env = Environment::new();
        let out = PatternEngine::new()
            .expand("<b>%%model_title%%</b>", &page("Home"), &env)
            .unwrap();
        assert_eq!(out, "<b>Home</b>");
    }

    #[test]
    fn comparison_text_before_placeholder_expands() {
        let env = Environment::new();
        let out = PatternEngine::new()
            .expand("Deals < 50 EUR %%model_title%%", &page("Shoes"), &env)
            .unwrap();
        assert_eq!(out, "Deals < 50 EUR Shoes");
    }

    #[test]
    fn strict_policy_rejects_missing_attributes() {
        let env = Environment::new();
        let engine = PatternEngine::new().with_missing_attribute(MissingAttribute::Error);
        let err = engine
            .expand("%%model_missing%%", &page("Home"), &env)
            .unwrap_err();
        assert!(matches!(err, SeoError::Config(msg) if msg.contains("missing")));

        assert_eq!(
            engine.expand("%%model_title%%", &page("Home"), &env).unwrap(),
            "Home"
        );
    }

    #[test]
    fn removed_strategy_is_a_configuration_error() {
        let env = Environment::new();
        let engine = PatternEngine::new().without_resolver(ResolverKind::AppParam);
        let err = engine
            .expand("%%appParam_site%%", &page(""), &env)
            .unwrap_err();
        assert!(matches!(err, SeoError::Config(_)));

        // Keys that classify to nothing never reach the strategy table.
        assert_eq!(
            engine.expand("%%other_site%%", &page(""), &env).unwrap(),
            "%%other_site%%"
        );
    }

    #[test]
    fn custom_strategy_replaces_builtin() {
        fn shout(name: &str, ctx: &PatternContext<'_>) -> Option<String> {
            ctx.owner.attribute(name).map(|v| v.to_uppercase())
        }
        let env = Environment::new();
        let engine = PatternEngine::new().with_resolver(ResolverKind::ModelAttribute, shout);
        assert_eq!(
            engine.expand("%%model_title%%", &page("home"), &env).unwrap(),
            "HOME"
        );
    }

    #[test]
    fn resolve_single_key() {
        let env = Environment::new().with_param("site", "Acme");
        let engine = PatternEngine::new();
        assert_eq!(
            engine.resolve("appParam_site", &page(""), &env).unwrap().as_deref(),
            Some("Acme")
        );
        assert_eq!(engine.resolve("whatever", &page(""), &env).unwrap(), None);
    }
}
