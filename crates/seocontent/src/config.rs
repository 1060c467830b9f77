//! # Configuration
//!
//! seocontent configuration is a [`confique`] struct loaded in layers by
//! `clapfig` (see [`crate::init`]).
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `SEOCONTENT__SEPARATOR`, `SEOCONTENT__TITLE_SCOPE`, etc.
//! 2. **Project Config**: `.seocontent/seocontent.toml`.
//! 3. **Global Config**: OS-appropriate data directory (via `directories` crate).
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `separator` | `-` | `%%sep%%` value when the view sets no `titleSeparator` |
//! | `strict_attributes` | `false` | Unknown `%%model_x%%` attributes are errors |
//! | `enable_query_cache` | `false` | Cache entry lookups |
//! | `query_cache_duration` | `1209600` | Cache lifetime in seconds |
//! | `title_attribute` | `seoTitle` | Virtual title field name |
//! | `keywords_attribute` | `seoKeywords` | Virtual keywords field name |
//! | `description_attribute` | `seoDescription` | Virtual description field name |
//! | `title_scope` | `global` | `global` or `owner_type` |
//! | `app` | none | Extra values for `%%appConfig_name%%` |

use crate::behavior::{BehaviorSettings, TitleScope, DEFAULT_QUERY_CACHE_DURATION};
use crate::environment::{scalar_text, ConfigSource};
use crate::pattern::{MissingAttribute, PatternEngine, DEFAULT_SEPARATOR};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CONFIG_FILENAME: &str = "seocontent.toml";

/// Configuration for seocontent, stored in `seocontent.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SeoConfig {
    /// Value of %%sep%% when the view does not set titleSeparator.
    #[config(default = "-")]
    pub separator: String,

    /// Fail on %%model_x%% when the record has no attribute x.
    #[config(default = false)]
    pub strict_attributes: bool,

    #[config(default = false)]
    pub enable_query_cache: bool,

    /// Seconds.
    #[config(default = 1209600)]
    pub query_cache_duration: u64,

    #[config(default = "seoTitle")]
    pub title_attribute: String,

    #[config(default = "seoKeywords")]
    pub keywords_attribute: String,

    #[config(default = "seoDescription")]
    pub description_attribute: String,

    /// "global" or "owner_type".
    #[config(default = "global")]
    pub title_scope: TitleScope,

    /// Application values readable from templates as %%appConfig_name%%.
    pub app: Option<BTreeMap<String, String>>,
}

impl Default for SeoConfig {
    fn default() -> Self {
        let settings = BehaviorSettings::default();
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            strict_attributes: false,
            enable_query_cache: settings.enable_query_cache,
            query_cache_duration: DEFAULT_QUERY_CACHE_DURATION,
            title_attribute: settings.title_attribute,
            keywords_attribute: settings.keywords_attribute,
            description_attribute: settings.description_attribute,
            title_scope: settings.title_scope,
            app: None,
        }
    }
}

impl SeoConfig {
    pub fn behavior_settings(&self) -> BehaviorSettings {
        BehaviorSettings {
            title_attribute: self.title_attribute.clone(),
            keywords_attribute: self.keywords_attribute.clone(),
            description_attribute: self.description_attribute.clone(),
            enable_query_cache: self.enable_query_cache,
            query_cache_duration: self.query_cache_duration,
            title_scope: self.title_scope,
        }
    }

    pub fn pattern_engine(&self) -> PatternEngine {
        let policy = if self.strict_attributes {
            MissingAttribute::Error
        } else {
            MissingAttribute::Absent
        };
        PatternEngine::new()
            .with_separator(self.separator.clone())
            .with_missing_attribute(policy)
    }
}

/// `app.<name>` first, then the settings themselves.
impl ConfigSource for SeoConfig {
    fn property(&self, name: &str) -> Option<String> {
        if let Some(value) = self.app.as_ref().and_then(|app| app.get(name)) {
            return Some(value.clone());
        }
        match serde_json::to_value(self).ok()?.get(name) {
            Some(value) => scalar_text(value),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SeoConfig::default();
        assert_eq!(config.separator, "-");
        assert!(!config.enable_query_cache);
        assert_eq!(config.query_cache_duration, 1_209_600);
        assert_eq!(config.behavior_settings(), BehaviorSettings::default());
    }

    #[test]
    fn test_behavior_settings_follow_config() {
        let config = SeoConfig {
            title_attribute: "metaTitle".to_string(),
            enable_query_cache: true,
            query_cache_duration: 30,
            title_scope: TitleScope::OwnerType,
            ..Default::default()
        };
        let settings = config.behavior_settings();
        assert_eq!(settings.title_attribute, "metaTitle");
        assert_eq!(
            settings.cache_duration(),
            Some(std::time::Duration::from_secs(30))
        );
        assert_eq!(settings.title_scope, TitleScope::OwnerType);
    }

    #[test]
    fn test_pattern_engine_uses_separator() {
        let config = SeoConfig {
            separator: "·".to_string(),
            ..Default::default()
        };
        assert_eq!(config.pattern_engine().separator(), "·");
    }

    #[test]
    fn test_properties_for_app_config_placeholders() {
        let mut app = BTreeMap::new();
        app.insert("siteName".to_string(), "Acme".to_string());
        let config = SeoConfig {
            app: Some(app),
            ..Default::default()
        };
        assert_eq!(config.property("siteName").as_deref(), Some("Acme"));
        assert_eq!(config.property("separator").as_deref(), Some("-"));
        assert_eq!(config.property("enable_query_cache").as_deref(), Some("false"));
        assert_eq!(config.property("app"), None);
        assert_eq!(config.property("missing"), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "separator = \"|\"\ntitle_scope = \"owner_type\"\n\n[app]\nsiteName = \"Acme\"\n",
        )
        .unwrap();

        let config = SeoConfig::builder().file(&path).load().unwrap();
        assert_eq!(config.separator, "|");
        assert_eq!(config.title_scope, TitleScope::OwnerType);
        assert_eq!(config.title_attribute, "seoTitle");
        assert_eq!(config.property("siteName").as_deref(), Some("Acme"));
    }
}
