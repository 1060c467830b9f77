//! # SEO Behavior
//!
//! [`SeoBehavior`] gives an owner record three virtual fields (by default
//! `seoTitle`, `seoKeywords` and `seoDescription`) backed by one row of the
//! `seo_content` table.
//!
//! ## Which row
//!
//! The backing entry is resolved once per attachment and kept in
//! [`EntryState`]:
//!
//! 1. the owner's own entry (`model_name` = owner type, `model_id` = primary key),
//! 2. else the global entry of the owner type,
//! 3. else a new, unsaved entry keyed to the owner.
//!
//! ## Reading
//!
//! A field that was assigned since the entry was loaded is returned verbatim.
//! Anything else is a template and goes through [`PatternEngine::expand`] with
//! the owner as the attribute source. This is what lets a single global entry
//! such as `%%model_title%% %%sep%% %%appParam_site%%` serve every record of a
//! type.
//!
//! ## Lifecycle
//!
//! The host calls [`SeoBehavior::notify_inserted`], [`SeoBehavior::notify_updated`]
//! and [`SeoBehavior::notify_deleted`] after the owner's own write. Store errors
//! propagate unchanged.
//!
//! A global entry is never written through an owner. Saving an owner whose
//! entry is the global fallback creates the owner's own entry instead, and
//! deleting such an owner leaves the global entry alone.

use crate::environment::Environment;
use crate::error::{Result, SeoError};
use crate::model::{SeoEntry, SeoField};
use crate::pattern::PatternEngine;
use crate::record::SeoOwner;
use crate::store::{EntryQuery, SeoStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Fourteen days.
pub const DEFAULT_QUERY_CACHE_DURATION: u64 = 1_209_600;

/// Which rows a title has to be unique against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleScope {
    /// Every entry of every owner type.
    #[default]
    Global,
    /// Entries of the same owner type only.
    OwnerType,
}

impl FromStr for TitleScope {
    type Err = SeoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "global" => Ok(TitleScope::Global),
            "owner_type" => Ok(TitleScope::OwnerType),
            other => Err(SeoError::Config(format!(
                "unknown title scope \"{other}\" (expected global or owner_type)"
            ))),
        }
    }
}

impl fmt::Display for TitleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleScope::Global => f.write_str("global"),
            TitleScope::OwnerType => f.write_str("owner_type"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorSettings {
    pub title_attribute: String,
    pub keywords_attribute: String,
    pub description_attribute: String,
    pub enable_query_cache: bool,
    /// Seconds.
    pub query_cache_duration: u64,
    pub title_scope: TitleScope,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            title_attribute: "seoTitle".to_string(),
            keywords_attribute: "seoKeywords".to_string(),
            description_attribute: "seoDescription".to_string(),
            enable_query_cache: false,
            query_cache_duration: DEFAULT_QUERY_CACHE_DURATION,
            title_scope: TitleScope::Global,
        }
    }
}

impl BehaviorSettings {
    /// Settings from loosely typed data, e.g. a JSON object out of a host's
    /// configuration. Missing keys keep their defaults; values of the wrong
    /// type are rejected.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(SeoError::Config(
                "SeoBehavior settings must be an object".to_string(),
            ));
        };

        let mut settings = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "title_attribute" => settings.title_attribute = string_setting(key, value)?,
                "keywords_attribute" => settings.keywords_attribute = string_setting(key, value)?,
                "description_attribute" => {
                    settings.description_attribute = string_setting(key, value)?
                }
                "enable_query_cache" => {
                    settings.enable_query_cache = value.as_bool().ok_or_else(|| {
                        SeoError::Config(
                            "SeoBehavior: enable_query_cache must be boolean".to_string(),
                        )
                    })?
                }
                "query_cache_duration" => {
                    settings.query_cache_duration = value.as_u64().ok_or_else(|| {
                        SeoError::Config(
                            "SeoBehavior: query_cache_duration must be a non-negative integer"
                                .to_string(),
                        )
                    })?
                }
                "title_scope" => settings.title_scope = string_setting(key, value)?.parse()?,
                other => {
                    return Err(SeoError::Config(format!(
                        "SeoBehavior: unknown setting \"{other}\""
                    )))
                }
            }
        }
        Ok(settings)
    }

    /// Lifetime for cached lookups, or `None` when caching is off.
    pub fn cache_duration(&self) -> Option<Duration> {
        self.enable_query_cache
            .then(|| Duration::from_secs(self.query_cache_duration))
    }

    /// Configured name of `field`'s virtual attribute.
    pub fn attribute_name(&self, field: SeoField) -> &str {
        match field {
            SeoField::Title => &self.title_attribute,
            SeoField::Keywords => &self.keywords_attribute,
            SeoField::Description => &self.description_attribute,
        }
    }

    /// The field a virtual attribute name maps to.
    pub fn field_for(&self, name: &str) -> Option<SeoField> {
        SeoField::ALL
            .into_iter()
            .find(|f| self.attribute_name(*f) == name)
    }
}

fn string_setting(key: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SeoError::Config(format!("SeoBehavior: {key} must be a string")))
}

/// Whether the backing entry has been looked up yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EntryState {
    #[default]
    Unresolved,
    Resolved(SeoEntry),
}

impl EntryState {
    pub fn entry(&self) -> Option<&SeoEntry> {
        match self {
            EntryState::Resolved(entry) => Some(entry),
            EntryState::Unresolved => None,
        }
    }

    fn get_or_try_resolve<F>(&mut self, resolve: F) -> Result<&mut SeoEntry>
    where
        F: FnOnce() -> Result<SeoEntry>,
    {
        if let EntryState::Unresolved = self {
            *self = EntryState::Resolved(resolve()?);
        }
        match self {
            EntryState::Resolved(entry) => Ok(entry),
            EntryState::Unresolved => unreachable!("state resolved above"),
        }
    }
}

/// True if `field` was assigned since `entry` was loaded or last saved.
pub fn is_field_dirty(entry: &SeoEntry, field: SeoField) -> bool {
    entry.is_dirty(field)
}

/// Binds one owner's virtual SEO fields to its `seo_content` entry.
#[derive(Debug, Clone)]
pub struct SeoBehavior {
    settings: BehaviorSettings,
    engine: PatternEngine,
    state: EntryState,
}

impl SeoBehavior {
    /// Attach with `settings`. The three attribute names must be non-empty
    /// and distinct.
    pub fn attach(settings: BehaviorSettings) -> Result<Self> {
        let names: Vec<&str> = SeoField::ALL
            .into_iter()
            .map(|f| settings.attribute_name(f))
            .collect();
        if let Some(field) = SeoField::ALL
            .into_iter()
            .find(|f| settings.attribute_name(*f).is_empty())
        {
            return Err(SeoError::Config(format!(
                "SeoBehavior: {field} attribute name cannot be empty"
            )));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(SeoError::Config(format!(
                    "SeoBehavior: attribute name \"{name}\" is used for more than one field"
                )));
            }
        }

        Ok(Self {
            settings,
            engine: PatternEngine::new(),
            state: EntryState::Unresolved,
        })
    }

    pub fn with_engine(mut self, engine: PatternEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn settings(&self) -> &BehaviorSettings {
        &self.settings
    }

    pub fn engine(&self) -> &PatternEngine {
        &self.engine
    }

    pub fn state(&self) -> &EntryState {
        &self.state
    }

    /// Forget the resolved entry; the next access looks it up again.
    pub fn reset(&mut self) {
        self.state = EntryState::Unresolved;
    }

    /// The owner's entry, else its type's global entry, else a new one.
    /// Resolved on first call and reused afterwards.
    pub fn load_or_create_entry<S, O>(&mut self, store: &S, owner: &O) -> Result<&mut SeoEntry>
    where
        S: SeoStore + ?Sized,
        O: SeoOwner,
    {
        let settings = &self.settings;
        self.state
            .get_or_try_resolve(|| resolve_entry(settings, store, owner))
    }

    /// Current value of virtual field `name`. `Ok(None)` for names that are
    /// not one of the three fields, and for fields with no stored value.
    pub fn get<S, O>(
        &mut self,
        store: &S,
        owner: &O,
        env: &Environment,
        name: &str,
    ) -> Result<Option<String>>
    where
        S: SeoStore + ?Sized,
        O: SeoOwner,
    {
        match self.settings.field_for(name) {
            Some(field) => self.get_field(store, owner, env, field),
            None => Ok(None),
        }
    }

    pub fn get_field<S, O>(
        &mut self,
        store: &S,
        owner: &O,
        env: &Environment,
        field: SeoField,
    ) -> Result<Option<String>>
    where
        S: SeoStore + ?Sized,
        O: SeoOwner,
    {
        let entry = self.load_or_create_entry(store, owner)?;
        let Some(stored) = entry.field(field) else {
            return Ok(None);
        };
        if entry.is_dirty(field) {
            return Ok(Some(stored.to_string()));
        }

        let stored = stored.to_string();
        let expanded = self.engine.expand(&stored, owner, env)?;
        tracing::debug!(%field, template = %stored, value = %expanded, "expanded seo field");
        Ok(Some(expanded))
    }

    /// Assign virtual field `name` without saving. Returns whether `name` is
    /// one of the three fields.
    pub fn set<S, O>(
        &mut self,
        store: &S,
        owner: &O,
        name: &str,
        value: Option<String>,
    ) -> Result<bool>
    where
        S: SeoStore + ?Sized,
        O: SeoOwner,
    {
        match self.settings.field_for(name) {
            Some(field) => {
                self.set_field(store, owner, field, value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn set_field<S, O>(
        &mut self,
        store: &S,
        owner: &O,
        field: SeoField,
        value: Option<String>,
    ) -> Result<()>
    where
        S: SeoStore + ?Sized,
        O: SeoOwner,
    {
        self.load_or_create_entry(store, owner)?
            .set_field(field, value);
        Ok(())
    }

    pub fn title<S: SeoStore + ?Sized, O: SeoOwner>(
        &mut self,
        store: &S,
        owner: &O,
        env: &Environment,
    ) -> Result<Option<String>> {
        self.get_field(store, owner, env, SeoField::Title)
    }

    pub fn keywords<S: SeoStore + ?Sized, O: SeoOwner>(
        &mut self,
        store: &S,
        owner: &O,
        env: &Environment,
    ) -> Result<Option<String>> {
        self.get_field(store, owner, env, SeoField::Keywords)
    }

    pub fn description<S: SeoStore + ?Sized, O: SeoOwner>(
        &mut self,
        store: &S,
        owner: &O,
        env: &Environment,
    ) -> Result<Option<String>> {
        self.get_field(store, owner, env, SeoField::Description)
    }

    pub fn set_title<S: SeoStore + ?Sized, O: SeoOwner>(
        &mut self,
        store: &S,
        owner: &O,
        value: impl Into<String>,
    ) -> Result<()> {
        self.set_field(store, owner, SeoField::Title, Some(value.into()))
    }

    pub fn set_keywords<S: SeoStore + ?Sized, O: SeoOwner>(
        &mut self,
        store: &S,
        owner: &O,
        value: impl Into<String>,
    ) -> Result<()> {
        self.set_field(store, owner, SeoField::Keywords, Some(value.into()))
    }

    pub fn set_description<S: SeoStore + ?Sized, O: SeoOwner>(
        &mut self,
        store: &S,
        owner: &O,
        value: impl Into<String>,
    ) -> Result<()> {
        self.set_field(store, owner, SeoField::Description, Some(value.into()))
    }

    /// Call after the owner was inserted.
    pub fn notify_inserted<S, O>(&mut self, store: &mut S, owner: &O, env: &Environment) -> Result<()>
    where
        S: SeoStore + ?Sized,
        O: SeoOwner,
    {
        self.save_entry(store, owner, env)
    }

    /// Call after the owner was updated.
    pub fn notify_updated<S, O>(&mut self, store: &mut S, owner: &O, env: &Environment) -> Result<()>
    where
        S: SeoStore + ?Sized,
        O: SeoOwner,
    {
        self.save_entry(store, owner, env)
    }

    /// Call after the owner was deleted. Removes the owner's own entry if it
    /// was ever saved; otherwise does nothing.
    pub fn notify_deleted<S, O>(&mut self, store: &mut S, owner: &O) -> Result<()>
    where
        S: SeoStore + ?Sized,
        O: SeoOwner,
    {
        let entry = self.load_or_create_entry(&*store, owner)?;
        if entry.is_new_record() || entry.is_global {
            return Ok(());
        }
        store.delete(entry)
    }

    fn save_entry<S, O>(&mut self, store: &mut S, owner: &O, env: &Environment) -> Result<()>
    where
        S: SeoStore + ?Sized,
        O: SeoOwner,
    {
        let mut values = Vec::with_capacity(SeoField::ALL.len());
        for field in SeoField::ALL {
            values.push((field, self.get_field(&*store, owner, env, field)?));
        }

        let entry = self.load_or_create_entry(&*store, owner)?;
        if entry.is_global {
            tracing::debug!(owner_type = owner.owner_type(), "saving owner entry instead of the global one");
            *entry = new_entry(owner);
        } else if entry.is_new_record() {
            // The primary key may have been assigned by the owner's insert.
            entry.owner_type = owner.owner_type().to_string();
            entry.owner_id = owner.primary_key().unwrap_or_default();
        }

        for (field, value) in values {
            entry.set_field(field, value);
        }
        store.save(entry)
    }

    /// Assign the owner's current title to the entry and check it against the
    /// other entries. Each problem is added to the owner's title attribute;
    /// returns `false` if there were any.
    pub fn validate_title_uniqueness<S, O>(
        &mut self,
        store: &S,
        owner: &mut O,
        env: &Environment,
    ) -> Result<bool>
    where
        S: SeoStore + ?Sized,
        O: SeoOwner,
    {
        let title = self.get_field(store, &*owner, env, SeoField::Title)?;
        let scope = self.settings.title_scope;
        let attribute = self.settings.title_attribute.clone();
        let label = owner.attribute_label(&attribute);

        let entry = self.load_or_create_entry(store, &*owner)?;
        entry.set_field(SeoField::Title, title);

        let mut errors = Vec::new();
        if entry.validate_length(SeoField::Title).is_some() {
            errors.push(format!(
                "{label} should contain at most {} characters.",
                SeoField::Title.max_len()
            ));
        }

        if let Some(title) = entry.title().filter(|t| !t.is_empty()) {
            let taken = store.find_by_title(title)?.into_iter().any(|row| {
                Some(row.id) != entry.id()
                    && (scope == TitleScope::Global || row.owner_type == entry.owner_type)
            });
            if taken {
                errors.push(format!("{label} \"{title}\" has already been taken."));
            }
        }

        let valid = errors.is_empty();
        for message in errors {
            owner.add_error(&attribute, message);
        }
        Ok(valid)
    }
}

fn new_entry<O: SeoOwner>(owner: &O) -> SeoEntry {
    SeoEntry::new(owner.owner_type(), owner.primary_key().unwrap_or_default())
}

fn resolve_entry<S, O>(settings: &BehaviorSettings, store: &S, owner: &O) -> Result<SeoEntry>
where
    S: SeoStore + ?Sized,
    O: SeoOwner,
{
    let cache = settings.cache_duration();
    let owner_type = owner.owner_type();

    if let Some(owner_id) = owner.primary_key() {
        if let Some(entry) = store.find_one(&EntryQuery::by_owner(owner_type, owner_id), cache)? {
            tracing::debug!(owner_type, id = entry.id(), "resolved owner seo entry");
            return Ok(entry);
        }
    }

    if let Some(entry) = store.find_one(&EntryQuery::global_for(owner_type), cache)? {
        tracing::debug!(owner_type, id = entry.id(), "resolved global seo entry");
        return Ok(entry);
    }

    tracing::debug!(owner_type, "no seo entry yet, starting a new one");
    Ok(new_entry(owner))
}
