//! # Owner Records
//!
//! [`SeoOwner`] is what the behavior needs from a host record: its type name,
//! its primary key, readable attributes (via [`AttributeSource`]), labels for
//! error messages and a place to put validation errors.
//!
//! [`SeoRecord`] pairs an owner with its attached [`SeoBehavior`]. Code that
//! only has a record (the publishing helpers, the CLI) goes through it, and gets
//! a configuration error when the record was never given a behavior.
//!
//! [`JsonRecord`] is an owner backed by a JSON object, for records that do not
//! have a Rust type of their own.

use crate::behavior::SeoBehavior;
use crate::environment::{scalar_text, AttributeSource, Environment};
use crate::error::{Result, SeoError};
use crate::store::SeoStore;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A host record that can carry SEO metadata.
pub trait SeoOwner: AttributeSource {
    /// Stored as `model_name`.
    fn owner_type(&self) -> &str;

    /// Stored as `model_id`. `None` until the record has been inserted.
    fn primary_key(&self) -> Option<String>;

    /// Human-readable label for `attribute`, used in error messages.
    fn attribute_label(&self, attribute: &str) -> String {
        generate_label(attribute)
    }

    /// Attach a validation error to `attribute`.
    fn add_error(&mut self, attribute: &str, message: String);
}

/// `seoTitle` → `Seo Title`, `meta_description` → `Meta Description`.
pub fn generate_label(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in name.chars() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn missing_behavior(owner_type: &str) -> SeoError {
    SeoError::Config(format!("Model {owner_type} must have SeoBehavior"))
}

/// An owner together with its (optional) behavior.
pub struct SeoRecord<O> {
    pub owner: O,
    behavior: Option<SeoBehavior>,
}

impl<O: SeoOwner> SeoRecord<O> {
    /// A record with no behavior attached.
    pub fn new(owner: O) -> Self {
        Self {
            owner,
            behavior: None,
        }
    }

    pub fn with_behavior(owner: O, behavior: SeoBehavior) -> Self {
        Self {
            owner,
            behavior: Some(behavior),
        }
    }

    pub fn attach(&mut self, behavior: SeoBehavior) {
        self.behavior = Some(behavior);
    }

    pub fn detach(&mut self) -> Option<SeoBehavior> {
        self.behavior.take()
    }

    pub fn behavior(&self) -> Result<&SeoBehavior> {
        self.behavior
            .as_ref()
            .ok_or_else(|| missing_behavior(self.owner.owner_type()))
    }

    /// Split borrow: the behavior mutably, the owner mutably.
    pub fn parts_mut(&mut self) -> Result<(&mut SeoBehavior, &mut O)> {
        match self.behavior.as_mut() {
            Some(behavior) => Ok((behavior, &mut self.owner)),
            None => Err(missing_behavior(self.owner.owner_type())),
        }
    }

    /// Virtual field by its configured name.
    pub fn get<S: SeoStore + ?Sized>(
        &mut self,
        store: &S,
        env: &Environment,
        name: &str,
    ) -> Result<Option<String>> {
        let (behavior, owner) = self.parts_mut()?;
        behavior.get(store, &*owner, env, name)
    }

    pub fn set<S: SeoStore + ?Sized>(
        &mut self,
        store: &S,
        name: &str,
        value: Option<String>,
    ) -> Result<bool> {
        let (behavior, owner) = self.parts_mut()?;
        behavior.set(store, &*owner, name, value)
    }

    pub fn notify_inserted<S: SeoStore + ?Sized>(
        &mut self,
        store: &mut S,
        env: &Environment,
    ) -> Result<()> {
        let (behavior, owner) = self.parts_mut()?;
        behavior.notify_inserted(store, &*owner, env)
    }

    pub fn notify_updated<S: SeoStore + ?Sized>(
        &mut self,
        store: &mut S,
        env: &Environment,
    ) -> Result<()> {
        let (behavior, owner) = self.parts_mut()?;
        behavior.notify_updated(store, &*owner, env)
    }

    pub fn notify_deleted<S: SeoStore + ?Sized>(&mut self, store: &mut S) -> Result<()> {
        let (behavior, owner) = self.parts_mut()?;
        behavior.notify_deleted(store, &*owner)
    }

    pub fn validate_title_uniqueness<S: SeoStore + ?Sized>(
        &mut self,
        store: &S,
        env: &Environment,
    ) -> Result<bool> {
        let (behavior, owner) = self.parts_mut()?;
        behavior.validate_title_uniqueness(store, owner, env)
    }
}

/// An owner record held as a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    owner_type: String,
    primary_key_attribute: String,
    attributes: Map<String, Value>,
    labels: BTreeMap<String, String>,
    errors: BTreeMap<String, Vec<String>>,
}

impl JsonRecord {
    /// `value` must be a JSON object. The primary key is read from `id`.
    pub fn from_value(owner_type: impl Into<String>, value: Value) -> Result<Self> {
        let owner_type = owner_type.into();
        match value {
            Value::Object(attributes) => Ok(Self {
                owner_type,
                primary_key_attribute: "id".to_string(),
                attributes,
                labels: BTreeMap::new(),
                errors: BTreeMap::new(),
            }),
            other => Err(SeoError::Config(format!(
                "{owner_type} record must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn with_primary_key_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.primary_key_attribute = attribute.into();
        self
    }

    pub fn with_label(mut self, attribute: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(attribute.into(), label.into());
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Errors added by validation, keyed by attribute.
    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl AttributeSource for JsonRecord {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).and_then(scalar_text)
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

impl SeoOwner for JsonRecord {
    fn owner_type(&self) -> &str {
        &self.owner_type
    }

    fn primary_key(&self) -> Option<String> {
        self.attribute(&self.primary_key_attribute)
    }

    fn attribute_label(&self, attribute: &str) -> String {
        self.labels
            .get(attribute)
            .cloned()
            .unwrap_or_else(|| generate_label(attribute))
    }

    fn add_error(&mut self, attribute: &str, message: String) {
        self.errors
            .entry(attribute.to_string())
            .or_default()
            .push(message);
    }
}
