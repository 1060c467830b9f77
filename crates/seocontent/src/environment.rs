//! # Substitution Environment
//!
//! Everything a template can read besides the owner record itself:
//!
//! - **Parameters**: a flat, read-only `key → value` map (`%%appParam_key%%`).
//! - **Configuration**: any [`ConfigSource`] exposing named properties
//!   (`%%appConfig_name%%`).
//! - **View parameters**: presentation-level settings. Only the title
//!   separator (`%%sep%%`) is read from here.
//!
//! Owner records are read through [`AttributeSource`].

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Read access to the attributes of an owner record.
pub trait AttributeSource {
    /// Current value of attribute `name`, or `None` when it is unreadable or null.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Whether the record has an attribute called `name` at all.
    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

/// Read access to named configuration properties.
pub trait ConfigSource {
    fn property(&self, name: &str) -> Option<String>;
}

/// Renders a scalar JSON value as template text. Null, arrays and objects have
/// no text form.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl AttributeSource for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl AttributeSource for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl AttributeSource for Value {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).and_then(scalar_text)
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.as_object().is_some_and(|o| o.contains_key(name))
    }
}

impl ConfigSource for HashMap<String, String> {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl ConfigSource for Value {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).and_then(scalar_text)
    }
}

/// Parameters, configuration and view parameters for one expansion run.
pub struct Environment {
    params: HashMap<String, String>,
    view_params: HashMap<String, String>,
    config: Box<dyn ConfigSource>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            params: HashMap::new(),
            view_params: HashMap::new(),
            config: Box::new(HashMap::<String, String>::new()),
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("params", &self.params)
            .field("view_params", &self.view_params)
            .finish_non_exhaustive()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_view_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.view_params.insert(key.into(), value.into());
        self
    }

    pub fn with_config(mut self, config: impl ConfigSource + 'static) -> Self {
        self.config = Box::new(config);
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn view_param(&self, key: &str) -> Option<&str> {
        self.view_params.get(key).map(String::as_str)
    }

    pub fn config(&self) -> &dyn ConfigSource {
        self.config.as_ref()
    }
}
