//! # Publishing
//!
//! Pushes a record's resolved SEO fields to the presentation layer through a
//! [`TagSink`]: the page title and `title`/`keywords`/`description` meta tags.
//! Fields that resolve to nothing or to an empty string are not published.

use crate::environment::Environment;
use crate::error::Result;
use crate::model::SeoField;
use crate::record::{SeoOwner, SeoRecord};
use crate::store::SeoStore;

/// Where published values go.
pub trait TagSink {
    /// Register `<meta name="{name}" content="{content}">`, keyed by `name`.
    fn register_meta_tag(&mut self, name: &str, content: &str);

    fn set_title(&mut self, title: &str);
}

/// Collects published values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySink {
    pub title: Option<String>,
    /// In registration order. Registering a name again replaces its content.
    pub meta: Vec<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meta(&self, name: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_str())
    }
}

impl TagSink for MemorySink {
    fn register_meta_tag(&mut self, name: &str, content: &str) {
        match self.meta.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = content.to_string(),
            None => self.meta.push((name.to_string(), content.to_string())),
        }
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }
}

/// Page title plus every meta tag.
pub fn register_all<O, S>(
    record: &mut SeoRecord<O>,
    store: &S,
    env: &Environment,
    sink: &mut dyn TagSink,
) -> Result<()>
where
    O: SeoOwner,
    S: SeoStore + ?Sized,
{
    set_title(record, store, env, sink)?;
    register_all_meta(record, store, env, sink)
}

/// The three meta tags.
pub fn register_all_meta<O, S>(
    record: &mut SeoRecord<O>,
    store: &S,
    env: &Environment,
    sink: &mut dyn TagSink,
) -> Result<()>
where
    O: SeoOwner,
    S: SeoStore + ?Sized,
{
    register_meta_title(record, store, env, sink)?;
    register_meta_keywords(record, store, env, sink)?;
    register_meta_description(record, store, env, sink)
}

pub fn set_title<O, S>(
    record: &mut SeoRecord<O>,
    store: &S,
    env: &Environment,
    sink: &mut dyn TagSink,
) -> Result<()>
where
    O: SeoOwner,
    S: SeoStore + ?Sized,
{
    if let Some(title) = published_value(record, store, env, SeoField::Title)? {
        sink.set_title(&title);
    }
    Ok(())
}

pub fn register_meta_title<O, S>(
    record: &mut SeoRecord<O>,
    store: &S,
    env: &Environment,
    sink: &mut dyn TagSink,
) -> Result<()>
where
    O: SeoOwner,
    S: SeoStore + ?Sized,
{
    register_meta(record, store, env, sink, SeoField::Title)
}

pub fn register_meta_keywords<O, S>(
    record: &mut SeoRecord<O>,
    store: &S,
    env: &Environment,
    sink: &mut dyn TagSink,
) -> Result<()>
where
    O: SeoOwner,
    S: SeoStore + ?Sized,
{
    register_meta(record, store, env, sink, SeoField::Keywords)
}

pub fn register_meta_description<O, S>(
    record: &mut SeoRecord<O>,
    store: &S,
    env: &Environment,
    sink: &mut dyn TagSink,
) -> Result<()>
where
    O: SeoOwner,
    S: SeoStore + ?Sized,
{
    register_meta(record, store, env, sink, SeoField::Description)
}

fn register_meta<O, S>(
    record: &mut SeoRecord<O>,
    store: &S,
    env: &Environment,
    sink: &mut dyn TagSink,
    field: SeoField,
) -> Result<()>
where
    O: SeoOwner,
    S: SeoStore + ?Sized,
{
    if let Some(value) = published_value(record, store, env, field)? {
        sink.register_meta_tag(field.column(), &value);
    }
    Ok(())
}

fn published_value<O, S>(
    record: &mut SeoRecord<O>,
    store: &S,
    env: &Environment,
    field: SeoField,
) -> Result<Option<String>>
where
    O: SeoOwner,
    S: SeoStore + ?Sized,
{
    let (behavior, owner) = record.parts_mut()?;
    let value = behavior.get_field(store, &*owner, env, field)?;
    Ok(value.filter(|v| !v.is_empty()))
}
