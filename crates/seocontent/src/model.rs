//! # Data Model
//!
//! One [`SeoEntry`] backs the SEO fields of one owner record, or, when
//! `is_global` is set, of every owner of a type that has no entry of its own.
//!
//! The persisted shape is [`SeoRow`], which keeps the column names of the
//! `seo_content` table (`model_name`, `model_id`, ...). [`SeoEntry`] is the
//! in-memory working copy: it remembers the text it was loaded with so the
//! behavior can tell an edited field from a stored template.

use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const OWNER_TYPE_MAX: usize = 255;
pub const OWNER_ID_MAX: usize = 255;
/// `model_id` used for type-wide default entries.
pub const GLOBAL_OWNER_ID: &str = "*";

/// One of the three text columns an entry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeoField {
    Title,
    Keywords,
    Description,
}

impl SeoField {
    pub const ALL: [SeoField; 3] = [SeoField::Title, SeoField::Keywords, SeoField::Description];

    /// Column name in the `seo_content` table.
    pub fn column(self) -> &'static str {
        match self {
            SeoField::Title => "title",
            SeoField::Keywords => "keywords",
            SeoField::Description => "description",
        }
    }

    /// Maximum length in characters.
    pub fn max_len(self) -> usize {
        match self {
            SeoField::Title => 255,
            SeoField::Keywords => 512,
            SeoField::Description => 1024,
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }
}

impl fmt::Display for SeoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// The three nullable text columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoText {
    pub title: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
}

impl SeoText {
    pub fn get(&self, field: SeoField) -> Option<&str> {
        match field {
            SeoField::Title => self.title.as_deref(),
            SeoField::Keywords => self.keywords.as_deref(),
            SeoField::Description => self.description.as_deref(),
        }
    }

    pub fn set(&mut self, field: SeoField, value: Option<String>) {
        match field {
            SeoField::Title => self.title = value,
            SeoField::Keywords => self.keywords = value,
            SeoField::Description => self.description = value,
        }
    }
}

/// A `seo_content` row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoRow {
    pub id: u64,
    #[serde(rename = "model_name")]
    pub owner_type: String,
    #[serde(rename = "model_id")]
    pub owner_id: String,
    #[serde(flatten)]
    pub text: SeoText,
    // Rows written before the is_global column existed read as instance rows.
    #[serde(default)]
    pub is_global: bool,
}

/// Working copy of an SEO entry with change tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoEntry {
    id: Option<u64>,
    pub owner_type: String,
    pub owner_id: String,
    pub is_global: bool,
    text: SeoText,
    baseline: SeoText,
}

impl SeoEntry {
    /// A new, never persisted entry for one owner. All text is unset.
    pub fn new(owner_type: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: None,
            owner_type: owner_type.into(),
            owner_id: owner_id.into(),
            is_global: false,
            text: SeoText::default(),
            baseline: SeoText::default(),
        }
    }

    /// A new type-wide default entry, keyed under [`GLOBAL_OWNER_ID`].
    pub fn global_default(owner_type: impl Into<String>) -> Self {
        Self {
            is_global: true,
            ..Self::new(owner_type, GLOBAL_OWNER_ID)
        }
    }

    pub fn from_row(row: SeoRow) -> Self {
        Self {
            id: Some(row.id),
            owner_type: row.owner_type,
            owner_id: row.owner_id,
            is_global: row.is_global,
            baseline: row.text.clone(),
            text: row.text,
        }
    }

    /// The row this entry would persist as under `id`.
    pub fn to_row(&self, id: u64) -> SeoRow {
        SeoRow {
            id,
            owner_type: self.owner_type.clone(),
            owner_id: self.owner_id.clone(),
            text: self.text.clone(),
            is_global: self.is_global,
        }
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn is_new_record(&self) -> bool {
        self.id.is_none()
    }

    pub fn text(&self) -> &SeoText {
        &self.text
    }

    pub fn field(&self, field: SeoField) -> Option<&str> {
        self.text.get(field)
    }

    pub fn set_field(&mut self, field: SeoField, value: Option<String>) {
        self.text.set(field, value);
    }

    pub fn title(&self) -> Option<&str> {
        self.text.title.as_deref()
    }

    pub fn keywords(&self) -> Option<&str> {
        self.text.keywords.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.text.description.as_deref()
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.text.title = Some(value.into());
    }

    pub fn set_keywords(&mut self, value: impl Into<String>) {
        self.text.keywords = Some(value.into());
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.text.description = Some(value.into());
    }

    /// True if `field` differs from what was last loaded or persisted.
    pub fn is_dirty(&self, field: SeoField) -> bool {
        self.text.get(field) != self.baseline.get(field)
    }

    pub fn dirty_fields(&self) -> Vec<SeoField> {
        SeoField::ALL
            .into_iter()
            .filter(|f| self.is_dirty(*f))
            .collect()
    }

    /// Record a successful insert or update under `id`.
    pub fn mark_persisted(&mut self, id: u64) {
        self.id = Some(id);
        self.baseline = self.text.clone();
    }

    /// Record a successful delete: the entry becomes a new record again.
    pub fn mark_deleted(&mut self) {
        self.id = None;
        self.baseline = SeoText::default();
    }

    /// Row-level rules: required owner keys and column lengths.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.owner_type.is_empty() {
            errors.push(FieldError::new("model_name", "Model Name cannot be blank."));
        } else if self.owner_type.chars().count() > OWNER_TYPE_MAX {
            errors.push(too_long("model_name", "Model Name", OWNER_TYPE_MAX));
        }

        if self.owner_id.is_empty() {
            errors.push(FieldError::new("model_id", "Model ID cannot be blank."));
        } else if self.owner_id.chars().count() > OWNER_ID_MAX {
            errors.push(too_long("model_id", "Model ID", OWNER_ID_MAX));
        }

        for field in SeoField::ALL {
            if let Some(err) = self.validate_length(field) {
                errors.push(err);
            }
        }

        errors
    }

    /// Length rule for a single text field.
    pub fn validate_length(&self, field: SeoField) -> Option<FieldError> {
        let value = self.field(field)?;
        if value.chars().count() > field.max_len() {
            let label = capitalize(field.column());
            Some(too_long(field.column(), &label, field.max_len()))
        } else {
            None
        }
    }
}

fn too_long(field: &str, label: &str, max: usize) -> FieldError {
    FieldError::new(
        field,
        format!("{} should contain at most {} characters.", label, max),
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
