use crate::environment::AttributeSource;
use crate::record::{generate_label, SeoOwner};
use crate::store::fs::FileStore;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tempfile::TempDir;

/// A minimal owner record of type `Page`.
#[derive(Debug, Clone, Default)]
pub struct TestPage {
    pub id: Option<u64>,
    pub title: String,
    pub slug: Option<String>,
    pub labels: BTreeMap<String, String>,
    /// `(attribute, message)` in the order they were added.
    pub errors: Vec<(String, String)>,
}

impl TestPage {
    pub fn new(id: u64, title: &str) -> Self {
        Self {
            id: Some(id),
            title: title.to_string(),
            ..Default::default()
        }
    }

    /// A page that has not been inserted yet.
    pub fn unsaved(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    pub fn with_label(mut self, attribute: &str, label: &str) -> Self {
        self.labels.insert(attribute.to_string(), label.to_string());
        self
    }
}

impl AttributeSource for TestPage {
    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.map(|id| id.to_string()),
            "title" => Some(self.title.clone()),
            "slug" => self.slug.clone(),
            _ => None,
        }
    }

    fn has_attribute(&self, name: &str) -> bool {
        matches!(name, "id" | "title" | "slug")
    }
}

impl SeoOwner for TestPage {
    fn owner_type(&self) -> &str {
        "Page"
    }

    fn primary_key(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }

    fn attribute_label(&self, attribute: &str) -> String {
        self.labels
            .get(attribute)
            .cloned()
            .unwrap_or_else(|| generate_label(attribute))
    }

    fn add_error(&mut self, attribute: &str, message: String) {
        self.errors.push((attribute.to_string(), message));
    }
}

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub store: FileStore,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().join(".seocontent");
        let store = FileStore::new(root.clone());
        Self {
            _temp_dir: temp_dir,
            store,
            root,
        }
    }
}
