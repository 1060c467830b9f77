//! # Table Schema
//!
//! The `seo_content` table is defined by three ordered migrations. They are
//! kept here as data so a store can tell which of them a table has seen and
//! derive the index set it has to enforce.
//!
//! | Migration                                              | Effect                                   |
//! |--------------------------------------------------------|------------------------------------------|
//! | `m160219_172342_create_seo_content`                    | table + unique `(model_name, model_id)`  |
//! | `m180312_090724_add_column_is_global_to_seo_content`   | `is_global` + unique `(model_name, is_global)` |
//! | `m190618_014614_drop_seo_content_index`                | drops the `is_global` index (irreversible) |
//!
//! The dropped index made two non-global rows of one type collide. One global
//! default per type is enforced by the store instead.

use crate::error::{Result, SeoError};
use crate::model::SeoRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TABLE: &str = "seo_content";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    PrimaryKey,
    String(usize),
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub unique: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateTable(&'static [Column]),
    AddColumn(Column),
    CreateIndex(Index),
    DropIndex(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub name: &'static str,
    pub up: &'static [Step],
    pub reversible: bool,
}

const MODEL_INDEX: Index = Index {
    name: "seo_content_model_model_id",
    columns: &["model_name", "model_id"],
    unique: true,
};

const GLOBAL_INDEX: Index = Index {
    name: "seo_content_model_name_is_global",
    columns: &["model_name", "is_global"],
    unique: true,
};

const BASE_COLUMNS: &[Column] = &[
    Column {
        name: "id",
        kind: ColumnKind::PrimaryKey,
        nullable: false,
    },
    Column {
        name: "model_name",
        kind: ColumnKind::String(255),
        nullable: false,
    },
    Column {
        name: "model_id",
        kind: ColumnKind::String(255),
        nullable: false,
    },
    Column {
        name: "title",
        kind: ColumnKind::String(255),
        nullable: true,
    },
    Column {
        name: "keywords",
        kind: ColumnKind::String(512),
        nullable: true,
    },
    Column {
        name: "description",
        kind: ColumnKind::String(1024),
        nullable: true,
    },
];

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "m160219_172342_create_seo_content",
        up: &[Step::CreateTable(BASE_COLUMNS), Step::CreateIndex(MODEL_INDEX)],
        reversible: true,
    },
    Migration {
        name: "m180312_090724_add_column_is_global_to_seo_content",
        up: &[
            Step::AddColumn(Column {
                name: "is_global",
                kind: ColumnKind::Boolean,
                nullable: true,
            }),
            Step::CreateIndex(GLOBAL_INDEX),
        ],
        reversible: true,
    },
    Migration {
        name: "m190618_014614_drop_seo_content_index",
        up: &[Step::DropIndex("seo_content_model_name_is_global")],
        reversible: false,
    },
];

/// A migration recorded as applied to a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMigration {
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

impl AppliedMigration {
    pub fn now(name: &str) -> Self {
        Self {
            name: name.to_string(),
            applied_at: Utc::now(),
        }
    }
}

/// Migrations from [`MIGRATIONS`] not yet present in `applied`, in order.
pub fn pending(applied: &[AppliedMigration]) -> Vec<&'static Migration> {
    MIGRATIONS
        .iter()
        .filter(|m| !applied.iter().any(|a| a.name == m.name))
        .collect()
}

/// Column and index set produced by a sequence of migrations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableLayout {
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
}

impl TableLayout {
    /// Layout after every known migration.
    pub fn current() -> Self {
        let mut layout = Self::default();
        for migration in MIGRATIONS {
            layout
                .apply(migration)
                .expect("bundled migrations apply in order");
        }
        layout
    }

    /// Layout after the named migrations, applied in declaration order.
    pub fn after(applied: &[AppliedMigration]) -> Result<Self> {
        let mut layout = Self::default();
        for migration in MIGRATIONS
            .iter()
            .filter(|m| applied.iter().any(|a| a.name == m.name))
        {
            layout.apply(migration)?;
        }
        Ok(layout)
    }

    pub fn apply(&mut self, migration: &Migration) -> Result<()> {
        for step in migration.up {
            match step {
                Step::CreateTable(columns) => {
                    if !self.columns.is_empty() {
                        return Err(schema_error(migration, format!("table {TABLE} exists")));
                    }
                    self.columns = columns.to_vec();
                }
                Step::AddColumn(column) => {
                    if self.column(column.name).is_some() {
                        return Err(schema_error(
                            migration,
                            format!("column {} exists", column.name),
                        ));
                    }
                    self.columns.push(*column);
                }
                Step::CreateIndex(index) => {
                    if let Some(missing) = index.columns.iter().find(|c| self.column(c).is_none())
                    {
                        return Err(schema_error(
                            migration,
                            format!("index {} uses unknown column {}", index.name, missing),
                        ));
                    }
                    self.indexes.push(*index);
                }
                Step::DropIndex(name) => {
                    let before = self.indexes.len();
                    self.indexes.retain(|i| i.name != *name);
                    if self.indexes.len() == before {
                        return Err(schema_error(migration, format!("no index {name}")));
                    }
                }
            }
        }
        Ok(())
    }

    /// Undo `migration`, which must be the last one applied.
    pub fn revert(&mut self, migration: &Migration) -> Result<()> {
        if !migration.reversible {
            return Err(schema_error(migration, "cannot be reverted".to_string()));
        }
        for step in migration.up.iter().rev() {
            match step {
                Step::CreateTable(_) => {
                    self.columns.clear();
                    self.indexes.clear();
                }
                Step::AddColumn(column) => self.columns.retain(|c| c.name != column.name),
                Step::CreateIndex(index) => self.indexes.retain(|i| i.name != index.name),
                Step::DropIndex(name) => {
                    return Err(schema_error(migration, format!("dropped index {name} is gone")));
                }
            }
        }
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn unique_indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.iter().filter(|i| i.unique)
    }
}

fn schema_error(migration: &Migration, detail: String) -> SeoError {
    SeoError::Store(format!("{}: {}", migration.name, detail))
}

/// Value of `column` in `row` as the index would see it. `None` is SQL NULL.
pub fn row_value(row: &SeoRow, column: &str) -> Option<String> {
    match column {
        "id" => Some(row.id.to_string()),
        "model_name" => Some(row.owner_type.clone()),
        "model_id" => Some(row.owner_id.clone()),
        "title" => row.text.title.clone(),
        "keywords" => row.text.keywords.clone(),
        "description" => row.text.description.clone(),
        "is_global" => Some(row.is_global.to_string()),
        _ => None,
    }
}
