use crate::commands::CmdResult;
use crate::error::Result;
use crate::schema::{self, ColumnKind, TableLayout, TABLE};
use crate::store::SeoStore;

/// Table layout after every migration, and which migrations the store has seen.
pub fn run<S: SeoStore>(store: &S) -> Result<CmdResult> {
    let layout = TableLayout::current();
    let mut properties = vec![("table".to_string(), TABLE.to_string())];

    for column in &layout.columns {
        let kind = match column.kind {
            ColumnKind::PrimaryKey => "primary key".to_string(),
            ColumnKind::String(len) => format!("string({len})"),
            ColumnKind::Boolean => "boolean".to_string(),
        };
        let null = if column.nullable { "null" } else { "not null" };
        properties.push((format!("column.{}", column.name), format!("{kind} {null}")));
    }

    for index in &layout.indexes {
        let unique = if index.unique { "unique " } else { "" };
        properties.push((
            format!("index.{}", index.name),
            format!("{unique}({})", index.columns.join(", ")),
        ));
    }

    let applied = store.applied_migrations()?;
    for migration in schema::MIGRATIONS {
        let state = match applied.iter().find(|a| a.name == migration.name) {
            Some(a) => format!("applied {}", a.applied_at.format("%Y-%m-%d %H:%M:%S")),
            None => "pending".to_string(),
        };
        properties.push((format!("migration.{}", migration.name), state));
    }

    Ok(CmdResult::default().with_properties(properties))
}
