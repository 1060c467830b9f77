use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::SeoStore;

pub fn run<S: SeoStore>(store: &mut S) -> Result<CmdResult> {
    let report = store.migrate()?;
    let mut result = CmdResult::default();

    if report.is_noop() {
        result.add_message(CmdMessage::info("Table is up to date."));
        return Ok(result);
    }
    for name in &report.applied {
        result.add_message(CmdMessage::success(format!("Applied {name}")));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::schema::{AppliedMigration, MIGRATIONS};
    use crate::store::backend::SeoTable;
    use crate::store::entry_store::EntryStore;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn brings_legacy_table_up_to_date() {
        let table = SeoTable {
            migrations: MIGRATIONS[..2]
                .iter()
                .map(|m| AppliedMigration::now(m.name))
                .collect(),
            ..Default::default()
        };
        let mut store = EntryStore::with_backend(MemBackend::with_table(table));

        let result = run(&mut store).unwrap();
        assert_eq!(result.messages.len(), 1);
        assert_eq!(
            result.messages[0].content,
            "Applied m190618_014614_drop_seo_content_index"
        );

        let again = run(&mut store).unwrap();
        assert_eq!(again.messages[0].level, MessageLevel::Info);
    }
}
