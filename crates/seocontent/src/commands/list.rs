use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::SeoStore;

/// Stored entries ordered by id, optionally only those of one owner type.
pub fn run<S: SeoStore>(store: &S, owner_type: Option<&str>) -> Result<CmdResult> {
    let rows: Vec<_> = store
        .list()?
        .into_iter()
        .filter(|row| owner_type.map_or(true, |t| row.owner_type == t))
        .collect();

    let mut result = CmdResult::default();
    if rows.is_empty() {
        result.add_message(CmdMessage::info(match owner_type {
            Some(t) => format!("No SEO entries for {t}."),
            None => "No SEO entries.".to_string(),
        }));
    }
    Ok(result.with_listed_entries(rows))
}
