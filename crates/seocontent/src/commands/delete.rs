use crate::commands::helpers::{describe_query, target};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::SeoStore;

/// Removes the entry of an owner, or the global default of a type when
/// `owner_id` is `None`. Removing an owner entry never touches the default.
pub fn run<S: SeoStore>(store: &mut S, owner_type: &str, owner_id: Option<&str>) -> Result<CmdResult> {
    let query = target(owner_type, owner_id)?;
    let mut result = CmdResult::default();

    let Some(mut entry) = store.find_one(&query, None)? else {
        result.add_message(CmdMessage::warning(format!(
            "No SEO entry for {}.",
            describe_query(&query)
        )));
        return Ok(result);
    };

    let id = entry.id().unwrap_or_default();
    let row = entry.to_row(id);
    store.delete(&mut entry)?;

    result.add_message(CmdMessage::success(format!(
        "SEO entry deleted ({}): {}",
        id,
        describe_query(&query)
    )));
    result.affected_entries.push(row);
    Ok(result)
}
