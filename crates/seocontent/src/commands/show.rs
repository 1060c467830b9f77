use crate::commands::helpers::{describe_query, target};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{EntryQuery, SeoStore};

/// The entry that applies to an owner: its own, else the type's global
/// default. With no `owner_id`, the global default itself.
pub fn run<S: SeoStore>(store: &S, owner_type: &str, owner_id: Option<&str>) -> Result<CmdResult> {
    let query = target(owner_type, owner_id)?;
    let mut result = CmdResult::default();

    if let Some(entry) = store.find_one(&query, None)? {
        if let Some(id) = entry.id() {
            result.listed_entries.push(entry.to_row(id));
        }
        return Ok(result);
    }

    if matches!(query, EntryQuery::ByOwner { .. }) {
        let global = EntryQuery::global_for(owner_type);
        if let Some(entry) = store.find_one(&global, None)? {
            result.add_message(CmdMessage::info(format!(
                "No entry for {}, the {} default applies.",
                describe_query(&query),
                owner_type
            )));
            if let Some(id) = entry.id() {
                result.listed_entries.push(entry.to_row(id));
            }
            return Ok(result);
        }
    }

    result.add_message(CmdMessage::warning(format!(
        "No SEO entry for {}.",
        describe_query(&query)
    )));
    Ok(result)
}
