use crate::commands::{CmdMessage, CmdResult};
use crate::environment::Environment;
use crate::error::Result;
use crate::record::{JsonRecord, SeoOwner, SeoRecord};
use crate::store::SeoStore;

/// Runs the unique-title validation for a record and reports its errors.
pub fn run<S: SeoStore>(
    store: &S,
    record: &mut SeoRecord<JsonRecord>,
    env: &Environment,
) -> Result<CmdResult> {
    let valid = record.validate_title_uniqueness(store, env)?;
    let attribute = record.behavior()?.settings().title_attribute.clone();
    let title = record.get(store, env, &attribute)?.unwrap_or_default();

    let mut result = CmdResult::default();
    if valid {
        result.add_message(CmdMessage::success(format!(
            "Title \"{}\" is available for {}.",
            title,
            record.owner.owner_type()
        )));
    } else {
        for messages in record.owner.errors().values() {
            for message in messages {
                result.add_message(CmdMessage::error(message.clone()));
            }
        }
    }
    Ok(result)
}
