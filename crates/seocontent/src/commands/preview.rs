use crate::commands::{CmdMessage, CmdResult};
use crate::environment::Environment;
use crate::error::Result;
use crate::publish::{self, MemorySink};
use crate::record::{SeoOwner, SeoRecord};
use crate::store::SeoStore;

/// Resolves a record's SEO fields and publishes them to a collecting sink.
pub fn run<S, O>(store: &S, record: &mut SeoRecord<O>, env: &Environment) -> Result<CmdResult>
where
    S: SeoStore,
    O: SeoOwner,
{
    let mut sink = MemorySink::new();
    publish::register_all(record, store, env, &mut sink)?;

    let mut result = CmdResult::default();
    if sink.title.is_none() && sink.meta.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Nothing to publish for {}.",
            record.owner.owner_type()
        )));
    }
    result.published = Some(sink);
    Ok(result)
}
