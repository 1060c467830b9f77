use crate::commands::helpers::{describe_query, target};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, SeoError};
use crate::model::{SeoEntry, SeoField};
use crate::store::{EntryQuery, SeoStore};

/// Field values to assign. `None` leaves a field as it is; an empty string
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    pub title: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
}

impl FieldValues {
    fn get(&self, field: SeoField) -> Option<&str> {
        match field {
            SeoField::Title => self.title.as_deref(),
            SeoField::Keywords => self.keywords.as_deref(),
            SeoField::Description => self.description.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        SeoField::ALL.into_iter().all(|f| self.get(f).is_none())
    }
}

/// Creates or edits the entry of an owner, or the global default of a type
/// when `owner_id` is `None`. Values are stored as given; templates are not
/// expanded.
pub fn run<S: SeoStore>(
    store: &mut S,
    owner_type: &str,
    owner_id: Option<&str>,
    values: FieldValues,
) -> Result<CmdResult> {
    if values.is_empty() {
        return Err(SeoError::Config(
            "nothing to set: give at least one of title, keywords, description".to_string(),
        ));
    }

    let query = target(owner_type, owner_id)?;
    let mut entry = match store.find_one(&query, None)? {
        Some(entry) => entry,
        None => match &query {
            EntryQuery::ByOwner {
                owner_type,
                owner_id,
            } => SeoEntry::new(owner_type.as_str(), owner_id.as_str()),
            EntryQuery::GlobalFor { owner_type } => SeoEntry::global_default(owner_type.as_str()),
        },
    };

    for field in SeoField::ALL {
        if let Some(value) = values.get(field) {
            let value = (!value.is_empty()).then(|| value.to_string());
            entry.set_field(field, value);
        }
    }

    let mut result = CmdResult::default();
    let changed = entry.dirty_fields();
    if changed.is_empty() && !entry.is_new_record() {
        result.add_message(CmdMessage::info(format!(
            "SEO entry for {} unchanged.",
            describe_query(&query)
        )));
        return Ok(result);
    }

    let created = entry.is_new_record();
    store.save(&mut entry)?;
    let id = entry.id().unwrap_or_default();

    let fields: Vec<_> = changed.iter().map(|f| f.column()).collect();
    result.add_message(CmdMessage::success(format!(
        "SEO entry {} ({}): {}{}",
        if created { "created" } else { "updated" },
        id,
        describe_query(&query),
        if fields.is_empty() {
            String::new()
        } else {
            format!(" [{}]", fields.join(", "))
        }
    )));
    result.affected_entries.push(entry.to_row(id));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn title(value: &str) -> FieldValues {
        FieldValues {
            title: Some(value.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn creates_owner_entry() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store, "Page", Some("1"), title("Home")).unwrap();
        assert_eq!(
            result.messages[0].content,
            "SEO entry created (1): Page/1 [title]"
        );
        let stored = store
            .find_one(&EntryQuery::by_owner("Page", "1"), None)
            .unwrap()
            .unwrap();
        assert_eq!(stored.title(), Some("Home"));
        assert!(!stored.is_global);
    }

    #[test]
    fn creates_global_default_with_raw_template() {
        let mut store = InMemoryStore::new();
        run(&mut store, "Page", None, title("%%model_title%% %%sep%% Acme")).unwrap();
        let stored = store
            .find_one(&EntryQuery::global_for("Page"), None)
            .unwrap()
            .unwrap();
        assert!(stored.is_global);
        assert_eq!(stored.title(), Some("%%model_title%% %%sep%% Acme"));
    }

    #[test]
    fn edits_only_the_given_fields() {
        let mut store = InMemoryStore::new();
        run(
            &mut store,
            "Page",
            Some("1"),
            FieldValues {
                title: Some("Home".into()),
                keywords: Some("home".into()),
                description: None,
            },
        )
        .unwrap();

        let result = run(
            &mut store,
            "Page",
            Some("1"),
            FieldValues {
                keywords: Some(String::new()),
                description: Some("Welcome".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            result.messages[0].content,
            "SEO entry updated (1): Page/1 [keywords, description]"
        );

        let row = &result.affected_entries[0];
        assert_eq!(row.text.title.as_deref(), Some("Home"));
        assert_eq!(row.text.keywords, None);
        assert_eq!(row.text.description.as_deref(), Some("Welcome"));
    }

    #[test]
    fn unchanged_values_are_not_written() {
        let mut store = InMemoryStore::new();
        run(&mut store, "Page", Some("1"), title("Home")).unwrap();
        let writes = store.backend().write_count();

        let result = run(&mut store, "Page", Some("1"), title("Home")).unwrap();
        assert!(result.affected_entries.is_empty());
        assert_eq!(result.messages[0].content, "SEO entry for Page/1 unchanged.");
        assert_eq!(store.backend().write_count(), writes);
    }

    #[test]
    fn requires_some_value() {
        let mut store = InMemoryStore::new();
        assert!(matches!(
            run(&mut store, "Page", Some("1"), FieldValues::default()),
            Err(SeoError::Config(_))
        ));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let mut store = InMemoryStore::new();
        let err = run(&mut store, "Page", Some("1"), title(&"t".repeat(256))).unwrap_err();
        assert!(matches!(err, SeoError::Validation(_)));
        assert!(store.list().unwrap().is_empty());
    }
}
