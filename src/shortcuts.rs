use smol_str::SmolStr;
use slog_scope::info;
use url::Url;
use uuid::Uuid;

use newtab_types::shortcuts::{display_order, Shortcut};

use newtab_types::settings::SettingKey;

use crate::settings::{decode, defaults, SettingsError, SettingsStore};
use crate::storage::Storage;
use crate::util::hyphenated_uuid;

/// User input for creating or replacing a shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutDraft {
    pub name: String,
    pub href: String,
    pub icon_url: String,
    /// Defaults to the end of the grid when adding.
    pub position: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ShortcutError {
    #[error("Name is required")]
    EmptyName,
    #[error("The {field} {value:?} is not a valid URL: {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Position must be at least 1, got {0}")]
    InvalidPosition(i64),
    #[error("No shortcut with id {0:?}")]
    NotFound(SmolStr),
    #[error("The stored shortcuts are malformed: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

fn check_url(field: &'static str, value: &str) -> Result<(), ShortcutError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|source| ShortcutError::InvalidUrl {
            field,
            value: value.to_owned(),
            source,
        })
}

impl ShortcutDraft {
    fn into_shortcut(self, id: SmolStr, default_position: i64) -> Result<Shortcut, ShortcutError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ShortcutError::EmptyName);
        }
        check_url("URL", &self.href)?;
        check_url("icon URL", &self.icon_url)?;
        let position = self.position.unwrap_or(default_position);
        if position < 1 {
            return Err(ShortcutError::InvalidPosition(position));
        }
        Ok(Shortcut {
            id,
            name: name.into(),
            href: self.href,
            icon_url: self.icon_url,
            position,
        })
    }
}

fn new_id() -> SmolStr {
    SmolStr::new(hyphenated_uuid!(Uuid::new_v4()))
}

impl<S: Storage> SettingsStore<S> {
    /// The stored list for a mutation. Unlike [`Self::shortcuts`], a stored value that is not a
    /// list of shortcuts is an error, so the mutation cannot overwrite it with the defaults.
    fn stored_shortcuts(&self) -> Result<Vec<Shortcut>, ShortcutError> {
        match self.storage().get_item(SettingKey::Shortcuts.as_str()) {
            Some(raw) => serde_json::from_value(decode(&raw)).map_err(ShortcutError::Malformed),
            None => Ok(defaults::shortcuts()),
        }
    }

    /// Shortcuts in display order.
    pub fn list_shortcuts(&self) -> Vec<Shortcut> {
        display_order(&self.shortcuts())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn add_shortcut(&self, draft: ShortcutDraft) -> Result<Shortcut, ShortcutError> {
        let mut shortcuts = self.stored_shortcuts()?;
        let shortcut = draft.into_shortcut(new_id(), shortcuts.len() as i64 + 1)?;
        shortcuts.push(shortcut.clone());
        self.set_shortcuts(&shortcuts)?;
        info!("Added shortcut {:?} ({})", shortcut.name, shortcut.id);
        Ok(shortcut)
    }

    /// Replaces the shortcut with the given id, keeping the id.
    pub fn edit_shortcut(&self, id: &str, draft: ShortcutDraft) -> Result<Shortcut, ShortcutError> {
        let mut shortcuts = self.stored_shortcuts()?;
        let slot = shortcuts
            .iter_mut()
            .find(|s| s.id.as_str() == id)
            .ok_or_else(|| ShortcutError::NotFound(id.into()))?;
        let shortcut = draft.into_shortcut(slot.id.clone(), slot.position)?;
        *slot = shortcut.clone();
        self.set_shortcuts(&shortcuts)?;
        info!("Edited shortcut {:?} ({})", shortcut.name, shortcut.id);
        Ok(shortcut)
    }

    pub fn delete_shortcut(&self, id: &str) -> Result<Shortcut, ShortcutError> {
        let mut shortcuts = self.stored_shortcuts()?;
        let index = shortcuts
            .iter()
            .position(|s| s.id.as_str() == id)
            .ok_or_else(|| ShortcutError::NotFound(id.into()))?;
        let removed = shortcuts.remove(index);
        self.set_shortcuts(&shortcuts)?;
        info!("Deleted shortcut {:?} ({})", removed.name, removed.id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::notify::RecordingNotifier;
    use crate::settings::SettingsStore;
    use crate::storage::{MemoryStorage, Storage};

    use super::{ShortcutDraft, ShortcutError};

    fn draft(name: &str, position: Option<i64>) -> ShortcutDraft {
        ShortcutDraft {
            name: name.to_owned(),
            href: "https://example.com".to_owned(),
            icon_url: "https://example.com/favicon.ico".to_owned(),
            position,
        }
    }

    fn empty_store() -> SettingsStore<MemoryStorage> {
        let store = SettingsStore::new(MemoryStorage::new());
        store.set_shortcuts(&[]).unwrap();
        store
    }

    #[test]
    fn test_add_appends_with_next_position() {
        let store = SettingsStore::new(MemoryStorage::new());
        let added = store.add_shortcut(draft("Example", None)).unwrap();
        assert_eq!(added.position, 11);
        assert_eq!(added.id.len(), 36);

        let listed = store.list_shortcuts();
        assert_eq!(listed.len(), 11);
        assert_eq!(listed.last().unwrap().id, added.id);
    }

    #[test]
    fn test_ids_are_unique() {
        let store = empty_store();
        let a = store.add_shortcut(draft("A", None)).unwrap();
        let b = store.add_shortcut(draft("B", None)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(b.position, 2);
    }

    #[test]
    fn test_list_orders_by_position() {
        let store = empty_store();
        store.add_shortcut(draft("Third", Some(3))).unwrap();
        store.add_shortcut(draft("First", Some(1))).unwrap();
        store.add_shortcut(draft("Also third", Some(3))).unwrap();
        let names = store
            .list_shortcuts()
            .into_iter()
            .map(|s| s.name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["First", "Third", "Also third"]);
    }

    #[test]
    fn test_edit_replaces_by_id() {
        let store = empty_store();
        let added = store.add_shortcut(draft("Old", Some(2))).unwrap();
        let edited = store
            .edit_shortcut(
                &added.id,
                ShortcutDraft {
                    name: "New".to_owned(),
                    href: "https://new.example".to_owned(),
                    icon_url: "https://new.example/icon.png".to_owned(),
                    position: Some(5),
                },
            )
            .unwrap();
        assert_eq!(edited.id, added.id);
        assert_eq!(store.shortcuts(), [edited]);
    }

    #[test]
    fn test_edit_and_delete_unknown_id() {
        let store = empty_store();
        assert!(matches!(
            store.edit_shortcut("nope", draft("X", None)),
            Err(ShortcutError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_shortcut("nope"),
            Err(ShortcutError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete() {
        let store = SettingsStore::new(MemoryStorage::new());
        let removed = store.delete_shortcut("4").unwrap();
        assert_eq!(removed.name.as_str(), "GitHub");
        assert_eq!(store.shortcuts().len(), 9);
        assert!(store.shortcuts().iter().all(|s| s.id.as_str() != "4"));
    }

    #[test]
    fn test_malformed_list_is_never_overwritten() {
        // an imported entry without an icon
        let stored = r#"[{"id":"a","name":"Mine","href":"https://mine.example","position":1}]"#;
        let storage = [("shortcuts", stored)].into_iter().collect::<MemoryStorage>();
        let store = SettingsStore::new(storage);

        assert!(matches!(
            store.add_shortcut(draft("New", None)),
            Err(ShortcutError::Malformed(_))
        ));
        assert!(matches!(
            store.edit_shortcut("a", draft("Renamed", None)),
            Err(ShortcutError::Malformed(_))
        ));
        assert!(matches!(
            store.delete_shortcut("a"),
            Err(ShortcutError::Malformed(_))
        ));
        assert_eq!(store.storage().get_item("shortcuts").as_deref(), Some(stored));
    }

    #[test]
    fn test_mutations_over_imported_list() {
        let store = SettingsStore::new(MemoryStorage::new());
        store
            .import_all(
                json!({ "shortcuts": [{
                    "id": "a",
                    "name": "Mine",
                    "href": "https://mine.example",
                    "iconUrl": "https://mine.example/icon.png",
                    "position": 1,
                }] }),
                &RecordingNotifier::default(),
            )
            .unwrap();

        let added = store.add_shortcut(draft("New", None)).unwrap();
        assert_eq!(added.position, 2);
        let names = store
            .list_shortcuts()
            .into_iter()
            .map(|s| s.name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Mine", "New"]);
    }

    #[test]
    fn test_validation() {
        let store = empty_store();
        assert!(matches!(
            store.add_shortcut(draft("  ", None)),
            Err(ShortcutError::EmptyName)
        ));
        assert!(matches!(
            store.add_shortcut(draft("X", Some(0))),
            Err(ShortcutError::InvalidPosition(0))
        ));
        let mut bad = draft("X", None);
        bad.href = "example.com".to_owned();
        assert!(matches!(
            store.add_shortcut(bad),
            Err(ShortcutError::InvalidUrl { field: "URL", .. })
        ));
        assert!(store.shortcuts().is_empty());
    }
}
