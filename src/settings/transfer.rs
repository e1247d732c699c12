//! Whole-state export and import of the allow-listed settings as one JSON document.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::{Map, Value};
use slog_scope::{info, warn};

use newtab_types::settings::SettingKey;

use crate::notify::{self, Notification, Notifier};
use crate::storage::{Storage, StorageError};

use super::{decode, SettingsStore};

pub const EXPORT_FILE_PREFIX: &str = "new-tab-settings-";

pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}{}.json", date.format("%Y-%m-%d"))
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Settings file must contain a JSON object")]
    NotAnObject,
    #[error("Settings file contains no recognized settings")]
    NoRecognizedKeys,
    #[error("Failed to persist imported settings: {0}")]
    Storage(#[from] StorageError),
}

impl ImportError {
    /// Whether the document itself was rejected, as opposed to failing to persist it.
    pub fn is_invalid_file(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// A document that passed validation and is ready to be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDocument {
    entries: Vec<(SettingKey, Value)>,
    ignored: Vec<String>,
}

impl ImportDocument {
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Accepts a JSON object holding at least one allow-listed key.
    pub fn from_value(document: Value) -> Result<Self, ImportError> {
        let Value::Object(map) = document else {
            return Err(ImportError::NotAnObject);
        };
        let mut entries = Vec::with_capacity(map.len());
        let mut ignored = Vec::new();
        for (name, value) in map {
            match SettingKey::exportable(&name) {
                Some(key) => entries.push((key, value)),
                None => ignored.push(name),
            }
        }
        if entries.is_empty() {
            return Err(ImportError::NoRecognizedKeys);
        }
        Ok(Self { entries, ignored })
    }

    pub fn keys(&self) -> impl Iterator<Item = SettingKey> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Names in the document that are not on the allow-list.
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub imported: Vec<SettingKey>,
    /// Settings are read at initialization, so the new values are only observed everywhere
    /// after a reload.
    pub reload_required: bool,
}

impl<S: Storage> SettingsStore<S> {
    /// Collects every allow-listed setting currently present in storage.
    pub fn export_all(&self) -> Map<String, Value> {
        SettingKey::EXPORTABLE
            .iter()
            .filter_map(|key| {
                self.storage
                    .get_item(key.as_str())
                    .map(|raw| (key.as_str().to_owned(), decode(&raw)))
            })
            .collect()
    }

    /// Renders [`Self::export_all`] as a pretty-printed document.
    pub fn export_document(&self, notifier: &dyn Notifier) -> Result<String, ExportError> {
        match serde_json::to_string_pretty(&self.export_all()) {
            Ok(text) => Ok(text),
            Err(e) => {
                notifier.notify(Notification::error(notify::EXPORT_ERROR));
                Err(e.into())
            }
        }
    }

    /// Writes the export document into `dir`, named after `date`.
    pub fn export_to_dir(
        &self,
        dir: &Path,
        date: NaiveDate,
        notifier: &dyn Notifier,
    ) -> Result<PathBuf, ExportError> {
        let text = self.export_document(notifier)?;
        let path = dir.join(export_file_name(date));
        if let Err(source) = std::fs::write(&path, text) {
            notifier.notify(Notification::error(notify::EXPORT_ERROR));
            return Err(ExportError::Write { path, source });
        }
        info!("Exported settings to {path:?}");
        notifier.notify(Notification::success(notify::EXPORT_SUCCESS));
        Ok(path)
    }

    /// Validates an import file's text, reporting an invalid file to the user.
    pub fn prepare_import(
        &self,
        text: &str,
        notifier: &dyn Notifier,
    ) -> Result<ImportDocument, ImportError> {
        ImportDocument::parse(text).inspect_err(|e| {
            warn!("Rejected settings file: {e}");
            notifier.notify(Notification::error(notify::IMPORT_ERROR_INVALID_FILE));
        })
    }

    /// Persists a validated document in one storage write. Strings that read back as themselves
    /// are stored verbatim, everything else as JSON.
    pub fn apply_import(
        &self,
        document: ImportDocument,
        notifier: &dyn Notifier,
    ) -> Result<ImportOutcome, ImportError> {
        for name in document.ignored() {
            warn!("Skipping unrecognized setting {name:?}");
        }
        let items = document
            .entries
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) if decode(s) == *value => s.clone(),
                    other => other.to_string(),
                };
                (key.as_str(), text)
            })
            .collect::<Vec<_>>();
        self.storage.set_items(&items)?;

        let imported = document.keys().collect::<Vec<_>>();
        info!("Imported {} settings", imported.len());
        notifier.notify(Notification::success(notify::IMPORT_SUCCESS));
        Ok(ImportOutcome {
            imported,
            reload_required: true,
        })
    }

    /// Validates and applies `document` in one step.
    pub fn import_all(
        &self,
        document: Value,
        notifier: &dyn Notifier,
    ) -> Result<ImportOutcome, ImportError> {
        let document = ImportDocument::from_value(document).inspect_err(|e| {
            warn!("Rejected settings document: {e}");
            notifier.notify(Notification::error(notify::IMPORT_ERROR_INVALID_FILE));
        })?;
        self.apply_import(document, notifier)
    }
}
