//! Start page settings. Every setting lives under its own key in a [`Storage`], as JSON text.
//! Consumers read settings when they initialize, so a bulk change such as an import only takes
//! effect everywhere after a reload.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use slog_scope::debug;

use newtab_types::settings::{SettingKey, Theme};
use newtab_types::shortcuts::Shortcut;
use newtab_types::wallpaper::{BingWallpaperCache, WallpaperConfig};

use crate::storage::{Storage, StorageError};

pub mod defaults;
pub mod transfer;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to encode the value of {key}: {source}")]
    Encoding {
        key: SettingKey,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct SettingsStore<S> {
    storage: S,
}

/// Parses a stored value, falling back to the raw text when it is not JSON.
pub fn decode(raw: &str) -> Value {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            debug!("Stored value is not JSON, using it verbatim: {e}");
            Value::String(raw.to_owned())
        }
    }
}

impl<S: Storage> SettingsStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Returns the stored value of `key` in structured form, or `default` if it is absent.
    pub fn read(&self, key: SettingKey, default: Value) -> Value {
        match self.storage.get_item(key.as_str()) {
            Some(raw) => decode(&raw),
            None => default,
        }
    }

    /// Returns the stored value of `key` if it is present and has the shape of `T`.
    pub fn get<T: DeserializeOwned>(&self, key: SettingKey) -> Option<T> {
        let raw = self.storage.get_item(key.as_str())?;
        match serde_json::from_value(decode(&raw)) {
            Ok(t) => Some(t),
            Err(e) => {
                debug!("Ignoring malformed value of {key}: {e}");
                None
            }
        }
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: SettingKey, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Serializes `value` as JSON and persists it under `key`.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        key: SettingKey,
        value: &T,
    ) -> Result<(), SettingsError> {
        let text = serde_json::to_string(value)
            .map_err(|source| SettingsError::Encoding { key, source })?;
        self.storage.set_item(key.as_str(), &text)?;
        debug!("Wrote {key}");
        Ok(())
    }

    pub fn remove(&self, key: SettingKey) -> Result<(), SettingsError> {
        Ok(self.storage.remove_item(key.as_str())?)
    }

    pub fn logo_url(&self) -> String {
        self.get_or(SettingKey::LogoUrl, defaults::LOGO_URL.to_owned())
    }

    pub fn set_logo_url(&self, url: &str) -> Result<(), SettingsError> {
        self.write(SettingKey::LogoUrl, url)
    }

    pub fn columns(&self) -> u32 {
        self.get_or(SettingKey::Columns, defaults::COLUMNS)
    }

    pub fn set_columns(&self, columns: u32) -> Result<(), SettingsError> {
        self.write(SettingKey::Columns, &columns)
    }

    pub fn shortcuts(&self) -> Vec<Shortcut> {
        self.get(SettingKey::Shortcuts)
            .unwrap_or_else(defaults::shortcuts)
    }

    pub fn set_shortcuts(&self, shortcuts: &[Shortcut]) -> Result<(), SettingsError> {
        self.write(SettingKey::Shortcuts, shortcuts)
    }

    pub fn wallpaper_config(&self) -> WallpaperConfig {
        self.get(SettingKey::WallpaperConfig)
            .unwrap_or_else(defaults::wallpaper_config)
    }

    pub fn set_wallpaper_config(&self, config: &WallpaperConfig) -> Result<(), SettingsError> {
        self.write(SettingKey::WallpaperConfig, config)
    }

    pub fn shortcut_bg_color(&self) -> String {
        self.get_or(
            SettingKey::ShortcutBgColor,
            defaults::SHORTCUT_BG_COLOR.to_owned(),
        )
    }

    pub fn set_shortcut_bg_color(&self, color: &str) -> Result<(), SettingsError> {
        self.write(SettingKey::ShortcutBgColor, color)
    }

    pub fn shortcut_bg_opacity(&self) -> f64 {
        self.get_or(SettingKey::ShortcutBgOpacity, defaults::SHORTCUT_BG_OPACITY)
    }

    pub fn set_shortcut_bg_opacity(&self, opacity: f64) -> Result<(), SettingsError> {
        self.write(SettingKey::ShortcutBgOpacity, &opacity)
    }

    pub fn shortcut_icon_rounding(&self) -> f64 {
        self.get_or(
            SettingKey::ShortcutIconRounding,
            defaults::SHORTCUT_ICON_ROUNDING,
        )
    }

    pub fn set_shortcut_icon_rounding(&self, rounding: f64) -> Result<(), SettingsError> {
        self.write(SettingKey::ShortcutIconRounding, &rounding)
    }

    pub fn theme(&self) -> Theme {
        self.get_or(SettingKey::Theme, defaults::THEME)
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), SettingsError> {
        self.write(SettingKey::Theme, &theme)
    }

    pub fn language(&self) -> String {
        self.get_or(SettingKey::Language, defaults::LANGUAGE.to_owned())
    }

    pub fn set_language(&self, language: &str) -> Result<(), SettingsError> {
        self.write(SettingKey::Language, language)
    }

    pub fn open_in_new_tab(&self) -> bool {
        self.get_or(SettingKey::OpenInNewTab, defaults::OPEN_IN_NEW_TAB)
    }

    pub fn set_open_in_new_tab(&self, open_in_new_tab: bool) -> Result<(), SettingsError> {
        self.write(SettingKey::OpenInNewTab, &open_in_new_tab)
    }

    pub fn bing_wallpaper_cache(&self) -> Option<BingWallpaperCache> {
        self.get(SettingKey::BingWallpaperCache)
    }

    pub fn set_bing_wallpaper_cache(&self, cache: &BingWallpaperCache) -> Result<(), SettingsError> {
        self.write(SettingKey::BingWallpaperCache, cache)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use newtab_types::settings::{SettingKey, Theme};
    use newtab_types::wallpaper::{BingWallpaperCache, WallpaperConfig};

    use crate::storage::{MemoryStorage, Storage};

    use super::{defaults, SettingsStore};

    fn store() -> SettingsStore<MemoryStorage> {
        SettingsStore::new(MemoryStorage::new())
    }

    #[test]
    fn test_write_then_read() {
        let store = store();
        store.write(SettingKey::Columns, &7).unwrap();
        assert_eq!(store.read(SettingKey::Columns, json!(5)), json!(7));
        assert_eq!(store.read(SettingKey::LogoUrl, json!("/x.svg")), json!("/x.svg"));
    }

    #[test]
    fn test_every_key_reads_back_equal() {
        let store = store();
        let values = [
            (SettingKey::LogoUrl, json!("https://logo.example/logo.png")),
            (SettingKey::Columns, json!(8)),
            (SettingKey::Shortcuts, serde_json::to_value(defaults::shortcuts()).unwrap()),
            (SettingKey::WallpaperConfig, json!({ "type": "url", "value": "https://a.example/b.jpg" })),
            (SettingKey::ShortcutBgColor, json!("#112233")),
            (SettingKey::ShortcutBgOpacity, json!(0.35)),
            (SettingKey::ShortcutIconRounding, json!(25)),
            (SettingKey::Theme, json!("dark")),
            (SettingKey::Language, json!("zh-CN")),
            (SettingKey::OpenInNewTab, json!(false)),
            (SettingKey::BingWallpaperCache, json!({ "url": "https://b.example/c.jpg", "date": "2024-01-01" })),
        ];
        for (key, value) in &values {
            store.write(*key, value).unwrap();
        }
        for (key, value) in values {
            assert_eq!(store.read(key, json!(null)), value, "{key}");
        }
    }

    #[test]
    fn test_raw_strings_fall_back_to_text() {
        let storage = [("theme", "dark"), ("i18nextLng", "en-US")]
            .into_iter()
            .collect::<MemoryStorage>();
        let store = SettingsStore::new(storage);
        assert_eq!(store.read(SettingKey::Theme, json!(null)), json!("dark"));
        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.language(), "en-US");
    }

    #[test]
    fn test_typed_accessors_default() {
        let store = store();
        assert_eq!(store.logo_url(), "/placeholder.svg");
        assert_eq!(store.columns(), 5);
        assert_eq!(store.shortcuts().len(), 10);
        assert_eq!(store.wallpaper_config(), WallpaperConfig::none());
        assert_eq!(store.shortcut_bg_color(), "#ffffff");
        assert_eq!(store.shortcut_bg_opacity(), 0.1);
        assert_eq!(store.shortcut_icon_rounding(), 0.0);
        assert_eq!(store.theme(), Theme::System);
        assert!(store.open_in_new_tab());
        assert_eq!(store.bing_wallpaper_cache(), None);
    }

    #[test]
    fn test_typed_accessors_ignore_malformed_values() {
        let storage = [("columns", "\"wide\""), ("wallpaperConfig", "{\"type\":\"video\"}")]
            .into_iter()
            .collect::<MemoryStorage>();
        let store = SettingsStore::new(storage);
        assert_eq!(store.columns(), 5);
        assert_eq!(store.wallpaper_config(), WallpaperConfig::none());
        // the stored text is not touched
        assert_eq!(
            store.storage().get_item("columns").as_deref(),
            Some("\"wide\"")
        );
    }

    #[test]
    fn test_typed_setters() {
        let store = store();
        store.set_columns(3).unwrap();
        store.set_theme(Theme::Light).unwrap();
        store.set_open_in_new_tab(false).unwrap();
        store
            .set_wallpaper_config(&WallpaperConfig::bing())
            .unwrap();
        let cache = BingWallpaperCache {
            url: "https://b.example/c.jpg".to_owned(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        store.set_bing_wallpaper_cache(&cache).unwrap();

        assert_eq!(store.columns(), 3);
        assert_eq!(store.theme(), Theme::Light);
        assert!(!store.open_in_new_tab());
        assert_eq!(store.wallpaper_config(), WallpaperConfig::bing());
        assert_eq!(store.bing_wallpaper_cache(), Some(cache));
        assert_eq!(store.storage().get_item("theme").as_deref(), Some("\"light\""));
    }

    #[test]
    fn test_remove() {
        let store = store();
        store.set_columns(3).unwrap();
        store.remove(SettingKey::Columns).unwrap();
        assert_eq!(store.columns(), 5);
    }
}
