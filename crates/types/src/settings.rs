use std::fmt;

/// A key of the start page's local storage.
///
/// Every key except [`SettingKey::BingWallpaperCache`] is part of the export allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum SettingKey {
    LogoUrl,
    Columns,
    Shortcuts,
    WallpaperConfig,
    ShortcutBgColor,
    ShortcutBgOpacity,
    ShortcutIconRounding,
    Theme,
    /// The UI language, under the key the i18n layer uses.
    #[strum(serialize = "i18nextLng")]
    Language,
    OpenInNewTab,
    BingWallpaperCache,
}

impl SettingKey {
    /// Keys eligible for export and import, in export order.
    pub const EXPORTABLE: &'static [SettingKey] = &[
        Self::LogoUrl,
        Self::Columns,
        Self::Shortcuts,
        Self::WallpaperConfig,
        Self::ShortcutBgColor,
        Self::ShortcutBgOpacity,
        Self::ShortcutIconRounding,
        Self::Theme,
        Self::Language,
        Self::OpenInNewTab,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LogoUrl => "logoUrl",
            Self::Columns => "columns",
            Self::Shortcuts => "shortcuts",
            Self::WallpaperConfig => "wallpaperConfig",
            Self::ShortcutBgColor => "shortcutBgColor",
            Self::ShortcutBgOpacity => "shortcutBgOpacity",
            Self::ShortcutIconRounding => "shortcutIconRounding",
            Self::Theme => "theme",
            Self::Language => "i18nextLng",
            Self::OpenInNewTab => "openInNewTab",
            Self::BingWallpaperCache => "bingWallpaperCache",
        }
    }

    pub const fn is_exportable(self) -> bool {
        !matches!(self, Self::BingWallpaperCache)
    }

    /// Looks up an allow-listed key by its storage name.
    pub fn exportable(name: &str) -> Option<Self> {
        name.parse::<Self>().ok().filter(|key| key.is_exportable())
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{SettingKey, Theme};

    #[test]
    fn test_key_names_parse_back() {
        for &key in SettingKey::EXPORTABLE {
            assert_eq!(SettingKey::from_str(key.as_str()), Ok(key), "{key}");
        }
        assert_eq!(
            SettingKey::from_str("bingWallpaperCache"),
            Ok(SettingKey::BingWallpaperCache)
        );
        assert!(SettingKey::from_str("somethingElse").is_err());
    }

    #[test]
    fn test_allow_list_excludes_cache() {
        assert_eq!(SettingKey::EXPORTABLE.len(), 10);
        assert!(!SettingKey::EXPORTABLE.contains(&SettingKey::BingWallpaperCache));
        assert_eq!(SettingKey::exportable("bingWallpaperCache"), None);
        assert_eq!(SettingKey::exportable("i18nextLng"), Some(SettingKey::Language));
        assert_eq!(SettingKey::exportable("nope"), None);
        assert!(!SettingKey::BingWallpaperCache.is_exportable());
        for &key in SettingKey::EXPORTABLE {
            assert!(key.is_exportable(), "{key}");
        }
    }

    #[test]
    fn test_theme_names() {
        assert_eq!(Theme::from_str("dark"), Ok(Theme::Dark));
        assert_eq!(serde_json::to_string(&Theme::System).unwrap(), "\"system\"");
        assert_eq!(Theme::Light.as_str(), "light");
    }
}
