//! Values used when a setting has never been written.

use newtab_types::settings::{SettingKey, Theme};
use newtab_types::shortcuts::Shortcut;
use newtab_types::wallpaper::WallpaperConfig;
use serde_json::Value;

pub const LOGO_URL: &str = "/placeholder.svg";
pub const COLUMNS: u32 = 5;
pub const SHORTCUT_BG_COLOR: &str = "#ffffff";
pub const SHORTCUT_BG_OPACITY: f64 = 0.1;
pub const SHORTCUT_ICON_ROUNDING: f64 = 0.0;
pub const THEME: Theme = Theme::System;
pub const LANGUAGE: &str = "en";
pub const OPEN_IN_NEW_TAB: bool = true;

pub const fn wallpaper_config() -> WallpaperConfig {
    WallpaperConfig::none()
}

const SITES: &[(&str, &str, &str)] = &[
    ("Google", "https://google.com", "google.com"),
    ("YouTube", "https://youtube.com", "youtube.com"),
    ("Facebook", "https://facebook.com", "facebook.com"),
    ("GitHub", "https://github.com", "github.com"),
    ("Twitter", "https://twitter.com", "twitter.com"),
    ("Reddit", "https://reddit.com", "reddit.com"),
    ("LinkedIn", "https://linkedin.com", "linkedin.com"),
    ("Netflix", "https://netflix.com", "netflix.com"),
    ("Twitch", "https://twitch.tv", "twitch.tv"),
    ("Amazon", "https://amazon.com", "amazon.com"),
];

/// Favicon service URL for a domain.
pub fn favicon_url(domain: &str) -> String {
    format!("https://www.google.com/s2/favicons?sz=64&domain={domain}")
}

pub fn shortcuts() -> Vec<Shortcut> {
    SITES
        .iter()
        .zip(1..)
        .map(|(&(name, href, domain), position)| Shortcut {
            id: position.to_string().into(),
            name: name.into(),
            href: href.to_owned(),
            icon_url: favicon_url(domain),
            position,
        })
        .collect()
}

/// The default of an exportable key in its structured form. `None` for the wallpaper cache,
/// which has no default.
pub fn value_for(key: SettingKey) -> Option<Value> {
    Some(match key {
        SettingKey::LogoUrl => LOGO_URL.into(),
        SettingKey::Columns => COLUMNS.into(),
        SettingKey::Shortcuts => serde_json::to_value(shortcuts()).ok()?,
        SettingKey::WallpaperConfig => serde_json::to_value(wallpaper_config()).ok()?,
        SettingKey::ShortcutBgColor => SHORTCUT_BG_COLOR.into(),
        SettingKey::ShortcutBgOpacity => SHORTCUT_BG_OPACITY.into(),
        SettingKey::ShortcutIconRounding => SHORTCUT_ICON_ROUNDING.into(),
        SettingKey::Theme => THEME.as_str().into(),
        SettingKey::Language => LANGUAGE.into(),
        SettingKey::OpenInNewTab => OPEN_IN_NEW_TAB.into(),
        SettingKey::BingWallpaperCache => return None,
    })
}

#[cfg(test)]
mod tests {
    use newtab_types::settings::SettingKey;

    #[test]
    fn test_default_shortcuts() {
        let shortcuts = super::shortcuts();
        assert_eq!(shortcuts.len(), 10);
        assert_eq!(shortcuts[0].id.as_str(), "1");
        assert_eq!(shortcuts[0].position, 1);
        assert_eq!(shortcuts[9].name.as_str(), "Amazon");
        assert_eq!(
            shortcuts[3].icon_url,
            "https://www.google.com/s2/favicons?sz=64&domain=github.com"
        );
    }

    #[test]
    fn test_every_exportable_key_has_a_default() {
        for &key in SettingKey::EXPORTABLE {
            assert!(super::value_for(key).is_some(), "{key}");
        }
        assert_eq!(super::value_for(SettingKey::BingWallpaperCache), None);
    }
}
