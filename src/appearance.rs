//! CSS values derived from the appearance settings.

use crate::settings::SettingsStore;
use crate::storage::Storage;

/// Icon rounding is a percentage of the icon size; 50% is already a circle.
pub const MAX_ICON_ROUNDING: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Parses `#rrggbb` or `rrggbb`, case-insensitively.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Background of a shortcut tile. Unparsable colors fall back to white.
pub fn shortcut_background(color: &str, opacity: f64) -> String {
    if opacity == 0.0 {
        return "transparent".to_owned();
    }
    let Rgb { r, g, b } = hex_to_rgb(color).unwrap_or(Rgb {
        r: 255,
        g: 255,
        b: 255,
    });
    format!("rgba({r}, {g}, {b}, {opacity})")
}

/// Opacity as the whole percentage shown next to the slider.
pub fn opacity_percent(opacity: f64) -> i64 {
    (opacity * 100.0).round() as i64
}

pub fn icon_border_radius(rounding: f64) -> String {
    let rounding = if rounding.is_nan() {
        0.0
    } else {
        rounding.clamp(0.0, MAX_ICON_ROUNDING)
    };
    format!("{rounding}%")
}

pub fn grid_template_columns(columns: u32) -> String {
    format!("repeat({}, minmax(0, 1fr))", columns.max(1))
}

pub fn link_target(open_in_new_tab: bool) -> &'static str {
    if open_in_new_tab { "_blank" } else { "_self" }
}

/// Everything the grid needs to style itself.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Appearance {
    #[serde(rename = "shortcutBackground")]
    pub shortcut_background: String,
    #[serde(rename = "opacityPercent")]
    pub opacity_percent: i64,
    #[serde(rename = "iconBorderRadius")]
    pub icon_border_radius: String,
    #[serde(rename = "gridTemplateColumns")]
    pub grid_template_columns: String,
    #[serde(rename = "linkTarget")]
    pub link_target: &'static str,
}

impl Appearance {
    pub fn from_settings<S: Storage>(settings: &SettingsStore<S>) -> Self {
        let opacity = settings.shortcut_bg_opacity();
        Self {
            shortcut_background: shortcut_background(&settings.shortcut_bg_color(), opacity),
            opacity_percent: opacity_percent(opacity),
            icon_border_radius: icon_border_radius(settings.shortcut_icon_rounding()),
            grid_template_columns: grid_template_columns(settings.columns()),
            link_target: link_target(settings.open_in_new_tab()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::settings::SettingsStore;
    use crate::storage::MemoryStorage;

    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ff8000"), Some(Rgb { r: 255, g: 128, b: 0 }));
        assert_eq!(hex_to_rgb("0A0b0C"), Some(Rgb { r: 10, g: 11, b: 12 }));
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("#gg0000"), None);
        assert_eq!(hex_to_rgb("#ff80001"), None);
    }

    #[test]
    fn test_shortcut_background() {
        assert_eq!(shortcut_background("#ffffff", 0.0), "transparent");
        assert_eq!(shortcut_background("#102030", 0.5), "rgba(16, 32, 48, 0.5)");
        assert_eq!(shortcut_background("red", 0.1), "rgba(255, 255, 255, 0.1)");
        assert_eq!(shortcut_background("#000000", 1.0), "rgba(0, 0, 0, 1)");
    }

    #[test]
    fn test_small_conversions() {
        assert_eq!(opacity_percent(0.35), 35);
        assert_eq!(opacity_percent(0.1), 10);
        assert_eq!(icon_border_radius(25.0), "25%");
        assert_eq!(icon_border_radius(80.0), "50%");
        assert_eq!(icon_border_radius(-3.0), "0%");
        assert_eq!(grid_template_columns(0), "repeat(1, minmax(0, 1fr))");
        assert_eq!(link_target(true), "_blank");
        assert_eq!(link_target(false), "_self");
    }

    #[test]
    fn test_from_defaults() {
        let store = SettingsStore::new(MemoryStorage::new());
        assert_eq!(
            Appearance::from_settings(&store),
            Appearance {
                shortcut_background: "rgba(255, 255, 255, 0.1)".to_owned(),
                opacity_percent: 10,
                icon_border_radius: "0%".to_owned(),
                grid_template_columns: "repeat(5, minmax(0, 1fr))".to_owned(),
                link_target: "_blank",
            }
        );
    }
}
