use chrono::NaiveDate;

/// Source of the page background.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WallpaperKind {
    #[default]
    None,
    /// The Bing image of the day.
    Bing,
    Url,
    /// An uploaded image, stored inline as a data URI.
    File,
}

impl WallpaperKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bing => "bing",
            Self::Url => "url",
            Self::File => "file",
        }
    }

    /// Whether configurations of this kind carry a value.
    pub const fn has_value(self) -> bool {
        matches!(self, Self::Url | Self::File)
    }
}

/// `value` is `None` for [`WallpaperKind::None`] and [`WallpaperKind::Bing`], and a string for
/// the other kinds. Stored documents that break this still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct WallpaperConfig {
    #[serde(rename = "type")]
    pub kind: WallpaperKind,
    #[serde(default)]
    pub value: Option<String>,
}

impl WallpaperConfig {
    pub const fn none() -> Self {
        Self {
            kind: WallpaperKind::None,
            value: None,
        }
    }

    pub const fn bing() -> Self {
        Self {
            kind: WallpaperKind::Bing,
            value: None,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            kind: WallpaperKind::Url,
            value: Some(url.into()),
        }
    }

    pub fn file(data_uri: impl Into<String>) -> Self {
        Self {
            kind: WallpaperKind::File,
            value: Some(data_uri.into()),
        }
    }

    /// Switches to another kind the way the wallpaper picker does.
    ///
    /// Switching to `url` keeps the current value only if it looks like an http(s) URL,
    /// `none` and `bing` drop the value, and `file` keeps whatever value is present.
    pub fn with_kind(self, kind: WallpaperKind) -> Self {
        match kind {
            WallpaperKind::Url => {
                let value = match self.value {
                    Some(v) if v.starts_with("http") => v,
                    _ => String::new(),
                };
                Self {
                    kind,
                    value: Some(value),
                }
            }
            WallpaperKind::None | WallpaperKind::Bing => Self { kind, value: None },
            WallpaperKind::File => Self { kind, ..self },
        }
    }

    /// The image to display when no fetch is involved.
    pub fn static_image(&self) -> Option<&str> {
        if self.kind.has_value() {
            self.value.as_deref().filter(|v| !v.is_empty())
        } else {
            None
        }
    }
}

/// The last Bing image of the day seen, keyed by calendar day.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct BingWallpaperCache {
    pub url: String,
    pub date: NaiveDate,
}

impl BingWallpaperCache {
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        self.date == today && !self.url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{BingWallpaperCache, WallpaperConfig, WallpaperKind};

    #[test]
    fn test_wire_format() {
        let config: WallpaperConfig =
            serde_json::from_str(r#"{"type":"none","value":null}"#).unwrap();
        assert_eq!(config, WallpaperConfig::none());

        let config: WallpaperConfig = serde_json::from_str(r#"{"type":"bing"}"#).unwrap();
        assert_eq!(config, WallpaperConfig::bing());

        assert_eq!(
            serde_json::to_string(&WallpaperConfig::url("https://a.example/x.jpg")).unwrap(),
            r#"{"type":"url","value":"https://a.example/x.jpg"}"#
        );
    }

    #[test]
    fn test_kind_switching() {
        let file = WallpaperConfig::file("data:image/png;base64,AAAA");
        assert_eq!(
            file.clone().with_kind(WallpaperKind::Url),
            WallpaperConfig::url("")
        );
        assert_eq!(
            WallpaperConfig::url("https://a.example/x.jpg").with_kind(WallpaperKind::Url),
            WallpaperConfig::url("https://a.example/x.jpg")
        );
        assert_eq!(
            file.clone().with_kind(WallpaperKind::Bing),
            WallpaperConfig::bing()
        );
        assert_eq!(
            WallpaperConfig::url("https://a.example/x.jpg").with_kind(WallpaperKind::File),
            WallpaperConfig {
                kind: WallpaperKind::File,
                value: Some("https://a.example/x.jpg".to_owned()),
            }
        );
        assert_eq!(WallpaperConfig::none().with_kind(WallpaperKind::File).value, None);
    }

    #[test]
    fn test_static_image() {
        assert_eq!(WallpaperConfig::none().static_image(), None);
        assert_eq!(WallpaperConfig::bing().static_image(), None);
        assert_eq!(WallpaperConfig::url("").static_image(), None);
        assert_eq!(
            WallpaperConfig::file("data:image/png;base64,AAAA").static_image(),
            Some("data:image/png;base64,AAAA")
        );
    }

    #[test]
    fn test_cache_validity() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let cache: BingWallpaperCache =
            serde_json::from_str(r#"{"url":"https://bing.example/a.jpg","date":"2024-05-02"}"#)
                .unwrap();
        assert!(cache.is_valid_on(today));
        assert!(!cache.is_valid_on(today.pred_opt().unwrap()));

        let empty = BingWallpaperCache {
            url: String::new(),
            date: today,
        };
        assert!(!empty.is_valid_on(today));
    }
}
