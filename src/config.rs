//! Application configuration. Read once at startup from `newtab.json` in the config directory;
//! every field is optional and a missing file means defaults.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use slog_scope::debug;
use smol_str::SmolStr;
use url::Url;

use newtab_paths::{config_dir, PRODUCT_NAME};

use crate::util::IoErrorKindExt;
use crate::wallpaper::bing;

pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bing_endpoint: Url,
    pub bing_resolution: u32,
    pub bing_market: SmolStr,
    pub default_profile: SmolStr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bing_endpoint: default_bing_endpoint(),
            bing_resolution: bing::DEFAULT_RESOLUTION,
            bing_market: SmolStr::new_static(bing::DEFAULT_MARKET),
            default_profile: SmolStr::new_static(DEFAULT_PROFILE),
        }
    }
}

fn default_bing_endpoint() -> Url {
    Url::parse(bing::DEFAULT_ENDPOINT).unwrap()
}

/// A representation of the config file that must retain complete backwards compatibility.
/// Migrations happen on load into [`Config`].
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct ConfigOnDisk {
    #[serde(rename = "bingEndpoint", default)]
    bing_endpoint: Option<Url>,
    #[serde(rename = "bingResolution", default)]
    bing_resolution: Option<u32>,
    #[serde(rename = "bingMarket", default)]
    bing_market: Option<SmolStr>,
    #[serde(rename = "defaultProfile", default)]
    default_profile: Option<SmolStr>,
}

impl From<ConfigOnDisk> for Config {
    fn from(value: ConfigOnDisk) -> Self {
        let defaults = Config::default();
        Self {
            bing_endpoint: value.bing_endpoint.unwrap_or(defaults.bing_endpoint),
            bing_resolution: value.bing_resolution.unwrap_or(defaults.bing_resolution),
            bing_market: value.bing_market.unwrap_or(defaults.bing_market),
            default_profile: value.default_profile.unwrap_or(defaults.default_profile),
        }
    }
}

pub fn get_path() -> PathBuf {
    config_dir().join(format!("{PRODUCT_NAME}.json"))
}

fn read(path: &Path) -> anyhow::Result<Option<Config>> {
    let mut bytes = match std::fs::read(path) {
        Ok(t) => t,
        Err(e) if e.is_not_found() => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let config = simd_json::from_slice::<ConfigOnDisk>(&mut bytes)?;
    Ok(Some(config.into()))
}

/// Loads the config from `path`, or from [`get_path`] if none is given.
pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path.to_owned(),
        None => get_path(),
    };
    match read(&path).with_context(|| format!("Failed to read config from {path:?}"))? {
        Some(config) => {
            debug!("Loaded config from {path:?}");
            Ok(config)
        }
        None => {
            debug!("No config at {path:?}, using defaults");
            Ok(Config::default())
        }
    }
}
