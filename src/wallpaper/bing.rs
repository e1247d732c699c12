//! Client for the public Bing image-of-the-day mirror.

use slog_scope::debug;
use url::Url;

use super::{FetchError, WallpaperSource};

pub const DEFAULT_ENDPOINT: &str = "https://bing.biturl.top/";
pub const DEFAULT_RESOLUTION: u32 = 1920;
pub const DEFAULT_MARKET: &str = "en-US";

#[derive(serde::Deserialize)]
struct ImageOfTheDay {
    url: String,
}

pub struct BingClient {
    client: reqwest::Client,
    request_url: Url,
}

impl BingClient {
    pub fn new(client: reqwest::Client, endpoint: &Url, resolution: u32, market: &str) -> Self {
        let mut request_url = endpoint.clone();
        request_url
            .query_pairs_mut()
            .append_pair("resolution", &resolution.to_string())
            .append_pair("format", "json")
            .append_pair("index", "0")
            .append_pair("mkt", market);
        Self {
            client,
            request_url,
        }
    }

    pub fn request_url(&self) -> &Url {
        &self.request_url
    }
}

impl WallpaperSource for BingClient {
    async fn fetch_url(&self) -> Result<String, FetchError> {
        debug!("Fetching the Bing wallpaper from {}", self.request_url);
        let image = self
            .client
            .get(self.request_url.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<ImageOfTheDay>()
            .await?;
        if image.url.is_empty() {
            return Err(FetchError::MissingUrl);
        }
        Ok(image.url)
    }
}
