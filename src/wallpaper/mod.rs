//! Turns the wallpaper configuration into the image the page displays.
//!
//! Only the Bing image of the day involves I/O. Its URL is cached per calendar day under the
//! `bingWallpaperCache` setting so the service is asked at most once a day while it succeeds.

use std::future::Future;

use chrono::NaiveDate;
use slog_scope::{debug, error, warn};

use newtab_types::wallpaper::{BingWallpaperCache, WallpaperConfig, WallpaperKind};

use crate::notify::{self, Notification, Notifier};
use crate::settings::SettingsStore;
use crate::storage::Storage;

pub mod bing;
mod slot;
pub mod upload;

pub use slot::BackgroundSlot;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("The wallpaper service returned no image URL")]
    MissingUrl,
}

/// A remote source of the image of the day.
pub trait WallpaperSource {
    fn fetch_url(&self) -> impl Future<Output = Result<String, FetchError>>;
}

pub struct WallpaperResolver<W> {
    source: W,
}

impl<W: WallpaperSource> WallpaperResolver<W> {
    pub fn new(source: W) -> Self {
        Self { source }
    }

    #[cfg(test)]
    fn source(&self) -> &W {
        &self.source
    }

    /// Resolves `config` to an image URL, or `None` for no wallpaper.
    ///
    /// A failed fetch is reported through `notifier` and leaves the cached entry as it was.
    pub async fn resolve<S: Storage>(
        &self,
        config: &WallpaperConfig,
        settings: &SettingsStore<S>,
        notifier: &dyn Notifier,
        today: NaiveDate,
    ) -> Option<String> {
        match config.kind {
            WallpaperKind::None => None,
            WallpaperKind::Url | WallpaperKind::File => config.static_image().map(str::to_owned),
            WallpaperKind::Bing => self.resolve_bing(settings, notifier, today).await,
        }
    }

    async fn resolve_bing<S: Storage>(
        &self,
        settings: &SettingsStore<S>,
        notifier: &dyn Notifier,
        today: NaiveDate,
    ) -> Option<String> {
        if let Some(cache) = settings.bing_wallpaper_cache() {
            if cache.is_valid_on(today) {
                debug!("Using the cached Bing wallpaper from {}", cache.date);
                return Some(cache.url);
            }
        }

        match self.source.fetch_url().await {
            Ok(url) => {
                let cache = BingWallpaperCache { url, date: today };
                if let Err(e) = settings.set_bing_wallpaper_cache(&cache) {
                    warn!("Failed to cache the Bing wallpaper: {e}");
                }
                Some(cache.url)
            }
            Err(e) => {
                error!("Failed to fetch the Bing wallpaper: {e}");
                notifier.notify(Notification::error(notify::BING_ERROR));
                None
            }
        }
    }

    /// Resolves `config` and stores the result in `slot`, unless a resolution started after
    /// this one got there first. Returns whether the result was applied.
    pub async fn resolve_into<S: Storage>(
        &self,
        slot: &BackgroundSlot,
        config: &WallpaperConfig,
        settings: &SettingsStore<S>,
        notifier: &dyn Notifier,
        today: NaiveDate,
    ) -> bool {
        let ticket = slot.begin();
        let image = self.resolve(config, settings, notifier, today).await;
        slot.apply(ticket, image)
    }
}
