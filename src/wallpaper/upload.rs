//! Local image uploads. The image is embedded into the configuration as a data URI.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use slog_scope::info;

use newtab_types::wallpaper::WallpaperConfig;

pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("File size should not exceed 5MB, got {size} bytes")]
    TooLarge { size: u64 },
    #[error("Unsupported image type {0:?}, expected PNG, JPEG, GIF or WebP")]
    UnsupportedType(String),
}

pub fn mime_type(path: &Path) -> Result<&'static str, UploadError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match &*ext {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        _ => Err(UploadError::UnsupportedType(ext)),
    }
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Reads an image file into a `file` wallpaper configuration.
pub fn load(path: &Path) -> Result<WallpaperConfig, UploadError> {
    let mime = mime_type(path)?;
    let read_error = |source| UploadError::Read {
        path: path.to_owned(),
        source,
    };
    let size = fs::metadata(path).map_err(read_error)?.len();
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge { size });
    }
    let bytes = fs::read(path).map_err(read_error)?;
    info!("Loaded {} byte wallpaper from {path:?}", bytes.len());
    Ok(WallpaperConfig::file(data_uri(mime, &bytes)))
}
