use std::path::PathBuf;
use std::sync::OnceLock;

/// Casing depends on platform.
pub const FOLDER_NAME: &'static str = if cfg!(target_os = "macos") || cfg!(target_os = "windows") {
    // use title case on macOS and Windows
    "NewTab"
} else {
    // use lowercase on Linux
    "newtab"
};

/// Always lowercase.
pub const PRODUCT_NAME: &'static str = "newtab";

static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();
static LOCAL_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();
static STORAGE_DIR: OnceLock<PathBuf> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("The {name} directory slot is already filled")]
    AlreadySet { name: &'static str },
    #[error("Unable to determine the {name} directory")]
    UnableToDetermine { name: &'static str },
    #[error("The {name} directory path is not absolute: {path:?}")]
    NotAbsolute { name: &'static str, path: PathBuf },
    #[error("Failed to create the {name} directory: {error}")]
    FailedToCreate {
        name: &'static str,
        error: std::io::Error,
    },
}

fn set(
    name: &'static str,
    slot: &OnceLock<PathBuf>,
    path: Option<PathBuf>,
) -> Result<(), InitError> {
    let path = path.ok_or(InitError::UnableToDetermine { name })?;

    if !path.is_absolute() {
        return Err(InitError::NotAbsolute { name, path });
    }

    std::fs::create_dir_all(&path).map_err(|error| InitError::FailedToCreate { name, error })?;

    slot.set(path).map_err(|_| InitError::AlreadySet { name })?;
    Ok(())
}

/// Resolves and creates the application directories. Must be called once before any of the
/// accessors below.
pub fn init() -> Result<(), InitError> {
    set(
        "config",
        &CONFIG_DIR,
        dirs::config_dir().map(|mut p| {
            p.push(FOLDER_NAME);
            p
        }),
    )?;
    set(
        "local data",
        &LOCAL_DATA_DIR,
        dirs::data_local_dir().map(|mut p| {
            p.push(FOLDER_NAME);
            p
        }),
    )?;
    // one file per profile, the equivalent of a browser's per-origin local storage
    set("storage", &STORAGE_DIR, Some(local_data_dir().join("storage")))?;

    Ok(())
}

pub fn config_dir() -> &'static PathBuf {
    CONFIG_DIR.get().unwrap()
}

pub fn local_data_dir() -> &'static PathBuf {
    LOCAL_DATA_DIR.get().unwrap()
}

pub fn storage_dir() -> &'static PathBuf {
    STORAGE_DIR.get().unwrap()
}
