#![deny(unused_must_use)]

pub mod appearance;
pub mod commands;
pub mod config;
pub mod error;
pub mod notify;
pub mod settings;
pub mod shortcuts;
pub mod storage;
mod util;
pub mod wallpaper;

use slog_scope::info;

use error::Error;

pub fn main() -> anyhow::Result<()> {
    let _guard = slog_envlogger::init()?;

    newtab_paths::init()?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match rt.block_on(commands::run(lexopt::Parser::from_env())) {
        Ok(()) => Ok(()),
        Err(Error::Aborted) => {
            info!("Aborted by the user");
            Ok(())
        }
        Err(Error::Error(e)) => Err(e),
        Err(e) => Err(e.into()),
    }
}
