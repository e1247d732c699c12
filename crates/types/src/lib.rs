//! Data model shared by the newtab application and its tooling.

pub mod settings;
pub mod shortcuts;
pub mod wallpaper;
