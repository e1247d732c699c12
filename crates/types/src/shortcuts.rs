use smol_str::SmolStr;

/// A link tile on the start page.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Shortcut {
    /// Opaque identifier, unique for the lifetime of the shortcut.
    pub id: SmolStr,
    /// Display name.
    pub name: SmolStr,
    /// Target URL.
    pub href: String,
    #[serde(rename = "iconUrl")]
    pub icon_url: String,
    /// Display order only. Not required to be contiguous or unique.
    pub position: i64,
}

/// Returns the shortcuts in display order.
///
/// The sort is stable, so shortcuts sharing a position keep their collection order.
pub fn display_order(shortcuts: &[Shortcut]) -> Vec<&Shortcut> {
    let mut sorted = shortcuts.iter().collect::<Vec<_>>();
    sorted.sort_by_key(|s| s.position);
    sorted
}
