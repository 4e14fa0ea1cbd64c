//! Color palette shapes shared by the board state and goal grid.
//!
//! # Invariants
//! - Color literals are CSS hex strings (`#rgb` or `#rrggbb`).
//! - Palette lookups never fail; missing entries fall back to defaults.
//! - `resolve_color` only yields hex literals; palette entries holding any
//!   other color syntax are skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Neutral background for cells without palette entry or override.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
/// Neutral text color for cells without palette entry.
pub const DEFAULT_TEXT_COLOR: &str = "#333333";

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex")
});

/// Named color offered by the external state container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub name: String,
    /// CSS color literal.
    pub color_value: String,
}

impl PaletteColor {
    pub fn new(name: impl Into<String>, color_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color_value: color_value.into(),
        }
    }
}

/// Background/text pair painted onto one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPalette {
    pub background: &'static str,
    pub text_color: &'static str,
}

impl CellPalette {
    pub const fn new(background: &'static str, text_color: &'static str) -> Self {
        Self {
            background,
            text_color,
        }
    }
}

/// Returns whether `value` is an accepted CSS hex color literal.
pub fn is_color_literal(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

/// Resolves a user-supplied color against a palette.
///
/// Accepts a palette entry name (case-insensitive) or a hex literal.
/// Returns the lowercased hex value, or `None` when nothing matches or the
/// named entry does not hold a hex literal.
pub fn resolve_color(palette: &[PaletteColor], value: &str) -> Option<String> {
    let trimmed = value.trim();
    if let Some(entry) = palette
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(trimmed))
    {
        let color = entry.color_value.trim();
        return is_color_literal(color).then(|| color.to_ascii_lowercase());
    }
    if is_color_literal(trimmed) {
        return Some(trimmed.to_ascii_lowercase());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{is_color_literal, resolve_color, PaletteColor};

    #[test]
    fn color_literal_accepts_short_and_long_hex() {
        assert!(is_color_literal("#fff"));
        assert!(is_color_literal("#A1b2C3"));
        assert!(!is_color_literal("fff"));
        assert!(!is_color_literal("#12345"));
        assert!(!is_color_literal("red"));
    }

    #[test]
    fn resolve_color_prefers_palette_names() {
        let palette = vec![PaletteColor::new("Mint", "#c8f7dc")];
        assert_eq!(resolve_color(&palette, " mint ").as_deref(), Some("#c8f7dc"));
        assert_eq!(resolve_color(&palette, "#ABC").as_deref(), Some("#abc"));
        assert_eq!(resolve_color(&palette, "teal"), None);
    }

    #[test]
    fn resolve_color_skips_entries_without_hex_value() {
        let palette = vec![
            PaletteColor::new("red", "rgb(255, 0, 0)"),
            PaletteColor::new("Sky", " #87CEEB "),
        ];
        assert_eq!(resolve_color(&palette, "red"), None);
        assert_eq!(resolve_color(&palette, "sky").as_deref(), Some("#87ceeb"));
    }
}
