//! Favorite indicator colors.
//!
//! `FavoritePalette` is the single source of truth for the two indicator
//! hues. Every host asks it for the color of a state rather than picking
//! colors itself, so the favorited state and its color always agree.

use crate::Config;

/// Default highlighted hue for favorited indicators.
pub const DEFAULT_FAVORITED_COLOR: &str = "#ff6b6b";

/// Default neutral hue for indicators that are not favorited.
pub const DEFAULT_NEUTRAL_COLOR: &str = "#ccc";

/// Parse a hex color string to RGB tuple. Returns None if invalid.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let color = color.trim().trim_start_matches('#');

    // Expand shorthand (e.g., "fff" -> "ffffff")
    let color = if color.len() == 3 {
        color.chars().flat_map(|c| [c, c]).collect::<String>()
    } else {
        color.to_string()
    };

    if color.len() != 6 || !color.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&color[0..2], 16).ok()?;
    let g = u8::from_str_radix(&color[2..4], 16).ok()?;
    let b = u8::from_str_radix(&color[4..6], 16).ok()?;

    Some((r, g, b))
}

/// True for `#rgb` or `#rrggbb`. The leading `#` is required.
pub fn is_valid_hex_color(color: &str) -> bool {
    color.starts_with('#') && parse_hex_color(color).is_some()
}

/// Which of the two palette hues an indicator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Highlighted,
    Neutral,
}

impl Tint {
    /// The tint matching a favorited state.
    pub fn for_state(favorited: bool) -> Self {
        if favorited {
            Tint::Highlighted
        } else {
            Tint::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritePalette {
    pub highlighted: String,
    pub neutral: String,
}

impl FavoritePalette {
    pub fn from_config(config: &Config) -> Self {
        Self {
            highlighted: config.colors.favorited.clone(),
            neutral: config.colors.neutral.clone(),
        }
    }

    /// Color string for a tint, exactly as configured.
    pub fn color(&self, tint: Tint) -> &str {
        match tint {
            Tint::Highlighted => &self.highlighted,
            Tint::Neutral => &self.neutral,
        }
    }

    /// Color string for a favorited state.
    pub fn color_for_state(&self, favorited: bool) -> &str {
        self.color(Tint::for_state(favorited))
    }
}

impl Default for FavoritePalette {
    fn default() -> Self {
        Self {
            highlighted: DEFAULT_FAVORITED_COLOR.to_string(),
            neutral: DEFAULT_NEUTRAL_COLOR.to_string(),
        }
    }
}
