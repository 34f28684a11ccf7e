//! Shared CSS class constants for favtoggle.
//!
//! Class names configured by the user (favorite icon marker, indicator,
//! favorited state) come from `Config::selectors`; everything here is fixed.
//!
//! ```ignore
//! use crate::styles::{class, tint};
//!
//! card.add_css_class(class::PRODUCT_CARD);
//! heart.add_css_class(tint::HIGHLIGHTED);
//! ```

/// Structural/layout classes.
pub mod class {
    use favtoggle_core::page;

    /// Window content root (`.catalog`).
    pub const CATALOG: &str = "catalog";

    /// Heading above the grid (`.catalog-title`).
    pub const CATALOG_TITLE: &str = "catalog-title";

    /// Grid holding the product cards (`.product-grid`).
    pub const PRODUCT_GRID: &str = page::GRID_CLASS;

    /// One product card (`.product-card`). Clicking it opens the product.
    pub const PRODUCT_CARD: &str = page::CARD_CLASS;

    /// Product name label (`.product-name`).
    pub const PRODUCT_NAME: &str = page::NAME_CLASS;

    /// Product price label (`.product-price`).
    pub const PRODUCT_PRICE: &str = page::PRICE_CLASS;

    /// Brand/category line (`.product-meta`).
    pub const PRODUCT_META: &str = page::META_CLASS;

    /// Status line at the bottom of the window (`.catalog-status`).
    pub const STATUS: &str = "catalog-status";
}

/// Indicator color classes.
///
/// Exactly one is present on an indicator at a time; the stylesheet maps
/// each to its palette color.
pub mod tint {
    use favtoggle_core::Tint;

    /// Favorited indicator (`.fav-tint-highlighted`).
    pub const HIGHLIGHTED: &str = "fav-tint-highlighted";

    /// Not-favorited indicator (`.fav-tint-neutral`).
    pub const NEUTRAL: &str = "fav-tint-neutral";

    pub fn class_for(tint: Tint) -> &'static str {
        match tint {
            Tint::Highlighted => HIGHLIGHTED,
            Tint::Neutral => NEUTRAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use favtoggle_core::Tint;

    #[test]
    fn test_tint_classes_are_distinct() {
        assert_ne!(tint::class_for(Tint::Highlighted), tint::class_for(Tint::Neutral));
        assert_eq!(tint::class_for(Tint::Highlighted), tint::HIGHLIGHTED);
    }
}
