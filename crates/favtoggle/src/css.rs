//! CSS for the catalog window.
//!
//! Indicator colors are plain style rules keyed off the tint classes, so a
//! widget's color changes only by swapping classes.

use favtoggle_core::{Config, FavoritePalette, Tint};
use tracing::{debug, warn};

use crate::styles::{class, tint};

/// Generate the full stylesheet for `config`.
pub fn generate_css(config: &Config, palette: &FavoritePalette) -> String {
    let icon = &config.selectors.icon;
    let highlighted_class = tint::HIGHLIGHTED;
    let neutral_class = tint::NEUTRAL;
    let highlighted = palette.color(Tint::Highlighted);
    let neutral = palette.color(Tint::Neutral);

    format!(
        r#"
/* ===== CATALOG ===== */

.{catalog} {{
    padding: 16px;
}}

.{title} {{
    font-size: 1.4em;
    font-weight: bold;
}}

.{card} {{
    padding: 12px;
    border-radius: 8px;
    background: alpha(currentColor, 0.06);
}}

.{card}:hover {{
    background: alpha(currentColor, 0.10);
}}

.{name} {{
    font-weight: bold;
}}

.{meta} {{
    opacity: 0.7;
    font-size: 0.9em;
}}

.{status} {{
    opacity: 0.7;
}}

/* ===== FAVORITES ===== */

.{icon} {{
    font-size: 1.5em;
}}

.{highlighted_class} {{
    color: {highlighted};
}}

.{neutral_class} {{
    color: {neutral};
}}
"#,
        catalog = class::CATALOG,
        title = class::CATALOG_TITLE,
        card = class::PRODUCT_CARD,
        name = class::PRODUCT_NAME,
        meta = class::PRODUCT_META,
        status = class::STATUS,
    )
}

/// Install the stylesheet on the default display.
pub fn load_css(config: &Config) {
    let palette = FavoritePalette::from_config(config);
    let css = generate_css(config, &palette);

    let provider = gtk4::CssProvider::new();
    provider.load_from_string(&css);

    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_USER,
        );
        debug!(
            "CSS loaded (favorited={}, neutral={})",
            palette.highlighted, palette.neutral
        );
    } else {
        warn!("No default display available, CSS styling not applied");
    }
}
