//! Catalog window: a grid of product cards with favorite icons.
//!
//! Cards open their product on click (release). Favorite icons sit inside
//! the cards and are bound by the favorite controller once the window
//! content exists; their press claims the event so the card never sees it.

use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, GestureClick, Grid, Label, Orientation,
    ScrolledWindow, Widget,
};
use tracing::{debug, info};

use favtoggle_core::page::{HEART_GLYPH, format_price};
use favtoggle_core::{Config, FavoriteController, ProductEntry};

use crate::gtk_host::GtkHost;
use crate::styles::class;

const CARD_SPACING: i32 = 12;

/// Build one product card and return it with its favorite icon.
fn build_card(product: &ProductEntry, config: &Config, status: &Label) -> (GtkBox, Widget) {
    let card = GtkBox::new(Orientation::Vertical, 4);
    card.add_css_class(class::PRODUCT_CARD);

    let header = GtkBox::new(Orientation::Horizontal, 8);

    let name = Label::new(Some(product.name.as_str()));
    name.add_css_class(class::PRODUCT_NAME);
    name.set_halign(Align::Start);
    name.set_hexpand(true);
    name.set_wrap(true);
    header.append(&name);

    let icon = build_icon(product, config);
    icon.set_valign(Align::Start);
    header.append(&icon);
    card.append(&header);

    let price = Label::new(Some(format_price(product.price).as_str()));
    price.add_css_class(class::PRODUCT_PRICE);
    price.set_halign(Align::Start);
    card.append(&price);

    let meta: Vec<&str> = [product.brand.as_deref(), product.category.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !meta.is_empty() {
        let meta_label = Label::new(Some(meta.join(" · ").as_str()));
        meta_label.add_css_class(class::PRODUCT_META);
        meta_label.set_halign(Align::Start);
        card.append(&meta_label);
    }

    let open = GestureClick::new();
    open.set_button(1); // GDK_BUTTON_PRIMARY
    let product_name = product.name.clone();
    let status = status.clone();
    open.connect_released(move |_gesture, _n_press, _x, _y| {
        info!("Opened product {}", product_name);
        status.set_label(&format!("Opened {}", product_name));
    });
    card.add_controller(open);

    (card, icon)
}

/// Favorite icon for `product`: a box holding a heart label, or a bare
/// label carrying the marker itself when the product has no nested heart.
fn build_icon(product: &ProductEntry, config: &Config) -> Widget {
    let selectors = &config.selectors;

    let icon: Widget = if product.heart {
        let icon = GtkBox::new(Orientation::Horizontal, 0);
        let heart = Label::new(Some(HEART_GLYPH));
        heart.add_css_class(&selectors.indicator);
        icon.append(&heart);
        icon.upcast()
    } else {
        Label::new(Some(HEART_GLYPH)).upcast()
    };

    icon.add_css_class(&selectors.icon);
    if product.favorited {
        icon.add_css_class(&selectors.favorited);
    }
    icon.set_cursor_from_name(Some("pointer"));
    icon.set_tooltip_text(Some("Favorite"));

    icon
}

/// Build the catalog window and bind favorite toggles on it.
pub fn build_window(app: &Application, config: &Config) -> ApplicationWindow {
    let controller: FavoriteController<GtkHost> = FavoriteController::from_config(config);

    let content = GtkBox::new(Orientation::Vertical, CARD_SPACING);
    content.add_css_class(class::CATALOG);

    let title = Label::new(Some(config.window.title.as_str()));
    title.add_css_class(class::CATALOG_TITLE);
    title.set_halign(Align::Start);
    content.append(&title);

    let status = Label::new(None);
    status.add_css_class(class::STATUS);
    status.set_halign(Align::Start);

    let grid = Grid::new();
    grid.add_css_class(class::PRODUCT_GRID);
    grid.set_row_spacing(CARD_SPACING as u32);
    grid.set_column_spacing(CARD_SPACING as u32);
    grid.set_column_homogeneous(true);

    let mut host = GtkHost::new(&content);
    let columns = config.window.columns.max(1) as usize;

    for (index, product) in config.catalog.products.iter().enumerate() {
        let (card, icon) = build_card(product, config, &status);
        let column = (index % columns) as i32;
        let row = (index / columns) as i32;
        grid.attach(&card, column, row, 1, 1);

        controller.sync_indicator(&mut host, &icon);
    }

    let scroller = ScrolledWindow::new();
    scroller.set_vexpand(true);
    scroller.set_child(Some(&grid));
    content.append(&scroller);
    content.append(&status);

    let status_for_changes = status.clone();
    controller.connect_changed(move |change| {
        status_for_changes.set_label(change.message());
    });

    let bound = controller.initialize(&mut host);
    debug!(
        "Catalog built with {} product(s), {} favorite icon(s) bound",
        config.catalog.products.len(),
        bound
    );

    ApplicationWindow::builder()
        .application(app)
        .title(config.window.title.as_str())
        .default_width(config.window.width as i32)
        .default_height(config.window.height as i32)
        .child(&content)
        .build()
}
