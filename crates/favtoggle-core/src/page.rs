//! Catalog page rendering for the in-memory document.
//!
//! Produces the markup a storefront listing would serve: a grid of product
//! cards, each wrapped in a link to the product page and carrying a favorite
//! icon. Clicking a card (outside its icon) records the product as opened.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::config::ProductEntry;
use crate::document::{ClickEvent, Document, NodeId};
use crate::favorite::FavoriteController;

/// Glyph shown inside nested heart indicators.
pub const HEART_GLYPH: &str = "♥";

pub const GRID_CLASS: &str = "product-grid";
pub const CARD_CLASS: &str = "product-card";
pub const NAME_CLASS: &str = "product-name";
pub const PRICE_CLASS: &str = "product-price";
pub const META_CLASS: &str = "product-meta";

/// Handles to the elements rendered for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedProduct {
    pub name: String,
    pub card: NodeId,
    pub link: NodeId,
    pub icon: NodeId,
    /// Nested heart, if the product was rendered with one.
    pub heart: Option<NodeId>,
}

/// A rendered catalog.
#[derive(Debug)]
pub struct CatalogPage {
    pub grid: NodeId,
    pub products: Vec<RenderedProduct>,
    opened: Rc<RefCell<Vec<String>>>,
}

impl CatalogPage {
    /// Names of products whose card was clicked, oldest first.
    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }

    pub fn product(&self, name: &str) -> Option<&RenderedProduct> {
        self.products.iter().find(|p| p.name == name)
    }
}

/// URL of the product page for the product at `index`.
pub fn product_href(index: usize) -> String {
    format!("/produto/{}/", index + 1)
}

/// Format a price the way the listing shows it.
pub fn format_price(price: f64) -> String {
    format!("R$ {:.2}", price).replace('.', ",")
}

/// Render `products` under `parent`.
///
/// Icons use the controller's selectors; products marked favorited start
/// with the marker class, and every indicator is painted to match its
/// initial state.
pub fn render_catalog(
    document: &mut Document,
    parent: NodeId,
    products: &[ProductEntry],
    controller: &FavoriteController<Document>,
) -> CatalogPage {
    let selectors = controller.selectors().clone();
    let opened = Rc::new(RefCell::new(Vec::new()));
    let grid = document.create_element(parent, "div", &[GRID_CLASS]);

    let mut rendered = Vec::with_capacity(products.len());
    for (index, product) in products.iter().enumerate() {
        let card = document.create_element(grid, "div", &[CARD_CLASS]);
        let link = document.create_element(card, "a", &[]);
        document.set_href(link, product_href(index));

        let name = document.create_element(link, "span", &[NAME_CLASS]);
        document.set_text(name, product.name.clone());

        let price = document.create_element(link, "span", &[PRICE_CLASS]);
        document.set_text(price, format_price(product.price));

        let meta: Vec<&str> = [product.brand.as_deref(), product.category.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !meta.is_empty() {
            let meta_node = document.create_element(link, "span", &[META_CLASS]);
            document.set_text(meta_node, meta.join(" · "));
        }

        let icon = document.create_element(link, "span", &[selectors.icon.as_str()]);
        if product.favorited {
            document.add_class(icon, &selectors.favorited);
        }

        let heart = if product.heart {
            let heart = document.create_element(icon, "i", &[selectors.indicator.as_str()]);
            document.set_text(heart, HEART_GLYPH);
            Some(heart)
        } else {
            document.set_text(icon, HEART_GLYPH);
            None
        };
        controller.sync_indicator(document, &icon);

        let product_name = product.name.clone();
        let log = Rc::clone(&opened);
        document.add_click_listener(
            card,
            Rc::new(move |_doc: &mut Document, _event: &mut ClickEvent| {
                debug!("Opened product {}", product_name);
                log.borrow_mut().push(product_name.clone());
            }),
        );

        rendered.push(RenderedProduct {
            name: product.name.clone(),
            card,
            link,
            icon,
            heart,
        });
    }

    debug!("Rendered catalog with {} product(s)", rendered.len());

    CatalogPage {
        grid,
        products: rendered,
        opened,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorsConfig;
    use crate::theme::FavoritePalette;

    fn products() -> Vec<ProductEntry> {
        let mut yoda = ProductEntry::new("Action Figure Yoda", 149.9);
        yoda.heart = false;
        let mut shirt = ProductEntry::new("Camiseta Marvel Avengers", 79.9);
        shirt.favorited = true;
        shirt.brand = Some("Marvel".to_string());
        vec![ProductEntry::new("Funko Pop Spider-Man", 99.9), shirt, yoda]
    }

    fn render() -> (Document, CatalogPage, FavoriteController<Document>) {
        let controller =
            FavoriteController::new(SelectorsConfig::default(), FavoritePalette::default());
        let mut doc = Document::new();
        let root = doc.root();
        let page = render_catalog(&mut doc, root, &products(), &controller);
        (doc, page, controller)
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(99.9), "R$ 99,90");
        assert_eq!(format_price(0.0), "R$ 0,00");
    }

    #[test]
    fn test_product_href_is_one_based() {
        assert_eq!(product_href(0), "/produto/1/");
        assert_eq!(product_href(9), "/produto/10/");
    }

    #[test]
    fn test_render_structure() {
        let (doc, page, _controller) = render();

        assert_eq!(page.products.len(), 3);
        assert_eq!(doc.select_all(CARD_CLASS).len(), 3);
        assert_eq!(doc.select_all("favorite-icon").len(), 3);

        let spider = page.product("Funko Pop Spider-Man").unwrap();
        assert_eq!(doc.href(spider.link), Some("/produto/1/"));
        assert_eq!(doc.parent(spider.icon), Some(spider.link));
        assert!(spider.heart.is_some());

        let shirt = page.product("Camiseta Marvel Avengers").unwrap();
        let meta = doc.select_first_within(shirt.link, META_CLASS).unwrap();
        assert_eq!(doc.text(meta), Some("Marvel"));
    }

    #[test]
    fn test_initial_state_painted() {
        let (doc, page, controller) = render();

        let spider = page.product("Funko Pop Spider-Man").unwrap();
        assert!(!controller.is_favorited(&doc, &spider.icon));
        assert_eq!(doc.style(spider.heart.unwrap(), "color"), Some("#ccc"));
        assert_eq!(doc.style(spider.icon, "color"), None);

        let shirt = page.product("Camiseta Marvel Avengers").unwrap();
        assert!(controller.is_favorited(&doc, &shirt.icon));
        assert_eq!(doc.style(shirt.heart.unwrap(), "color"), Some("#ff6b6b"));

        let yoda = page.product("Action Figure Yoda").unwrap();
        assert_eq!(yoda.heart, None);
        assert_eq!(doc.style(yoda.icon, "color"), Some("#ccc"));
    }

    #[test]
    fn test_card_click_opens_product() {
        let (mut doc, page, _controller) = render();
        let spider = page.product("Funko Pop Spider-Man").unwrap().clone();

        let outcome = doc.click(spider.link);

        assert_eq!(page.opened(), vec!["Funko Pop Spider-Man".to_string()]);
        assert_eq!(outcome.navigated_to.as_deref(), Some("/produto/1/"));
    }
}
