//! Headless run of the catalog over the in-memory document.
//!
//! Renders the configured catalog, binds favorites on content load and
//! clicks one product's favorite icon a number of times, reporting what
//! each click did.

use std::cell::RefCell;
use std::rc::Rc;

use favtoggle_core::page::render_catalog;
use favtoggle_core::{Config, Document, FavoriteChange, FavoriteController};

/// Upper bound on clicks per run.
pub const MAX_CLICKS: u32 = 10_000;

/// Result of a simulation run.
#[derive(Debug)]
pub struct SimulationReport {
    /// One line per click.
    pub lines: Vec<String>,
    /// Final markup of the page.
    pub markup: String,
}

/// Click the favorite icon of product `product` `clicks` times.
pub fn run(config: &Config, product: usize, clicks: u32) -> Result<SimulationReport, String> {
    if clicks > MAX_CLICKS {
        return Err(format!(
            "click count {} too large (at most {})",
            clicks, MAX_CLICKS
        ));
    }

    let products = &config.catalog.products;
    if product >= products.len() {
        return Err(format!(
            "product index {} out of range (catalog has {} product(s))",
            product,
            products.len()
        ));
    }

    let controller: FavoriteController<Document> = FavoriteController::from_config(config);
    let changes = Rc::new(RefCell::new(Vec::<FavoriteChange>::new()));
    let sink = Rc::clone(&changes);
    controller.connect_changed(move |change| sink.borrow_mut().push(change));

    let mut doc = Document::new();
    controller.attach(&mut doc);
    let root = doc.root();
    let page = render_catalog(&mut doc, root, products, &controller);
    doc.finish_parsing();

    let target = &page.products[product];
    let indicator = controller.indicator_for(&doc, &target.icon);

    let mut lines = Vec::new();
    for n in 1..=clicks {
        let outcome = doc.click(target.icon);
        let change = changes.borrow().last().copied();
        let color = doc.style(indicator, "color").unwrap_or("unset");
        let message = change.map(FavoriteChange::message).unwrap_or("no change");
        let navigation = outcome.navigated_to.as_deref().unwrap_or("none");
        lines.push(format!(
            "click {}: {} [{}] (color {}, navigation {})",
            n, message, target.name, color, navigation
        ));
    }

    Ok(SimulationReport {
        lines,
        markup: doc.to_markup(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_alternates_add_and_remove() {
        let config = Config::from_default_toml().unwrap();

        let report = run(&config, 0, 3).unwrap();

        assert_eq!(report.lines.len(), 3);
        assert!(report.lines[0].starts_with("click 1: Product added to favorites"));
        assert!(report.lines[0].contains("color #ff6b6b"));
        assert!(report.lines[1].starts_with("click 2: Product removed from favorites"));
        assert!(report.lines[1].contains("color #ccc"));
        assert!(report.lines[2].contains("navigation none"));
    }

    #[test]
    fn test_run_zero_clicks() {
        let config = Config::from_default_toml().unwrap();

        let report = run(&config, 1, 0).unwrap();

        assert!(report.lines.is_empty());
        assert!(report.markup.contains("favorite-icon"));
    }

    #[test]
    fn test_run_rejects_out_of_range_product() {
        let config = Config::from_default_toml().unwrap();
        let count = config.catalog.products.len();

        let err = run(&config, count, 1).unwrap_err();
        assert!(err.contains("out of range"));
    }

    #[test]
    fn test_run_rejects_excessive_click_count() {
        let config = Config::from_default_toml().unwrap();

        let err = run(&config, 0, u32::MAX).unwrap_err();
        assert!(err.contains("too large"));

        let report = run(&config, 0, MAX_CLICKS).unwrap();
        assert_eq!(report.lines.len(), MAX_CLICKS as usize);
    }
}
