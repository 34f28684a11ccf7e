//! Favorite toggle controller.
//!
//! Finds every element carrying the favorite-icon marker class and binds a
//! click handler that flips the `favorited` marker on it. The color of the
//! icon's indicator (its nested heart, or the icon itself when it has none)
//! is derived from the freshly toggled state in the same handler, so state
//! and color are never observed out of sync.
//!
//! The controller is written against [`FavoriteHost`], implemented here for
//! the in-memory [`Document`] and by the GTK front end for widget trees.

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::{Config, SelectorsConfig};
use crate::document::{ClickEvent, Document, NodeId};
use crate::theme::{FavoritePalette, Tint};

/// Trace emitted when an icon becomes favorited.
pub const ADDED_MESSAGE: &str = "Product added to favorites";

/// Trace emitted when an icon stops being favorited.
pub const REMOVED_MESSAGE: &str = "Product removed from favorites";

/// Click handler registered by the controller on one icon.
pub type ClickHandler<H> =
    Rc<dyn Fn(&mut H, &mut <H as FavoriteHost>::Event, &<H as FavoriteHost>::Element)>;

/// The element tree a controller operates on.
pub trait FavoriteHost: Sized + 'static {
    type Element: Clone + 'static;
    type Event;

    /// Every element carrying `class`, in tree order.
    fn select_all(&self, class: &str) -> Vec<Self::Element>;

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    fn add_class(&mut self, element: &Self::Element, class: &str);

    fn remove_class(&mut self, element: &Self::Element, class: &str);

    /// First strict descendant of `element` carrying `class`.
    fn find_descendant(&self, element: &Self::Element, class: &str) -> Option<Self::Element>;

    /// Show `tint` on `element`.
    fn paint(&mut self, element: &Self::Element, tint: Tint, palette: &FavoritePalette);

    /// Call `handler` for every click on `element`.
    fn listen_click(&mut self, element: &Self::Element, handler: ClickHandler<Self>);

    /// Cancel the click's default action.
    fn prevent_default(&mut self, event: &mut Self::Event);

    /// Keep the click from reaching ancestors of the icon.
    fn stop_propagation(&mut self, event: &mut Self::Event);
}

/// Result of one toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
}

impl FavoriteChange {
    pub fn is_favorited(self) -> bool {
        matches!(self, FavoriteChange::Added)
    }

    pub fn message(self) -> &'static str {
        match self {
            FavoriteChange::Added => ADDED_MESSAGE,
            FavoriteChange::Removed => REMOVED_MESSAGE,
        }
    }
}

type ChangeObserver = Rc<dyn Fn(FavoriteChange)>;

struct ControllerInner {
    selectors: SelectorsConfig,
    palette: FavoritePalette,
    initialized: Cell<bool>,
    observers: RefCell<Vec<ChangeObserver>>,
}

/// Binds favorite toggling to the icons of one host.
///
/// Cloning is cheap and clones share state.
pub struct FavoriteController<H: FavoriteHost> {
    inner: Rc<ControllerInner>,
    _host: PhantomData<fn(&mut H)>,
}

impl<H: FavoriteHost> Clone for FavoriteController<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            _host: PhantomData,
        }
    }
}

impl<H: FavoriteHost> FavoriteController<H> {
    pub fn new(selectors: SelectorsConfig, palette: FavoritePalette) -> Self {
        Self {
            inner: Rc::new(ControllerInner {
                selectors,
                palette,
                initialized: Cell::new(false),
                observers: RefCell::new(Vec::new()),
            }),
            _host: PhantomData,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.selectors.clone(),
            FavoritePalette::from_config(config),
        )
    }

    pub fn selectors(&self) -> &SelectorsConfig {
        &self.inner.selectors
    }

    pub fn palette(&self) -> &FavoritePalette {
        &self.inner.palette
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.initialized.get()
    }

    /// Register a callback run after every toggle.
    pub fn connect_changed<F: Fn(FavoriteChange) + 'static>(&self, callback: F) {
        self.inner.observers.borrow_mut().push(Rc::new(callback));
    }

    /// Bind a click handler to every icon currently in `host`.
    ///
    /// Returns the number of icons bound. Icons added later are not picked
    /// up. Only the first call on a controller binds anything.
    pub fn initialize(&self, host: &mut H) -> usize {
        if self.inner.initialized.replace(true) {
            warn!("Favorite controller already initialized, ignoring initialize call");
            return 0;
        }

        let icons = host.select_all(&self.inner.selectors.icon);
        for icon in &icons {
            let controller = self.clone();
            host.listen_click(
                icon,
                Rc::new(move |host: &mut H, event: &mut H::Event, icon: &H::Element| {
                    controller.on_icon_clicked(host, event, icon);
                }),
            );
        }

        debug!(
            "Bound favorite toggle to {} icon(s) matching .{}",
            icons.len(),
            self.inner.selectors.icon
        );
        icons.len()
    }

    /// Handle a click on `icon`.
    ///
    /// Suppresses the default action and propagation, flips the favorited
    /// marker, then recolors the indicator to match.
    pub fn on_icon_clicked(
        &self,
        host: &mut H,
        event: &mut H::Event,
        icon: &H::Element,
    ) -> FavoriteChange {
        host.prevent_default(event);
        host.stop_propagation(event);

        let favorited_class = &self.inner.selectors.favorited;
        let favorited = if host.has_class(icon, favorited_class) {
            host.remove_class(icon, favorited_class);
            false
        } else {
            host.add_class(icon, favorited_class);
            true
        };

        self.paint_indicator(host, icon, favorited);

        let change = if favorited {
            FavoriteChange::Added
        } else {
            FavoriteChange::Removed
        };
        info!("{}", change.message());

        let observers = self.inner.observers.borrow().clone();
        for observer in observers {
            observer(change);
        }

        change
    }

    /// Whether `icon` currently carries the favorited marker.
    pub fn is_favorited(&self, host: &H, icon: &H::Element) -> bool {
        host.has_class(icon, &self.inner.selectors.favorited)
    }

    /// The element that carries `icon`'s color: its nested indicator if it
    /// has one, otherwise the icon itself.
    pub fn indicator_for(&self, host: &H, icon: &H::Element) -> H::Element {
        host.find_descendant(icon, &self.inner.selectors.indicator)
            .unwrap_or_else(|| icon.clone())
    }

    /// Paint `icon`'s indicator to match its current state without toggling.
    ///
    /// Renderers call this for icons they create already favorited (or not).
    pub fn sync_indicator(&self, host: &mut H, icon: &H::Element) {
        let favorited = self.is_favorited(host, icon);
        self.paint_indicator(host, icon, favorited);
    }

    fn paint_indicator(&self, host: &mut H, icon: &H::Element, favorited: bool) {
        let indicator = self.indicator_for(host, icon);
        host.paint(&indicator, Tint::for_state(favorited), &self.inner.palette);
    }
}

impl FavoriteController<Document> {
    /// Run [`initialize`](Self::initialize) once `document` finishes parsing.
    pub fn attach(&self, document: &mut Document) {
        let controller = self.clone();
        document.on_content_loaded(move |document| {
            controller.initialize(document);
        });
    }
}

impl FavoriteHost for Document {
    type Element = NodeId;
    type Event = ClickEvent;

    fn select_all(&self, class: &str) -> Vec<NodeId> {
        Document::select_all(self, class)
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        Document::has_class(self, *element, class)
    }

    fn add_class(&mut self, element: &NodeId, class: &str) {
        Document::add_class(self, *element, class);
    }

    fn remove_class(&mut self, element: &NodeId, class: &str) {
        Document::remove_class(self, *element, class);
    }

    fn find_descendant(&self, element: &NodeId, class: &str) -> Option<NodeId> {
        self.select_first_within(*element, class)
    }

    fn paint(&mut self, element: &NodeId, tint: Tint, palette: &FavoritePalette) {
        self.set_style(*element, "color", palette.color(tint));
    }

    fn listen_click(&mut self, element: &NodeId, handler: ClickHandler<Self>) {
        let node = *element;
        self.add_click_listener(
            node,
            Rc::new(move |document: &mut Document, event: &mut ClickEvent| {
                handler(document, event, &node);
            }),
        );
    }

    fn prevent_default(&mut self, event: &mut ClickEvent) {
        event.prevent_default();
    }

    fn stop_propagation(&mut self, event: &mut ClickEvent) {
        event.stop_propagation();
    }
}
