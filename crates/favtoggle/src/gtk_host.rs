//! Favorite host over a GTK4 widget tree.
//!
//! CSS classes play the role of the marker and state classes. A click
//! handler is a `GestureClick` that claims its event sequence: claiming
//! stops the press from reaching gestures on ancestor widgets (the product
//! card) and denies it to any other gesture on the same widget, which is
//! where GTK's default activations live.

use gtk4::prelude::*;
use gtk4::{EventSequenceState, GestureClick, Widget};

use favtoggle_core::{ClickHandler, FavoriteHost, FavoritePalette, Tint};

use crate::styles::tint;

/// Widget tree rooted at `root`. Cheap to clone.
#[derive(Clone)]
pub struct GtkHost {
    root: Widget,
}

/// A primary-button press delivered to a favorite icon.
pub struct GtkClick {
    gesture: GestureClick,
}

impl GtkClick {
    fn claim(&self) {
        self.gesture.set_state(EventSequenceState::Claimed);
    }
}

impl GtkHost {
    pub fn new(root: &impl IsA<Widget>) -> Self {
        Self {
            root: root.clone().upcast(),
        }
    }
}

/// Children of `widget`, in order.
fn children(widget: &Widget) -> impl Iterator<Item = Widget> {
    std::iter::successors(widget.first_child(), |child| child.next_sibling())
}

fn collect_with_class(widget: &Widget, class: &str, found: &mut Vec<Widget>) {
    if widget.has_css_class(class) {
        found.push(widget.clone());
    }
    for child in children(widget) {
        collect_with_class(&child, class, found);
    }
}

fn first_descendant_with_class(widget: &Widget, class: &str) -> Option<Widget> {
    for child in children(widget) {
        if child.has_css_class(class) {
            return Some(child);
        }
        if let Some(found) = first_descendant_with_class(&child, class) {
            return Some(found);
        }
    }
    None
}

impl FavoriteHost for GtkHost {
    type Element = Widget;
    type Event = GtkClick;

    fn select_all(&self, class: &str) -> Vec<Widget> {
        let mut found = Vec::new();
        collect_with_class(&self.root, class, &mut found);
        found
    }

    fn has_class(&self, element: &Widget, class: &str) -> bool {
        element.has_css_class(class)
    }

    fn add_class(&mut self, element: &Widget, class: &str) {
        element.add_css_class(class);
    }

    fn remove_class(&mut self, element: &Widget, class: &str) {
        element.remove_css_class(class);
    }

    fn find_descendant(&self, element: &Widget, class: &str) -> Option<Widget> {
        first_descendant_with_class(element, class)
    }

    // The stylesheet generated from the palette maps tint classes to colors.
    fn paint(&mut self, element: &Widget, shade: Tint, _palette: &FavoritePalette) {
        element.remove_css_class(tint::HIGHLIGHTED);
        element.remove_css_class(tint::NEUTRAL);
        element.add_css_class(tint::class_for(shade));
    }

    fn listen_click(&mut self, element: &Widget, handler: ClickHandler<Self>) {
        let gesture = GestureClick::new();
        gesture.set_button(1); // GDK_BUTTON_PRIMARY

        let host = self.clone();
        gesture.connect_pressed(move |gesture, _n_press, _x, _y| {
            let Some(icon) = gesture.widget() else {
                return;
            };
            let mut host = host.clone();
            let mut event = GtkClick {
                gesture: gesture.clone(),
            };
            handler(&mut host, &mut event, &icon);
        });

        element.add_controller(gesture);
    }

    fn prevent_default(&mut self, event: &mut GtkClick) {
        event.claim();
    }

    fn stop_propagation(&mut self, event: &mut GtkClick) {
        event.claim();
    }
}
