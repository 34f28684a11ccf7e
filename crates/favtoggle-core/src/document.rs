//! In-memory element tree with click dispatch.
//!
//! A small stand-in for a rendered page: elements with ordered class lists,
//! inline styles and optional link targets, class queries in document order,
//! and click events that run capture, target and bubble phases. A click that
//! is not default-prevented follows the nearest enclosing link.
//!
//! `NodeId`s are only meaningful for the document that created them.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::mem;
use std::rc::Rc;

use tracing::{debug, trace};

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Listener invoked for clicks reaching the node it was registered on.
pub type ClickListener = Rc<dyn Fn(&mut Document, &mut ClickEvent)>;

type ContentLoadedCallback = Box<dyn FnOnce(&mut Document)>;

/// Parsing lifecycle of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Structure still being built; content-loaded callbacks are queued.
    Loading,
    /// Structure complete; content-loaded callbacks have run.
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    Capturing,
    AtTarget,
    Bubbling,
}

/// State of a click travelling through the tree.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    target: NodeId,
    current_target: NodeId,
    phase: EventPhase,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl ClickEvent {
    fn new(target: NodeId) -> Self {
        Self {
            target,
            current_target: target,
            phase: EventPhase::AtTarget,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Element the click was dispatched on.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Element whose listener is currently running.
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    /// Cancel the default action (link navigation).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Keep the event from reaching any further element.
    ///
    /// Remaining listeners on the current element still run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// What happened after a dispatched click finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
    /// Link followed by the default action, if any.
    pub navigated_to: Option<String>,
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    href: Option<String>,
    text: Option<String>,
}

impl Element {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_string(),
            parent,
            children: Vec::new(),
            classes: Vec::new(),
            style: BTreeMap::new(),
            href: None,
            text: None,
        }
    }
}

#[derive(Default)]
struct Listeners {
    capture: Vec<ClickListener>,
    bubble: Vec<ClickListener>,
}

pub struct Document {
    nodes: Vec<Element>,
    root: NodeId,
    listeners: HashMap<NodeId, Listeners>,
    ready_state: ReadyState,
    content_loaded: Vec<ContentLoadedCallback>,
    navigations: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document in the `Loading` state with a `body` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("body", None)],
            root: NodeId(0),
            listeners: HashMap::new(),
            ready_state: ReadyState::Loading,
            content_loaded: Vec::new(),
            navigations: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Append a new element under `parent`.
    pub fn create_element(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut element = Element::new(tag, Some(parent));
        for class in classes {
            if !element.classes.iter().any(|c| c == class) {
                element.classes.push((*class).to_string());
            }
        }
        self.nodes.push(element);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].text.as_deref()
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        self.nodes[node.0].text = Some(text.into());
    }

    pub fn href(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].href.as_deref()
    }

    pub fn set_href(&mut self, node: NodeId, href: impl Into<String>) {
        self.nodes[node.0].href = Some(href.into());
    }

    // Class list

    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.nodes[node.0].classes
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.nodes[node.0].classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0].classes.retain(|c| c != class);
    }

    /// Flip `class` on `node`, returning whether it is now present.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    // Inline style

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].style.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        self.nodes[node.0]
            .style
            .insert(property.to_string(), value.to_string());
    }

    pub fn remove_style(&mut self, node: NodeId, property: &str) {
        self.nodes[node.0].style.remove(property);
    }

    // Queries

    /// Every element carrying `class`, in document order.
    pub fn select_all(&self, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.walk(self.root, &mut |id| {
            if self.has_class(id, class) {
                found.push(id);
            }
        });
        found
    }

    /// First strict descendant of `node` carrying `class`, in document order.
    pub fn select_first_within(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.has_class(id, class) {
                return Some(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        None
    }

    fn walk(&self, node: NodeId, visit: &mut dyn FnMut(NodeId)) {
        visit(node);
        for &child in self.children(node) {
            self.walk(child, visit);
        }
    }

    /// `node` followed by its ancestors up to the root.
    fn ancestors_inclusive(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            path.push(id);
            cursor = self.parent(id);
        }
        path
    }

    // Events

    /// Register a bubble-phase click listener.
    pub fn add_click_listener(&mut self, node: NodeId, listener: ClickListener) {
        self.listeners.entry(node).or_default().bubble.push(listener);
    }

    /// Register a capture-phase click listener.
    pub fn add_capture_listener(&mut self, node: NodeId, listener: ClickListener) {
        self.listeners.entry(node).or_default().capture.push(listener);
    }

    /// Number of click listeners (both phases) registered on `node`.
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners
            .get(&node)
            .map(|l| l.capture.len() + l.bubble.len())
            .unwrap_or(0)
    }

    fn listeners_for(&self, node: NodeId, capture: bool) -> Vec<ClickListener> {
        self.listeners
            .get(&node)
            .map(|l| if capture { l.capture.clone() } else { l.bubble.clone() })
            .unwrap_or_default()
    }

    fn invoke(&mut self, node: NodeId, capture: bool, event: &mut ClickEvent) {
        event.current_target = node;
        for listener in self.listeners_for(node, capture) {
            listener(self, event);
        }
    }

    /// Dispatch a click on `target` and run its default action.
    pub fn click(&mut self, target: NodeId) -> ClickOutcome {
        let mut event = ClickEvent::new(target);

        // Root first
        let mut path = self.ancestors_inclusive(target);
        path.reverse();
        let (ancestors, _) = path.split_at(path.len() - 1);

        'dispatch: {
            event.phase = EventPhase::Capturing;
            for &node in ancestors {
                self.invoke(node, true, &mut event);
                if event.propagation_stopped {
                    break 'dispatch;
                }
            }

            event.phase = EventPhase::AtTarget;
            self.invoke(target, true, &mut event);
            if event.propagation_stopped {
                break 'dispatch;
            }
            self.invoke(target, false, &mut event);
            if event.propagation_stopped {
                break 'dispatch;
            }

            event.phase = EventPhase::Bubbling;
            for &node in ancestors.iter().rev() {
                self.invoke(node, false, &mut event);
                if event.propagation_stopped {
                    break 'dispatch;
                }
            }
        }

        let navigated_to = if event.default_prevented {
            None
        } else {
            self.follow_link(target)
        };

        trace!(
            "Click on {:?} done (prevented={}, stopped={})",
            target, event.default_prevented, event.propagation_stopped
        );

        ClickOutcome {
            default_prevented: event.default_prevented,
            propagation_stopped: event.propagation_stopped,
            navigated_to,
        }
    }

    fn follow_link(&mut self, target: NodeId) -> Option<String> {
        let href = self
            .ancestors_inclusive(target)
            .into_iter()
            .find_map(|id| self.href(id).map(str::to_string))?;
        debug!("Navigating to {}", href);
        self.navigations.push(href.clone());
        Some(href)
    }

    /// Links followed by unprevented clicks, oldest first.
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    // Lifecycle

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Queue `callback` for the moment parsing finishes.
    ///
    /// Callbacks registered after that moment never run.
    pub fn on_content_loaded(&mut self, callback: impl FnOnce(&mut Document) + 'static) {
        match self.ready_state {
            ReadyState::Loading => self.content_loaded.push(Box::new(callback)),
            ReadyState::Interactive => {
                debug!("Content-loaded callback registered after load; it will not run");
            }
        }
    }

    /// Mark the structure complete and run queued content-loaded callbacks
    /// once, in registration order. Later calls do nothing.
    pub fn finish_parsing(&mut self) {
        if self.ready_state == ReadyState::Interactive {
            return;
        }
        self.ready_state = ReadyState::Interactive;

        let callbacks = mem::take(&mut self.content_loaded);
        debug!("Content loaded, running {} callback(s)", callbacks.len());
        for callback in callbacks {
            callback(self);
        }
    }

    /// Render the tree as indented HTML-like markup.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(self.root, 0, &mut out);
        out
    }

    fn write_markup(&self, node: NodeId, depth: usize, out: &mut String) {
        let element = &self.nodes[node.0];
        let indent = "  ".repeat(depth);

        let _ = write!(out, "{}<{}", indent, element.tag);
        if !element.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", element.classes.join(" "));
        }
        if let Some(href) = &element.href {
            let _ = write!(out, " href=\"{}\"", href);
        }
        if !element.style.is_empty() {
            let style = element
                .style
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            let _ = write!(out, " style=\"{}\"", style);
        }
        out.push('>');

        if element.children.is_empty() {
            if let Some(text) = &element.text {
                out.push_str(text);
            }
            let _ = writeln!(out, "</{}>", element.tag);
            return;
        }

        out.push('\n');
        if let Some(text) = &element.text {
            let _ = writeln!(out, "{}  {}", indent, text);
        }
        for &child in &element.children {
            self.write_markup(child, depth + 1, out);
        }
        let _ = writeln!(out, "{}</{}>", indent, element.tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, label: &str) -> ClickListener {
        let log = Rc::clone(log);
        let label = label.to_string();
        Rc::new(move |_doc: &mut Document, event: &mut ClickEvent| {
            log.borrow_mut()
                .push(format!("{}:{:?}", label, event.phase()));
        })
    }

    #[test]
    fn test_create_element_links_parent_and_dedups_classes() {
        let mut doc = Document::new();
        let div = doc.create_element(doc.root(), "div", &["card", "card"]);

        assert_eq!(doc.parent(div), Some(doc.root()));
        assert_eq!(doc.children(doc.root()), &[div]);
        assert_eq!(doc.classes(div), &["card".to_string()]);
        assert_eq!(doc.tag(div), "div");
    }

    #[test]
    fn test_toggle_class() {
        let mut doc = Document::new();
        let span = doc.create_element(doc.root(), "span", &[]);

        assert!(doc.toggle_class(span, "on"));
        assert!(doc.has_class(span, "on"));
        assert!(!doc.toggle_class(span, "on"));
        assert!(!doc.has_class(span, "on"));
    }

    #[test]
    fn test_select_all_in_document_order() {
        let mut doc = Document::new();
        let a = doc.create_element(doc.root(), "div", &["x"]);
        let b = doc.create_element(a, "span", &["x"]);
        let c = doc.create_element(doc.root(), "div", &["x"]);
        doc.create_element(doc.root(), "div", &["y"]);

        assert_eq!(doc.select_all("x"), vec![a, b, c]);
        assert!(doc.select_all("missing").is_empty());
    }

    #[test]
    fn test_select_first_within_excludes_self() {
        let mut doc = Document::new();
        let outer = doc.create_element(doc.root(), "div", &["heart"]);
        let wrapper = doc.create_element(outer, "div", &[]);
        let deep = doc.create_element(wrapper, "span", &["heart"]);
        let later = doc.create_element(outer, "span", &["heart"]);

        assert_eq!(doc.select_first_within(outer, "heart"), Some(deep));
        assert_eq!(doc.select_first_within(later, "heart"), None);
    }

    #[test]
    fn test_style_set_and_remove() {
        let mut doc = Document::new();
        let span = doc.create_element(doc.root(), "span", &[]);

        assert_eq!(doc.style(span, "color"), None);
        doc.set_style(span, "color", "#ccc");
        assert_eq!(doc.style(span, "color"), Some("#ccc"));
        doc.remove_style(span, "color");
        assert_eq!(doc.style(span, "color"), None);
    }

    #[test]
    fn test_click_runs_capture_target_bubble_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut doc = Document::new();
        let parent = doc.create_element(doc.root(), "div", &[]);
        let child = doc.create_element(parent, "span", &[]);

        doc.add_click_listener(parent, recorder(&log, "parent-bubble"));
        doc.add_capture_listener(parent, recorder(&log, "parent-capture"));
        doc.add_click_listener(child, recorder(&log, "child"));

        let outcome = doc.click(child);

        assert_eq!(
            *log.borrow(),
            vec![
                "parent-capture:Capturing",
                "child:AtTarget",
                "parent-bubble:Bubbling"
            ]
        );
        assert!(!outcome.propagation_stopped);
        assert_eq!(doc.listener_count(parent), 2);
    }

    #[test]
    fn test_stop_propagation_keeps_ancestors_quiet() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut doc = Document::new();
        let parent = doc.create_element(doc.root(), "div", &[]);
        let child = doc.create_element(parent, "span", &[]);

        doc.add_click_listener(parent, recorder(&log, "parent"));
        doc.add_click_listener(
            child,
            Rc::new(|_doc: &mut Document, event: &mut ClickEvent| event.stop_propagation()),
        );
        doc.add_click_listener(child, recorder(&log, "child-second"));

        let outcome = doc.click(child);

        // Same-element listeners still run, ancestors don't
        assert_eq!(*log.borrow(), vec!["child-second:AtTarget"]);
        assert!(outcome.propagation_stopped);
    }

    #[test]
    fn test_unprevented_click_follows_enclosing_link() {
        let mut doc = Document::new();
        let link = doc.create_element(doc.root(), "a", &[]);
        doc.set_href(link, "/produto/1/");
        let span = doc.create_element(link, "span", &[]);

        let outcome = doc.click(span);

        assert_eq!(outcome.navigated_to.as_deref(), Some("/produto/1/"));
        assert_eq!(doc.navigations(), &["/produto/1/".to_string()]);
    }

    #[test]
    fn test_prevent_default_blocks_navigation() {
        let mut doc = Document::new();
        let link = doc.create_element(doc.root(), "a", &[]);
        doc.set_href(link, "/produto/1/");
        let span = doc.create_element(link, "span", &[]);
        doc.add_click_listener(
            span,
            Rc::new(|_doc: &mut Document, event: &mut ClickEvent| event.prevent_default()),
        );

        let outcome = doc.click(span);

        assert!(outcome.default_prevented);
        assert_eq!(outcome.navigated_to, None);
        assert!(doc.navigations().is_empty());
    }

    #[test]
    fn test_listener_can_mutate_document() {
        let mut doc = Document::new();
        let span = doc.create_element(doc.root(), "span", &[]);
        doc.add_click_listener(
            span,
            Rc::new(|doc: &mut Document, event: &mut ClickEvent| {
                let target = event.current_target();
                doc.toggle_class(target, "clicked");
            }),
        );

        doc.click(span);
        assert!(doc.has_class(span, "clicked"));
    }

    #[test]
    fn test_content_loaded_runs_once_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut doc = Document::new();
        assert_eq!(doc.ready_state(), ReadyState::Loading);

        for label in ["first", "second"] {
            let log = Rc::clone(&log);
            doc.on_content_loaded(move |_doc| log.borrow_mut().push(label));
        }

        doc.finish_parsing();
        doc.finish_parsing();

        assert_eq!(*log.borrow(), vec!["first", "second"]);
        assert_eq!(doc.ready_state(), ReadyState::Interactive);
    }

    #[test]
    fn test_content_loaded_after_load_never_runs() {
        let ran = Rc::new(RefCell::new(false));
        let mut doc = Document::new();
        doc.finish_parsing();

        let flag = Rc::clone(&ran);
        doc.on_content_loaded(move |_doc| *flag.borrow_mut() = true);
        doc.finish_parsing();

        assert!(!*ran.borrow());
    }

    #[test]
    fn test_to_markup() {
        let mut doc = Document::new();
        let link = doc.create_element(doc.root(), "a", &["card"]);
        doc.set_href(link, "/p/");
        let span = doc.create_element(link, "span", &["heart"]);
        doc.set_text(span, "♥");
        doc.set_style(span, "color", "#ccc");

        let markup = doc.to_markup();
        assert!(markup.contains("<a class=\"card\" href=\"/p/\">"));
        assert!(markup.contains("<span class=\"heart\" style=\"color: #ccc\">♥</span>"));
    }
}
