//! Headless rendering surface.
//!
//! A small arena DOM: elements with a tag, attributes, a class list, inline
//! style and children. It answers the queries the widget needs (lookup by id,
//! simple selectors, ancestry, inline-style geometry) and serializes to HTML.
//! Layout only understands the inline insets and sizes of positioned
//! elements; that is all the floating panel and button rely on.

mod css;
mod html;
mod selector;

pub use css::{Axis, CssLength, REM_PX, Rect, Viewport, px};
pub use selector::Selector;

use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;

pub type SharedDocument = Rc<RefCell<Document>>;

/// Handle to an element in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    style: Vec<(String, String)>,
    text: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            classes: Vec::new(),
            style: Vec::new(),
            text: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Lowercase tag
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Uppercase tag, as reported by `tagName`
    #[must_use]
    pub fn tag_name(&self) -> String {
        self.tag.to_ascii_uppercase()
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub fn style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn styles(&self) -> &[(String, String)] {
        &self.style
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[must_use]
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

fn upsert(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    if let Some(slot) = pairs.iter_mut().find(|(k, _)| k == key) {
        slot.1 = value.to_string();
    } else {
        pairs.push((key.to_string(), value.to_string()));
    }
}

pub struct Document {
    nodes: Vec<Option<Element>>,
    root: ElementId,
    head: ElementId,
    body: ElementId,
    viewport: Viewport,
}

impl Document {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: ElementId(0),
            head: ElementId(0),
            body: ElementId(0),
            viewport,
        };
        doc.root = doc.create_element("html");
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.head);
        doc.append_child(doc.root, doc.body);
        doc
    }

    #[must_use]
    pub fn shared(viewport: Viewport) -> SharedDocument {
        Rc::new(RefCell::new(Self::new(viewport)))
    }

    #[must_use]
    pub fn root(&self) -> ElementId {
        self.root
    }

    #[must_use]
    pub fn head(&self) -> ElementId {
        self.head
    }

    #[must_use]
    pub fn body(&self) -> ElementId {
        self.body
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.nodes.push(Some(Element::new(tag)));
        ElementId(self.nodes.len() - 1)
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Whether the element still exists (it may be detached)
    #[must_use]
    pub fn exists(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    /// Move `child` to the end of `parent`'s children.
    ///
    /// Appending an ancestor into its own subtree is refused.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if !self.exists(parent) || !self.exists(child) || self.contains(child, parent) {
            warn!("Refusing to append {:?} under {:?}", child, parent);
            return;
        }

        self.detach(child);
        if let Some(el) = self.element_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.element_mut(parent) {
            el.children.push(child);
        }
    }

    fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.element(id).and_then(Element::parent) else {
            return;
        };
        if let Some(el) = self.element_mut(parent) {
            el.children.retain(|c| *c != id);
        }
        if let Some(el) = self.element_mut(id) {
            el.parent = None;
        }
    }

    /// Detach the element and drop it with its whole subtree
    pub fn remove(&mut self, id: ElementId) {
        if id == self.root || id == self.head || id == self.body {
            return;
        }
        self.detach(id);
        for node in self.descendants(id) {
            self.nodes[node.0] = None;
        }
    }

    /// Drop every child of the element
    pub fn clear_children(&mut self, id: ElementId) {
        let children = self
            .element(id)
            .map(|el| el.children.clone())
            .unwrap_or_default();
        for child in children {
            self.remove(child);
        }
    }

    /// The element and all of its descendants in document order
    #[must_use]
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(el) = self.element(current) else {
                continue;
            };
            out.push(current);
            stack.extend(el.children.iter().rev().copied());
        }
        out
    }

    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).and_then(Element::parent)
    }

    #[must_use]
    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.element(id)
            .map(|el| el.children.clone())
            .unwrap_or_default()
    }

    /// Whether `node` is `ancestor` or lies inside it
    #[must_use]
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether the element is attached to the document tree
    #[must_use]
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.exists(id) && self.contains(self.root, id)
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            upsert(&mut el.attributes, name, value);
        }
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(el) = self.element_mut(id) {
            el.attributes.retain(|(key, _)| key != name);
        }
    }

    #[must_use]
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attribute(name))
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.element_mut(id)
            && !el.has_class(class)
        {
            el.classes.push(class.to_string());
        }
    }

    #[must_use]
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(el) = self.element_mut(id) {
            el.text = Some(text.to_string());
        }
    }

    #[must_use]
    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.element(id).and_then(Element::text)
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            upsert(&mut el.style, property, value);
        }
    }

    pub fn set_styles(&mut self, id: ElementId, styles: &[(&str, &str)]) {
        for (property, value) in styles {
            self.set_style(id, property, value);
        }
    }

    #[must_use]
    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.style(property))
    }

    /// Form control value (kept as the `value` attribute)
    #[must_use]
    pub fn value(&self, id: ElementId) -> &str {
        self.attribute(id, "value").unwrap_or("")
    }

    pub fn set_value(&mut self, id: ElementId, value: &str) {
        self.set_attribute(id, "value", value);
    }

    /// Whether the element's own `display` is not `none`
    #[must_use]
    pub fn is_displayed(&self, id: ElementId) -> bool {
        self.exists(id) && self.style(id, "display") != Some("none")
    }

    /// First connected element with the given `id` attribute
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<ElementId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.attribute(*node, "id") == Some(id))
    }

    /// First connected element matching a simple selector
    #[must_use]
    pub fn query_selector(&self, selector: &str) -> Option<ElementId> {
        self.query_selector_within(self.root, selector)
    }

    /// First element under `scope` (excluding `scope`) matching a simple selector
    #[must_use]
    pub fn query_selector_within(&self, scope: ElementId, selector: &str) -> Option<ElementId> {
        self.query_selector_all(scope, selector).into_iter().next()
    }

    /// Every element under `scope` (excluding `scope`) matching a simple selector
    #[must_use]
    pub fn query_selector_all(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        let Some(selector) = Selector::parse(selector) else {
            warn!("Unsupported selector: {}", selector);
            return Vec::new();
        };
        self.descendants(scope)
            .into_iter()
            .skip(1)
            .filter(|node| self.element(*node).is_some_and(|el| selector.matches(el)))
            .collect()
    }

    /// Nearest inclusive ancestor carrying the attribute
    #[must_use]
    pub fn closest_with_attr(&self, id: ElementId, name: &str) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.attribute(node, name).is_some() {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    fn resolve(&self, id: ElementId, property: &str, axis: Axis) -> Option<f64> {
        let raw = self.style(id, property)?;
        match CssLength::parse(raw) {
            Some(length) => length.resolve(axis, self.viewport),
            None => {
                warn!("Unparseable {} on {:?}: {:?}", property, id, raw);
                None
            }
        }
    }

    /// Border box computed from the element's inline geometry.
    ///
    /// `left`/`top` win over `right`/`bottom`; when both sides of an axis are
    /// `auto` the element sits at 0 on that axis.
    #[must_use]
    pub fn bounding_rect(&self, id: ElementId) -> Rect {
        let viewport = self.viewport;
        let width = self.resolve(id, "width", Axis::Horizontal).unwrap_or(0.0);
        let height = self.resolve(id, "height", Axis::Vertical).unwrap_or(0.0);

        let left = self
            .resolve(id, "left", Axis::Horizontal)
            .or_else(|| {
                self.resolve(id, "right", Axis::Horizontal)
                    .map(|right| viewport.width - right - width)
            })
            .unwrap_or(0.0);
        let top = self
            .resolve(id, "top", Axis::Vertical)
            .or_else(|| {
                self.resolve(id, "bottom", Axis::Vertical)
                    .map(|bottom| viewport.height - bottom - height)
            })
            .unwrap_or(0.0);

        Rect::new(left, top, width, height)
    }

    #[must_use]
    pub fn offset_left(&self, id: ElementId) -> f64 {
        self.bounding_rect(id).left
    }

    #[must_use]
    pub fn offset_top(&self, id: ElementId) -> f64 {
        self.bounding_rect(id).top
    }

    /// Serialize the element and its subtree
    #[must_use]
    pub fn outer_html(&self, id: ElementId) -> String {
        html::serialize(self, id)
    }

    /// Serialize the whole document
    #[must_use]
    pub fn to_html(&self) -> String {
        html::serialize(self, self.root)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

#[cfg(test)]
// Geometry here is exact binary fractions
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new(Viewport::new(1000.0, 800.0))
    }

    #[test]
    fn test_new_document_has_head_and_body() {
        let doc = doc();
        assert_eq!(doc.children(doc.root()), vec![doc.head(), doc.body()]);
        assert!(doc.is_connected(doc.body()));
    }

    #[test]
    fn test_append_moves_between_parents() {
        let mut doc = doc();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(a, child);
        doc.append_child(b, child);

        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), vec![child]);
        assert_eq!(doc.parent(child), Some(b));
    }

    #[test]
    fn test_append_refuses_cycles() {
        let mut doc = doc();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner);
        doc.append_child(inner, outer);

        assert_eq!(doc.parent(outer), None);
        assert_eq!(doc.parent(inner), Some(outer));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut doc = doc();
        let cell = doc.create_element("div");
        let img = doc.create_element("img");
        doc.append_child(doc.body(), cell);
        doc.append_child(cell, img);

        doc.remove(cell);
        assert!(!doc.exists(cell));
        assert!(!doc.exists(img));
        assert!(doc.children(doc.body()).is_empty());
    }

    #[test]
    fn test_get_element_by_id_only_sees_connected() {
        let mut doc = doc();
        let el = doc.create_element("div");
        doc.set_attribute(el, "id", "panel");
        assert_eq!(doc.get_element_by_id("panel"), None);

        doc.append_child(doc.body(), el);
        assert_eq!(doc.get_element_by_id("panel"), Some(el));
    }

    #[test]
    fn test_query_selector_forms() {
        let mut doc = doc();
        let cell = doc.create_element("div");
        doc.set_attribute(cell, "data-id", "7");
        let img = doc.create_element("img");
        doc.add_class(img, "image_target");
        doc.append_child(doc.body(), cell);
        doc.append_child(cell, img);

        assert_eq!(doc.query_selector("[data-id=\"7\"]"), Some(cell));
        assert_eq!(doc.query_selector("img.image_target"), Some(img));
        assert_eq!(doc.query_selector(".image_target"), Some(img));
        assert_eq!(doc.query_selector("[data-id=\"8\"]"), None);
        assert_eq!(doc.query_selector_all(cell, "img"), vec![img]);
    }

    #[test]
    fn test_bounding_rect_left_top() {
        let mut doc = doc();
        let el = doc.create_element("div");
        doc.set_styles(
            el,
            &[
                ("left", "40px"),
                ("top", "30px"),
                ("width", "350px"),
                ("height", "50vh"),
            ],
        );
        assert_eq!(doc.bounding_rect(el), Rect::new(40.0, 30.0, 350.0, 400.0));
    }

    #[test]
    fn test_bounding_rect_right_anchored() {
        let mut doc = doc();
        let el = doc.create_element("div");
        doc.set_styles(
            el,
            &[
                ("top", "5px"),
                ("right", "5px"),
                ("bottom", "auto"),
                ("left", "auto"),
                ("width", "350px"),
                ("height", "90vh"),
            ],
        );
        let rect = doc.bounding_rect(el);
        assert_eq!(rect.left, 645.0);
        assert_eq!(rect.top, 5.0);
        assert_eq!(rect.height, 720.0);
    }

    #[test]
    fn test_bounding_rect_tolerates_garbage() {
        let mut doc = doc();
        let el = doc.create_element("div");
        doc.set_styles(el, &[("left", "banana"), ("width", "10px")]);
        assert_eq!(doc.bounding_rect(el), Rect::new(0.0, 0.0, 10.0, 0.0));
    }

    #[test]
    fn test_style_upsert_keeps_order() {
        let mut doc = doc();
        let el = doc.create_element("div");
        doc.set_style(el, "left", "1px");
        doc.set_style(el, "top", "2px");
        doc.set_style(el, "left", "3px");

        let element = doc.element(el).unwrap();
        assert_eq!(
            element.styles(),
            &[
                ("left".to_string(), "3px".to_string()),
                ("top".to_string(), "2px".to_string())
            ]
        );
    }
}
