//! Press-move-release dragging of a floating element.

use crate::dom::{ElementId, SharedDocument, px};
use crate::events::{EventBus, EventKind, ListenerGroup, Scope};
use crate::resize::RESIZE_HANDLE_CLASS;
use crate::store::GeometryStore;
use imglib_types::{AUTO, InteractionState, PositionRecord};
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

/// Interaction state shared by the controllers of one floating element
pub type InteractionToken = Rc<Cell<InteractionState>>;

/// Press targets that never start a drag (uppercase tag names)
pub const EXCLUDED_TAGS: &[&str] = &["IMG", "INPUT"];

/// Classes whose elements never start a drag
pub const EXCLUDED_CLASSES: &[&str] = &[RESIZE_HANDLE_CLASS];

const CURSOR_GRABBING: &str = "grabbing";
const CURSOR_GRAB: &str = "grab";

/// Moves an element with the pointer and saves where it lands.
///
/// While dragging, every move pins the element by `left`/`top` (with
/// `right`/`bottom` reset to `auto`) and persists that position under the
/// controller's key. There is no clamping; the element may leave the screen.
pub struct PointerDragController {
    doc: SharedDocument,
    element: ElementId,
    key: String,
    store: GeometryStore,
    token: InteractionToken,
}

impl PointerDragController {
    pub fn new(
        doc: SharedDocument,
        element: ElementId,
        key: impl Into<String>,
        store: GeometryStore,
        token: InteractionToken,
    ) -> Self {
        Self {
            doc,
            element,
            key: key.into(),
            store,
            token,
        }
    }

    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.token.get()
    }

    /// Whether pressing `target` must not start a drag
    #[must_use]
    pub fn is_excluded(&self, target: ElementId) -> bool {
        let doc = self.doc.borrow();
        let Some(el) = doc.element(target) else {
            return true;
        };
        EXCLUDED_TAGS.contains(&el.tag_name().as_str())
            || EXCLUDED_CLASSES.iter().any(|class| el.has_class(class))
    }

    /// Start dragging from a press at `(x, y)` on `target`.
    ///
    /// Returns whether a drag started.
    pub fn press(&self, target: ElementId, x: f64, y: f64) -> bool {
        if self.is_excluded(target) {
            return false;
        }
        if !self.token.get().is_idle() {
            debug!("Ignoring drag press on {:?}: {:?}", self.element, self.token.get());
            return false;
        }

        let mut doc = self.doc.borrow_mut();
        let offset_x = x - doc.offset_left(self.element);
        let offset_y = y - doc.offset_top(self.element);
        self.token
            .set(InteractionState::Dragging { offset_x, offset_y });
        doc.set_style(self.element, "cursor", CURSOR_GRABBING);
        debug!("Drag started on {:?} at ({}, {})", self.element, x, y);
        true
    }

    /// Follow the pointer; returns the position applied, if dragging
    pub fn pointer_move(&self, x: f64, y: f64) -> Option<PositionRecord> {
        let InteractionState::Dragging { offset_x, offset_y } = self.token.get() else {
            return None;
        };

        let left = px(x - offset_x);
        let top = px(y - offset_y);
        self.doc.borrow_mut().set_styles(
            self.element,
            &[
                ("left", left.as_str()),
                ("top", top.as_str()),
                ("right", AUTO),
                ("bottom", AUTO),
            ],
        );

        let position = PositionRecord::anchored(left, top);
        self.store.save_position(&self.key, &position);
        Some(position)
    }

    /// End the drag; a no-op unless dragging
    pub fn release(&self) {
        if !self.token.get().is_dragging() {
            return;
        }
        self.token.set(InteractionState::Idle);
        self.doc
            .borrow_mut()
            .set_style(self.element, "cursor", CURSOR_GRAB);
        debug!("Drag ended on {:?}", self.element);
    }

    /// Register press on the element and document-wide move/release
    pub fn attach(self: &Rc<Self>, bus: &Rc<EventBus>) -> ListenerGroup {
        let mut group = ListenerGroup::new(bus);

        let this = self.clone();
        group.listen(EventKind::MouseDown, Scope::Element(self.element), move |e| {
            this.press(e.target, e.client_x, e.client_y);
        });

        let this = self.clone();
        group.listen(EventKind::MouseMove, Scope::Document, move |e| {
            this.pointer_move(e.client_x, e.client_y);
        });

        let this = self.clone();
        group.listen(EventKind::MouseUp, Scope::Document, move |_| {
            this.release();
        });

        group
    }
}
