//! Edge-handle resizing of the panel.
//!
//! Top and left edges move the panel origin and refuse to go below the
//! minimum size; bottom and right edges keep the origin and floor at it.

use crate::dom::{ElementId, Rect, SharedDocument, px};
use crate::drag::InteractionToken;
use crate::events::{EventBus, EventKind, ListenerGroup, Scope};
use crate::store::{GeometryStore, POSITION_KEY};
use imglib_types::{AUTO, Edge, InteractionState, PositionRecord, SizeRecord};
use std::rc::Rc;
use tracing::debug;

pub const MIN_HEIGHT: f64 = 100.0;
pub const MIN_WIDTH: f64 = 150.0;

/// Class carried by every handle, next to the edge name
pub const RESIZE_HANDLE_CLASS: &str = "resize-handle";

const HANDLE_THICKNESS: &str = "3px";
const CORNER_SIZE: &str = "10px";

/// Geometry changes produced by one pointer move
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResizeStep {
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl ResizeStep {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.left.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// New geometry for a pointer at `(x, y)` while resizing from `edge`.
///
/// Corners apply their vertical and horizontal rules independently.
#[must_use]
pub fn compute_resize(edge: Edge, rect: Rect, x: f64, y: f64) -> ResizeStep {
    let mut step = ResizeStep::default();

    match edge.vertical() {
        Some(Edge::Top) => {
            let height = rect.bottom() - y;
            if height >= MIN_HEIGHT {
                step.height = Some(height);
                step.top = Some(y);
            }
        }
        Some(_) => step.height = Some((y - rect.top).max(MIN_HEIGHT)),
        None => {}
    }

    match edge.horizontal() {
        Some(Edge::Left) => {
            let width = rect.right() - x;
            if width >= MIN_WIDTH {
                step.width = Some(width);
                step.left = Some(x);
            }
        }
        Some(_) => step.width = Some((x - rect.left).max(MIN_WIDTH)),
        None => {}
    }

    step
}

/// Inline style of the handle strip for `edge`
fn handle_styles(edge: Edge) -> Vec<(&'static str, &'static str)> {
    let mut styles = vec![
        ("position", "absolute"),
        ("background-color", "#007bff"),
        ("z-index", "10"),
        ("cursor", edge.cursor()),
    ];
    let placement: &[(&str, &str)] = match edge {
        Edge::Top => &[("top", "0"), ("left", "0"), ("right", "0"), ("height", HANDLE_THICKNESS)],
        Edge::Bottom => &[("bottom", "0"), ("left", "0"), ("right", "0"), ("height", HANDLE_THICKNESS)],
        Edge::Left => &[("top", "0"), ("bottom", "0"), ("left", "0"), ("width", HANDLE_THICKNESS)],
        Edge::Right => &[("top", "0"), ("bottom", "0"), ("right", "0"), ("width", HANDLE_THICKNESS)],
        Edge::TopLeft => &[("top", "0"), ("left", "0"), ("width", CORNER_SIZE), ("height", CORNER_SIZE)],
        Edge::TopRight => &[("top", "0"), ("right", "0"), ("width", CORNER_SIZE), ("height", CORNER_SIZE)],
        Edge::BottomLeft => &[("bottom", "0"), ("left", "0"), ("width", CORNER_SIZE), ("height", CORNER_SIZE)],
        Edge::BottomRight => &[("bottom", "0"), ("right", "0"), ("width", CORNER_SIZE), ("height", CORNER_SIZE)],
    };
    styles.extend_from_slice(placement);
    if edge.vertical().is_none() || edge.horizontal().is_none() {
        styles.push(("border-radius", "10px"));
    }
    styles
}

/// Resizes the panel from handles along its edges.
///
/// Each applied move persists the size under the controller's key and the
/// current `left`/`top` under [`POSITION_KEY`], because top and left resizes
/// move the panel.
pub struct EdgeResizeController {
    doc: SharedDocument,
    element: ElementId,
    key: String,
    store: GeometryStore,
    token: InteractionToken,
    handles: Vec<(Edge, ElementId)>,
}

impl EdgeResizeController {
    /// Create one handle per edge and append them to `element`
    pub fn new(
        doc: SharedDocument,
        element: ElementId,
        key: impl Into<String>,
        store: GeometryStore,
        token: InteractionToken,
        edges: &[Edge],
    ) -> Self {
        let handles = {
            let mut d = doc.borrow_mut();
            edges
                .iter()
                .map(|edge| {
                    let handle = d.create_element("div");
                    d.add_class(handle, RESIZE_HANDLE_CLASS);
                    d.add_class(handle, edge.as_str());
                    d.set_styles(handle, &handle_styles(*edge));
                    d.append_child(element, handle);
                    (*edge, handle)
                })
                .collect()
        };

        Self {
            doc,
            element,
            key: key.into(),
            store,
            token,
            handles,
        }
    }

    #[must_use]
    pub fn handles(&self) -> &[(Edge, ElementId)] {
        &self.handles
    }

    #[must_use]
    pub fn handle(&self, edge: Edge) -> Option<ElementId> {
        self.handles
            .iter()
            .find(|(e, _)| *e == edge)
            .map(|(_, handle)| *handle)
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.token.get()
    }

    /// Start resizing from `edge`; refused while the panel is being dragged
    pub fn press(&self, edge: Edge) -> bool {
        if self.token.get().is_dragging() {
            debug!("Ignoring resize press on {} while dragging", edge);
            return false;
        }

        self.token.set(InteractionState::Resizing(edge));
        let mut doc = self.doc.borrow_mut();
        let body = doc.body();
        doc.set_style(body, "cursor", edge.cursor());
        debug!("Resize started from {}", edge);
        true
    }

    /// Apply the active edge's rule for a pointer at `(x, y)`
    pub fn pointer_move(&self, x: f64, y: f64) -> Option<ResizeStep> {
        let edge = self.token.get().resize_edge()?;

        let (step, size, position) = {
            let mut doc = self.doc.borrow_mut();
            let rect = doc.bounding_rect(self.element);
            let step = compute_resize(edge, rect, x, y);

            for (property, value) in [
                ("height", step.height),
                ("top", step.top),
                ("width", step.width),
                ("left", step.left),
            ] {
                if let Some(value) = value {
                    doc.set_style(self.element, property, &px(value));
                }
            }

            let style = |property: &str| {
                doc.style(self.element, property)
                    .unwrap_or_default()
                    .to_string()
            };
            let size = SizeRecord::new(style("width"), style("height"));
            let position = PositionRecord {
                left: Some(style("left")),
                top: Some(style("top")),
                right: Some(AUTO.to_string()),
                bottom: Some(AUTO.to_string()),
            };
            (step, size, position)
        };

        self.store.save_size(&self.key, &size);
        self.store.save_position(POSITION_KEY, &position);
        Some(step)
    }

    /// End the resize; a no-op unless resizing
    pub fn release(&self) {
        if !self.token.get().is_resizing() {
            return;
        }
        self.token.set(InteractionState::Idle);
        let mut doc = self.doc.borrow_mut();
        let body = doc.body();
        doc.set_style(body, "cursor", "default");
        debug!("Resize ended");
    }

    /// Register press on every handle and document-wide move/release
    pub fn attach(self: &Rc<Self>, bus: &Rc<EventBus>) -> ListenerGroup {
        let mut group = ListenerGroup::new(bus);

        for (edge, handle) in &self.handles {
            let this = self.clone();
            let edge = *edge;
            group.listen(EventKind::MouseDown, Scope::Element(*handle), move |e| {
                if this.press(edge) {
                    e.prevent_default();
                }
            });
        }

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
