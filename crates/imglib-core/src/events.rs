//! Input events and the listener registry they are dispatched through.
//!
//! Every controller registers its handlers on an [`EventBus`] and keeps the
//! returned ids in a [`ListenerGroup`], so tearing a widget down removes
//! exactly the listeners it added and nothing else.

use crate::dom::{ElementId, SharedDocument};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseDown,
    MouseMove,
    MouseUp,
    Click,
    DoubleClick,
    KeyUp,
    Change,
    Submit,
    MouseEnter,
    MouseLeave,
}

impl EventKind {
    /// Whether ancestors and document listeners see the event
    #[must_use]
    pub fn bubbles(self) -> bool {
        !matches!(self, Self::MouseEnter | Self::MouseLeave)
    }
}

#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub target: ElementId,
    pub client_x: f64,
    pub client_y: f64,
    default_prevented: Cell<bool>,
}

impl Event {
    #[must_use]
    pub fn new(kind: EventKind, target: ElementId) -> Self {
        Self::pointer(kind, target, 0.0, 0.0)
    }

    #[must_use]
    pub fn pointer(kind: EventKind, target: ElementId, client_x: f64, client_y: f64) -> Self {
        Self {
            kind,
            target,
            client_x,
            client_y,
            default_prevented: Cell::new(false),
        }
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Document,
    /// Fires for events targeting the element or, for bubbling kinds, any
    /// of its descendants
    Element(ElementId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub type Handler = Rc<dyn Fn(&Event)>;

struct Listener {
    id: ListenerId,
    kind: EventKind,
    scope: Scope,
    handler: Handler,
}

pub struct EventBus {
    doc: SharedDocument,
    listeners: RefCell<Vec<Listener>>,
    next_id: Cell<u64>,
}

impl EventBus {
    #[must_use]
    pub fn new(doc: SharedDocument) -> Self {
        Self {
            doc,
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    #[must_use]
    pub fn document(&self) -> &SharedDocument {
        &self.doc
    }

    pub fn listen<F>(&self, kind: EventKind, scope: Scope, handler: F) -> ListenerId
    where
        F: Fn(&Event) + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            kind,
            scope,
            handler: Rc::new(handler),
        });
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unlisten(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver an event.
    ///
    /// Element listeners run first, innermost element first, then document
    /// listeners. The set of handlers is fixed before the first one runs;
    /// handlers may mutate the document and the registry.
    pub fn dispatch(&self, event: &Event) {
        let path = {
            let doc = self.doc.borrow();
            if event.kind.bubbles() {
                let mut path = Vec::new();
                let mut current = doc.exists(event.target).then_some(event.target);
                while let Some(id) = current {
                    path.push(id);
                    current = doc.parent(id);
                }
                path
            } else {
                vec![event.target]
            }
        };

        let handlers: Vec<Handler> = {
            let guard = self.listeners.borrow();
            let listeners: &[Listener] = &guard;
            let on_path = path.iter().flat_map(|node| {
                listeners
                    .iter()
                    .filter(move |l| l.kind == event.kind && l.scope == Scope::Element(*node))
            });
            let on_document = listeners
                .iter()
                .filter(|l| event.kind.bubbles() && l.kind == event.kind)
                .filter(|l| l.scope == Scope::Document);
            on_path
                .chain(on_document)
                .map(|l| l.handler.clone())
                .collect()
        };

        for handler in handlers {
            handler(event);
        }
    }
}

/// Listener ids registered by one component, removed together
#[derive(Default)]
pub struct ListenerGroup {
    bus: Weak<EventBus>,
    ids: Vec<ListenerId>,
}

impl ListenerGroup {
    #[must_use]
    pub fn new(bus: &Rc<EventBus>) -> Self {
        Self {
            bus: Rc::downgrade(bus),
            ids: Vec::new(),
        }
    }

    pub fn listen<F>(&mut self, kind: EventKind, scope: Scope, handler: F)
    where
        F: Fn(&Event) + 'static,
    {
        if let Some(bus) = self.bus.upgrade() {
            self.ids.push(bus.listen(kind, scope, handler));
        }
    }

    /// Take over another group's listeners
    pub fn merge(&mut self, mut other: ListenerGroup) {
        if self.bus.upgrade().is_none() {
            self.bus = other.bus.clone();
        }
        self.ids.append(&mut other.ids);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Unregister every listener of the group
    pub fn detach(&mut self) {
        let Some(bus) = self.bus.upgrade() else {
            self.ids.clear();
            return;
        };
        let removed = self.ids.drain(..).filter(|id| bus.unlisten(*id)).count();
        debug!("Detached {} listeners", removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn bus() -> (Rc<EventBus>, ElementId, ElementId) {
        let doc = Document::shared(crate::dom::Viewport::default());
        let (outer, inner) = {
            let mut d = doc.borrow_mut();
            let outer = d.create_element("div");
            let inner = d.create_element("span");
            let body = d.body();
            d.append_child(body, outer);
            d.append_child(outer, inner);
            (outer, inner)
        };
        (Rc::new(EventBus::new(doc)), outer, inner)
    }

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Handler) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = log.clone();
            move |name: &'static str| -> Handler {
                let log = log.clone();
                Rc::new(move |_: &Event| log.borrow_mut().push(name))
            }
        };
        (log, make)
    }

    #[test]
    fn test_dispatch_order_innermost_first() {
        let (bus, outer, inner) = bus();
        let (log, make) = recorder();
        let doc_handler = make("document");
        let outer_handler = make("outer");
        let inner_handler = make("inner");
        bus.listen(EventKind::Click, Scope::Document, move |e| doc_handler(e));
        bus.listen(EventKind::Click, Scope::Element(outer), move |e| outer_handler(e));
        bus.listen(EventKind::Click, Scope::Element(inner), move |e| inner_handler(e));

        bus.dispatch(&Event::new(EventKind::Click, inner));
        assert_eq!(*log.borrow(), vec!["inner", "outer", "document"]);
    }

    #[test]
    fn test_kind_filter() {
        let (bus, outer, _) = bus();
        let (log, make) = recorder();
        let handler = make("click");
        bus.listen(EventKind::Click, Scope::Element(outer), move |e| handler(e));

        bus.dispatch(&Event::new(EventKind::DoubleClick, outer));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_mouse_enter_does_not_bubble() {
        let (bus, outer, inner) = bus();
        let (log, make) = recorder();
        let outer_handler = make("outer");
        let doc_handler = make("document");
        bus.listen(EventKind::MouseEnter, Scope::Element(outer), move |e| {
            outer_handler(e);
        });
        bus.listen(EventKind::MouseEnter, Scope::Document, move |e| doc_handler(e));

        bus.dispatch(&Event::new(EventKind::MouseEnter, inner));
        assert!(log.borrow().is_empty());

        bus.dispatch(&Event::new(EventKind::MouseEnter, outer));
        assert_eq!(*log.borrow(), vec!["outer"]);
    }

    #[test]
    fn test_unlisten_and_group_detach() {
        let (bus, outer, _) = bus();
        let hits = Rc::new(Cell::new(0));

        let mut group = ListenerGroup::new(&bus);
        for _ in 0..3 {
            let hits = hits.clone();
            group.listen(EventKind::Click, Scope::Element(outer), move |_| {
                hits.set(hits.get() + 1);
            });
        }
        let other = bus.listen(EventKind::Click, Scope::Document, |_| {});
        assert_eq!(bus.listener_count(), 4);

        bus.dispatch(&Event::new(EventKind::Click, outer));
        assert_eq!(hits.get(), 3);

        group.detach();
        assert!(group.is_empty());
        assert_eq!(bus.listener_count(), 1);
        assert!(bus.unlisten(other));
        assert!(!bus.unlisten(other));
    }

    #[test]
    fn test_handler_can_unlisten_during_dispatch() {
        let (bus, outer, _) = bus();
        let hits = Rc::new(Cell::new(0));
        let slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let id = {
            let bus_ref = Rc::downgrade(&bus);
            let hits = hits.clone();
            let slot = slot.clone();
            bus.listen(EventKind::Click, Scope::Element(outer), move |_| {
                hits.set(hits.get() + 1);
                if let (Some(bus), Some(id)) = (bus_ref.upgrade(), slot.get()) {
                    bus.unlisten(id);
                }
            })
        };
        slot.set(Some(id));

        bus.dispatch(&Event::new(EventKind::Click, outer));
        bus.dispatch(&Event::new(EventKind::Click, outer));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_prevent_default_is_visible_to_caller() {
        let (bus, outer, _) = bus();
        bus.listen(EventKind::MouseDown, Scope::Element(outer), |e| {
            e.prevent_default();
        });
        let event = Event::pointer(EventKind::MouseDown, outer, 1.0, 2.0);
        bus.dispatch(&event);
        assert!(event.default_prevented());
    }
}
