//! The image library widget as a host embeds it.

use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::config::WidgetConfig;
use crate::dom::{Document, ElementId, SharedDocument, Viewport};
use crate::events::{Event, EventBus, EventKind, ListenerGroup};
use crate::grid::{ImageGrid, ImageGridController};
use crate::hooks::Hooks;
use crate::messages::Messenger;
use crate::panel::PanelWidget;
use crate::store::{CookieJar, GeometryStore, PersistenceSurface};
use crate::timers::Timers;
use imglib_types::{FileDescriptor, ImageRecord, MessageTone};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

/// What hooks get to work with
pub struct WidgetContext {
    doc: SharedDocument,
    config: WidgetConfig,
    messenger: Messenger,
    grid: ImageGrid,
    selection: RefCell<Vec<FileDescriptor>>,
}

impl WidgetContext {
    #[must_use]
    pub fn document(&self) -> &SharedDocument {
        &self.doc
    }

    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    #[must_use]
    pub fn messenger(&self) -> &Messenger {
        &self.messenger
    }

    #[must_use]
    pub fn grid(&self) -> &ImageGrid {
        &self.grid
    }

    /// Files currently picked in the upload form
    #[must_use]
    pub fn selected_files(&self) -> Vec<FileDescriptor> {
        self.selection.borrow().clone()
    }

    pub fn show_message(&self, text: &str, tone: MessageTone) {
        self.messenger.show(text, tone);
    }
}

/// External collaborators the widget runs against
pub struct Surfaces {
    pub document: SharedDocument,
    pub persistence: Rc<dyn PersistenceSurface>,
    pub clipboard: Rc<dyn Clipboard>,
}

impl Surfaces {
    /// Fresh document, in-memory cookie jar and clipboard
    #[must_use]
    pub fn headless(viewport: Viewport) -> Self {
        Self {
            document: Document::shared(viewport),
            persistence: Rc::new(CookieJar::new()),
            clipboard: Rc::new(MemoryClipboard::new()),
        }
    }
}

/// One image library: the panel, its toggle button and the image grid
pub struct ImageLibrary {
    ctx: Rc<WidgetContext>,
    bus: Rc<EventBus>,
    timers: Rc<Timers>,
    store: GeometryStore,
    panel: Rc<PanelWidget>,
    grid: Rc<ImageGridController>,
    listeners: RefCell<ListenerGroup>,
}

impl ImageLibrary {
    /// Build the widget into `surfaces.document` and start listening
    #[must_use]
    pub fn new(config: WidgetConfig, hooks: Hooks, surfaces: Surfaces) -> Self {
        let config = config.sanitized();
        let doc = surfaces.document;
        let timers = Rc::new(Timers::new());
        let bus = Rc::new(EventBus::new(doc.clone()));
        let store = GeometryStore::new(surfaces.persistence)
            .with_expiry_days(config.geometry_expiry_days);

        let panel = Rc::new(PanelWidget::build(doc.clone(), &config, &store));
        panel.attach(&bus);

        let messenger = Messenger::new(
            doc.clone(),
            timers.clone(),
            config.image_message_field_id.clone(),
            config.message_timeout_ms,
        );
        let grid = ImageGrid::new(doc.clone(), config.images_list_container_id.clone());
        let ctx = Rc::new(WidgetContext {
            doc,
            config,
            messenger,
            grid,
            selection: RefCell::new(Vec::new()),
        });

        let controller = Rc::new(ImageGridController::new(
            ctx.clone(),
            hooks,
            surfaces.clipboard,
        ));
        let listeners = controller.attach(&bus);

        info!(
            "Image library ready with {} listeners",
            bus.listener_count()
        );

        Self {
            ctx,
            bus,
            timers,
            store,
            panel,
            grid: controller,
            listeners: RefCell::new(listeners),
        }
    }

    /// Show `records` through the load hook (by default, replacing the grid)
    pub fn load_library_images(&self, records: &[ImageRecord]) -> bool {
        self.grid.load_library_images(records)
    }

    pub fn show(&self) {
        self.panel.show();
    }

    pub fn hide(&self) {
        self.panel.hide();
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.panel.is_visible()
    }

    pub fn dispatch(&self, event: &Event) {
        self.bus.dispatch(event);
    }

    /// First element matching a simple selector
    #[must_use]
    pub fn find(&self, selector: &str) -> Option<ElementId> {
        self.ctx.doc.borrow().query_selector(selector)
    }

    pub fn press(&self, target: ElementId, x: f64, y: f64) {
        self.dispatch(&Event::pointer(EventKind::MouseDown, target, x, y));
    }

    pub fn move_pointer(&self, x: f64, y: f64) {
        let body = self.ctx.doc.borrow().body();
        self.dispatch(&Event::pointer(EventKind::MouseMove, body, x, y));
    }

    pub fn release(&self, x: f64, y: f64) {
        let body = self.ctx.doc.borrow().body();
        self.dispatch(&Event::pointer(EventKind::MouseUp, body, x, y));
    }

    pub fn click(&self, target: ElementId) {
        self.dispatch(&Event::new(EventKind::Click, target));
    }

    pub fn double_click(&self, target: ElementId) {
        self.dispatch(&Event::new(EventKind::DoubleClick, target));
    }

    /// Pointer enters (`true`) or leaves (`false`) the element
    pub fn hover(&self, target: ElementId, inside: bool) {
        let kind = if inside {
            EventKind::MouseEnter
        } else {
            EventKind::MouseLeave
        };
        self.dispatch(&Event::new(kind, target));
    }

    /// Pick files in the upload form
    pub fn select_files(&self, files: Vec<FileDescriptor>) {
        *self.ctx.selection.borrow_mut() = files;
        let input = self.panel.elements().file_input;
        self.dispatch(&Event::new(EventKind::Change, input));
    }

    /// Type `text` into the search field
    pub fn search(&self, text: &str) {
        let input = self.panel.elements().search_input;
        self.ctx.doc.borrow_mut().set_value(input, text);
        self.dispatch(&Event::new(EventKind::KeyUp, input));
    }

    /// Submit the upload form; returns whether a hook took over the submit
    pub fn submit(&self) -> bool {
        let event = Event::new(EventKind::Submit, self.panel.elements().form);
        self.dispatch(&event);
        event.default_prevented()
    }

    /// Move the virtual clock, firing due timeouts
    pub fn advance_time(&self, ms: u64) {
        self.timers.advance(ms);
    }

    /// Text of the status message field
    #[must_use]
    pub fn message(&self) -> String {
        self.ctx.messenger.text()
    }

    #[must_use]
    pub fn context(&self) -> &Rc<WidgetContext> {
        &self.ctx
    }

    #[must_use]
    pub fn document(&self) -> &SharedDocument {
        &self.ctx.doc
    }

    #[must_use]
    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    #[must_use]
    pub fn timers(&self) -> &Rc<Timers> {
        &self.timers
    }

    #[must_use]
    pub fn store(&self) -> &GeometryStore {
        &self.store
    }

    #[must_use]
    pub fn panel(&self) -> &PanelWidget {
        &self.panel
    }

    #[must_use]
    pub fn grid(&self) -> &ImageGrid {
        &self.ctx.grid
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        self.ctx.doc.borrow().to_html()
    }

    /// Remove every listener the widget registered
    pub fn teardown(&self) {
        self.panel.teardown();
        self.listeners.borrow_mut().detach();
        info!("Image library torn down");
    }
}
