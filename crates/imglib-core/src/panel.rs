//! The floating panel and its toggle button.

use crate::config::WidgetConfig;
use crate::dom::{Document, ElementId, SharedDocument};
use crate::drag::{InteractionToken, PointerDragController};
use crate::events::{EventBus, EventKind, ListenerGroup, Scope};
use crate::resize::EdgeResizeController;
use crate::store::{BUTTON_POSITION_KEY, GeometryStore, POSITION_KEY, SIZE_KEY};
use imglib_types::{AUTO, Edge, InteractionState, PositionRecord, SizeRecord};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info};

const HEADING: &str = "Images Library";
const BUTTON_COLOR: &str = "#007bff";
const BUTTON_HOVER_COLOR: &str = "#0056b3";

/// Panel position when nothing is saved
#[must_use]
pub fn default_panel_position() -> PositionRecord {
    PositionRecord::new("5px", "5px", AUTO, AUTO)
}

/// Panel size when nothing is saved
#[must_use]
pub fn default_panel_size() -> SizeRecord {
    SizeRecord::new("350px", "90vh")
}

/// Toggle button position when nothing is saved
#[must_use]
pub fn default_button_position() -> PositionRecord {
    PositionRecord::new("100px", "50px", AUTO, AUTO)
}

fn inset_styles(position: &PositionRecord) -> [(&'static str, &str); 4] {
    [
        ("top", position.top.as_deref().unwrap_or(AUTO)),
        ("right", position.right.as_deref().unwrap_or(AUTO)),
        ("bottom", position.bottom.as_deref().unwrap_or(AUTO)),
        ("left", position.left.as_deref().unwrap_or(AUTO)),
    ]
}

/// Elements of the panel that other components look up
#[derive(Debug, Clone, Copy)]
pub struct PanelElements {
    pub panel: ElementId,
    pub toggle_button: ElementId,
    pub close_button: ElementId,
    pub form: ElementId,
    pub file_input: ElementId,
    pub alt_text_input: ElementId,
    pub submit_button: ElementId,
    pub message: ElementId,
    pub search_input: ElementId,
    pub grid: ElementId,
}

/// Owns the panel, the toggle button and their drag/resize controllers
pub struct PanelWidget {
    doc: SharedDocument,
    elements: PanelElements,
    panel_token: InteractionToken,
    button_token: InteractionToken,
    panel_drag: Rc<PointerDragController>,
    panel_resize: Rc<EdgeResizeController>,
    button_drag: Rc<PointerDragController>,
    listeners: RefCell<ListenerGroup>,
}

impl PanelWidget {
    /// Build the panel and the toggle button into `doc`, restoring their
    /// saved geometry. The panel starts hidden.
    pub fn build(doc: SharedDocument, config: &WidgetConfig, store: &GeometryStore) -> Self {
        let panel_position = store
            .load_position(POSITION_KEY)
            .unwrap_or_default()
            .or_defaults(&default_panel_position());
        let panel_size = store
            .load_size(SIZE_KEY)
            .unwrap_or_default()
            .or_defaults(&default_panel_size());
        let button_position = store
            .load_position(BUTTON_POSITION_KEY)
            .unwrap_or_default()
            .or_defaults(&default_button_position());

        let elements = {
            let mut d = doc.borrow_mut();
            let parts = build_panel(&mut d, config, &panel_position, &panel_size);
            let toggle_button = build_toggle_button(&mut d, config, &button_position);
            parts.with_toggle_button(toggle_button)
        };
        info!(
            "Built image library panel #{} at {:?}",
            config.images_library_container_id, panel_position
        );

        let panel_token: InteractionToken = Rc::new(Cell::new(InteractionState::Idle));
        let button_token: InteractionToken = Rc::new(Cell::new(InteractionState::Idle));

        let panel_drag = Rc::new(PointerDragController::new(
            doc.clone(),
            elements.panel,
            POSITION_KEY,
            store.clone(),
            panel_token.clone(),
        ));
        let panel_resize = Rc::new(EdgeResizeController::new(
            doc.clone(),
            elements.panel,
            SIZE_KEY,
            store.clone(),
            panel_token.clone(),
            &Edge::STRAIGHT,
        ));
        let button_drag = Rc::new(PointerDragController::new(
            doc.clone(),
            elements.toggle_button,
            BUTTON_POSITION_KEY,
            store.clone(),
            button_token.clone(),
        ));

        Self {
            doc,
            elements,
            panel_token,
            button_token,
            panel_drag,
            panel_resize,
            button_drag,
            listeners: RefCell::new(ListenerGroup::default()),
        }
    }

    /// Register drag, resize, visibility and hover listeners
    pub fn attach(self: &Rc<Self>, bus: &Rc<EventBus>) {
        let mut group = ListenerGroup::new(bus);
        group.merge(self.panel_drag.attach(bus));
        group.merge(self.panel_resize.attach(bus));
        group.merge(self.button_drag.attach(bus));

        let this = Rc::downgrade(self);
        group.listen(
            EventKind::Click,
            Scope::Element(self.elements.close_button),
            move |_| {
                if let Some(panel) = this.upgrade() {
                    panel.hide();
                }
            },
        );

        let this = Rc::downgrade(self);
        group.listen(
            EventKind::DoubleClick,
            Scope::Element(self.elements.toggle_button),
            move |_| {
                if let Some(panel) = this.upgrade() {
                    panel.show();
                }
            },
        );

        let button = self.elements.toggle_button;
        for (kind, color) in [
            (EventKind::MouseEnter, BUTTON_HOVER_COLOR),
            (EventKind::MouseLeave, BUTTON_COLOR),
        ] {
            let doc = self.doc.clone();
            group.listen(kind, Scope::Element(button), move |_| {
                doc.borrow_mut().set_style(button, "background-color", color);
            });
        }

        debug!("Panel attached {} listeners", group.len());
        self.listeners.borrow_mut().merge(group);
    }

    /// Panel visible, toggle button hidden
    pub fn show(&self) {
        let mut doc = self.doc.borrow_mut();
        doc.set_style(self.elements.panel, "display", "block");
        doc.set_style(self.elements.toggle_button, "display", "none");
    }

    /// Panel hidden, toggle button visible
    pub fn hide(&self) {
        let mut doc = self.doc.borrow_mut();
        doc.set_style(self.elements.panel, "display", "none");
        doc.set_style(self.elements.toggle_button, "display", "block");
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.doc.borrow().is_displayed(self.elements.panel)
    }

    #[must_use]
    pub fn elements(&self) -> &PanelElements {
        &self.elements
    }

    #[must_use]
    pub fn panel_state(&self) -> InteractionState {
        self.panel_token.get()
    }

    #[must_use]
    pub fn button_state(&self) -> InteractionState {
        self.button_token.get()
    }

    #[must_use]
    pub fn panel_drag(&self) -> &PointerDragController {
        &self.panel_drag
    }

    #[must_use]
    pub fn panel_resize(&self) -> &EdgeResizeController {
        &self.panel_resize
    }

    #[must_use]
    pub fn button_drag(&self) -> &PointerDragController {
        &self.button_drag
    }

    /// Remove every listener registered by [`Self::attach`]
    pub fn teardown(&self) {
        self.listeners.borrow_mut().detach();
    }
}

/// Panel elements before the toggle button exists
struct PanelParts {
    panel: ElementId,
    close_button: ElementId,
    form: ElementId,
    file_input: ElementId,
    alt_text_input: ElementId,
    submit_button: ElementId,
    message: ElementId,
    search_input: ElementId,
    grid: ElementId,
}

impl PanelParts {
    fn with_toggle_button(self, toggle_button: ElementId) -> PanelElements {
        PanelElements {
            panel: self.panel,
            toggle_button,
            close_button: self.close_button,
            form: self.form,
            file_input: self.file_input,
            alt_text_input: self.alt_text_input,
            submit_button: self.submit_button,
            message: self.message,
            search_input: self.search_input,
            grid: self.grid,
        }
    }
}

fn element_with_id(doc: &mut Document, tag: &str, id: &str) -> ElementId {
    let el = doc.create_element(tag);
    doc.set_attribute(el, "id", id);
    el
}

fn build_panel(
    doc: &mut Document,
    config: &WidgetConfig,
    position: &PositionRecord,
    size: &SizeRecord,
) -> PanelParts {
    let container = doc.create_element("div");
    doc.set_styles(
        container,
        &[
            ("background-color", "#fff"),
            ("border-radius", ".5rem"),
            ("position", "sticky"),
            ("top", "1rem"),
            ("padding", "0 1.5rem"),
            ("width", "100%"),
            ("height", "100%"),
            ("overflow-y", "scroll"),
        ],
    );

    let form_container = doc.create_element("div");
    doc.set_styles(
        form_container,
        &[
            ("position", "sticky"),
            ("top", "0"),
            ("z-index", "2"),
            ("background", "white"),
            ("padding", "1rem 0"),
        ],
    );

    let header = doc.create_element("div");
    doc.set_styles(
        header,
        &[
            ("display", "flex"),
            ("justify-content", "space-between"),
            ("align-items", "center"),
        ],
    );
    let heading = doc.create_element("h4");
    doc.set_text(heading, HEADING);
    let close_button = doc.create_element("span");
    doc.set_text(close_button, "x");
    doc.set_styles(
        close_button,
        &[
            ("background-color", "red"),
            ("color", "white"),
            ("border-radius", "50%"),
            ("padding", "2px 10px"),
            ("cursor", "pointer"),
        ],
    );
    doc.append_child(header, heading);
    doc.append_child(header, close_button);
    doc.append_child(form_container, header);

    let form = element_with_id(doc, "form", &config.image_form_id);
    doc.set_attribute(form, "action", "");

    let input_row = doc.create_element("div");
    doc.set_styles(
        input_row,
        &[
            ("display", "flex"),
            ("align-items", "center"),
            ("border", "1px solid rgb(221, 221, 221)"),
        ],
    );

    let file_input = element_with_id(doc, "input", &config.image_file_input_id);
    doc.set_attribute(file_input, "type", "file");
    doc.set_attribute(file_input, "name", &config.file_input_field_name());
    doc.set_attribute(file_input, "accept", &config.accept_attribute());
    doc.set_attribute(file_input, "multiple", "multiple");
    doc.set_attribute(file_input, "required", "required");

    let alt_text_input = element_with_id(doc, "input", &config.image_alt_text_input_id);
    doc.set_attribute(alt_text_input, "type", "text");
    doc.set_attribute(alt_text_input, "name", &config.image_alt_text_input_name);
    doc.set_attribute(alt_text_input, "placeholder", "Searchable Text");
    doc.set_attribute(alt_text_input, "required", "required");

    let hidden_input = element_with_id(doc, "input", &config.image_hidden_input_id);
    doc.set_attribute(hidden_input, "type", "hidden");
    doc.set_attribute(hidden_input, "name", &config.image_hidden_input_name);

    let submit_button = element_with_id(doc, "button", &config.image_submit_button_id);
    doc.set_attribute(submit_button, "type", "submit");
    let label = doc.create_element("span");
    doc.set_text(label, "Upload");
    let spinner = doc.create_element("span");
    doc.set_styles(
        spinner,
        &[
            ("display", "none"),
            ("width", "1rem"),
            ("height", "1rem"),
            ("border-radius", "50%"),
        ],
    );
    doc.append_child(submit_button, label);
    doc.append_child(submit_button, spinner);

    for child in [file_input, alt_text_input, hidden_input, submit_button] {
        doc.append_child(input_row, child);
    }
    doc.append_child(form, input_row);

    let message = element_with_id(doc, "span", &config.image_message_field_id);
    doc.set_style(message, "font-size", "14px");
    doc.append_child(form, message);
    doc.append_child(form_container, form);

    let search_input = element_with_id(doc, "input", &config.image_search_input_id);
    doc.set_attribute(search_input, "type", "text");
    doc.set_attribute(search_input, "name", &config.image_search_input_name);
    doc.set_attribute(search_input, "placeholder", "Search Image");
    doc.append_child(form_container, search_input);

    let grid = element_with_id(doc, "div", &config.images_list_container_id);
    doc.set_styles(
        grid,
        &[
            ("display", "flex"),
            ("flex-wrap", "wrap"),
            ("gap", "0.5rem"),
            ("border-top", "1px solid #ddd"),
        ],
    );

    doc.append_child(container, form_container);
    doc.append_child(container, grid);

    let panel = element_with_id(doc, "div", &config.images_library_container_id);
    doc.set_styles(
        panel,
        &[
            ("display", "none"),
            ("border-radius", "10px"),
            ("z-index", "1001"),
            ("position", "fixed"),
        ],
    );
    doc.set_styles(panel, &inset_styles(position));
    doc.set_styles(
        panel,
        &[
            ("width", size.width.as_deref().unwrap_or("350px")),
            ("height", size.height.as_deref().unwrap_or("90vh")),
        ],
    );
    doc.append_child(panel, container);
    let body = doc.body();
    doc.append_child(body, panel);

    PanelParts {
        panel,
        close_button,
        form,
        file_input,
        alt_text_input,
        submit_button,
        message,
        search_input,
        grid,
    }
}

fn build_toggle_button(
    doc: &mut Document,
    config: &WidgetConfig,
    position: &PositionRecord,
) -> ElementId {
    let button = element_with_id(doc, "button", &config.library_toggle_button_id);
    doc.set_text(button, "+");
    doc.set_style(button, "position", "fixed");
    doc.set_styles(button, &inset_styles(position));
    doc.set_styles(
        button,
        &[
            ("width", "60px"),
            ("height", "60px"),
            ("background-color", BUTTON_COLOR),
            ("color", "white"),
            ("border", "none"),
            ("border-radius", "50%"),
            ("display", "flex"),
            ("justify-content", "center"),
            ("align-items", "center"),
            ("font-size", "24px"),
            ("cursor", "pointer"),
            ("z-index", "1000"),
        ],
    );
    let body = doc.body();
    doc.append_child(body, button);
    button
}
