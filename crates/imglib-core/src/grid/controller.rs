use super::{IMAGE_CLASS, REMOVE_CLASS};
use crate::clipboard::Clipboard;
use crate::dom::ElementId;
use crate::events::{Event, EventBus, EventKind, ListenerGroup, Scope};
use crate::hooks::Hooks;
use crate::library::WidgetContext;
use crate::upload::UploadRejection;
use imglib_types::{ImageRecord, MessageTone};
use std::rc::Rc;
use tracing::{debug, error, warn};

const MSG_COPIED: &str = "Text copied successfully";
const MSG_COPY_FAILED: &str = "Failed to Copy text";

/// Routes clicks, keystrokes and form events of the panel to the hooks
pub struct ImageGridController {
    ctx: Rc<WidgetContext>,
    hooks: Hooks,
    clipboard: Rc<dyn Clipboard>,
}

impl ImageGridController {
    pub fn new(ctx: Rc<WidgetContext>, hooks: Hooks, clipboard: Rc<dyn Clipboard>) -> Self {
        Self {
            ctx,
            hooks,
            clipboard,
        }
    }

    #[must_use]
    pub fn context(&self) -> &Rc<WidgetContext> {
        &self.ctx
    }

    /// Hand records to the load hook; returns whether it succeeded
    pub fn load_library_images(&self, records: &[ImageRecord]) -> bool {
        match self.hooks.load.load_library_images(records, &self.ctx) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to load library images: {:#}", e);
                false
            }
        }
    }

    /// Copy `text`, reporting the outcome in the message field
    pub fn copy_text(&self, text: &str) -> bool {
        match self.clipboard.write_text(text) {
            Ok(()) => {
                self.ctx.messenger().show(MSG_COPIED, MessageTone::Success);
                true
            }
            Err(e) => {
                debug!("Clipboard write failed: {}", e);
                self.ctx.messenger().show(MSG_COPY_FAILED, MessageTone::Error);
                false
            }
        }
    }

    /// Document-wide click: copy on image, remove hook on remove glyph
    pub fn handle_click(&self, target: ElementId) {
        let (is_image, is_remove) = {
            let doc = self.ctx.document().borrow();
            (
                doc.has_class(target, IMAGE_CLASS),
                doc.has_class(target, REMOVE_CLASS),
            )
        };

        if is_image {
            match self.ctx.grid().url_for_image(target) {
                Some(url) => {
                    self.copy_text(&url);
                }
                None => warn!("Image {:?} has no URL input", target),
            }
        } else if is_remove {
            match self.ctx.grid().id_for_remove_glyph(target) {
                Some(id) => self.hooks.remove.remove_image(&id, &self.ctx),
                None => warn!("Remove glyph {:?} has no data-id", target),
            }
        }
    }

    /// Keystroke in the search field
    pub fn handle_search(&self, input: ElementId) {
        let text = self.ctx.document().borrow().value(input).to_string();
        let images = self.ctx.grid().image_elements();
        self.hooks.search.search_images(&text, &images, &self.ctx);
    }

    /// File selection changed
    ///
    /// # Errors
    ///
    /// Returns the change hook's rejection.
    pub fn handle_change(&self) -> Result<(), UploadRejection> {
        let files = self.ctx.selected_files();
        self.hooks.change.change_images(&files, &self.ctx)
    }

    pub fn handle_submit(&self, event: &Event) {
        if let Err(e) = self.hooks.submit.submit_images(event, &self.ctx) {
            error!("Image upload failed: {:#}", e);
        }
    }

    /// Register the grid, search and form listeners.
    ///
    /// Search and form listeners are skipped when their element is missing.
    pub fn attach(self: &Rc<Self>, bus: &Rc<EventBus>) -> ListenerGroup {
        let mut group = ListenerGroup::new(bus);
        let config = self.ctx.config();
        let (search_input, form) = {
            let doc = self.ctx.document().borrow();
            (
                doc.get_element_by_id(&config.image_search_input_id),
                doc.get_element_by_id(&config.image_form_id),
            )
        };

        let this = self.clone();
        group.listen(EventKind::Click, Scope::Document, move |e| {
            this.handle_click(e.target);
        });

        if let Some(input) = search_input {
            let this = self.clone();
            group.listen(EventKind::KeyUp, Scope::Element(input), move |_| {
                this.handle_search(input);
            });
        }

        if let Some(form) = form {
            let this = self.clone();
            group.listen(EventKind::Change, Scope::Element(form), move |_| {
                if let Err(rejection) = this.handle_change() {
                    debug!("File selection rejected: {}", rejection);
                }
            });

            let this = self.clone();
            group.listen(EventKind::Submit, Scope::Element(form), move |e| {
                this.handle_submit(e);
            });
        }

        group
    }
}
