//! Host-replaceable widget behaviors.
//!
//! Each behavior is a trait whose provided method is the built-in behavior.
//! [`BuiltinHooks`] uses every default; hosts replace one behavior at a time
//! on [`Hooks`] with their own implementation or a closure of the matching
//! shape.

use crate::dom::ElementId;
use crate::events::Event;
use crate::library::WidgetContext;
use crate::upload::{UploadRejection, validate_selection};
use imglib_types::{FileDescriptor, ImageRecord, MessageTone};
use std::rc::Rc;
use tracing::{debug, warn};

const MSG_UPLOADING: &str = "Uploading...";
const MSG_UPLOADED: &str = "The images were uploaded successfully!";

/// Remove glyph clicked on the cell with `id`
pub trait RemoveImageHook {
    fn remove_image(&self, id: &str, ctx: &WidgetContext) {
        if !ctx.grid().remove(id) {
            debug!("No cell with data-id {:?} to remove", id);
        }
    }
}

/// Search text changed; `images` are the grid's `img` elements
pub trait SearchImagesHook {
    fn search_images(&self, text: &str, images: &[ElementId], ctx: &WidgetContext) {
        ctx.grid().filter(text, images);
    }
}

/// File selection of the upload form changed
pub trait ChangeImagesHook {
    /// # Errors
    ///
    /// Returns the rejection when the selection fails validation.
    fn change_images(
        &self,
        files: &[FileDescriptor],
        ctx: &WidgetContext,
    ) -> Result<(), UploadRejection> {
        let result = validate_selection(files, ctx.config());
        if let Err(rejection) = &result {
            ctx.messenger().show(&rejection.to_string(), MessageTone::Error);
        }
        result
    }
}

/// Upload form submitted.
///
/// The built-in behavior only drives the button's busy state; moving the
/// files is up to the host.
pub trait SubmitImagesHook {
    /// # Errors
    ///
    /// Returns an error when the upload fails.
    fn submit_images(&self, event: &Event, ctx: &WidgetContext) -> anyhow::Result<()> {
        event.prevent_default();
        ctx.messenger().show(MSG_UPLOADING, MessageTone::Error);

        let button = {
            let doc = ctx.document().borrow();
            doc.get_element_by_id(&ctx.config().image_submit_button_id)
        };
        let Some(button) = button else {
            warn!(
                "Submit button #{} missing",
                ctx.config().image_submit_button_id
            );
            ctx.messenger().show(MSG_UPLOADED, MessageTone::Success);
            return Ok(());
        };

        set_busy(ctx, button, true);
        ctx.messenger().show(MSG_UPLOADED, MessageTone::Success);
        set_busy(ctx, button, false);
        Ok(())
    }
}

/// Records handed to `load_library_images`
pub trait LoadLibraryImagesHook {
    /// # Errors
    ///
    /// Returns an error when the records cannot be shown.
    fn load_library_images(&self, records: &[ImageRecord], ctx: &WidgetContext) -> anyhow::Result<()> {
        let count = ctx.grid().render(records)?;
        debug!("Rendered {} library images", count);
        Ok(())
    }
}

/// Disable the submit button and show its spinner, or the reverse
fn set_busy(ctx: &WidgetContext, button: ElementId, busy: bool) {
    let mut doc = ctx.document().borrow_mut();
    let spans = doc.query_selector_all(button, "span");
    let (Some(label), Some(spinner)) = (spans.first().copied(), spans.last().copied()) else {
        return;
    };

    if busy {
        doc.set_attribute(button, "disabled", "disabled");
        doc.set_style(label, "display", "none");
        doc.set_style(spinner, "display", "block");
    } else {
        doc.set_style(spinner, "display", "none");
        doc.set_style(label, "display", "block");
        doc.remove_attribute(button, "disabled");
    }
}

/// Every hook at its built-in behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinHooks;

impl RemoveImageHook for BuiltinHooks {}
impl SearchImagesHook for BuiltinHooks {}
impl ChangeImagesHook for BuiltinHooks {}
impl SubmitImagesHook for BuiltinHooks {}
impl LoadLibraryImagesHook for BuiltinHooks {}

impl<F> RemoveImageHook for F
where
    F: Fn(&str, &WidgetContext),
{
    fn remove_image(&self, id: &str, ctx: &WidgetContext) {
        self(id, ctx);
    }
}

impl<F> SearchImagesHook for F
where
    F: Fn(&str, &[ElementId], &WidgetContext),
{
    fn search_images(&self, text: &str, images: &[ElementId], ctx: &WidgetContext) {
        self(text, images, ctx);
    }
}

impl<F> ChangeImagesHook for F
where
    F: Fn(&[FileDescriptor], &WidgetContext) -> Result<(), UploadRejection>,
{
    fn change_images(
        &self,
        files: &[FileDescriptor],
        ctx: &WidgetContext,
    ) -> Result<(), UploadRejection> {
        self(files, ctx)
    }
}

impl<F> SubmitImagesHook for F
where
    F: Fn(&Event, &WidgetContext) -> anyhow::Result<()>,
{
    fn submit_images(&self, event: &Event, ctx: &WidgetContext) -> anyhow::Result<()> {
        self(event, ctx)
    }
}

impl<F> LoadLibraryImagesHook for F
where
    F: Fn(&[ImageRecord], &WidgetContext) -> anyhow::Result<()>,
{
    fn load_library_images(&self, records: &[ImageRecord], ctx: &WidgetContext) -> anyhow::Result<()> {
        self(records, ctx)
    }
}

/// The active implementation of every hook
#[derive(Clone)]
pub struct Hooks {
    pub(crate) remove: Rc<dyn RemoveImageHook>,
    pub(crate) search: Rc<dyn SearchImagesHook>,
    pub(crate) change: Rc<dyn ChangeImagesHook>,
    pub(crate) submit: Rc<dyn SubmitImagesHook>,
    pub(crate) load: Rc<dyn LoadLibraryImagesHook>,
}

impl Default for Hooks {
    fn default() -> Self {
        let builtin = Rc::new(BuiltinHooks);
        Self {
            remove: builtin.clone(),
            search: builtin.clone(),
            change: builtin.clone(),
            submit: builtin.clone(),
            load: builtin,
        }
    }
}

impl Hooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_remove_image(mut self, hook: impl RemoveImageHook + 'static) -> Self {
        self.remove = Rc::new(hook);
        self
    }

    #[must_use]
    pub fn on_search_images(mut self, hook: impl SearchImagesHook + 'static) -> Self {
        self.search = Rc::new(hook);
        self
    }

    #[must_use]
    pub fn on_change_images(mut self, hook: impl ChangeImagesHook + 'static) -> Self {
        self.change = Rc::new(hook);
        self
    }

    #[must_use]
    pub fn on_submit_images(mut self, hook: impl SubmitImagesHook + 'static) -> Self {
        self.submit = Rc::new(hook);
        self
    }

    #[must_use]
    pub fn on_load_library_images(mut self, hook: impl LoadLibraryImagesHook + 'static) -> Self {
        self.load = Rc::new(hook);
        self
    }
}
