use crate::dom::SharedDocument;
use crate::timers::Timers;
use imglib_types::MessageTone;
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, warn};

/// Transient status line of the upload form.
///
/// Each message clears itself after the configured timeout. A newer message
/// restarts the countdown instead of being wiped by an older timeout.
#[derive(Clone)]
pub struct Messenger {
    doc: SharedDocument,
    timers: Rc<Timers>,
    field_id: String,
    timeout_ms: u64,
    generation: Rc<Cell<u64>>,
}

impl Messenger {
    #[must_use]
    pub fn new(
        doc: SharedDocument,
        timers: Rc<Timers>,
        field_id: impl Into<String>,
        timeout_ms: u64,
    ) -> Self {
        Self {
            doc,
            timers,
            field_id: field_id.into(),
            timeout_ms,
            generation: Rc::new(Cell::new(0)),
        }
    }

    pub fn show(&self, text: &str, tone: MessageTone) {
        {
            let mut doc = self.doc.borrow_mut();
            let Some(field) = doc.get_element_by_id(&self.field_id) else {
                warn!("Message field #{} missing, dropping {:?}", self.field_id, text);
                return;
            };
            doc.set_style(field, "color", tone.color());
            doc.set_text(field, text);
        }
        debug!("Message ({:?}): {}", tone, text);

        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let doc = self.doc.clone();
        let field_id = self.field_id.clone();
        let current = self.generation.clone();
        self.timers.set_timeout(self.timeout_ms, move || {
            if current.get() != generation {
                return;
            }
            let mut doc = doc.borrow_mut();
            if let Some(field) = doc.get_element_by_id(&field_id) {
                doc.set_text(field, "");
            }
        });
    }

    pub fn success(&self, text: &str) {
        self.show(text, MessageTone::Success);
    }

    pub fn error(&self, text: &str) {
        self.show(text, MessageTone::Error);
    }

    /// Text currently shown, `""` when cleared or missing
    #[must_use]
    pub fn text(&self) -> String {
        let doc = self.doc.borrow();
        doc.get_element_by_id(&self.field_id)
            .and_then(|field| doc.text(field))
            .unwrap_or_default()
            .to_string()
    }

    /// Color currently applied to the field
    #[must_use]
    pub fn color(&self) -> Option<String> {
        let doc = self.doc.borrow();
        doc.get_element_by_id(&self.field_id)
            .and_then(|field| doc.style(field, "color"))
            .map(String::from)
    }
}
