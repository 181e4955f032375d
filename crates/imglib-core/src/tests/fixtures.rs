//! Test fixtures and helpers

use crate::clipboard::MemoryClipboard;
use crate::config::WidgetConfig;
use crate::dom::{Document, ElementId, Viewport};
use crate::hooks::Hooks;
use crate::store::CookieJar;
use crate::{ImageLibrary, Surfaces};
use imglib_types::{Edge, FileDescriptor, ImageRecord};
use std::rc::Rc;

/// Viewport every widget test runs in
pub const VIEWPORT: Viewport = Viewport {
    width: 1000.0,
    height: 800.0,
};

/// A widget with handles on its collaborators
pub struct Harness {
    pub library: ImageLibrary,
    pub jar: Rc<CookieJar>,
    pub clipboard: Rc<MemoryClipboard>,
}

impl Harness {
    /// Element matching `selector`; panics when absent
    pub fn el(&self, selector: &str) -> ElementId {
        self.library
            .find(selector)
            .unwrap_or_else(|| panic!("no element matches {selector}"))
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<String> {
        self.library
            .document()
            .borrow()
            .style(id, property)
            .map(String::from)
    }

    pub fn panel(&self) -> ElementId {
        self.library.panel().elements().panel
    }

    pub fn button(&self) -> ElementId {
        self.library.panel().elements().toggle_button
    }

    pub fn handle(&self, edge: Edge) -> ElementId {
        self.library
            .panel()
            .panel_resize()
            .handle(edge)
            .unwrap_or_else(|| panic!("no {edge} handle"))
    }

    /// Press, move through `points`, release at the last point
    pub fn gesture(&self, target: ElementId, from: (f64, f64), points: &[(f64, f64)]) {
        self.library.press(target, from.0, from.1);
        for (x, y) in points {
            self.library.move_pointer(*x, *y);
        }
        let end = points.last().copied().unwrap_or(from);
        self.library.release(end.0, end.1);
    }
}

pub fn harness() -> Harness {
    harness_with(WidgetConfig::default(), Hooks::default())
}

pub fn harness_with(config: WidgetConfig, hooks: Hooks) -> Harness {
    harness_with_jar(Rc::new(CookieJar::new()), config, hooks)
}

pub fn harness_with_jar(jar: Rc<CookieJar>, config: WidgetConfig, hooks: Hooks) -> Harness {
    let clipboard = Rc::new(MemoryClipboard::new());
    let surfaces = Surfaces {
        document: Document::shared(VIEWPORT),
        persistence: jar.clone(),
        clipboard: clipboard.clone(),
    };
    Harness {
        library: ImageLibrary::new(config, hooks, surfaces),
        jar,
        clipboard,
    }
}

pub fn make_record(id: &str, img: &str, text: Option<&str>) -> ImageRecord {
    let record = ImageRecord::new(id, img);
    match text {
        Some(text) => record.with_searchable_text(text),
        None => record,
    }
}

pub fn sample_records() -> Vec<ImageRecord> {
    vec![
        make_record("1", "/img/cat.png", Some("Cat on a mat")),
        make_record("2", "/img/dog.jpg", Some("Dog in the park")),
        make_record("3", "/img/untitled.webp", None),
    ]
}

pub fn files_kb(names: &[&str], size_kb: u64) -> Vec<FileDescriptor> {
    names
        .iter()
        .map(|name| FileDescriptor::new(*name, size_kb * 1024))
        .collect()
}
