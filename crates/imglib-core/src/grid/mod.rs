//! Image grid of the panel.
//!
//! [`ImageGrid`] owns the cells inside the grid container: rendering a batch
//! of records, filtering and removing cells. [`ImageGridController`] wires
//! user input in the panel to the hooks that drive those operations.

mod controller;

pub use controller::ImageGridController;

use crate::dom::{Document, ElementId, SharedDocument};
use crate::{Error, Result};
use imglib_types::ImageRecord;
use tracing::info;

/// Class of the clickable image in a cell
pub const IMAGE_CLASS: &str = "image_target";

/// Class of the remove glyph in a cell
pub const REMOVE_CLASS: &str = "remove_image_target";

const THUMBNAIL_SIZE: &str = "78px";

#[derive(Clone)]
pub struct ImageGrid {
    doc: SharedDocument,
    container_id: String,
}

impl ImageGrid {
    pub fn new(doc: SharedDocument, container_id: impl Into<String>) -> Self {
        Self {
            doc,
            container_id: container_id.into(),
        }
    }

    #[must_use]
    pub fn container(&self) -> Option<ElementId> {
        self.doc.borrow().get_element_by_id(&self.container_id)
    }

    /// Replace every cell with one per record, in order.
    ///
    /// The batch is checked before anything is cleared, so a rejected batch
    /// leaves the current cells in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid container is missing or a record has an
    /// empty image URL.
    pub fn render(&self, records: &[ImageRecord]) -> Result<usize> {
        let container = self
            .container()
            .ok_or_else(|| Error::ElementNotFound(format!("#{}", self.container_id)))?;

        if let Some(bad) = records.iter().find(|r| r.img.trim().is_empty()) {
            return Err(Error::InvalidRecord(format!("empty image url for id {}", bad.id)));
        }

        let mut doc = self.doc.borrow_mut();
        doc.clear_children(container);
        for record in records {
            let cell = create_cell(&mut doc, record);
            doc.append_child(container, cell);
        }

        info!("Rendered {} images into #{}", records.len(), self.container_id);
        Ok(records.len())
    }

    /// Cells currently in the grid
    #[must_use]
    pub fn cells(&self) -> Vec<ElementId> {
        self.container()
            .map(|container| self.doc.borrow().children(container))
            .unwrap_or_default()
    }

    /// Every `img` element inside the grid container
    #[must_use]
    pub fn image_elements(&self) -> Vec<ElementId> {
        let Some(container) = self.container() else {
            return Vec::new();
        };
        self.doc.borrow().query_selector_all(container, "img")
    }

    /// Show the cells whose image alt text contains `text`, ignoring case;
    /// hide the rest. Returns how many are shown.
    pub fn filter(&self, text: &str, images: &[ElementId]) -> usize {
        let needle = text.to_lowercase();
        let mut doc = self.doc.borrow_mut();
        let mut shown = 0;

        for img in images {
            let Some(cell) = doc.parent(*img) else {
                continue;
            };
            let alt = doc.attribute(*img, "alt").unwrap_or_default().to_lowercase();
            let is_match = alt.contains(&needle);
            doc.set_style(cell, "display", if is_match { "block" } else { "none" });
            shown += usize::from(is_match);
        }

        shown
    }

    /// Remove the cell whose remove glyph carries `data-id="<id>"`
    pub fn remove(&self, id: &str) -> bool {
        let cells = self.cells();
        let mut doc = self.doc.borrow_mut();
        let found = cells.into_iter().find(|cell| {
            doc.children(*cell)
                .iter()
                .any(|child| doc.attribute(*child, "data-id") == Some(id))
        });
        let Some(cell) = found else {
            return false;
        };
        doc.remove(cell);
        true
    }

    /// URL kept in the hidden input next to an image
    #[must_use]
    pub fn url_for_image(&self, img: ElementId) -> Option<String> {
        let doc = self.doc.borrow();
        let cell = doc.parent(img)?;
        let input = doc.query_selector_within(cell, "input")?;
        Some(doc.value(input).to_string())
    }

    /// Record id of the cell a remove glyph belongs to
    #[must_use]
    pub fn id_for_remove_glyph(&self, glyph: ElementId) -> Option<String> {
        let doc = self.doc.borrow();
        let tagged = doc.parent(glyph)?;
        doc.attribute(tagged, "data-id").map(String::from)
    }

    /// Ids of the cells not hidden by a search, in grid order
    #[must_use]
    pub fn visible_ids(&self) -> Vec<String> {
        let doc = self.doc.borrow();
        self.cells()
            .into_iter()
            .filter(|cell| doc.is_displayed(*cell))
            .filter_map(|cell| {
                let tagged = doc.query_selector_within(cell, "[data-id]")?;
                doc.attribute(tagged, "data-id").map(String::from)
            })
            .collect()
    }
}

/// Build one grid cell: image, remove glyph and hidden URL input
fn create_cell(doc: &mut Document, record: &ImageRecord) -> ElementId {
    let remove = doc.create_element("div");
    doc.set_attribute(remove, "data-id", record.id.as_str());
    doc.set_styles(
        remove,
        &[
            ("background", "red"),
            ("border-radius", "50%"),
            ("font-size", "12px"),
            ("padding", "0px 5px"),
            ("color", "white"),
            ("position", "absolute"),
            ("top", "-5px"),
            ("right", "-5px"),
            ("cursor", "pointer"),
        ],
    );
    let glyph = doc.create_element("span");
    doc.add_class(glyph, REMOVE_CLASS);
    doc.set_text(glyph, "x");
    doc.append_child(remove, glyph);

    let img = doc.create_element("img");
    doc.set_attribute(img, "src", &record.img);
    doc.set_attribute(img, "alt", record.alt_text());
    doc.set_attribute(img, "loading", "lazy");
    doc.set_attribute(img, "width", THUMBNAIL_SIZE);
    doc.set_attribute(img, "height", THUMBNAIL_SIZE);
    doc.set_styles(
        img,
        &[
            ("width", "100%"),
            ("height", "100%"),
            ("object-fit", "cover"),
            ("cursor", "pointer"),
        ],
    );
    doc.add_class(img, IMAGE_CLASS);

    let input = doc.create_element("input");
    doc.set_attribute(input, "type", "hidden");
    doc.set_value(input, &record.img);
    doc.set_style(input, "display", "none");

    let cell = doc.create_element("div");
    doc.set_styles(
        cell,
        &[
            ("position", "relative"),
            ("margin", "5px"),
            ("width", "80px"),
            ("height", "80px"),
            ("border", "1px solid"),
        ],
    );
    doc.append_child(cell, img);
    doc.append_child(cell, remove);
    doc.append_child(cell, input);
    cell
}
