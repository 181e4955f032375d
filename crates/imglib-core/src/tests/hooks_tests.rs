//! Tests for replacing built-in behaviors with host hooks

use super::fixtures::{Harness, files_kb, harness_with, make_record, sample_records};
use crate::WidgetContext;
use crate::config::WidgetConfig;
use crate::dom::ElementId;
use crate::events::Event;
use crate::hooks::{ChangeImagesHook, Hooks, RemoveImageHook};
use crate::upload::{UploadRejection, validate_selection};
use imglib_types::{FileDescriptor, ImageRecord, MessageTone};
use std::cell::RefCell;
use std::rc::Rc;

fn glyph_for(h: &Harness, id: &str) -> ElementId {
    let doc = h.library.document().borrow();
    let tagged = doc
        .query_selector(&format!("[data-id=\"{id}\"]"))
        .unwrap();
    doc.children(tagged)[0]
}

#[test]
fn test_remove_hook_closure_replaces_default() {
    let removed = Rc::new(RefCell::new(Vec::new()));
    let log = removed.clone();
    let hooks = Hooks::new().on_remove_image(move |id: &str, _ctx: &WidgetContext| {
        log.borrow_mut().push(id.to_string());
    });
    let h = harness_with(WidgetConfig::default(), hooks);
    h.library.load_library_images(&sample_records());

    h.library.click(glyph_for(&h, "2"));

    assert_eq!(*removed.borrow(), vec!["2"]);
    // The cell stays until the host removes it
    assert_eq!(h.library.grid().visible_ids(), vec!["1", "2", "3"]);
}

struct ConfirmedRemove {
    confirmed: bool,
}

impl RemoveImageHook for ConfirmedRemove {
    fn remove_image(&self, id: &str, ctx: &WidgetContext) {
        if self.confirmed {
            ctx.grid().remove(id);
            ctx.show_message("Image removed", MessageTone::Info);
        }
    }
}

#[test]
fn test_remove_hook_struct() {
    let h = harness_with(
        WidgetConfig::default(),
        Hooks::new().on_remove_image(ConfirmedRemove { confirmed: true }),
    );
    h.library.load_library_images(&sample_records());

    h.library.click(glyph_for(&h, "1"));

    assert_eq!(h.library.grid().visible_ids(), vec!["2", "3"]);
    assert_eq!(h.library.message(), "Image removed");
    assert_eq!(
        h.library.context().messenger().color().as_deref(),
        Some("inherit")
    );
}

#[test]
fn test_declined_remove_keeps_cell() {
    let h = harness_with(
        WidgetConfig::default(),
        Hooks::new().on_remove_image(ConfirmedRemove { confirmed: false }),
    );
    h.library.load_library_images(&sample_records());

    h.library.click(glyph_for(&h, "1"));

    assert_eq!(h.library.grid().cells().len(), 3);
}

#[test]
fn test_search_hook_receives_text_and_images() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    let hooks = Hooks::new().on_search_images(
        move |text: &str, images: &[ElementId], _ctx: &WidgetContext| {
            log.borrow_mut().push((text.to_string(), images.len()));
        },
    );
    let h = harness_with(WidgetConfig::default(), hooks);
    h.library.load_library_images(&sample_records());

    h.library.search("dog");

    assert_eq!(*seen.borrow(), vec![("dog".to_string(), 3)]);
    // Nothing was filtered
    assert_eq!(h.library.grid().visible_ids(), vec!["1", "2", "3"]);
}

#[test]
fn test_search_hook_can_match_on_url() {
    let hooks = Hooks::new().on_search_images(
        |text: &str, images: &[ElementId], ctx: &WidgetContext| {
            let mut doc = ctx.document().borrow_mut();
            for img in images {
                let src = doc.attribute(*img, "src").unwrap_or_default().to_string();
                if let Some(cell) = doc.parent(*img) {
                    let display = if src.contains(text) { "block" } else { "none" };
                    doc.set_style(cell, "display", display);
                }
            }
        },
    );
    let h = harness_with(WidgetConfig::default(), hooks);
    h.library.load_library_images(&sample_records());

    h.library.search(".webp");

    assert_eq!(h.library.grid().visible_ids(), vec!["3"]);
}

#[test]
fn test_change_hook_closure() {
    let hooks = Hooks::new().on_change_images(
        |files: &[FileDescriptor], ctx: &WidgetContext| -> Result<(), UploadRejection> {
            ctx.show_message(&format!("{} files picked", files.len()), MessageTone::Info);
            Ok(())
        },
    );
    let h = harness_with(WidgetConfig::default(), hooks);

    // Would fail the built-in extension check
    h.library.select_files(files_kb(&["a.gif", "b.bmp"], 1));

    assert_eq!(h.library.message(), "2 files picked");
}

struct StricterChange {
    max_total_kb: u64,
}

impl ChangeImagesHook for StricterChange {
    fn change_images(
        &self,
        files: &[FileDescriptor],
        ctx: &WidgetContext,
    ) -> Result<(), UploadRejection> {
        validate_selection(files, ctx.config())?;
        let total: u64 = files.iter().map(|f| f.size_bytes).sum();
        if total > self.max_total_kb * 1024 {
            ctx.show_message("Selection too large", MessageTone::Error);
        }
        Ok(())
    }
}

#[test]
fn test_change_hook_struct_can_reuse_validation() {
    let hooks = Hooks::new().on_change_images(StricterChange { max_total_kb: 100 });
    let h = harness_with(WidgetConfig::default(), hooks);

    h.library.select_files(files_kb(&["a.png", "b.png", "c.png"], 50));

    assert_eq!(h.library.message(), "Selection too large");
}

#[test]
fn test_submit_hook_closure() {
    let submitted = Rc::new(RefCell::new(Vec::new()));
    let log = submitted.clone();
    let hooks = Hooks::new().on_submit_images(
        move |event: &Event, ctx: &WidgetContext| -> anyhow::Result<()> {
            event.prevent_default();
            log.borrow_mut().extend(ctx.selected_files());
            ctx.show_message("Sent", MessageTone::Success);
            Ok(())
        },
    );
    let h = harness_with(WidgetConfig::default(), hooks);
    h.library.select_files(files_kb(&["a.png"], 1));

    assert!(h.library.submit());

    assert_eq!(submitted.borrow().len(), 1);
    assert_eq!(submitted.borrow()[0].name, "a.png");
    assert_eq!(h.library.message(), "Sent");
}

#[test]
fn test_submit_hook_may_leave_default_action() {
    let hooks = Hooks::new().on_submit_images(
        |_event: &Event, _ctx: &WidgetContext| -> anyhow::Result<()> { Ok(()) },
    );
    let h = harness_with(WidgetConfig::default(), hooks);

    assert!(!h.library.submit());
}

#[test]
fn test_failing_submit_hook_is_contained() {
    let hooks = Hooks::new().on_submit_images(
        |event: &Event, ctx: &WidgetContext| -> anyhow::Result<()> {
            event.prevent_default();
            ctx.show_message("Upload failed", MessageTone::Error);
            anyhow::bail!("server returned 500")
        },
    );
    let h = harness_with(WidgetConfig::default(), hooks);

    assert!(h.library.submit());
    assert_eq!(h.library.message(), "Upload failed");
}

#[test]
fn test_load_hook_closure() {
    let hooks = Hooks::new().on_load_library_images(
        |records: &[ImageRecord], ctx: &WidgetContext| -> anyhow::Result<()> {
            let newest_first: Vec<ImageRecord> = records.iter().rev().cloned().collect();
            ctx.grid().render(&newest_first)?;
            Ok(())
        },
    );
    let h = harness_with(WidgetConfig::default(), hooks);

    assert!(h.library.load_library_images(&sample_records()));

    assert_eq!(h.library.grid().visible_ids(), vec!["3", "2", "1"]);
}

#[test]
fn test_failing_load_hook_reports_false() {
    let hooks = Hooks::new().on_load_library_images(
        |_records: &[ImageRecord], _ctx: &WidgetContext| -> anyhow::Result<()> {
            anyhow::bail!("backend unavailable")
        },
    );
    let h = harness_with(WidgetConfig::default(), hooks);

    assert!(!h.library.load_library_images(&[make_record("1", "/a.png", None)]));
    assert!(h.library.grid().cells().is_empty());
}

#[test]
fn test_hooks_are_independent() {
    let hooks = Hooks::new()
        .on_remove_image(|_id: &str, _ctx: &WidgetContext| {})
        .on_search_images(|_text: &str, _images: &[ElementId], _ctx: &WidgetContext| {});
    let h = harness_with(WidgetConfig::default(), hooks);
    h.library.load_library_images(&sample_records());

    // Built-in copy and change behaviors still apply
    h.library.click(h.el("img"));
    assert_eq!(h.clipboard.contents().as_deref(), Some("/img/cat.png"));

    h.library.select_files(files_kb(&["x.gif"], 1));
    assert_eq!(
        h.library.message(),
        "You are trying to upload some invalid files!"
    );
}
