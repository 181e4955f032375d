//! Tests for the image grid and its built-in hooks
//!
//! Tests the grid including:
//! - Rendering and replacing batches of records
//! - Case-insensitive search filtering
//! - Copy-to-clipboard and its status messages
//! - Remove glyphs, upload validation and the default submit flow

use super::fixtures::{files_kb, harness, harness_with, make_record, sample_records};
use crate::config::{Checks, WidgetConfig};
use crate::grid::{IMAGE_CLASS, REMOVE_CLASS};
use crate::hooks::Hooks;
use crate::{Error, ImageRecord};

#[test]
fn test_load_renders_one_cell_per_record() {
    let h = harness();

    assert!(h.library.load_library_images(&sample_records()));

    let grid = h.library.grid();
    assert_eq!(grid.cells().len(), 3);
    assert_eq!(grid.image_elements().len(), 3);
    assert_eq!(grid.visible_ids(), vec!["1", "2", "3"]);
}

#[test]
fn test_cell_structure() {
    let h = harness();
    h.library
        .load_library_images(&[make_record("1", "/a.png", Some("Dog"))]);

    let doc = h.library.document().borrow();
    let img = doc.query_selector(&format!(".{IMAGE_CLASS}")).unwrap();
    assert_eq!(doc.attribute(img, "src"), Some("/a.png"));
    assert_eq!(doc.attribute(img, "alt"), Some("Dog"));
    assert_eq!(doc.attribute(img, "loading"), Some("lazy"));

    let tagged = doc.query_selector("[data-id=\"1\"]").unwrap();
    let glyph = doc.query_selector_within(tagged, "span").unwrap();
    assert!(doc.has_class(glyph, REMOVE_CLASS));
    assert_eq!(doc.text(glyph), Some("x"));

    let cell = doc.parent(img).unwrap();
    let hidden = doc.query_selector_within(cell, "input").unwrap();
    assert_eq!(doc.attribute(hidden, "type"), Some("hidden"));
    assert_eq!(doc.value(hidden), "/a.png");
}

#[test]
fn test_missing_searchable_text_renders_empty_alt() {
    let h = harness();
    h.library
        .load_library_images(&[make_record("7", "/b.png", None)]);

    let doc = h.library.document().borrow();
    let img = doc.query_selector("img").unwrap();
    assert_eq!(doc.attribute(img, "alt"), Some(""));
}

#[test]
fn test_load_replaces_previous_batch() {
    let h = harness();
    h.library.load_library_images(&sample_records());

    h.library
        .load_library_images(&[make_record("x9", "/new.png", Some("New"))]);

    assert_eq!(h.library.grid().visible_ids(), vec!["x9"]);
}

#[test]
fn test_load_empty_batch_clears_grid() {
    let h = harness();
    h.library.load_library_images(&sample_records());

    assert!(h.library.load_library_images(&[]));

    assert!(h.library.grid().cells().is_empty());
}

#[test]
fn test_invalid_batch_keeps_current_grid() {
    let h = harness();
    h.library.load_library_images(&sample_records());

    let batch = vec![make_record("4", "/ok.png", None), make_record("5", "  ", None)];
    assert!(!h.library.load_library_images(&batch));

    assert_eq!(h.library.grid().visible_ids(), vec!["1", "2", "3"]);
    assert!(matches!(
        h.library.grid().render(&batch),
        Err(Error::InvalidRecord(_))
    ));
}

#[test]
fn test_render_without_container_errors() {
    let h = harness();
    let grid = h.library.panel().elements().grid;
    h.library.document().borrow_mut().remove(grid);

    assert!(matches!(
        h.library.grid().render(&sample_records()),
        Err(Error::ElementNotFound(_))
    ));
    assert!(!h.library.load_library_images(&sample_records()));
}

#[test]
fn test_records_from_json() {
    let h = harness();
    let records: Vec<ImageRecord> = serde_json::from_str(
        r#"[{"id": 1, "img": "/a.png", "searchable_text": "Dog"}, {"id": "b", "img": "/b.png"}]"#,
    )
    .unwrap();

    h.library.load_library_images(&records);

    assert_eq!(h.library.grid().visible_ids(), vec!["1", "b"]);
}

#[test]
fn test_search_filters_case_insensitively() {
    let h = harness();
    h.library.load_library_images(&sample_records());

    h.library.search("cat");
    assert_eq!(h.library.grid().visible_ids(), vec!["1"]);

    h.library.search("CAT");
    assert_eq!(h.library.grid().visible_ids(), vec!["1"]);

    h.library.search("dog");
    assert_eq!(h.library.grid().visible_ids(), vec!["2"]);
}

#[test]
fn test_empty_search_shows_everything() {
    let h = harness();
    h.library.load_library_images(&sample_records());

    h.library.search("park");
    h.library.search("");

    assert_eq!(h.library.grid().visible_ids(), vec!["1", "2", "3"]);
}

#[test]
fn test_search_without_match_hides_everything() {
    let h = harness();
    h.library.load_library_images(&sample_records());

    h.library.search("zebra");

    assert!(h.library.grid().visible_ids().is_empty());
    assert_eq!(h.library.grid().cells().len(), 3);
}

#[test]
fn test_search_is_idempotent() {
    let h = harness();
    h.library.load_library_images(&sample_records());

    h.library.search("a");
    let first = h.library.grid().visible_ids();
    h.library.search("a");

    assert_eq!(h.library.grid().visible_ids(), first);
    // "Cat on a mat" and "Dog in the park" contain an "a"
    assert_eq!(first, vec!["1", "2"]);
}

#[test]
fn test_click_image_copies_url() {
    let h = harness();
    h.library
        .load_library_images(&[make_record("1", "/a.png", Some("Dog"))]);
    let img = h.el("img");

    h.library.click(img);

    assert_eq!(h.clipboard.contents().as_deref(), Some("/a.png"));
    assert_eq!(h.library.message(), "Text copied successfully");
    assert_eq!(
        h.library.context().messenger().color().as_deref(),
        Some("green")
    );
}

#[test]
fn test_copy_message_clears_after_timeout() {
    let h = harness();
    h.library.load_library_images(&sample_records());

    h.library.click(h.el("img"));
    h.library.advance_time(2999);
    assert_eq!(h.library.message(), "Text copied successfully");

    h.library.advance_time(1);
    assert_eq!(h.library.message(), "");
}

#[test]
fn test_copy_failure_message() {
    let h = harness();
    h.library.load_library_images(&sample_records());
    h.clipboard.set_failing(true);

    h.library.click(h.el("img"));

    assert_eq!(h.library.message(), "Failed to Copy text");
    assert_eq!(
        h.library.context().messenger().color().as_deref(),
        Some("red")
    );
    assert!(h.clipboard.contents().is_none());
}

#[test]
fn test_newer_message_survives_older_timeout() {
    let h = harness();
    h.library.load_library_images(&sample_records());

    h.library.click(h.el("img"));
    h.library.advance_time(2000);
    h.library.click(h.el("img"));
    h.library.advance_time(1500);

    assert_eq!(h.library.message(), "Text copied successfully");

    h.library.advance_time(1500);
    assert_eq!(h.library.message(), "");
}

#[test]
fn test_click_elsewhere_does_nothing() {
    let h = harness();
    h.library.load_library_images(&sample_records());

    h.library.click(h.panel());

    assert_eq!(h.clipboard.writes(), 0);
    assert_eq!(h.library.message(), "");
    assert_eq!(h.library.grid().cells().len(), 3);
}

#[test]
fn test_remove_glyph_removes_cell() {
    let h = harness();
    h.library.load_library_images(&sample_records());
    let glyph = {
        let doc = h.library.document().borrow();
        let tagged = doc.query_selector("[data-id=\"2\"]").unwrap();
        doc.query_selector_within(tagged, &format!(".{REMOVE_CLASS}"))
            .unwrap()
    };

    h.library.click(glyph);

    assert_eq!(h.library.grid().visible_ids(), vec!["1", "3"]);
    assert!(!h.library.document().borrow().exists(glyph));
    assert_eq!(h.clipboard.writes(), 0);
}

#[test]
fn test_remove_id_with_quotes() {
    let h = harness();
    let records = vec![
        make_record("a\"b", "/img/quoted.png", None),
        make_record("plain", "/img/plain.png", None),
    ];
    h.library.load_library_images(&records);

    assert!(h.library.grid().remove("a\"b"));
    assert_eq!(h.library.grid().visible_ids(), vec!["plain"]);
}

#[test]
fn test_remove_unknown_id_is_noop() {
    let h = harness();
    h.library.load_library_images(&sample_records());

    assert!(!h.library.grid().remove("42"));
    assert_eq!(h.library.grid().cells().len(), 3);
}

#[test]
fn test_selection_too_large() {
    let h = harness();

    h.library
        .select_files(files_kb(&["small.png", "150KB.png"], 150));

    assert_eq!(
        h.library.message(),
        "File \"small.png\" exceeds the allowed size 100 KB."
    );
    assert_eq!(
        h.library.context().messenger().color().as_deref(),
        Some("red")
    );
}

#[test]
fn test_selection_too_many_files() {
    let config = WidgetConfig {
        max_files: 2,
        ..WidgetConfig::default()
    };
    let h = harness_with(config, Hooks::default());

    h.library
        .select_files(files_kb(&["a.png", "b.png", "c.png"], 1));

    assert_eq!(
        h.library.message(),
        "You can only upload up to 2 files at a time."
    );
}

#[test]
fn test_selection_bad_extension() {
    let h = harness();

    h.library.select_files(files_kb(&["a.png", "b.gif"], 1));

    assert_eq!(
        h.library.message(),
        "You are trying to upload some invalid files!"
    );
}

#[test]
fn test_valid_selection_shows_nothing() {
    let h = harness();

    h.library.select_files(files_kb(&["a.PNG", "b.jpeg"], 50));

    assert_eq!(h.library.message(), "");
    assert_eq!(h.library.context().selected_files().len(), 2);
}

#[test]
fn test_disabled_checks_let_everything_through() {
    let config = WidgetConfig {
        checks: Checks {
            max_file_size_check: false,
            max_files_check: false,
            allowed_extensions_check: false,
        },
        max_files: 1,
        ..WidgetConfig::default()
    };
    let h = harness_with(config, Hooks::default());

    h.library
        .select_files(files_kb(&["a.exe", "b.gif"], 5000));

    assert_eq!(h.library.message(), "");
}

#[test]
fn test_default_submit_flow() {
    let h = harness();
    let button = h.library.panel().elements().submit_button;

    assert!(h.library.submit());

    assert_eq!(
        h.library.message(),
        "The images were uploaded successfully!"
    );
    assert_eq!(
        h.library.context().messenger().color().as_deref(),
        Some("green")
    );
    let doc = h.library.document().borrow();
    let spans = doc.children(button);
    assert!(doc.attribute(button, "disabled").is_none());
    assert_eq!(doc.style(spans[0], "display"), Some("block"));
    assert_eq!(doc.style(spans[1], "display"), Some("none"));
}

#[test]
fn test_submit_message_clears() {
    let h = harness();

    h.library.submit();
    h.library.advance_time(3000);

    assert_eq!(h.library.message(), "");
}
