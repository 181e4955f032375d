use super::{Document, ElementId};
use std::fmt::Write;

const VOID_ELEMENTS: &[&str] = &["img", "input", "br", "hr", "meta", "link"];

fn escape(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

pub(super) fn serialize(doc: &Document, id: ElementId) -> String {
    let mut out = String::new();
    write_element(doc, id, &mut out);
    out
}

fn write_element(doc: &Document, id: ElementId, out: &mut String) {
    let Some(el) = doc.element(id) else {
        return;
    };

    out.push('<');
    out.push_str(el.tag());
    for (name, value) in el.attributes() {
        let _ = write!(out, " {name}=\"");
        escape(value, out);
        out.push('"');
    }
    if !el.classes().is_empty() {
        out.push_str(" class=\"");
        escape(&el.classes().join(" "), out);
        out.push('"');
    }
    if !el.styles().is_empty() {
        let style = el
            .styles()
            .iter()
            .map(|(property, value)| format!("{property}: {value};"))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(" style=\"");
        escape(&style, out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&el.tag()) {
        return;
    }

    if let Some(text) = el.text() {
        escape(text, out);
    }
    for child in el.children() {
        write_element(doc, *child, out);
    }
    let _ = write!(out, "</{}>", el.tag());
}
