//! Compound selectors: `tag`, `#id`, `.class`, `[attr]` and `[attr="value"]`,
//! in any combination, with no combinators.

use super::Element;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Split a leading identifier off `input`
fn take_ident(input: &str) -> Option<(&str, &str)> {
    let end = input
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map_or(input.len(), |(i, _)| i);
    if end == 0 {
        return None;
    }
    Some(input.split_at(end))
}

fn parse_attribute(body: &str) -> Option<(String, Option<String>)> {
    let Some((name, value)) = body.split_once('=') else {
        let (name, rest) = take_ident(body.trim())?;
        return rest.is_empty().then(|| (name.to_string(), None));
    };

    let (name, rest) = take_ident(name.trim())?;
    if !rest.is_empty() {
        return None;
    }

    let value = value.trim();
    let unquoted = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);
    Some((name.to_string(), Some(unquoted.to_string())))
}

impl Selector {
    /// Parse a compound selector; `None` for anything outside the supported
    /// grammar
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let mut rest = input.trim();
        if rest.is_empty() {
            return None;
        }

        let mut selector = Self::default();
        if let Some((tag, tail)) = take_ident(rest) {
            selector.tag = Some(tag.to_ascii_lowercase());
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('*') {
            rest = tail;
        }

        while let Some(c) = rest.chars().next() {
            match c {
                '#' => {
                    let (id, tail) = take_ident(&rest[1..])?;
                    selector.id = Some(id.to_string());
                    rest = tail;
                }
                '.' => {
                    let (class, tail) = take_ident(&rest[1..])?;
                    selector.classes.push(class.to_string());
                    rest = tail;
                }
                '[' => {
                    let close = rest.find(']')?;
                    selector.attributes.push(parse_attribute(&rest[1..close])?);
                    rest = &rest[close + 1..];
                }
                _ => return None,
            }
        }

        Some(selector)
    }

    #[must_use]
    pub fn matches(&self, element: &Element) -> bool {
        if self.tag.as_deref().is_some_and(|tag| tag != element.tag()) {
            return false;
        }
        if self
            .id
            .as_deref()
            .is_some_and(|id| element.attribute("id") != Some(id))
        {
            return false;
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attributes
            .iter()
            .all(|(name, expected)| match (element.attribute(name), expected) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            })
    }
}
