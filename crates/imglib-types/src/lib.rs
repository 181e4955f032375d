//! Shared types for the imglib image library panel.
//!
//! This crate provides the plain data used across imglib-core and
//! imglib-cli: persisted geometry records, image records handed in by the
//! host, resize edges and the interaction token shared by the drag and resize
//! controllers. Everything that crosses a persistence or host boundary is
//! serializable.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// CSS keyword used for an unset inset.
pub const AUTO: &str = "auto";

/// Identifier of an image as supplied by the host.
///
/// Hosts send either JSON numbers or strings; both are kept in the textual
/// form that ends up in the cell's `data-id` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for ImageId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ImageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Float(f64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Self(n.to_string()),
            RawId::Float(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// An image entry shown in the library grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: ImageId,

    /// Image URL, copied to the clipboard when the cell is clicked
    pub img: String,

    /// Text matched by the search field; rendered as the image's alt text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable_text: Option<String>,
}

impl ImageRecord {
    pub fn new(id: impl Into<ImageId>, img: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            img: img.into(),
            searchable_text: None,
        }
    }

    #[must_use]
    pub fn with_searchable_text(mut self, text: impl Into<String>) -> Self {
        self.searchable_text = Some(text.into());
        self
    }

    /// Alt text for the rendered image (empty when no searchable text)
    #[must_use]
    pub fn alt_text(&self) -> &str {
        self.searchable_text.as_deref().unwrap_or("")
    }
}

/// Persisted position of a floating element.
///
/// Each inset is a CSS length string or `"auto"`. Missing insets fall back
/// to the element's default independently of the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
}

impl PositionRecord {
    /// Fully specified position
    pub fn new(
        top: impl Into<String>,
        right: impl Into<String>,
        bottom: impl Into<String>,
        left: impl Into<String>,
    ) -> Self {
        Self {
            left: Some(left.into()),
            top: Some(top.into()),
            right: Some(right.into()),
            bottom: Some(bottom.into()),
        }
    }

    /// Position pinned by left/top only; right and bottom become `auto`
    pub fn anchored(left: impl Into<String>, top: impl Into<String>) -> Self {
        Self {
            left: Some(left.into()),
            top: Some(top.into()),
            right: Some(AUTO.to_string()),
            bottom: Some(AUTO.to_string()),
        }
    }

    /// Fill every missing inset from `defaults`
    #[must_use]
    pub fn or_defaults(self, defaults: &PositionRecord) -> Self {
        Self {
            left: self.left.or_else(|| defaults.left.clone()),
            top: self.top.or_else(|| defaults.top.clone()),
            right: self.right.or_else(|| defaults.right.clone()),
            bottom: self.bottom.or_else(|| defaults.bottom.clone()),
        }
    }
}

/// Persisted size of the panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

impl SizeRecord {
    pub fn new(width: impl Into<String>, height: impl Into<String>) -> Self {
        Self {
            width: Some(width.into()),
            height: Some(height.into()),
        }
    }

    #[must_use]
    pub fn or_defaults(self, defaults: &SizeRecord) -> Self {
        Self {
            width: self.width.or_else(|| defaults.width.clone()),
            height: self.height.or_else(|| defaults.height.clone()),
        }
    }
}

/// Edge (or corner) of the panel a resize handle sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Edge {
    /// The four straight edges that get a handle on the panel
    pub const STRAIGHT: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Name used in the handle's class list
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    /// CSS cursor shown while hovering or dragging the handle
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Top => "n-resize",
            Self::Bottom => "s-resize",
            Self::Left => "w-resize",
            Self::Right => "e-resize",
            Self::TopLeft => "nw-resize",
            Self::TopRight => "ne-resize",
            Self::BottomLeft => "sw-resize",
            Self::BottomRight => "se-resize",
        }
    }

    /// Vertical component, if any
    #[must_use]
    pub fn vertical(self) -> Option<Edge> {
        match self {
            Self::Top | Self::TopLeft | Self::TopRight => Some(Self::Top),
            Self::Bottom | Self::BottomLeft | Self::BottomRight => Some(Self::Bottom),
            Self::Left | Self::Right => None,
        }
    }

    /// Horizontal component, if any
    #[must_use]
    pub fn horizontal(self) -> Option<Edge> {
        match self {
            Self::Left | Self::TopLeft | Self::BottomLeft => Some(Self::Left),
            Self::Right | Self::TopRight | Self::BottomRight => Some(Self::Right),
            Self::Top | Self::Bottom => None,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Edge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-right" => Ok(Self::BottomRight),
            other => Err(format!("unknown edge: {other}")),
        }
    }
}

/// Pointer interaction currently owning a floating element.
///
/// One token exists per floating element and is consulted by both its drag
/// and resize controllers, so at most one of them is live per gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Pointer offset from the element origin captured at press time
    Dragging { offset_x: f64, offset_y: f64 },
    Resizing(Edge),
}

impl InteractionState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    #[must_use]
    pub fn is_resizing(&self) -> bool {
        matches!(self, Self::Resizing(_))
    }

    #[must_use]
    pub fn resize_edge(&self) -> Option<Edge> {
        match self {
            Self::Resizing(edge) => Some(*edge),
            _ => None,
        }
    }
}

/// A file picked in the upload form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    pub size_bytes: u64,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }

    /// Lowercased text after the last dot; the whole name when there is none
    #[must_use]
    pub fn extension(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

/// Tone of a transient status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageTone {
    Success,
    Error,
    #[default]
    Info,
}

impl MessageTone {
    /// CSS color applied to the message field
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Success => "green",
            Self::Error => "red",
            Self::Info => "inherit",
        }
    }
}
