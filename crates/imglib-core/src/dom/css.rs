//! CSS lengths and boxes as the headless surface understands them.

use serde::{Deserialize, Serialize};

/// Root font size used to resolve `rem`
pub const REM_PX: f64 = 16.0;

/// Size of the visible area fixed elements are positioned against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Which viewport extent a percentage refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A parsed CSS length
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssLength {
    Px(f64),
    Vh(f64),
    Vw(f64),
    Percent(f64),
    Rem(f64),
    Auto,
}

impl CssLength {
    /// Parse `12px`, `90vh`, `50vw`, `25%`, `1.5rem`, `0` or `auto`
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Some(Self::Auto);
        }

        let (number, build): (&str, fn(f64) -> Self) = if let Some(n) = s.strip_suffix("px") {
            (n, Self::Px)
        } else if let Some(n) = s.strip_suffix("vh") {
            (n, Self::Vh)
        } else if let Some(n) = s.strip_suffix("vw") {
            (n, Self::Vw)
        } else if let Some(n) = s.strip_suffix("rem") {
            (n, Self::Rem)
        } else if let Some(n) = s.strip_suffix('%') {
            (n, Self::Percent)
        } else {
            (s, Self::Px)
        };

        let value: f64 = number.trim().parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        // Unitless lengths are only valid for zero
        if number.len() == s.len() && value != 0.0 {
            return None;
        }
        Some(build(value))
    }

    /// Resolve to pixels; `None` for `auto`
    #[must_use]
    pub fn resolve(self, axis: Axis, viewport: Viewport) -> Option<f64> {
        match self {
            Self::Px(v) => Some(v),
            Self::Vh(v) => Some(v * viewport.height / 100.0),
            Self::Vw(v) => Some(v * viewport.width / 100.0),
            Self::Rem(v) => Some(v * REM_PX),
            Self::Percent(v) => Some(
                v * match axis {
                    Axis::Horizontal => viewport.width,
                    Axis::Vertical => viewport.height,
                } / 100.0,
            ),
            Self::Auto => None,
        }
    }
}

/// Format a pixel length the way inline styles are written (`10px`, `10.5px`)
#[must_use]
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// Border box of an element in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }
}
