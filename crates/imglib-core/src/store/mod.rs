//! Persistent key-value storage for panel and button geometry.
//!
//! The widget only needs cookie semantics: a flat namespace of string keys,
//! raw string values and a per-entry expiry. [`PersistenceSurface`] is that
//! contract; [`CookieJar`] and [`FileCookieJar`] implement it, and
//! [`GeometryStore`] layers the typed position/size records on top.

mod cookie_jar;
mod geometry;

pub use cookie_jar::{CookieJar, FileCookieJar};
pub use geometry::GeometryStore;

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;

/// Key of the panel's saved position
pub const POSITION_KEY: &str = "libraryContainerPosition";

/// Key of the panel's saved size
pub const SIZE_KEY: &str = "libraryContainerResize";

/// Key of the toggle button's saved position
pub const BUTTON_POSITION_KEY: &str = "libraryFloatingButtonPosition";

/// Default lifetime of a saved geometry record
pub const GEOMETRY_EXPIRY_DAYS: u32 = 365;

/// Key-value store with per-entry expiry.
///
/// Neither operation fails: a missing or expired entry reads as `""`, and a
/// write that cannot be persisted is logged and dropped.
pub trait PersistenceSurface {
    fn get(&self, name: &str) -> String;

    fn set(&self, name: &str, value: &str, expiry_days: u32);
}

/// Time source for expiry decisions
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance_days(&self, days: i64) {
        self.now.set(self.now.get() + Duration::days(days));
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
