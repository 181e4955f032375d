use super::{GEOMETRY_EXPIRY_DAYS, PersistenceSurface};
use imglib_types::{PositionRecord, SizeRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::rc::Rc;
use tracing::{error, warn};

/// Typed access to saved geometry records.
///
/// Records are stored as JSON strings. Anything that does not parse is
/// treated as absent so the caller falls back to its default geometry.
#[derive(Clone)]
pub struct GeometryStore {
    surface: Rc<dyn PersistenceSurface>,
    expiry_days: u32,
}

impl GeometryStore {
    pub fn new(surface: Rc<dyn PersistenceSurface>) -> Self {
        Self {
            surface,
            expiry_days: GEOMETRY_EXPIRY_DAYS,
        }
    }

    #[must_use]
    pub fn with_expiry_days(mut self, days: u32) -> Self {
        self.expiry_days = days;
        self
    }

    #[must_use]
    pub fn load_position(&self, key: &str) -> Option<PositionRecord> {
        self.load(key)
    }

    #[must_use]
    pub fn load_size(&self, key: &str) -> Option<SizeRecord> {
        self.load(key)
    }

    pub fn save_position(&self, key: &str, position: &PositionRecord) {
        self.save(key, position);
    }

    pub fn save_size(&self, key: &str, size: &SizeRecord) {
        self.save(key, size);
    }

    /// Raw stored string, `""` when absent or expired
    #[must_use]
    pub fn raw(&self, key: &str) -> String {
        self.surface.get(key)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.surface.get(key);
        if raw.is_empty() {
            return None;
        }

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Ignoring corrupt geometry under {}: {}", key, e);
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, record: &T) {
        match serde_json::to_string(record) {
            Ok(json) => self.surface.set(key, &json, self.expiry_days),
            Err(e) => error!("Failed to serialize geometry for {}: {}", key, e),
        }
    }
}
