use super::{Clock, PersistenceSurface, SystemClock};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CookieEntry {
    value: String,
    /// Expiry timestamp in milliseconds since epoch
    expires_at_ms: i64,
}

/// In-memory cookie store
pub struct CookieJar {
    entries: RefCell<BTreeMap<String, CookieEntry>>,
    clock: Rc<dyn Clock>,
}

impl CookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Rc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Rc<dyn Clock>) -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
            clock,
        }
    }

    fn from_entries(entries: BTreeMap<String, CookieEntry>, clock: Rc<dyn Clock>) -> Self {
        Self {
            entries: RefCell::new(entries),
            clock,
        }
    }

    /// Live (non-expired) entries as `(name, value)` pairs, sorted by name
    #[must_use]
    pub fn entries(&self) -> Vec<(String, String)> {
        let now = self.clock.now().timestamp_millis();
        self.entries
            .borrow()
            .iter()
            .filter(|(_, entry)| entry.expires_at_ms > now)
            .map(|(name, entry)| (name.clone(), entry.value.clone()))
            .collect()
    }

    /// Remove one entry; returns whether it existed
    pub fn remove(&self, name: &str) -> bool {
        self.entries.borrow_mut().remove(name).is_some()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Drop expired entries
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now().timestamp_millis();
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at_ms > now);
        before - entries.len()
    }
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistenceSurface for CookieJar {
    fn get(&self, name: &str) -> String {
        let now = self.clock.now().timestamp_millis();
        let entries = self.entries.borrow();
        match entries.get(name) {
            Some(entry) if entry.expires_at_ms > now => entry.value.clone(),
            Some(_) => {
                debug!("Cookie {} expired", name);
                String::new()
            }
            None => String::new(),
        }
    }

    fn set(&self, name: &str, value: &str, expiry_days: u32) {
        let expires = Duration::try_days(i64::from(expiry_days))
            .and_then(|ttl| self.clock.now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries.borrow_mut().insert(
            name.to_string(),
            CookieEntry {
                value: value.to_string(),
                expires_at_ms: expires.timestamp_millis(),
            },
        );
    }
}

/// Cookie store persisted to a JSON file.
///
/// The file is read once on open and rewritten after every `set`. A missing,
/// unreadable or corrupt file starts an empty jar.
pub struct FileCookieJar {
    jar: CookieJar,
    path: PathBuf,
}

impl FileCookieJar {
    #[must_use]
    pub fn open(path: &Path) -> Self {
        Self::open_with_clock(path, Rc::new(SystemClock))
    }

    #[must_use]
    pub fn open_with_clock(path: &Path, clock: Rc<dyn Clock>) -> Self {
        let entries = Self::load_from_file(path);
        let jar = CookieJar::from_entries(entries, clock);
        let purged = jar.purge_expired();
        if purged > 0 {
            debug!("Dropped {} expired geometry entries", purged);
        }

        Self {
            jar,
            path: path.to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn entries(&self) -> Vec<(String, String)> {
        self.jar.entries()
    }

    /// Remove every entry and persist the empty jar
    pub fn clear(&self) {
        self.jar.clear();
        self.save();
    }

    pub fn remove(&self, name: &str) -> bool {
        let removed = self.jar.remove(name);
        if removed {
            self.save();
        }
        removed
    }

    fn load_from_file(path: &Path) -> BTreeMap<String, CookieEntry> {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(entries) => {
                        info!("Loaded geometry from {:?}", path);
                        return entries;
                    }
                    Err(e) => {
                        warn!("Failed to parse geometry file: {}", e);
                    }
                },
                Err(e) => {
                    warn!("Failed to read geometry file: {}", e);
                }
            }
        }

        BTreeMap::new()
    }

    fn save(&self) {
        if let Some(parent) = self.path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            error!("Failed to create geometry directory: {}", e);
            return;
        }

        let entries = self.jar.entries.borrow();
        match serde_json::to_string_pretty(&*entries) {
            Ok(content) => {
                if let Err(e) = std::fs::write(&self.path, content) {
                    error!("Failed to write geometry file: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize geometry: {}", e);
            }
        }
    }
}

impl PersistenceSurface for FileCookieJar {
    fn get(&self, name: &str) -> String {
        self.jar.get(name)
    }

    fn set(&self, name: &str, value: &str, expiry_days: u32) {
        self.jar.set(name, value, expiry_days);
        self.save();
    }
}
