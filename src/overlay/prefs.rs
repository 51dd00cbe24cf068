//! The persisted "copy capture to clipboard" preference.
//!
//! One boolean, string-encoded as "true"/"false", durable across restarts.
//! Long-lived event handlers must see the value current at decision time,
//! never the one captured at registration, so reads go through a shared cell.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::constants::PREF_COPY_TO_CLIPBOARD;

/// Durable string key/value storage for user preferences.
pub trait PrefStore: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> Result<(), String>;
}

/// One file per key under the per-user config directory.
pub struct FilePrefStore {
    dir: PathBuf,
}

impl FilePrefStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn default_location() -> Result<Self, String> {
        let dir = dirs::config_dir()
            .ok_or("config dir not found")?
            .join("com.axray.overlay");
        Ok(Self::new(dir))
    }
}

impl PrefStore for FilePrefStore {
    fn read(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.dir.join(key))
            .ok()
            .map(|s| s.trim().to_string())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        std::fs::create_dir_all(&self.dir).map_err(|e| e.to_string())?;
        std::fs::write(self.dir.join(key), value).map_err(|e| e.to_string())
    }
}

/// Anything but the two canonical forms falls back to the default (enabled).
fn parse_bool(value: Option<&str>) -> bool {
    match value {
        Some("true") => true,
        Some("false") => false,
        _ => true,
    }
}

/// The clipboard-copy preference: a shared live cell backed by the store.
///
/// Clones share one cell, so a handler holding a clone reads the latest
/// value when it decides, regardless of when it was registered.
#[derive(Clone)]
pub struct ClipboardPref {
    cell: Arc<AtomicBool>,
    store: Arc<dyn PrefStore>,
}

impl ClipboardPref {
    pub fn load(store: Arc<dyn PrefStore>) -> Self {
        let value = parse_bool(store.read(PREF_COPY_TO_CLIPBOARD).as_deref());
        Self {
            cell: Arc::new(AtomicBool::new(value)),
            store,
        }
    }

    /// Write-through: the durable write lands before the cell moves, so the
    /// cell never runs ahead of storage.
    pub fn set(&self, value: bool) -> Result<(), String> {
        self.store
            .write(PREF_COPY_TO_CLIPBOARD, if value { "true" } else { "false" })?;
        self.cell.store(value, Ordering::SeqCst);
        Ok(())
    }

    pub fn get(&self) -> bool {
        self.cell.load(Ordering::SeqCst)
    }
}
