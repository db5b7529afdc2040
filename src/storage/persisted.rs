//! Typed load/save of history and settings.
//!
//! Loading never fails: unreadable or malformed data is logged and treated
//! as absent. Saving reports errors so the caller can log them.

use crate::model::StorageError;
use crate::state::history::HistoryEntry;
use crate::state::settings::Settings;
use crate::storage::{Storage, HISTORY_KEY, SETTINGS_KEY};
use tracing::warn;

/// Read the persisted history, most recent first.
///
/// A non-array value yields an empty history. Individual malformed entries
/// are skipped so one bad record does not cost the rest.
pub fn load_history(storage: &impl Storage) -> Vec<HistoryEntry> {
    let raw = match storage.load(HISTORY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read history, starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        Ok(_) | Err(_) => {
            warn!("Persisted history is not a JSON array, discarding");
            Vec::new()
        }
    }
}

/// Write the history list.
pub fn save_history(storage: &mut impl Storage, entries: &[HistoryEntry]) -> Result<(), StorageError> {
    let json = serde_json::to_string(entries).map_err(|source| StorageError::Serialize {
        key: HISTORY_KEY.to_string(),
        source,
    })?;
    storage.save(HISTORY_KEY, &json)
}

/// Read persisted settings.
///
/// `None` when nothing was saved or the saved value is malformed, so the
/// caller keeps its configured defaults. Fields missing from an otherwise
/// valid object take [`Settings::default`] values.
pub fn load_settings(storage: &impl Storage) -> Option<Settings> {
    match storage.load(SETTINGS_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw)
            .map_err(|e| warn!(error = %e, "Malformed settings, using defaults"))
            .ok(),
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "Failed to read settings, using defaults");
            None
        }
    }
}

/// Write settings.
pub fn save_settings(storage: &mut impl Storage, settings: &Settings) -> Result<(), StorageError> {
    let json = serde_json::to_string(settings).map_err(|source| StorageError::Serialize {
        key: SETTINGS_KEY.to_string(),
        source,
    })?;
    storage.save(SETTINGS_KEY, &json)
}
