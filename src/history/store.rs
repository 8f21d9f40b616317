//! History persistence
//!
//! Stores history as a JSON array of records, newest first.

use std::fs;
use std::path::Path;

use super::{GenerationHistory, GenerationRecord, HistoryError};

/// Load history from `path`. A missing file is an empty history.
pub fn load_history(path: &Path, max_entries: usize) -> Result<GenerationHistory, HistoryError> {
    if !path.exists() {
        return Ok(GenerationHistory::new(max_entries));
    }

    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(GenerationHistory::new(max_entries));
    }

    let records: Vec<GenerationRecord> =
        serde_json::from_str(&raw).map_err(|e| HistoryError::Corrupt(e.to_string()))?;
    Ok(GenerationHistory::from_records(records, max_entries))
}

/// Write history to `path`, creating parent directories as needed
pub fn save_history(history: &GenerationHistory, path: &Path) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(&history.to_records())
        .map_err(|e| HistoryError::Corrupt(e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}
