//! History Module
//!
//! Bounded, newest-first record of accepted generations. Only accepted results
//! can be recorded; the engine itself never reads history back.

mod store;

pub use store::*;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use crate::qr::{Accepted, ContentKind, ErrorCorrectionLevel, Version};

/// History errors
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("History file is corrupt: {0}")]
    Corrupt(String),

    #[error("Invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),
}

/// Foreground/background colors chosen for a rendered code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub foreground: String,
    pub background: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            foreground: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl ColorScheme {
    /// Build a scheme from two `#RRGGBB` strings; hex digits are upper-cased
    pub fn new(foreground: &str, background: &str) -> Result<Self, HistoryError> {
        Ok(Self {
            foreground: normalize_hex(foreground)?,
            background: normalize_hex(background)?,
        })
    }
}

fn normalize_hex(color: &str) -> Result<String, HistoryError> {
    let trimmed = color.trim();
    let digits = trimmed
        .strip_prefix('#')
        .ok_or_else(|| HistoryError::InvalidColor(color.to_string()))?;

    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(HistoryError::InvalidColor(color.to_string()));
    }
    Ok(format!("#{}", digits.to_ascii_uppercase()))
}

/// One accepted generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: String,
    pub raw_string: String,
    pub content_type: ContentKind,
    pub level: ErrorCorrectionLevel,
    pub version: Version,
    pub colors: ColorScheme,
    /// Unix milliseconds
    pub timestamp: i64,
}

/// Bounded history, newest first
#[derive(Debug, Clone)]
pub struct GenerationHistory {
    entries: VecDeque<GenerationRecord>,
    max_entries: usize,
}

impl GenerationHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    /// Rebuild from stored records (newest first), keeping at most `max_entries`
    pub fn from_records(records: Vec<GenerationRecord>, max_entries: usize) -> Self {
        let mut entries: VecDeque<GenerationRecord> = records.into();
        entries.truncate(max_entries);
        Self {
            entries,
            max_entries,
        }
    }

    /// Append an accepted result; the oldest record is evicted past the bound
    pub fn record(&mut self, accepted: &Accepted, colors: ColorScheme) -> GenerationRecord {
        let ticket = accepted.ticket();
        let record = GenerationRecord {
            id: format!("{:016x}", rand::thread_rng().gen::<u64>()),
            raw_string: ticket.payload,
            content_type: accepted.encoded.content_type,
            level: ticket.level,
            version: ticket.version,
            colors,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };

        self.entries.push_front(record.clone());
        self.entries.truncate(self.max_entries);

        crate::log_debug!(
            "history",
            "generation recorded",
            id = record.id,
            kept = self.entries.len()
        );
        record
    }

    pub fn entries(&self) -> impl Iterator<Item = &GenerationRecord> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&GenerationRecord> {
        self.entries.front()
    }

    pub fn get(&self, id: &str) -> Option<&GenerationRecord> {
        self.entries.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn to_records(&self) -> Vec<GenerationRecord> {
        self.entries.iter().cloned().collect()
    }
}
