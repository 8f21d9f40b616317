//! Engine Configuration
//!
//! File-backed settings for hosts of the engine:
//! - Default error-correction level and version choice
//! - Short-link issuer and failure policy
//! - History bounds and location
//!
//! Every field has a default, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{QrForgeError, QrForgeResult};
use crate::qr::{
    DynamicAdapter, ErrorCorrectionLevel, HttpShortLinker, LocalShortLinker, ShortLinkFallback,
    VersionChoice,
};

/// Default number of records kept in history
pub const DEFAULT_HISTORY_ENTRIES: usize = 20;

/// Default short-link request timeout
pub const DEFAULT_SHORT_LINK_TIMEOUT_SECS: u64 = 5;

/// Short-link settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortLinkConfig {
    /// Base for locally issued slugs
    pub base_url: String,
    /// Remote shortener; takes precedence over `base_url` when set
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
    pub fallback: ShortLinkFallback,
}

impl Default for ShortLinkConfig {
    fn default() -> Self {
        Self {
            base_url: "https://qr.link".to_string(),
            endpoint: None,
            timeout_secs: DEFAULT_SHORT_LINK_TIMEOUT_SECS,
            fallback: ShortLinkFallback::UseOriginal,
        }
    }
}

impl ShortLinkConfig {
    /// Build the adapter this config describes
    pub fn adapter(&self) -> QrForgeResult<DynamicAdapter> {
        let adapter = match &self.endpoint {
            Some(endpoint) => {
                let linker =
                    HttpShortLinker::new(endpoint.as_str(), Duration::from_secs(self.timeout_secs))?;
                DynamicAdapter::new(Box::new(linker), self.fallback)
            }
            None => DynamicAdapter::new(
                Box::new(LocalShortLinker::new(self.base_url.as_str())),
                self.fallback,
            ),
        };
        Ok(adapter)
    }
}

/// History settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_entries: usize,
    /// JSON file; history is in-memory only when unset
    pub path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_HISTORY_ENTRIES,
            path: None,
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub default_level: ErrorCorrectionLevel,
    pub default_version: VersionChoice,
    pub short_link: ShortLinkConfig,
    pub history: HistoryConfig,
    pub debug_logging: bool,
}

impl EngineConfig {
    /// Load a config from a JSON file
    pub fn load(path: &Path) -> QrForgeResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            QrForgeError::config_error(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Parse a config from JSON text
    pub fn from_json(raw: &str) -> QrForgeResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| QrForgeError::config_error(format!("invalid config: {}", e)))
    }

    /// Check settings and return warnings (empty if all OK)
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        match &self.short_link.endpoint {
            Some(endpoint) => {
                if !is_http_url(endpoint) {
                    warnings.push(format!("short_link.endpoint is not an http(s) URL: {}", endpoint));
                }
            }
            None => {
                if !is_http_url(&self.short_link.base_url) {
                    warnings.push(format!(
                        "short_link.base_url is not an http(s) URL: {}",
                        self.short_link.base_url
                    ));
                }
            }
        }

        if self.short_link.timeout_secs == 0 {
            warnings.push("short_link.timeout_secs is 0; every remote request will time out".to_string());
        }

        if self.history.max_entries == 0 {
            warnings.push("history.max_entries is 0; nothing will be recorded".to_string());
        }

        warnings
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}
