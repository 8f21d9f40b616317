//! Unified error types for qrforge
//!
//! Request-level rejections are values (see [`crate::qr::Rejection`]). This module
//! carries the errors that cross a host boundary (FFI, CLI, config and history I/O)
//! in a serializable form.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::history::HistoryError;
use crate::qr::{RejectReason, Rejection, ShortLinkError};

/// Main error type for all boundary operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrForgeError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl QrForgeError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for QrForgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for QrForgeError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Rejections
    NoData,
    InvalidFormat,
    CapacityExceeded,

    // Input errors
    InvalidInput,
    ParseError,
    JsonError,

    // Collaborators
    ShortLinkFailed,
    HistoryError,
    ConfigError,

    // Internal
    Internal,
}

/// Result type alias for boundary operations
pub type QrForgeResult<T> = Result<T, QrForgeError>;

// Conversions from common error types

impl From<Rejection> for QrForgeError {
    fn from(r: Rejection) -> Self {
        let code = match r.reason() {
            RejectReason::NoData => ErrorCode::NoData,
            RejectReason::InvalidFormat => ErrorCode::InvalidFormat,
            RejectReason::CapacityExceeded => ErrorCode::CapacityExceeded,
        };
        QrForgeError::new(code, r.detail())
    }
}

impl From<ShortLinkError> for QrForgeError {
    fn from(e: ShortLinkError) -> Self {
        let code = match e {
            ShortLinkError::Config(_) => ErrorCode::ConfigError,
            _ => ErrorCode::ShortLinkFailed,
        };
        QrForgeError::new(code, e.to_string())
    }
}

impl From<HistoryError> for QrForgeError {
    fn from(e: HistoryError) -> Self {
        QrForgeError::new(ErrorCode::HistoryError, e.to_string())
    }
}

impl From<serde_json::Error> for QrForgeError {
    fn from(e: serde_json::Error) -> Self {
        QrForgeError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<std::io::Error> for QrForgeError {
    fn from(e: std::io::Error) -> Self {
        QrForgeError::internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_maps_to_code() {
        let err: QrForgeError = Rejection::NoData("email address is required".into()).into();
        assert_eq!(err.code, ErrorCode::NoData);
        assert!(err.message.contains("email address is required"));
    }

    #[test]
    fn test_error_display_with_details() {
        let err = QrForgeError::config_error("bad config").with_details("history.max_entries");
        assert_eq!(err.to_string(), "[ConfigError] bad config (history.max_entries)");
    }

    #[test]
    fn test_io_error_is_internal() {
        let err: QrForgeError = std::io::Error::other("disk gone").into();
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.message, "disk gone");
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::CapacityExceeded).unwrap();
        assert_eq!(json, "\"capacity_exceeded\"");
    }
}
