//! QR Payload Engine
//!
//! Turns structured form input into a canonical QR payload string and plans the
//! symbol size it needs. The engine stops at a validated payload plus the version
//! and error-correction level it will be encoded at; drawing the matrix is left to
//! a rendering library.
//!
//! # Pipeline
//! - [`encoder`]: one pure encoder per content type (`mailto:`, `WIFI:`, vCard, ...)
//! - [`classifier`]: assigns the payload to the numeric, alphanumeric, byte or kanji alphabet
//! - [`capacity`]: approximate data capacity per (version, level)
//! - [`selector`]: smallest version that holds the payload
//! - [`validator`]: state machine producing an accepted payload or a typed rejection
//! - [`dynamic`]: optional short-link wrapping for trackable codes
//!
//! # Usage
//! ```rust,ignore
//! use qrforge::qr::{ContentKind, FieldSet, GenerationRequest, RequestValidator};
//!
//! let fields = FieldSet::new()
//!     .with("ssid", "Home")
//!     .with("password", "pass1234")
//!     .with("security", "WPA");
//! let request = GenerationRequest::new(ContentKind::Wifi, fields);
//! let accepted = RequestValidator::new().validate(&request)?;
//! println!("{} at version {}", accepted.ticket().payload, accepted.ticket().version);
//! ```

pub mod capacity;
pub mod classifier;
pub mod content;
pub mod dynamic;
pub mod encoder;
pub mod selector;
pub mod types;
pub mod validator;

pub use capacity::{capacity_for, Capacity, VersionInfo};
pub use classifier::classify;
pub use content::Content;
pub use dynamic::{
    DynamicAdapter, HttpShortLinker, LocalShortLinker, ShortLinkError, ShortLinkFallback,
    ShortLinkService,
};
pub use encoder::encode;
pub use selector::{fits, required_version, select, Selection};
pub use types::*;
pub use validator::{transition, Accepted, RequestValidator, ValidationEvent, ValidationState};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a generation request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NoData,
    InvalidFormat,
    CapacityExceeded,
}

/// A refused generation request. Every variant is recoverable by editing the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Mandatory fields are empty
    #[error("No data: {0}")]
    NoData(String),

    /// The content fails a type-specific shape check
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The payload does not fit the chosen version/level
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),
}

impl Rejection {
    pub fn reason(&self) -> RejectReason {
        match self {
            Rejection::NoData(_) => RejectReason::NoData,
            Rejection::InvalidFormat(_) => RejectReason::InvalidFormat,
            Rejection::CapacityExceeded(_) => RejectReason::CapacityExceeded,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Rejection::NoData(d) | Rejection::InvalidFormat(d) | Rejection::CapacityExceeded(d) => d,
        }
    }
}

impl Serialize for Rejection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            reason: RejectReason,
            detail: &'a str,
        }

        Wire {
            reason: self.reason(),
            detail: self.detail(),
        }
        .serialize(serializer)
    }
}

/// QR code error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    /// Low (~7% recovery)
    L,
    /// Medium (~15% recovery)
    M,
    /// Quartile (~25% recovery)
    Q,
    /// High (~30% recovery)
    H,
}

impl ErrorCorrectionLevel {
    pub const ALL: [ErrorCorrectionLevel; 4] = [
        ErrorCorrectionLevel::L,
        ErrorCorrectionLevel::M,
        ErrorCorrectionLevel::Q,
        ErrorCorrectionLevel::H,
    ];

    /// Share of the data modules spent on redundancy, in percent
    pub fn redundancy_percent(&self) -> u32 {
        match self {
            ErrorCorrectionLevel::L => 7,
            ErrorCorrectionLevel::M => 15,
            ErrorCorrectionLevel::Q => 25,
            ErrorCorrectionLevel::H => 30,
        }
    }
}

impl Default for ErrorCorrectionLevel {
    fn default() -> Self {
        ErrorCorrectionLevel::M
    }
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCorrectionLevel::L => "L",
            ErrorCorrectionLevel::M => "M",
            ErrorCorrectionLevel::Q => "Q",
            ErrorCorrectionLevel::H => "H",
        };
        f.write_str(s)
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(ErrorCorrectionLevel::L),
            "m" | "medium" => Ok(ErrorCorrectionLevel::M),
            "q" | "quartile" => Ok(ErrorCorrectionLevel::Q),
            "h" | "high" => Ok(ErrorCorrectionLevel::H),
            other => Err(format!("unknown error correction level: {}", other)),
        }
    }
}
