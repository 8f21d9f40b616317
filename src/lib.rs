//! qrforge Core Library
//!
//! Content encoding and capacity planning for QR codes.
//!
//! # Architecture
//!
//! This crate provides:
//! - **qr**: Payload encoders, alphabet classifier, capacity model, version
//!   selector, request validator and short-link adapter
//! - **history**: Bounded record of accepted generations with JSON persistence
//! - **utils**: Logging, input sanitizing and engine configuration
//! - **ffi**: C-ABI exports for UI hosts
//!
//! # FFI Usage
//!
//! All public FFI functions are in the `ffi` module and follow this pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `qrforge_free_string`)
//!
//! # Example
//!
//! ```rust,ignore
//! use qrforge::qr::{ContentKind, FieldSet, GenerationRequest, RequestValidator};
//!
//! let request = GenerationRequest::new(
//!     ContentKind::Phone,
//!     FieldSet::new().with("number", "+15551234567"),
//! );
//! let ticket = RequestValidator::new().validate(&request)?.ticket();
//! println!("{} -> version {}", ticket.payload, ticket.version);
//! ```

pub mod error;
pub mod ffi;
pub mod history;
pub mod qr;
pub mod types;
pub mod utils;

// Re-export key types for convenience
pub use error::{ErrorCode, QrForgeError, QrForgeResult};
pub use types::*;

pub use qr::{
    Accepted, ContentKind, ErrorCorrectionLevel, FieldSet, GenerationRequest, Rejection,
    RenderTicket, RequestValidator, Version, VersionChoice,
};

pub use ffi::{qrforge_capacity, qrforge_classify, qrforge_free_string, qrforge_validate};
