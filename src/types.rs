//! Boundary types shared by the FFI and CLI

use serde::{Deserialize, Serialize};

use crate::qr::{
    AlphabetClass, Capacity, ErrorCorrectionLevel, GenerationRequest, RenderTicket, Rejection,
    Version,
};
use crate::utils::engine_config::ShortLinkConfig;

// =============================================================================
// Requests
// =============================================================================

/// Validation request as received over FFI
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    pub request: GenerationRequest,
    /// Short-link settings for dynamic requests; defaults apply when absent
    #[serde(default)]
    pub short_link: Option<ShortLinkConfig>,
}

/// Capacity lookup for one version at one level
#[derive(Debug, Clone, Deserialize)]
pub struct CapacityRequest {
    pub version: Version,
    #[serde(default)]
    pub level: ErrorCorrectionLevel,
}

/// Classification request
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRequest {
    pub payload: String,
    #[serde(default)]
    pub level: ErrorCorrectionLevel,
}

// =============================================================================
// Responses
// =============================================================================

/// Outcome of validating one request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Accepted {
        ticket: RenderTicket,
        alphabet_class: AlphabetClass,
        byte_length: usize,
        required_version: Version,
        #[serde(skip_serializing_if = "Option::is_none")]
        short_link_source: Option<String>,
    },
    Rejected {
        rejection: Rejection,
    },
}

/// Capacity of one version at one level
#[derive(Debug, Clone, Serialize)]
pub struct CapacityResponse {
    pub version: Version,
    pub level: ErrorCorrectionLevel,
    pub module_side: u32,
    pub data_bits: u32,
    pub capacity: Capacity,
}

/// Classification and sizing of a raw payload
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyResponse {
    pub alphabet_class: AlphabetClass,
    pub byte_length: usize,
    pub required_version: Version,
    pub fits: bool,
}

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<crate::error::QrForgeError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: crate::error::QrForgeError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"code":"internal","message":"Serialization failed"}}"#.to_string()
        })
    }
}
