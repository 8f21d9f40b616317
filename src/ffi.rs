//! FFI Layer for qrforge
//!
//! All C-ABI exports are defined here. Every function follows the same pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `qrforge_free_string`)
//!
//! Error handling: all functions return JSON with a `success` field.
//! On error, `success: false` and the `error` object is populated. A rejected
//! request is not an error: it comes back as `success: true` with
//! `data.status == "rejected"`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::error::QrForgeError;
use crate::qr::{capacity_for, select, RequestValidator};
use crate::types::*;

const LOG_MODULE: &str = "ffi";

// =============================================================================
// Memory Management
// =============================================================================

/// Free a string returned by any qrforge_* function
///
/// # Safety
/// The pointer must have been returned by a qrforge_* function
#[unsafe(no_mangle)]
pub extern "C" fn qrforge_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe {
        let _ = CString::from_raw(s);
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Convert C string to Rust string, returning error JSON if invalid
fn parse_input(input: *const c_char) -> Result<String, *mut c_char> {
    if input.is_null() {
        return Err(error_response(QrForgeError::invalid_input("Null input pointer")));
    }

    let c_str = unsafe { CStr::from_ptr(input) };
    match c_str.to_str() {
        Ok(s) => Ok(s.to_owned()),
        Err(_) => Err(error_response(QrForgeError::invalid_input("Invalid UTF-8 string"))),
    }
}

/// Parse the JSON body of a request. Malformed JSON is a parse error; well-formed
/// JSON with the wrong shape is invalid input.
fn parse_json<T: serde::de::DeserializeOwned>(input: *const c_char) -> Result<T, *mut c_char> {
    let json = parse_input(input)?;
    serde_json::from_str(&json).map_err(|e| {
        let error = if e.is_syntax() || e.is_eof() {
            QrForgeError::parse_error(format!("Invalid JSON: {}", e))
        } else {
            QrForgeError::invalid_input(format!("Invalid request: {}", e))
        };
        error_response(error)
    })
}

/// Create a success response JSON string
fn success_response<T: serde::Serialize>(data: T) -> *mut c_char {
    let response = ApiResponse::ok(data);
    string_to_ptr(response.to_json())
}

/// Create an error response JSON string
fn error_response(error: QrForgeError) -> *mut c_char {
    crate::log_error!(LOG_MODULE, "call failed", error = error);
    let response: ApiResponse<()> = ApiResponse::err(error);
    string_to_ptr(response.to_json())
}

/// Convert Rust string to C string pointer
fn string_to_ptr(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        Err(_) => {
            // Last resort: return a minimal error
            CString::new(r#"{"success":false,"error":{"code":"internal","message":"String conversion failed"}}"#)
                .unwrap_or_default()
                .into_raw()
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validate a generation request and plan its symbol
///
/// # Input
/// ```json
/// {
///   "request": {
///     "content_type": "wifi",
///     "fields": {"ssid": "Home", "password": "pass1234", "security": "WPA"},
///     "level": "M",
///     "version": "auto",
///     "dynamic": false
///   },
///   "short_link": {"base_url": "https://qr.link", "fallback": "use_original"}
/// }
/// ```
///
/// # Output
/// ```json
/// {
///   "success": true,
///   "data": {
///     "status": "accepted",
///     "ticket": {"payload": "WIFI:T:WPA;S:Home;P:pass1234;H:false;;", "version": 2, "level": "M"},
///     "alphabet_class": "byte",
///     "byte_length": 38,
///     "required_version": 2
///   }
/// }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn qrforge_validate(input: *const c_char) -> *mut c_char {
    let req: ValidateRequest = match parse_json(input) {
        Ok(r) => r,
        Err(e) => return e,
    };

    let validator = if req.request.dynamic {
        match req.short_link.unwrap_or_default().adapter() {
            Ok(adapter) => RequestValidator::with_dynamic(adapter),
            Err(e) => return error_response(e),
        }
    } else {
        RequestValidator::new()
    };

    let outcome = match validator.validate(&req.request) {
        Ok(accepted) => ValidationOutcome::Accepted {
            ticket: accepted.ticket(),
            alphabet_class: accepted.encoded.alphabet_class,
            byte_length: accepted.encoded.byte_length,
            required_version: accepted.encoded.required_version,
            short_link_source: accepted.encoded.short_link_source,
        },
        Err(rejection) => {
            crate::log_debug!(LOG_MODULE, "validate rejected", reason = rejection);
            ValidationOutcome::Rejected { rejection }
        }
    };

    success_response(outcome)
}

// =============================================================================
// Capacity and Classification
// =============================================================================

/// Approximate capacity of one version at one level
///
/// # Input
/// ```json
/// {"version": 7, "level": "M"}
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn qrforge_capacity(input: *const c_char) -> *mut c_char {
    let req: CapacityRequest = match parse_json(input) {
        Ok(r) => r,
        Err(e) => return e,
    };

    let info = capacity_for(req.version, req.level);
    success_response(CapacityResponse {
        version: info.version,
        level: info.level,
        module_side: info.module_side,
        data_bits: info.data_bits,
        capacity: info.capacity,
    })
}

/// Classify a raw payload and find the smallest version that holds it
///
/// # Input
/// ```json
/// {"payload": "HELLO WORLD", "level": "Q"}
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn qrforge_classify(input: *const c_char) -> *mut c_char {
    let req: ClassifyRequest = match parse_json(input) {
        Ok(r) => r,
        Err(e) => return e,
    };

    let selection = select(&req.payload, req.level);
    success_response(ClassifyResponse {
        alphabet_class: selection.alphabet,
        byte_length: selection.byte_length,
        required_version: selection.version,
        fits: selection.fits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn call(f: extern "C" fn(*const c_char) -> *mut c_char, input: &str) -> Value {
        let c_input = CString::new(input).unwrap();
        let ptr = f(c_input.as_ptr());
        let json = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        qrforge_free_string(ptr);
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_null_input() {
        let ptr = qrforge_validate(std::ptr::null());
        let json = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        qrforge_free_string(ptr);
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("invalid_input"));
    }

    #[test]
    fn test_free_null_is_noop() {
        qrforge_free_string(std::ptr::null_mut());
    }

    #[test]
    fn test_validate_wifi() {
        let v = call(
            qrforge_validate,
            r#"{"request": {"content_type": "wifi", "fields": {"ssid": "Home", "password": "pass1234"}}}"#,
        );
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["status"], "accepted");
        assert_eq!(v["data"]["ticket"]["payload"], "WIFI:T:WPA;S:Home;P:pass1234;H:false;;");
        assert_eq!(v["data"]["ticket"]["level"], "M");
    }

    #[test]
    fn test_validate_rejection_is_data() {
        let v = call(
            qrforge_validate,
            r#"{"request": {"content_type": "email", "fields": {"email": ""}}}"#,
        );
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["status"], "rejected");
        assert_eq!(v["data"]["rejection"]["reason"], "no_data");
    }

    #[test]
    fn test_validate_bad_json() {
        let v = call(qrforge_validate, "{ nope");
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "parse_error");

        let v = call(qrforge_validate, r#"{"request": {"content_type": "fax"}}"#);
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "invalid_input");
    }

    #[test]
    fn test_capacity() {
        let v = call(qrforge_capacity, r#"{"version": 1, "level": "L"}"#);
        assert_eq!(v["data"]["module_side"], 21);
        assert_eq!(v["data"]["capacity"]["byte"], 24);
        assert_eq!(v["data"]["capacity"]["numeric"], 79);

        let v = call(qrforge_capacity, r#"{"version": 41}"#);
        assert_eq!(v["success"], false);
    }

    #[test]
    fn test_classify() {
        let v = call(qrforge_classify, r#"{"payload": "HELLO WORLD"}"#);
        assert_eq!(v["data"]["alphabet_class"], "alphanumeric");
        assert_eq!(v["data"]["required_version"], 1);
        assert_eq!(v["data"]["fits"], true);
    }
}
