//! Version Selector
//!
//! Finds the smallest version whose capacity holds a payload.

use serde::Serialize;

use super::capacity::capacity_for;
use super::classifier::classify;
use super::types::{AlphabetClass, Version};
use super::ErrorCorrectionLevel;

/// Result of sizing a payload at one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub alphabet: AlphabetClass,
    pub byte_length: usize,
    /// Smallest fitting version, or the ceiling when nothing fits
    pub version: Version,
    /// False only when `version` is the ceiling and still too small
    pub fits: bool,
}

/// Length used for capacity checks (UTF-8 bytes)
pub fn byte_length(payload: &str) -> usize {
    payload.len()
}

fn class_fits(
    class: AlphabetClass,
    length: usize,
    version: Version,
    level: ErrorCorrectionLevel,
) -> bool {
    length <= capacity_for(version, level).capacity_of(class)
}

/// Classify once and scan versions 1..=40
pub fn select(payload: &str, level: ErrorCorrectionLevel) -> Selection {
    let alphabet = classify(payload);
    let length = byte_length(payload);

    let found = Version::all().find(|&v| class_fits(alphabet, length, v, level));

    Selection {
        alphabet,
        byte_length: length,
        version: found.unwrap_or(Version::MAX),
        fits: found.is_some(),
    }
}

/// Smallest version holding `payload`; returns the ceiling (40) when none does,
/// so callers must still check [`fits`].
pub fn required_version(payload: &str, level: ErrorCorrectionLevel) -> Version {
    select(payload, level).version
}

/// Whether `payload` fits in exactly this version and level
pub fn fits(payload: &str, version: Version, level: ErrorCorrectionLevel) -> bool {
    class_fits(classify(payload), byte_length(payload), version, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ErrorCorrectionLevel::*;

    #[test]
    fn test_short_payload_uses_version_one() {
        assert_eq!(required_version("HELLO", M), Version::MIN);
        assert!(fits("HELLO", Version::MIN, M));
    }

    #[test]
    fn test_boundary_of_version_one() {
        // 24 bytes fit version 1 at L, 25 do not
        let exact = "a".repeat(24) + "?";
        assert_eq!(byte_length(&exact), 25);
        assert_eq!(required_version(&exact, L), Version::new(2));
        assert!(fits(&"?".repeat(24), Version::MIN, L));
    }

    #[test]
    fn test_cheaper_alphabet_needs_smaller_version() {
        let digits = "1".repeat(200);
        let text = "x".repeat(199) + "?";
        assert!(required_version(&digits, M) < required_version(&text, M));
    }

    #[test]
    fn test_ceiling_when_nothing_fits() {
        let huge = "?".repeat(4000);
        let selection = select(&huge, H);
        assert_eq!(selection.alphabet, AlphabetClass::Byte);
        assert_eq!(selection.version, Version::MAX);
        assert!(!selection.fits);
        assert!(!fits(&huge, Version::MAX, H));
    }

    #[test]
    fn test_selected_version_is_minimal() {
        let payload = "mailto:someone@example.com?subject=Hello&body=".repeat(6);
        let selection = select(&payload, Q);
        assert!(selection.fits);
        assert!(fits(&payload, selection.version, Q));
        if selection.version > Version::MIN {
            let below = Version::new(selection.version.value() - 1);
            assert!(!fits(&payload, below, Q));
        }
    }

    #[test]
    fn test_multibyte_length_counts_bytes() {
        assert_eq!(byte_length("é"), 2);
        assert_eq!(byte_length("東"), 3);
    }
}
