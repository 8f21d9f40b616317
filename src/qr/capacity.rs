//! Capacity Model
//!
//! Approximates how much data a symbol of a given version and error correction
//! level can carry. The estimate starts from the module grid, removes the fixed
//! function patterns, keeps the share not spent on redundancy and converts the
//! remaining bits into characters per alphabet.
//!
//! This is an approximation of the printed QR capacity tables, not a bit-exact
//! reproduction. Alignment patterns and remainder bits are not modelled.

use serde::Serialize;

use super::types::{AlphabetClass, Version};
use super::ErrorCorrectionLevel;

/// Three 8x8 finder patterns including their separators
const FINDER_MODULES: u32 = 3 * 8 * 8;
/// The single dark module next to the lower-left finder
const DARK_MODULES: u32 = 1;
/// Two 6x3 version information blocks
const VERSION_INFO_MODULES: u32 = 2 * 18;
/// Smallest version that carries version information
const VERSION_INFO_MIN_VERSION: u8 = 7;
/// Flat allowance for the two format information strips
const FORMAT_INFO_MODULES: u32 = 31;

/// Characters per alphabet for one (version, level) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capacity {
    pub numeric: usize,
    pub alphanumeric: usize,
    pub byte: usize,
    pub kanji: usize,
}

impl Capacity {
    /// Derive per-alphabet capacity from byte capacity
    /// (numeric x3.3, alphanumeric x2.0, byte x1.0, kanji x0.6)
    fn from_bytes(bytes: usize) -> Self {
        Self {
            numeric: bytes * 33 / 10,
            alphanumeric: bytes * 2,
            byte: bytes,
            kanji: bytes * 6 / 10,
        }
    }

    pub fn get(&self, class: AlphabetClass) -> usize {
        match class {
            AlphabetClass::Numeric => self.numeric,
            AlphabetClass::Alphanumeric => self.alphanumeric,
            AlphabetClass::Byte => self.byte,
            AlphabetClass::Kanji => self.kanji,
        }
    }
}

/// Derived description of a symbol version at a given level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub version: Version,
    pub level: ErrorCorrectionLevel,
    pub module_side: u32,
    /// Modules left after removing function patterns
    pub data_modules: u32,
    /// Data bits left after redundancy
    pub data_bits: u32,
    pub capacity: Capacity,
}

impl VersionInfo {
    pub fn capacity_of(&self, class: AlphabetClass) -> usize {
        self.capacity.get(class)
    }
}

/// Modules taken by finder, timing, dark-module, version and format patterns
fn function_pattern_modules(version: Version) -> u32 {
    let side = version.module_side();
    let timing = 2 * (side - 16);
    let version_info = if version.value() >= VERSION_INFO_MIN_VERSION {
        VERSION_INFO_MODULES
    } else {
        0
    };
    FINDER_MODULES + timing + DARK_MODULES + version_info + FORMAT_INFO_MODULES
}

/// Compute the approximate capacity of `version` at `level`
pub fn capacity_for(version: Version, level: ErrorCorrectionLevel) -> VersionInfo {
    let module_side = version.module_side();
    let total = module_side * module_side;
    let data_modules = total - function_pattern_modules(version);
    let data_bits = data_modules * (100 - level.redundancy_percent()) / 100;
    let bytes = (data_bits / 8) as usize;

    VersionInfo {
        version,
        level,
        module_side,
        data_modules,
        data_bits,
        capacity: Capacity::from_bytes(bytes),
    }
}
