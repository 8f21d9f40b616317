//! Input Sanitization
//!
//! Cleans form values before they become payload text:
//! - Whitespace trimming and collapsing
//! - Unicode normalization (NFC)
//! - Null byte and control character removal
//! - Markup escaping for free text
//!
//! Nothing here ever shortens content to make it fit; capacity problems are
//! reported by the validator instead.

use unicode_normalization::UnicodeNormalization;

/// Sanitize a string with configurable options
pub fn sanitize_string(input: &str, options: &SanitizeOptions) -> String {
    let mut result = input.to_string();

    if options.trim {
        result = result.trim().to_string();
    }

    // Normalize Unicode (NFC)
    if options.normalize_unicode {
        result = result.nfc().collect();
    }

    if options.remove_null_bytes && result.contains('\0') {
        result = result.replace('\0', "");
    }

    // Line breaks and tabs survive only when layout is content
    if options.remove_control_chars {
        result = result
            .chars()
            .filter(|c| !c.is_control() || (options.keep_layout && (*c == '\n' || *c == '\t')))
            .collect();
    }

    if options.collapse_whitespace {
        let mut prev_space = false;
        result = result
            .chars()
            .filter(|c| {
                if c.is_whitespace() {
                    if prev_space {
                        return false;
                    }
                    prev_space = true;
                } else {
                    prev_space = false;
                }
                true
            })
            .collect();
    }

    if options.escape_markup {
        result = escape_markup(&result);
    }

    result
}

/// Sanitization options
#[derive(Debug, Clone)]
pub struct SanitizeOptions {
    pub trim: bool,
    pub normalize_unicode: bool,
    pub remove_null_bytes: bool,
    pub remove_control_chars: bool,
    /// Keep `\n` and `\t` when removing control characters
    pub keep_layout: bool,
    pub collapse_whitespace: bool,
    pub escape_markup: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            trim: true,
            normalize_unicode: true,
            remove_null_bytes: true,
            remove_control_chars: true,
            keep_layout: false,
            collapse_whitespace: false,
            escape_markup: false,
        }
    }
}

impl SanitizeOptions {
    /// Single-line identifiers: URLs, addresses, numbers, handles
    pub fn for_line() -> Self {
        Self {
            trim: true,
            normalize_unicode: true,
            remove_null_bytes: true,
            remove_control_chars: true,
            keep_layout: false,
            collapse_whitespace: false,
            escape_markup: false,
        }
    }

    /// Display labels: names, titles, locations
    pub fn for_label() -> Self {
        Self {
            collapse_whitespace: true,
            ..Self::for_line()
        }
    }

    /// Free text that may later be shown as markup
    pub fn for_text() -> Self {
        Self {
            trim: false, // Leading indentation is content
            normalize_unicode: true,
            remove_null_bytes: true,
            remove_control_chars: true,
            keep_layout: true,
            collapse_whitespace: false,
            escape_markup: true,
        }
    }

    /// Secrets such as WiFi passwords: only null bytes go
    pub fn for_secret() -> Self {
        Self {
            trim: false,
            normalize_unicode: false,
            remove_null_bytes: true,
            remove_control_chars: false,
            keep_layout: true,
            collapse_whitespace: false,
            escape_markup: false,
        }
    }
}

/// Escape `< > & " '` to their entity equivalents
pub fn escape_markup(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 2);

    for c in input.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }

    result
}

/// Clean a single-line form value
pub fn clean_line(input: &str) -> String {
    sanitize_string(input, &SanitizeOptions::for_line())
}

/// Clean a display label
pub fn clean_label(input: &str) -> String {
    sanitize_string(input, &SanitizeOptions::for_label())
}

/// Clean and escape a free-text value
pub fn clean_text(input: &str) -> String {
    sanitize_string(input, &SanitizeOptions::for_text())
}

/// Clean a secret without altering its visible characters
pub fn clean_secret(input: &str) -> String {
    sanitize_string(input, &SanitizeOptions::for_secret())
}
