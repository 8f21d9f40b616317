//! QR Payload Types
//!
//! Common types used across the QR module.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::ErrorCorrectionLevel;

// =============================================================================
// Form input
// =============================================================================

/// A single form value as sent by the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

/// Raw field map for one content type (`map<string, string | bool>`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet(HashMap<String, FieldValue>);

impl FieldSet {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Text value of a field; absent fields and flags read as ""
    pub fn text(&self, key: &str) -> &str {
        match self.0.get(key) {
            Some(FieldValue::Text(s)) => s,
            _ => "",
        }
    }

    /// Boolean value of a field; text values "true", "1", "yes" and "on" count as set
    pub fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(FieldValue::Flag(b)) => *b,
            Some(FieldValue::Text(s)) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Content types
// =============================================================================

/// Social and media platforms with a profile-link format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Twitter,
    Instagram,
    Facebook,
    LinkedIn,
    YouTube,
    TikTok,
    GitHub,
    Telegram,
    WhatsApp,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 9] = [
        SocialPlatform::Twitter,
        SocialPlatform::Instagram,
        SocialPlatform::Facebook,
        SocialPlatform::LinkedIn,
        SocialPlatform::YouTube,
        SocialPlatform::TikTok,
        SocialPlatform::GitHub,
        SocialPlatform::Telegram,
        SocialPlatform::WhatsApp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::LinkedIn => "linkedin",
            SocialPlatform::YouTube => "youtube",
            SocialPlatform::TikTok => "tiktok",
            SocialPlatform::GitHub => "github",
            SocialPlatform::Telegram => "telegram",
            SocialPlatform::WhatsApp => "whatsapp",
        }
    }
}

impl FromStr for SocialPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "x" {
            return Ok(SocialPlatform::Twitter);
        }
        SocialPlatform::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| format!("unknown social platform: {}", s))
    }
}

/// The closed set of QR content types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Url,
    Text,
    Email,
    Phone,
    Sms,
    Wifi,
    Geo,
    Event,
    #[serde(rename = "vcard")]
    VCard,
    AppLink,
    Social(SocialPlatform),
}

impl ContentKind {
    /// Content whose payload is an http(s) link and may be wrapped in a short link
    pub fn is_linkable(&self) -> bool {
        matches!(self, ContentKind::Url | ContentKind::AppLink | ContentKind::Social(_))
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Url => f.write_str("url"),
            ContentKind::Text => f.write_str("text"),
            ContentKind::Email => f.write_str("email"),
            ContentKind::Phone => f.write_str("phone"),
            ContentKind::Sms => f.write_str("sms"),
            ContentKind::Wifi => f.write_str("wifi"),
            ContentKind::Geo => f.write_str("geo"),
            ContentKind::Event => f.write_str("event"),
            ContentKind::VCard => f.write_str("vcard"),
            ContentKind::AppLink => f.write_str("app_link"),
            ContentKind::Social(p) => write!(f, "social:{}", p.as_str()),
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some(platform) = lower.strip_prefix("social:") {
            return platform.parse().map(ContentKind::Social);
        }
        match lower.as_str() {
            "url" | "link" => Ok(ContentKind::Url),
            "text" => Ok(ContentKind::Text),
            "email" => Ok(ContentKind::Email),
            "phone" | "tel" => Ok(ContentKind::Phone),
            "sms" => Ok(ContentKind::Sms),
            "wifi" => Ok(ContentKind::Wifi),
            "geo" | "location" => Ok(ContentKind::Geo),
            "event" => Ok(ContentKind::Event),
            "vcard" | "contact" => Ok(ContentKind::VCard),
            "app_link" | "app" => Ok(ContentKind::AppLink),
            other => other
                .parse::<SocialPlatform>()
                .map(ContentKind::Social)
                .map_err(|_| format!("unknown content type: {}", s)),
        }
    }
}

// =============================================================================
// Alphabets and versions
// =============================================================================

/// QR character-set class, ordered by increasing bits-per-character cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphabetClass {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
}

impl AlphabetClass {
    pub const ALL: [AlphabetClass; 4] = [
        AlphabetClass::Numeric,
        AlphabetClass::Alphanumeric,
        AlphabetClass::Byte,
        AlphabetClass::Kanji,
    ];
}

impl fmt::Display for AlphabetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlphabetClass::Numeric => "numeric",
            AlphabetClass::Alphanumeric => "alphanumeric",
            AlphabetClass::Byte => "byte",
            AlphabetClass::Kanji => "kanji",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("QR version {0} is outside 1..=40")]
pub struct VersionOutOfRange(pub u8);

/// A QR symbol version in the range [1, 40]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// Panics if the number is outside the range [1, 40]; use `Version::try_from`
    /// for untrusted input.
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length of the symbol in modules
    pub const fn module_side(self) -> u32 {
        21 + 4 * (self.0 as u32 - 1)
    }

    /// All versions in increasing order
    pub fn all() -> impl Iterator<Item = Version> {
        (Version::MIN.0..=Version::MAX.0).map(Version)
    }
}

impl TryFrom<u8> for Version {
    type Error = VersionOutOfRange;

    fn try_from(ver: u8) -> Result<Self, Self::Error> {
        if (Version::MIN.0..=Version::MAX.0).contains(&ver) {
            Ok(Version(ver))
        } else {
            Err(VersionOutOfRange(ver))
        }
    }
}

impl From<Version> for u8 {
    fn from(v: Version) -> u8 {
        v.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Either pick the smallest fitting version or pin one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "VersionChoiceRepr", into = "VersionChoiceRepr")]
pub enum VersionChoice {
    #[default]
    Auto,
    Pinned(Version),
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum VersionChoiceRepr {
    Number(u8),
    Keyword(String),
}

impl TryFrom<VersionChoiceRepr> for VersionChoice {
    type Error = String;

    fn try_from(repr: VersionChoiceRepr) -> Result<Self, Self::Error> {
        match repr {
            VersionChoiceRepr::Number(n) => Version::try_from(n)
                .map(VersionChoice::Pinned)
                .map_err(|e| e.to_string()),
            VersionChoiceRepr::Keyword(s) => s.parse(),
        }
    }
}

impl From<VersionChoice> for VersionChoiceRepr {
    fn from(choice: VersionChoice) -> Self {
        match choice {
            VersionChoice::Auto => VersionChoiceRepr::Keyword("auto".to_string()),
            VersionChoice::Pinned(v) => VersionChoiceRepr::Number(v.value()),
        }
    }
}

impl FromStr for VersionChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(VersionChoice::Auto);
        }
        let n: u8 = trimmed
            .parse()
            .map_err(|_| format!("expected \"auto\" or a version number, got {:?}", s))?;
        Version::try_from(n)
            .map(VersionChoice::Pinned)
            .map_err(|e| e.to_string())
    }
}

impl fmt::Display for VersionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionChoice::Auto => f.write_str("auto"),
            VersionChoice::Pinned(v) => write!(f, "{}", v),
        }
    }
}

// =============================================================================
// Requests and results
// =============================================================================

/// One generation request: a snapshot of the form plus encoding options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub content_type: ContentKind,
    #[serde(default)]
    pub fields: FieldSet,
    #[serde(default)]
    pub level: ErrorCorrectionLevel,
    #[serde(default)]
    pub version: VersionChoice,
    /// Wrap the payload in a short link
    #[serde(default)]
    pub dynamic: bool,
}

impl GenerationRequest {
    pub fn new(content_type: ContentKind, fields: FieldSet) -> Self {
        Self {
            content_type,
            fields,
            level: ErrorCorrectionLevel::default(),
            version: VersionChoice::Auto,
            dynamic: false,
        }
    }

    pub fn with_level(mut self, level: ErrorCorrectionLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_version(mut self, version: VersionChoice) -> Self {
        self.version = version;
        self
    }

    pub fn with_dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }
}

/// A payload that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedPayload {
    pub content_type: ContentKind,
    pub raw_string: String,
    pub byte_length: usize,
    pub alphabet_class: AlphabetClass,
    /// Smallest version that holds the payload
    pub required_version: Version,
    pub level: ErrorCorrectionLevel,
    /// Original payload when `raw_string` is a short link
    pub short_link_source: Option<String>,
}

/// What the rendering side receives for an accepted request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTicket {
    pub payload: String,
    pub version: Version,
    pub level: ErrorCorrectionLevel,
}
