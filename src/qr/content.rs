//! Typed Content
//!
//! The typed view of a form: one variant per content type, each owning the
//! fields that type needs. Values are cleaned on the way in.

use serde::{Deserialize, Serialize};

use super::types::{ContentKind, FieldSet, SocialPlatform};
use crate::utils::sanitize::{clean_label, clean_line, clean_secret};

// =============================================================================
// Field structs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlFields {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFields {
    /// Raw text; escaping happens at encode time
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailFields {
    pub email: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneFields {
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsFields {
    pub number: String,
    pub message: String,
}

/// WiFi authentication as written in the `T:` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiSecurity {
    Wpa,
    Wep,
    NoPass,
}

impl WifiSecurity {
    pub fn as_str(&self) -> &'static str {
        match self {
            WifiSecurity::Wpa => "WPA",
            WifiSecurity::Wep => "WEP",
            WifiSecurity::NoPass => "nopass",
        }
    }

    /// Lenient parse; anything unrecognised is treated as WPA
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "wep" => WifiSecurity::Wep,
            "nopass" | "none" | "open" => WifiSecurity::NoPass,
            _ => WifiSecurity::Wpa,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiFields {
    pub ssid: String,
    pub password: String,
    pub security: WifiSecurity,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoFields {
    pub latitude: String,
    pub longitude: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFields {
    pub title: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VCardFields {
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub title: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub address: String,
}

/// App store the link points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppPlatform {
    Ios,
    Android,
}

impl AppPlatform {
    /// Lenient parse; anything that is not iOS is treated as Android
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" | "iphone" | "apple" | "app_store" => AppPlatform::Ios,
            _ => AppPlatform::Android,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppLinkFields {
    pub platform: AppPlatform,
    pub app_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialFields {
    pub platform: SocialPlatform,
    pub handle: String,
    /// Prefilled message, used by WhatsApp only
    pub message: String,
}

// =============================================================================
// Content
// =============================================================================

/// Structured content for one QR code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Content {
    Url(UrlFields),
    Text(TextFields),
    Email(EmailFields),
    Phone(PhoneFields),
    Sms(SmsFields),
    Wifi(WifiFields),
    Geo(GeoFields),
    Event(EventFields),
    #[serde(rename = "vcard")]
    VCard(VCardFields),
    AppLink(AppLinkFields),
    Social(SocialFields),
}

impl Content {
    /// Build the typed view of `fields` for `kind`. Missing fields read as empty;
    /// encoders decide what is mandatory.
    pub fn from_fields(kind: ContentKind, fields: &FieldSet) -> Self {
        match kind {
            ContentKind::Url => Content::Url(UrlFields {
                url: clean_line(fields.text("url")),
            }),
            ContentKind::Text => Content::Text(TextFields {
                text: fields.text("text").to_string(),
            }),
            ContentKind::Email => Content::Email(EmailFields {
                email: clean_line(fields.text("email")),
                subject: clean_line(fields.text("subject")),
                body: fields.text("body").to_string(),
            }),
            ContentKind::Phone => Content::Phone(PhoneFields {
                number: clean_line(fields.text("number")),
            }),
            ContentKind::Sms => Content::Sms(SmsFields {
                number: clean_line(fields.text("number")),
                message: fields.text("message").to_string(),
            }),
            ContentKind::Wifi => Content::Wifi(WifiFields {
                ssid: clean_line(fields.text("ssid")),
                password: clean_secret(fields.text("password")),
                security: WifiSecurity::parse_lenient(fields.text("security")),
                hidden: fields.flag("hidden"),
            }),
            ContentKind::Geo => Content::Geo(GeoFields {
                latitude: clean_line(fields.text("latitude")),
                longitude: clean_line(fields.text("longitude")),
                label: clean_label(fields.text("label")),
            }),
            ContentKind::Event => Content::Event(EventFields {
                title: clean_label(fields.text("title")),
                start: clean_line(fields.text("start")),
                end: clean_line(fields.text("end")),
                location: clean_label(fields.text("location")),
                description: fields.text("description").to_string(),
            }),
            ContentKind::VCard => Content::VCard(VCardFields {
                first_name: clean_label(fields.text("first_name")),
                last_name: clean_label(fields.text("last_name")),
                organization: clean_label(fields.text("organization")),
                title: clean_label(fields.text("title")),
                phone: clean_line(fields.text("phone")),
                email: clean_line(fields.text("email")),
                website: clean_line(fields.text("website")),
                address: clean_label(fields.text("address")),
            }),
            ContentKind::AppLink => Content::AppLink(AppLinkFields {
                platform: AppPlatform::parse_lenient(fields.text("platform")),
                app_id: clean_line(fields.text("app_id")),
            }),
            ContentKind::Social(platform) => Content::Social(SocialFields {
                platform,
                handle: clean_line(fields.text("handle")),
                message: fields.text("message").to_string(),
            }),
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Url(_) => ContentKind::Url,
            Content::Text(_) => ContentKind::Text,
            Content::Email(_) => ContentKind::Email,
            Content::Phone(_) => ContentKind::Phone,
            Content::Sms(_) => ContentKind::Sms,
            Content::Wifi(_) => ContentKind::Wifi,
            Content::Geo(_) => ContentKind::Geo,
            Content::Event(_) => ContentKind::Event,
            Content::VCard(_) => ContentKind::VCard,
            Content::AppLink(_) => ContentKind::AppLink,
            Content::Social(f) => ContentKind::Social(f.platform),
        }
    }
}
