//! Payload Encoders
//!
//! One pure function per content type, producing the string format third-party
//! scanners understand (`mailto:`, `tel:`, `sms:`, `WIFI:`, `geo:`, iCalendar,
//! vCard, store and profile links).
//!
//! Every encoder returns an empty string when a mandatory field is missing, so a
//! half-built scheme prefix never reaches the validator.

use chrono::{NaiveDate, NaiveDateTime};

use super::content::{
    AppLinkFields, AppPlatform, Content, EmailFields, EventFields, GeoFields, PhoneFields,
    SmsFields, SocialFields, TextFields, UrlFields, VCardFields, WifiFields, WifiSecurity,
};
use super::types::SocialPlatform;
use crate::utils::sanitize::clean_text;

/// Encode any content into its payload string
pub fn encode(content: &Content) -> String {
    match content {
        Content::Url(f) => encode_url(f),
        Content::Text(f) => encode_text(f),
        Content::Email(f) => encode_email(f),
        Content::Phone(f) => encode_phone(f),
        Content::Sms(f) => encode_sms(f),
        Content::Wifi(f) => encode_wifi(f),
        Content::Geo(f) => encode_geo(f),
        Content::Event(f) => encode_event(f),
        Content::VCard(f) => encode_vcard(f),
        Content::AppLink(f) => encode_app_link(f),
        Content::Social(f) => encode_social(f),
    }
}

/// URL passes through; shape is checked by the validator
pub fn encode_url(fields: &UrlFields) -> String {
    fields.url.clone()
}

/// Free text with markup characters escaped
pub fn encode_text(fields: &TextFields) -> String {
    if fields.text.trim().is_empty() {
        return String::new();
    }
    clean_text(&fields.text)
}

/// `mailto:{email}?subject=..&body=..`
pub fn encode_email(fields: &EmailFields) -> String {
    if fields.email.is_empty() {
        return String::new();
    }
    format!(
        "mailto:{}?subject={}&body={}",
        fields.email,
        urlencoding::encode(&fields.subject),
        urlencoding::encode(&fields.body)
    )
}

/// `tel:{number}`
pub fn encode_phone(fields: &PhoneFields) -> String {
    if fields.number.is_empty() {
        return String::new();
    }
    format!("tel:{}", fields.number)
}

/// `sms:{number}`, with `?body=` only when there is a message
pub fn encode_sms(fields: &SmsFields) -> String {
    if fields.number.is_empty() {
        return String::new();
    }
    if fields.message.is_empty() {
        format!("sms:{}", fields.number)
    } else {
        format!("sms:{}?body={}", fields.number, urlencoding::encode(&fields.message))
    }
}

/// `WIFI:T:{security};S:{ssid};P:{password};H:{hidden};;`
pub fn encode_wifi(fields: &WifiFields) -> String {
    if fields.ssid.is_empty() {
        return String::new();
    }
    let password = match fields.security {
        WifiSecurity::NoPass => String::new(),
        _ => escape_wifi(&fields.password),
    };
    format!(
        "WIFI:T:{};S:{};P:{};H:{};;",
        fields.security.as_str(),
        escape_wifi(&fields.ssid),
        password,
        fields.hidden
    )
}

/// `geo:{lat},{lng}`, with `?q=` for a label
pub fn encode_geo(fields: &GeoFields) -> String {
    if fields.latitude.is_empty() || fields.longitude.is_empty() {
        return String::new();
    }
    let mut uri = format!("geo:{},{}", fields.latitude, fields.longitude);
    if !fields.label.is_empty() {
        uri.push_str("?q=");
        uri.push_str(&urlencoding::encode(&fields.label));
    }
    uri
}

/// iCalendar VEVENT block
pub fn encode_event(fields: &EventFields) -> String {
    if fields.title.is_empty() || fields.start.is_empty() {
        return String::new();
    }

    let mut lines = vec![
        "BEGIN:VEVENT".to_string(),
        format!("SUMMARY:{}", escape_structured(&fields.title)),
        ical_datetime("DTSTART", &fields.start),
    ];
    if !fields.end.is_empty() {
        lines.push(ical_datetime("DTEND", &fields.end));
    }
    if !fields.location.is_empty() {
        lines.push(format!("LOCATION:{}", escape_structured(&fields.location)));
    }
    if !fields.description.is_empty() {
        lines.push(format!("DESCRIPTION:{}", escape_structured(&fields.description)));
    }
    lines.push("END:VEVENT".to_string());
    lines.join("\n")
}

/// vCard 3.0 contact
pub fn encode_vcard(fields: &VCardFields) -> String {
    if fields.first_name.is_empty() && fields.last_name.is_empty() {
        return String::new();
    }

    let full_name = format!("{} {}", fields.first_name, fields.last_name);
    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!(
            "N:{};{}",
            escape_structured(&fields.last_name),
            escape_structured(&fields.first_name)
        ),
        format!("FN:{}", escape_structured(full_name.trim())),
    ];

    let optional = [
        ("ORG", &fields.organization),
        ("TITLE", &fields.title),
        ("TEL", &fields.phone),
        ("EMAIL", &fields.email),
        ("URL", &fields.website),
    ];
    for (name, value) in optional {
        if !value.is_empty() {
            lines.push(format!("{}:{}", name, escape_structured(value)));
        }
    }
    if !fields.address.is_empty() {
        lines.push(format!("ADR:;;{};;;;", escape_structured(&fields.address)));
    }

    lines.push("END:VCARD".to_string());
    lines.join("\n")
}

/// App Store or Play Store listing
pub fn encode_app_link(fields: &AppLinkFields) -> String {
    let id = fields.app_id.as_str();
    if id.is_empty() {
        return String::new();
    }
    match fields.platform {
        AppPlatform::Ios => {
            // Numeric store ids need the "id" prefix
            if id.chars().all(|c| c.is_ascii_digit()) {
                format!("https://apps.apple.com/app/id{}", id)
            } else {
                format!("https://apps.apple.com/app/{}", urlencoding::encode(id))
            }
        }
        AppPlatform::Android => format!(
            "https://play.google.com/store/apps/details?id={}",
            urlencoding::encode(id)
        ),
    }
}

/// Profile link for a handle
pub fn encode_social(fields: &SocialFields) -> String {
    let handle = fields.handle.trim_start_matches('@');
    if handle.is_empty() {
        return String::new();
    }
    if handle.starts_with("https://") || handle.starts_with("http://") {
        return handle.to_string();
    }

    match fields.platform {
        SocialPlatform::Twitter => format!("https://x.com/{}", handle),
        SocialPlatform::Instagram => format!("https://instagram.com/{}", handle),
        SocialPlatform::Facebook => format!("https://facebook.com/{}", handle),
        SocialPlatform::LinkedIn => format!("https://linkedin.com/in/{}", handle),
        SocialPlatform::YouTube => format!("https://youtube.com/@{}", handle),
        SocialPlatform::TikTok => format!("https://tiktok.com/@{}", handle),
        SocialPlatform::GitHub => format!("https://github.com/{}", handle),
        SocialPlatform::Telegram => format!("https://t.me/{}", handle),
        SocialPlatform::WhatsApp => {
            let digits: String = handle.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                return String::new();
            }
            if fields.message.is_empty() {
                format!("https://wa.me/{}", digits)
            } else {
                format!("https://wa.me/{}?text={}", digits, urlencoding::encode(&fields.message))
            }
        }
    }
}

/// Backslash-escape the WIFI: special characters `\ ; , : "`
fn escape_wifi(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ';' | ',' | ':' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// vCard/iCalendar text escaping: `\ ; ,` and newlines
fn escape_structured(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | ';' | ',' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Render a form datetime as an iCalendar property. Values that do not parse
/// are assumed to be in iCalendar form already.
fn ical_datetime(name: &str, raw: &str) -> String {
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return format!("{}:{}", name, dt.format("%Y%m%dT%H%M%S"));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return format!("{};VALUE=DATE:{}", name, date.format("%Y%m%d"));
    }
    format!("{}:{}", name, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wifi(ssid: &str, password: &str, security: WifiSecurity, hidden: bool) -> WifiFields {
        WifiFields {
            ssid: ssid.into(),
            password: password.into(),
            security,
            hidden,
        }
    }

    #[test]
    fn test_wifi_wpa() {
        let encoded = encode_wifi(&wifi("Home", "pass1234", WifiSecurity::Wpa, false));
        assert_eq!(encoded, "WIFI:T:WPA;S:Home;P:pass1234;H:false;;");
    }

    #[test]
    fn test_wifi_nopass_drops_password() {
        let encoded = encode_wifi(&wifi("Cafe", "leftover", WifiSecurity::NoPass, true));
        assert_eq!(encoded, "WIFI:T:nopass;S:Cafe;P:;H:true;;");
    }

    #[test]
    fn test_wifi_escapes_specials() {
        let encoded = encode_wifi(&wifi("My;Net", "a:b\"c", WifiSecurity::Wep, false));
        assert_eq!(encoded, "WIFI:T:WEP;S:My\\;Net;P:a\\:b\\\"c;H:false;;");
    }

    #[test]
    fn test_wifi_requires_ssid() {
        assert_eq!(encode_wifi(&wifi("", "pass", WifiSecurity::Wpa, false)), "");
    }

    #[test]
    fn test_email() {
        let fields = EmailFields {
            email: "a@b.com".into(),
            subject: "Hi".into(),
            body: "".into(),
        };
        assert_eq!(encode_email(&fields), "mailto:a@b.com?subject=Hi&body=");
    }

    #[test]
    fn test_email_encodes_subject_and_body() {
        let fields = EmailFields {
            email: "a@b.com".into(),
            subject: "Hello there".into(),
            body: "x&y=z".into(),
        };
        assert_eq!(
            encode_email(&fields),
            "mailto:a@b.com?subject=Hello%20there&body=x%26y%3Dz"
        );
    }

    #[test]
    fn test_email_without_address_is_empty() {
        let fields = EmailFields {
            email: "".into(),
            subject: "Hi".into(),
            body: "Body".into(),
        };
        assert_eq!(encode_email(&fields), "");
    }

    #[test]
    fn test_phone_and_sms() {
        assert_eq!(encode_phone(&PhoneFields { number: "+15551234".into() }), "tel:+15551234");
        assert_eq!(encode_phone(&PhoneFields { number: "".into() }), "");

        let plain = SmsFields { number: "+15551234".into(), message: "".into() };
        assert_eq!(encode_sms(&plain), "sms:+15551234");

        let with_body = SmsFields { number: "+15551234".into(), message: "See you".into() };
        assert_eq!(encode_sms(&with_body), "sms:+15551234?body=See%20you");
    }

    #[test]
    fn test_text_is_escaped() {
        let fields = TextFields { text: "<script>alert('x')</script>".into() };
        assert_eq!(
            encode_text(&fields),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
        assert_eq!(encode_text(&TextFields { text: "   ".into() }), "");
    }

    #[test]
    fn test_geo() {
        let fields = GeoFields {
            latitude: "52.52".into(),
            longitude: "13.405".into(),
            label: "Berlin Mitte".into(),
        };
        assert_eq!(encode_geo(&fields), "geo:52.52,13.405?q=Berlin%20Mitte");

        let missing = GeoFields { latitude: "52.52".into(), longitude: "".into(), label: "".into() };
        assert_eq!(encode_geo(&missing), "");
    }

    #[test]
    fn test_event() {
        let fields = EventFields {
            title: "Launch, v2".into(),
            start: "2026-03-01T18:30".into(),
            end: "2026-03-01".into(),
            location: "".into(),
            description: "Line one\nLine two".into(),
        };
        assert_eq!(
            encode_event(&fields),
            "BEGIN:VEVENT\nSUMMARY:Launch\\, v2\nDTSTART:20260301T183000\n\
             DTEND;VALUE=DATE:20260301\nDESCRIPTION:Line one\\nLine two\nEND:VEVENT"
        );
    }

    #[test]
    fn test_event_requires_title_and_start() {
        let fields = EventFields {
            title: "Party".into(),
            start: "".into(),
            end: "".into(),
            location: "".into(),
            description: "".into(),
        };
        assert_eq!(encode_event(&fields), "");
    }

    #[test]
    fn test_vcard() {
        let fields = VCardFields {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            organization: "Analytical Engines; Ltd".into(),
            title: "".into(),
            phone: "+44 20 7946 0000".into(),
            email: "ada@example.com".into(),
            website: "".into(),
            address: "".into(),
        };
        assert_eq!(
            encode_vcard(&fields),
            "BEGIN:VCARD\nVERSION:3.0\nN:Lovelace;Ada\nFN:Ada Lovelace\n\
             ORG:Analytical Engines\\; Ltd\nTEL:+44 20 7946 0000\nEMAIL:ada@example.com\nEND:VCARD"
        );
    }

    #[test]
    fn test_vcard_requires_a_name() {
        let fields = VCardFields {
            first_name: "".into(),
            last_name: "".into(),
            organization: "Acme".into(),
            title: "".into(),
            phone: "".into(),
            email: "".into(),
            website: "".into(),
            address: "".into(),
        };
        assert_eq!(encode_vcard(&fields), "");
    }

    #[test]
    fn test_app_links() {
        let ios = AppLinkFields { platform: AppPlatform::Ios, app_id: "284882215".into() };
        assert_eq!(encode_app_link(&ios), "https://apps.apple.com/app/id284882215");

        let slug = AppLinkFields { platform: AppPlatform::Ios, app_id: "my app?x".into() };
        assert_eq!(encode_app_link(&slug), "https://apps.apple.com/app/my%20app%3Fx");

        let android = AppLinkFields {
            platform: AppPlatform::Android,
            app_id: "com.example.app".into(),
        };
        assert_eq!(
            encode_app_link(&android),
            "https://play.google.com/store/apps/details?id=com.example.app"
        );
    }

    #[test]
    fn test_social_links() {
        let social = |platform, handle: &str| SocialFields {
            platform,
            handle: handle.into(),
            message: "".into(),
        };

        assert_eq!(encode_social(&social(SocialPlatform::Instagram, "@shop")), "https://instagram.com/shop");
        assert_eq!(encode_social(&social(SocialPlatform::LinkedIn, "ada")), "https://linkedin.com/in/ada");
        assert_eq!(encode_social(&social(SocialPlatform::TikTok, "dance")), "https://tiktok.com/@dance");
        assert_eq!(
            encode_social(&social(SocialPlatform::GitHub, "https://github.com/rust-lang")),
            "https://github.com/rust-lang"
        );
        assert_eq!(encode_social(&social(SocialPlatform::Telegram, "@")), "");
    }

    #[test]
    fn test_whatsapp_link() {
        let fields = SocialFields {
            platform: SocialPlatform::WhatsApp,
            handle: "+1 (555) 123-4567".into(),
            message: "Hi there".into(),
        };
        assert_eq!(encode_social(&fields), "https://wa.me/15551234567?text=Hi%20there");
    }
}
