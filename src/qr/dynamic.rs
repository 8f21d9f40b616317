//! Dynamic QR Links
//!
//! Wraps an accepted link in a short link so the destination can change after
//! the code is printed. Issuing the short link is delegated to a
//! [`ShortLinkService`]; the adapter only guarantees that what comes back is a
//! usable http(s) reference.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Short-link issuance errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortLinkError {
    #[error("Short link service unavailable: {0}")]
    Unavailable(String),

    #[error("Short link service returned an invalid reference: {0}")]
    InvalidReference(String),

    #[error("Short link configuration error: {0}")]
    Config(String),
}

/// Backing service that turns a payload into a short reference
pub trait ShortLinkService {
    fn issue(&self, original: &str) -> Result<String, ShortLinkError>;
}

/// What to do when no short link can be issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortLinkFallback {
    /// Keep the accepted, unwrapped payload
    #[default]
    UseOriginal,
    /// Refuse the request
    Reject,
}

// =============================================================================
// Local issuer
// =============================================================================

/// Issues deterministic slugs under a base URL without any network call
#[derive(Debug, Clone)]
pub struct LocalShortLinker {
    base_url: String,
}

impl LocalShortLinker {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base58 of the first 6 bytes of the payload's SHA-256
    pub fn slug(original: &str) -> String {
        let digest = Sha256::digest(original.as_bytes());
        bs58::encode(&digest[..6]).into_string()
    }
}

impl ShortLinkService for LocalShortLinker {
    fn issue(&self, original: &str) -> Result<String, ShortLinkError> {
        if self.base_url.is_empty() {
            return Err(ShortLinkError::Config("no short link base URL".to_string()));
        }
        Ok(format!("{}/{}", self.base_url, Self::slug(original)))
    }
}

// =============================================================================
// HTTP issuer
// =============================================================================

#[derive(Serialize)]
struct IssueRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct IssueResponse {
    short_url: String,
}

/// Issues short links through a remote shortener API
///
/// Sends `POST {endpoint}` with `{"url": ...}` and expects `{"short_url": ...}`.
pub struct HttpShortLinker {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpShortLinker {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ShortLinkError> {
        let endpoint = endpoint.into();
        Url::parse(&endpoint)
            .map_err(|e| ShortLinkError::Config(format!("invalid endpoint {}: {}", endpoint, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ShortLinkError::Config(e.to_string()))?;

        Ok(Self { endpoint, client })
    }
}

impl ShortLinkService for HttpShortLinker {
    fn issue(&self, original: &str) -> Result<String, ShortLinkError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&IssueRequest { url: original })
            .send()
            .map_err(|e| ShortLinkError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ShortLinkError::Unavailable(format!(
                "shortener answered {}",
                response.status()
            )));
        }

        let body: IssueResponse = response
            .json()
            .map_err(|e| ShortLinkError::InvalidReference(e.to_string()))?;
        Ok(body.short_url)
    }
}

// =============================================================================
// Adapter
// =============================================================================

/// Applies a short-link service to accepted payloads
pub struct DynamicAdapter {
    service: Box<dyn ShortLinkService>,
    fallback: ShortLinkFallback,
}

impl DynamicAdapter {
    pub fn new(service: Box<dyn ShortLinkService>, fallback: ShortLinkFallback) -> Self {
        Self { service, fallback }
    }

    pub fn fallback(&self) -> ShortLinkFallback {
        self.fallback
    }

    /// Issue a reference for `resolved`. Anything that is not an absolute
    /// http(s) URL is reported as an error, never returned.
    pub fn wrap(&self, resolved: &str) -> Result<String, ShortLinkError> {
        let reference = self.service.issue(resolved)?;
        let reference = reference.trim();

        match Url::parse(reference) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                Ok(reference.to_string())
            }
            _ => Err(ShortLinkError::InvalidReference(reference.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedService(&'static str);

    impl ShortLinkService for FixedService {
        fn issue(&self, _original: &str) -> Result<String, ShortLinkError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_local_slug_is_deterministic() {
        let linker = LocalShortLinker::new("https://qr.example/");
        let a = linker.issue("https://example.com/menu").unwrap();
        let b = linker.issue("https://example.com/menu").unwrap();
        let c = linker.issue("https://example.com/other").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("https://qr.example/"));
        assert!(!a.contains("//qr.example//"));
    }

    #[test]
    fn test_local_requires_base() {
        let linker = LocalShortLinker::new("");
        assert!(matches!(linker.issue("x"), Err(ShortLinkError::Config(_))));
    }

    #[test]
    fn test_wrap_rejects_non_http_reference() {
        let adapter = DynamicAdapter::new(Box::new(FixedService("ftp://x/y")), ShortLinkFallback::UseOriginal);
        assert!(matches!(adapter.wrap("https://a.b"), Err(ShortLinkError::InvalidReference(_))));

        let adapter = DynamicAdapter::new(Box::new(FixedService("https://s.io/")), ShortLinkFallback::Reject);
        assert_eq!(adapter.wrap("https://a.b").unwrap(), "https://s.io/");
        assert_eq!(adapter.fallback(), ShortLinkFallback::Reject);
    }

    #[test]
    fn test_http_linker_rejects_bad_endpoint() {
        let result = HttpShortLinker::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(ShortLinkError::Config(_))));
    }

    #[test]
    fn test_http_linker_unreachable() {
        let linker = HttpShortLinker::new("http://127.0.0.1:9/shorten", Duration::from_millis(500)).unwrap();
        assert!(matches!(linker.issue("https://example.com"), Err(ShortLinkError::Unavailable(_))));
    }
}
