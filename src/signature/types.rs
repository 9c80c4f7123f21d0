//! Signature acquisition types

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Header set sent with an upstream request.
///
/// The upstream API is picky about clients, so requests can be retried with a
/// different set of headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestProfile {
    pub name: String,
    pub headers: Vec<(String, String)>,
}

impl RequestProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Looks like a desktop browser visiting the provider's site
    pub fn browser() -> Self {
        Self::new("browser")
            .header(
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            )
            .header("Accept", "application/json, text/plain, */*")
            .header("Accept-Language", "es-ES,es;q=0.9,en;q=0.8")
            .header("Referer", "https://onlinesignatures.net/")
    }

    /// No extra headers beyond the client defaults
    pub fn plain() -> Self {
        Self::new("plain")
    }

    /// Profiles tried in order when nothing else is configured
    pub fn defaults() -> Vec<Self> {
        vec![Self::browser(), Self::plain()]
    }
}

/// Upstream fetch errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

/// Signature acquisition errors
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("First name and last name are required")]
    MissingName,

    #[error("Failed to fetch signature data: {0}")]
    Fetch(#[from] FetchError),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("No providers available in API response")]
    NoProviders,

    #[error("No valid signature found for provider '{0}'")]
    NoSignature(String),

    #[error("Failed to download signature image: {0}")]
    Download(FetchError),
}

/// Where a generated signature came from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureMetadata {
    pub first_name: String,
    pub last_name: String,
    pub provider: String,
    pub typography_key: String,
    pub used_style: u8,
    pub generated_at: DateTime<Utc>,
}

/// A downloaded signature image plus its source
#[derive(Debug, Clone)]
pub struct GeneratedSignature {
    pub image_bytes: Vec<u8>,
    pub image_url: String,
    pub metadata: SignatureMetadata,
}
