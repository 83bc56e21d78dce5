use portal_shortener::{ShortenRequest, Shortened};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ShortenRequestBody {
    pub url: String,
    #[serde(default)]
    pub short: Option<String>,
    /// Retention in hours.
    #[serde(default)]
    pub expiry: Option<u64>,
}

impl From<ShortenRequestBody> for ShortenRequest {
    fn from(body: ShortenRequestBody) -> Self {
        ShortenRequest {
            url: body.url,
            custom: body.short,
            expiry_hours: body.expiry,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShortenResponseBody {
    pub url: String,
    pub short: String,
    pub expiry: u64,
    pub rate_limit_remaining: i64,
    pub rate_limit_reset_minutes: u64,
}

impl From<Shortened> for ShortenResponseBody {
    fn from(shortened: Shortened) -> Self {
        ShortenResponseBody {
            url: shortened.link.target,
            short: shortened.short_url,
            expiry: shortened.link.expiry.hours(),
            rate_limit_remaining: shortened.quota.remaining,
            rate_limit_reset_minutes: shortened.quota.reset_in.as_secs() / 60,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_reset_minutes: Option<u64>,
}

impl ErrorResponse {
    pub fn new(error: &'static str) -> Self {
        Self {
            error,
            rate_limit_reset_minutes: None,
        }
    }
}
