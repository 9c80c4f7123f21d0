//! HTTP fetching behind a trait so the upstream API can be swapped in tests

use std::time::Duration;

use async_trait::async_trait;

use super::types::{FetchError, RequestProfile};

/// Fetches a URL and returns the raw body of a successful response
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn fetch(&self, url: &str, profile: &RequestProfile) -> Result<Vec<u8>, FetchError>;
}

/// reqwest-backed fetcher
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Request {
                url: String::new(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, profile: &RequestProfile) -> Result<Vec<u8>, FetchError> {
        let mut request = self.client.get(url);
        for (name, value) in &profile.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| request_error(url, e))?;
        Ok(body.to_vec())
    }
}

fn request_error(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Try each profile in order and return the first successful body.
///
/// With no profiles a single plain request is made. When every profile fails
/// the last error is returned.
pub async fn fetch_with_profiles(
    fetcher: &dyn HttpFetcher,
    url: &str,
    profiles: &[RequestProfile],
) -> Result<Vec<u8>, FetchError> {
    let fallback = [RequestProfile::plain()];
    let profiles = if profiles.is_empty() {
        &fallback[..]
    } else {
        profiles
    };

    let mut last_error = None;
    for profile in profiles {
        match fetcher.fetch(url, profile).await {
            Ok(body) => {
                tracing::debug!(profile = %profile.name, bytes = body.len(), "Fetched {}", url);
                return Ok(body);
            }
            Err(e) => {
                tracing::warn!(profile = %profile.name, "Fetch attempt failed: {}", e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| FetchError::Request {
        url: url.to_string(),
        reason: "no request profiles attempted".to_string(),
    }))
}
