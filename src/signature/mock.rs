//! Canned-response fetcher for tests

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use super::fetcher::HttpFetcher;
use super::types::{FetchError, RequestProfile};

/// Serves bodies by URL prefix and records every request made
#[derive(Default)]
pub struct MockFetcher {
    routes: Vec<(String, Vec<u8>)>,
    rejected_profiles: HashSet<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for any URL starting with `prefix`
    pub fn respond(mut self, prefix: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.push((prefix.to_string(), body.into()));
        self
    }

    /// Answer 403 to every request made with this profile
    pub fn reject_profile(mut self, name: &str) -> Self {
        self.rejected_profiles.insert(name.to_string());
        self
    }

    /// `(url, profile name)` pairs in request order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetcher for MockFetcher {
    async fn fetch(&self, url: &str, profile: &RequestProfile) -> Result<Vec<u8>, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), profile.name.clone()));

        if self.rejected_profiles.contains(&profile.name) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 403,
            });
        }

        self.routes
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
