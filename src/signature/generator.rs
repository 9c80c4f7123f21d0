//! Signature generation against the onlinesignatures.net data API

use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

use super::fetcher::{fetch_with_profiles, HttpFetcher};
use super::types::{GeneratedSignature, RequestProfile, SignatureError, SignatureMetadata};

pub const MIN_STYLE: u8 = 0;
pub const MAX_STYLE: u8 = 8;

/// Typography variants the provider renders for every name
pub const TYPOGRAPHY_KEYS: [&str; 7] = [
    "nikita Sobolev",
    "SNikita",
    "Nsobolev",
    "Nikita",
    "Sobolev",
    "SANikita",
    "NASobolev",
];

/// Generates signature images through the third-party API
#[derive(Clone)]
pub struct SignatureGenerator {
    fetcher: Arc<dyn HttpFetcher>,
    base_url: String,
    profiles: Vec<RequestProfile>,
}

impl SignatureGenerator {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            profiles: RequestProfile::defaults(),
        }
    }

    pub fn with_profiles(mut self, profiles: Vec<RequestProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    /// Pick a random style, provider and typography and download the image
    pub async fn generate<R: Rng + Send>(
        &self,
        first_name: &str,
        last_name: &str,
        rng: &mut R,
    ) -> Result<GeneratedSignature, SignatureError> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(SignatureError::MissingName);
        }

        let style = rng.gen_range(MIN_STYLE..=MAX_STYLE);
        let url = build_api_url(
            &self.base_url,
            &[
                ("first-name", first_name.to_string()),
                ("last-name", last_name.to_string()),
                ("styles", style.to_string()),
            ],
        );

        tracing::info!(style, "Requesting signature data for {} {}", first_name, last_name);
        let body = fetch_with_profiles(self.fetcher.as_ref(), &url, &self.profiles).await?;
        let payload: Value = serde_json::from_slice(&body)
            .map_err(|e| SignatureError::InvalidResponse(e.to_string()))?;

        let selection = select_signature(&payload, rng)?;

        let image_bytes = fetch_with_profiles(self.fetcher.as_ref(), &selection.image_url, &self.profiles)
            .await
            .map_err(SignatureError::Download)?;

        tracing::info!(
            provider = %selection.provider,
            typography = %selection.typography_key,
            bytes = image_bytes.len(),
            "Signature image downloaded"
        );

        Ok(GeneratedSignature {
            image_bytes,
            image_url: selection.image_url,
            metadata: SignatureMetadata {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                provider: selection.provider,
                typography_key: selection.typography_key,
                used_style: style,
                generated_at: Utc::now(),
            },
        })
    }
}

/// Provider and image chosen from an API payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureSelection {
    pub provider: String,
    /// The randomly requested key, even when a fallback image was used
    pub typography_key: String,
    pub image_url: String,
}

/// Choose a provider at random, then a typography.
///
/// If the chosen typography has no image, the first entry of the provider that
/// does have one is used instead.
pub fn select_signature<R: Rng>(payload: &Value, rng: &mut R) -> Result<SignatureSelection, SignatureError> {
    let providers = payload
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| SignatureError::InvalidResponse("missing data field".to_string()))?;

    let names: Vec<&String> = providers.keys().collect();
    let provider = names.choose(rng).ok_or(SignatureError::NoProviders)?;

    let typography_key = TYPOGRAPHY_KEYS
        .choose(rng)
        .copied()
        .unwrap_or(TYPOGRAPHY_KEYS[0]);

    let signatures = providers.get(provider.as_str()).and_then(Value::as_object);
    let image_url = signatures
        .and_then(|sigs| {
            sigs.get(typography_key)
                .and_then(image_of)
                .or_else(|| sigs.values().find_map(image_of))
        })
        .ok_or_else(|| SignatureError::NoSignature(provider.to_string()))?;

    Ok(SignatureSelection {
        provider: provider.to_string(),
        typography_key: typography_key.to_string(),
        image_url: image_url.to_string(),
    })
}

fn image_of(signature: &Value) -> Option<&str> {
    signature
        .get("image")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
}

/// Append non-empty query parameters to `base`
pub fn build_api_url(base: &str, params: &[(&str, String)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect();

    if query.is_empty() {
        return base.to_string();
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, separator, query.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::mock::MockFetcher;
    use crate::signature::types::FetchError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    const API: &str = "https://signatures.test/api/get-signatures-data";

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn single_provider_payload() -> Value {
        let entries: serde_json::Map<String, Value> = TYPOGRAPHY_KEYS
            .iter()
            .map(|key| {
                (
                    key.to_string(),
                    json!({ "image": format!("https://cdn.test/{}.png", key.replace(' ', "_")) }),
                )
            })
            .collect();
        json!({ "data": { "alpha": entries } })
    }

    #[test]
    fn test_build_api_url_skips_empty() {
        let url = build_api_url(
            API,
            &[
                ("first-name", "José María".to_string()),
                ("last-name", String::new()),
                ("styles", "3".to_string()),
            ],
        );
        assert_eq!(url, format!("{}?first-name=Jos%C3%A9%20Mar%C3%ADa&styles=3", API));
    }

    #[test]
    fn test_build_api_url_existing_query() {
        let url = build_api_url("https://x.test/a?k=v", &[("styles", "1".to_string())]);
        assert_eq!(url, "https://x.test/a?k=v&styles=1");
    }

    #[test]
    fn test_select_uses_requested_typography() {
        let selection = select_signature(&single_provider_payload(), &mut rng()).unwrap();
        assert_eq!(selection.provider, "alpha");
        assert!(TYPOGRAPHY_KEYS.contains(&selection.typography_key.as_str()));
        assert_eq!(
            selection.image_url,
            format!("https://cdn.test/{}.png", selection.typography_key.replace(' ', "_"))
        );
    }

    #[test]
    fn test_select_falls_back_to_first_image() {
        let payload = json!({
            "data": {
                "beta": {
                    "unrelated": { "image": "" },
                    "other": { "image": "https://cdn.test/fallback.png" }
                }
            }
        });
        let selection = select_signature(&payload, &mut rng()).unwrap();
        assert_eq!(selection.image_url, "https://cdn.test/fallback.png");
    }

    #[test]
    fn test_select_errors() {
        let missing = select_signature(&json!({ "status": "ok" }), &mut rng()).unwrap_err();
        assert!(matches!(missing, SignatureError::InvalidResponse(_)));

        let empty = select_signature(&json!({ "data": {} }), &mut rng()).unwrap_err();
        assert!(matches!(empty, SignatureError::NoProviders));

        let no_images = select_signature(&json!({ "data": { "gamma": { "SNikita": {} } } }), &mut rng())
            .unwrap_err();
        assert!(matches!(no_images, SignatureError::NoSignature(p) if p == "gamma"));
    }

    #[tokio::test]
    async fn test_generate_downloads_selected_image() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .respond(API, serde_json::to_vec(&single_provider_payload()).unwrap())
                .respond("https://cdn.test/", b"\x89PNG-bytes".to_vec()),
        );
        let generator = SignatureGenerator::new(fetcher.clone(), API);

        let signature = generator.generate("  Ada ", "Lovelace", &mut rng()).await.unwrap();

        assert_eq!(signature.image_bytes, b"\x89PNG-bytes");
        assert!(signature.image_url.starts_with("https://cdn.test/"));
        assert_eq!(signature.metadata.first_name, "Ada");
        assert_eq!(signature.metadata.provider, "alpha");
        assert!(signature.metadata.used_style <= MAX_STYLE);

        let calls = fetcher.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].0.starts_with(&format!("{}?first-name=Ada&last-name=Lovelace&styles=", API)));
        assert_eq!(calls[1].0, signature.image_url);
    }

    #[tokio::test]
    async fn test_generate_requires_names() {
        let generator = SignatureGenerator::new(Arc::new(MockFetcher::new()), API);
        let err = generator.generate("Ada", "   ", &mut rng()).await.unwrap_err();
        assert!(matches!(err, SignatureError::MissingName));
    }

    #[tokio::test]
    async fn test_generate_reports_download_failure() {
        let payload = json!({ "data": { "alpha": { "SNikita": { "image": "https://gone.test/x.png" } } } });
        let fetcher = MockFetcher::new().respond(API, serde_json::to_vec(&payload).unwrap());
        let generator = SignatureGenerator::new(Arc::new(fetcher), API);

        let err = generator.generate("Ada", "Lovelace", &mut rng()).await.unwrap_err();
        assert!(matches!(err, SignatureError::Download(FetchError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_generate_rejects_non_json() {
        let fetcher = MockFetcher::new().respond(API, b"<html>blocked</html>".to_vec());
        let generator = SignatureGenerator::new(Arc::new(fetcher), API)
            .with_profiles(vec![RequestProfile::plain()]);

        let err = generator.generate("Ada", "Lovelace", &mut rng()).await.unwrap_err();
        assert!(matches!(err, SignatureError::InvalidResponse(_)));
    }
}
