//! Signature image acquisition
//!
//! Talks to a third-party signature API through [`HttpFetcher`], retrying
//! each request across an ordered list of [`RequestProfile`]s.

mod fetcher;
mod generator;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use fetcher::{fetch_with_profiles, HttpFetcher, ReqwestFetcher};
pub use generator::{
    build_api_url, select_signature, SignatureGenerator, SignatureSelection, MAX_STYLE, MIN_STYLE,
    TYPOGRAPHY_KEYS,
};
pub use types::{
    FetchError, GeneratedSignature, RequestProfile, SignatureError, SignatureMetadata,
};
