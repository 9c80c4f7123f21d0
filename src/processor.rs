//! End-to-end signing of an uploaded PDF
//!
//! Downloads the chosen signature image, then stamps it on the blocking pool.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::placement::{PlacementError, ResolvedPlacement, SignaturePlacer, SignaturePosition};
use crate::signature::{fetch_with_profiles, FetchError, HttpFetcher, RequestProfile};

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to download signature image: {0}")]
    ImageDownload(#[from] FetchError),

    #[error("Failed to insert signature into PDF: {0}")]
    Placement(#[from] PlacementError),

    #[error("Signing task failed: {0}")]
    Task(String),
}

/// What to stamp and where
#[derive(Debug, Clone, Default)]
pub struct SignRequest {
    pub signature_image_url: String,
    pub position: SignaturePosition,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub processed_at: DateTime<Utc>,
    /// 1-based page the signature was drawn on
    pub page: usize,
    pub placement: ResolvedPlacement,
}

#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub pdf: Vec<u8>,
    pub filename: String,
    pub metadata: ProcessingMetadata,
}

#[derive(Clone)]
pub struct DocumentProcessor {
    fetcher: Arc<dyn HttpFetcher>,
    placer: Arc<SignaturePlacer>,
    profiles: Vec<RequestProfile>,
}

impl DocumentProcessor {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, placer: SignaturePlacer) -> Self {
        Self {
            fetcher,
            placer: Arc::new(placer),
            profiles: RequestProfile::defaults(),
        }
    }

    pub async fn process(
        &self,
        pdf: Vec<u8>,
        filename: String,
        request: SignRequest,
    ) -> Result<ProcessedDocument, ProcessError> {
        let full_name = full_name(request.first_name.as_deref(), request.last_name.as_deref());
        tracing::info!(
            filename = %filename,
            bytes = pdf.len(),
            signer = full_name.as_deref().unwrap_or("-"),
            "Signing PDF"
        );

        let image =
            fetch_with_profiles(self.fetcher.as_ref(), &request.signature_image_url, &self.profiles)
                .await?;

        let placer = self.placer.clone();
        let position = request.position;
        let stamped = tokio::task::spawn_blocking(move || placer.stamp(&pdf, &image, position))
            .await
            .map_err(|e| ProcessError::Task(e.to_string()))??;

        tracing::info!(
            filename = %filename,
            page = stamped.page_index + 1,
            x = stamped.placement.x,
            y = stamped.placement.y,
            "Signature inserted"
        );

        Ok(ProcessedDocument {
            pdf: stamped.pdf,
            filename,
            metadata: ProcessingMetadata {
                full_name,
                processed_at: Utc::now(),
                page: stamped.page_index + 1,
                placement: stamped.placement,
            },
        })
    }
}

fn full_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}
