//! Signature placement pipeline

use tracing::debug;

use super::coords::{resolve, TopLeftOffset};
use super::error::{PlacementError, Result};
use super::types::{PlacementConfig, ResolvedPlacement, SignaturePosition};
use crate::pdf::{LopdfBackend, PdfBackend, SignableDocument};

/// Outcome of a successful placement
#[derive(Debug, Clone)]
pub struct StampedDocument {
    pub pdf: Vec<u8>,
    /// 0-based index of the page the signature landed on
    pub page_index: usize,
    pub placement: ResolvedPlacement,
}

/// Stamps a signature image onto one page of a PDF.
///
/// Each call loads its own document, so a placer can be shared freely
/// between concurrent requests.
#[derive(Debug, Clone)]
pub struct SignaturePlacer<B = LopdfBackend> {
    backend: B,
    config: PlacementConfig,
}

impl SignaturePlacer<LopdfBackend> {
    pub fn new(config: PlacementConfig) -> Self {
        Self::with_backend(LopdfBackend, config)
    }
}

impl<B: PdfBackend> SignaturePlacer<B> {
    pub fn with_backend(backend: B, config: PlacementConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Place the signature and return the serialized document
    pub fn place(
        &self,
        pdf_bytes: &[u8],
        image_bytes: &[u8],
        position: Option<SignaturePosition>,
    ) -> Result<Vec<u8>> {
        self.stamp(pdf_bytes, image_bytes, position.unwrap_or_default())
            .map(|stamped| stamped.pdf)
    }

    /// Place the signature, also reporting where it was drawn
    pub fn stamp(
        &self,
        pdf_bytes: &[u8],
        image_bytes: &[u8],
        position: SignaturePosition,
    ) -> Result<StampedDocument> {
        let mut doc = self.backend.load(pdf_bytes)?;

        let page_count = doc.page_count();
        if page_count == 0 {
            return Err(PlacementError::EmptyDocument);
        }

        let requested_page = position.page.unwrap_or(self.config.default_page);
        let page_index = target_page_index(requested_page, page_count);
        let page = doc.page_size(page_index)?;

        let image = doc.embed_png(image_bytes)?;
        let (max_width, max_height) = self.config.bounding_box(page);
        let scaled = image.fit_to_box(max_width, max_height);

        let placement = resolve(
            page,
            scaled,
            position.x,
            position.y,
            TopLeftOffset {
                x: self.config.default_x,
                y: self.config.default_y,
            },
        );

        debug!(
            requested_page,
            page_index,
            page_width = page.width,
            page_height = page.height,
            x = placement.x,
            y = placement.y,
            width = placement.width,
            height = placement.height,
            "Resolved signature placement"
        );

        doc.draw_image(page_index, &image, placement)?;
        let pdf = doc.serialize()?;

        Ok(StampedDocument {
            pdf,
            page_index,
            placement,
        })
    }
}

/// Maps a 1-based page request onto an existing page.
///
/// Requests past the end land on the last page; zero and negative requests
/// land on the first.
pub fn target_page_index(requested: i64, page_count: usize) -> usize {
    let last = page_count.saturating_sub(1) as i64;
    requested.saturating_sub(1).clamp(0, last) as usize
}
