//! Document traits
//!
//! The placement pipeline only needs a handful of document operations, so the
//! concrete PDF library stays behind these two traits.

use crate::placement::{PageGeometry, ResolvedPlacement, Result, ScaledImageBox};

/// Loads documents from raw bytes
pub trait PdfBackend: Send + Sync {
    type Document: SignableDocument;

    /// Parse a document, failing with `DocumentLoad` on unreadable input
    fn load(&self, bytes: &[u8]) -> Result<Self::Document>;
}

/// A loaded document that can receive a raster stamp
pub trait SignableDocument {
    /// Number of pages, in document order
    fn page_count(&self) -> usize;

    /// Size of the page at `index` (0-based)
    fn page_size(&self, index: usize) -> Result<PageGeometry>;

    /// Embed PNG bytes as an image resource. Other encodings are rejected.
    fn embed_png(&mut self, bytes: &[u8]) -> Result<EmbeddedImage>;

    /// Draw a previously embedded image onto the page at `index`
    fn draw_image(
        &mut self,
        index: usize,
        image: &EmbeddedImage,
        rect: ResolvedPlacement,
    ) -> Result<()>;

    /// Serialize the document, consuming it
    fn serialize(self) -> Result<Vec<u8>>;
}

/// Handle to an image embedded in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// Backend-specific slot for the image resource
    pub handle: usize,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl EmbeddedImage {
    /// Fit the image's native size into `max_width × max_height`
    pub fn fit_to_box(&self, max_width: f64, max_height: f64) -> ScaledImageBox {
        ScaledImageBox::fit(
            self.pixel_width as f64,
            self.pixel_height as f64,
            max_width,
            max_height,
        )
    }
}
