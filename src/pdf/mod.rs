//! PDF document access
//!
//! `SignableDocument` is the narrow surface the placement pipeline needs.
//! `LopdfBackend` is the production implementation.

mod lopdf_backend;
mod png;
mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use lopdf_backend::{LopdfBackend, LopdfDocument};
pub use png::{decode_png, is_png, DecodedPng};
pub use traits::{EmbeddedImage, PdfBackend, SignableDocument};
