//! Signature placement
//!
//! Fits a signature image into a bounding box derived from the target page,
//! converts the caller's top-left position into native page coordinates and
//! draws the image inside the page bounds.

mod coords;
mod error;
mod placer;
mod types;

pub use coords::{clamp_to_page, resolve, TopLeftOffset};
pub use error::{PlacementError, Result};
pub use placer::{target_page_index, SignaturePlacer, StampedDocument};
pub use types::{PageGeometry, PlacementConfig, ResolvedPlacement, ScaledImageBox, SignaturePosition};
