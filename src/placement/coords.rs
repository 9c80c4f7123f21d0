//! Coordinate conversion between the caller's top-left convention and the
//! page's native bottom-left system.

use super::types::{PageGeometry, ResolvedPlacement, ScaledImageBox};

/// Caller-facing origin, expressed as "pixels from the top-left corner".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopLeftOffset {
    pub x: f64,
    pub y: f64,
}

/// Pins `value` into `[0, upper]`, applying the upper bound first.
///
/// An inverted range (negative `upper`) collapses to 0.
pub fn clamp_to_page(value: f64, upper: f64) -> f64 {
    value.min(upper).max(0.0)
}

/// Converts a requested position into a draw rectangle that lies inside the page.
///
/// Missing coordinates fall back to `defaults`. The vertical request measures the
/// distance from the top of the page to the top edge of the image, so the image
/// height is subtracted after flipping the axis.
pub fn resolve(
    page: PageGeometry,
    image: ScaledImageBox,
    request_x: Option<f64>,
    request_y: Option<f64>,
    defaults: TopLeftOffset,
) -> ResolvedPlacement {
    let effective_x = request_x.unwrap_or(defaults.x);
    let y_from_top = request_y.unwrap_or(defaults.y);

    let native_y = page.height - y_from_top - image.height;

    ResolvedPlacement {
        x: clamp_to_page(effective_x, page.width - image.width),
        y: clamp_to_page(native_y, page.height - image.height),
        width: image.width,
        height: image.height,
    }
}
