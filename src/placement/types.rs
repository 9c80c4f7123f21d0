//! Placement geometry types

use serde::{Deserialize, Serialize};

/// Size of a page in its native coordinate system (points, bottom-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

/// Image dimensions after fitting into the signature bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaledImageBox {
    pub width: f64,
    pub height: f64,
}

impl ScaledImageBox {
    /// Uniformly scales `width × height` so that both sides fit the box.
    ///
    /// Images smaller than the box are scaled up. Degenerate source sizes
    /// produce an empty box.
    pub fn fit(width: f64, height: f64, max_width: f64, max_height: f64) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self {
                width: 0.0,
                height: 0.0,
            };
        }

        let scale = (max_width / width).min(max_height / height);
        Self {
            width: width * scale,
            height: height * scale,
        }
    }
}

/// Final draw rectangle in native page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedPlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Caller intent for where the signature goes.
///
/// `y` is measured from the top edge of the page. `page` is 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignaturePosition {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub page: Option<i64>,
}

/// Placement defaults and bounding-box fractions
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlacementConfig {
    pub default_x: f64,
    pub default_y: f64,
    pub default_page: i64,
    pub max_width_fraction: f64,
    pub max_height_fraction: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            default_x: 200.0,
            default_y: 400.0,
            default_page: 1,
            max_width_fraction: 0.25,
            max_height_fraction: 0.10,
        }
    }
}

impl PlacementConfig {
    /// Bounding box the signature is fitted into on a page of the given size
    pub fn bounding_box(&self, page: PageGeometry) -> (f64, f64) {
        (
            page.width * self.max_width_fraction,
            page.height * self.max_height_fraction,
        )
    }
}
