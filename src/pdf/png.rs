//! PNG decoding for signature images

use image::ImageFormat;

use crate::placement::{PlacementError, Result};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// PNG pixels split into the planes a PDF image XObject expects
#[derive(Debug, Clone)]
pub struct DecodedPng {
    pub width: u32,
    pub height: u32,
    /// Interleaved 8-bit RGB samples
    pub rgb: Vec<u8>,
    /// 8-bit alpha plane, absent when every pixel is opaque
    pub alpha: Option<Vec<u8>>,
}

pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}

/// Decode PNG bytes. Any other encoding is rejected, even if `image` could read it.
pub fn decode_png(bytes: &[u8]) -> Result<DecodedPng> {
    if !is_png(bytes) {
        return Err(PlacementError::ImageEmbed(
            "input is not a PNG image".to_string(),
        ));
    }

    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| PlacementError::ImageEmbed(e.to_string()))?
        .to_rgba8();

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(PlacementError::ImageEmbed("image has no pixels".to_string()));
    }

    let pixel_count = (width as usize) * (height as usize);
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for pixel in img.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let alpha = if alpha.iter().all(|&a| a == u8::MAX) {
        None
    } else {
        Some(alpha)
    };

    Ok(DecodedPng {
        width,
        height,
        rgb,
        alpha,
    })
}
