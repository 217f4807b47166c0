// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo file loading and encoding.
//!
//! This module decodes photos into RGBA buffers for editing and display,
//! and flattens edited buffers into JPEG bytes for storage.

use crate::error::{Result, SitemarkError};
use crate::models::annotation::Color;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage, RgbaImage};
use std::path::Path;

/// Quality used when saving annotated photos.
pub const ANNOTATED_JPEG_QUALITY: u8 = 95;

/// Quality used when embedding photos into a ledger.
pub const LEDGER_JPEG_QUALITY: u8 = 85;

/// Load and fully decode an image file.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let bytes = std::fs::read(path).map_err(|e| SitemarkError::load(path.display().to_string(), e))?;
    decode_image(&bytes, &path.display().to_string())
}

/// Decode in-memory image bytes. `name` only labels errors.
pub fn decode_image(bytes: &[u8], name: &str) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes).map_err(|e| SitemarkError::load(name, e))?;
    Ok(image.to_rgba8())
}

/// Composite a straight-alpha buffer over an opaque background.
pub fn flatten_over(image: &RgbaImage, background: Color) -> RgbImage {
    let (w, h) = image.dimensions();
    let bg = [background.r, background.g, background.b];
    RgbImage::from_fn(w, h, |x, y| {
        let px = image.get_pixel(x, y);
        let a = px[3] as f32 / 255.0;
        let mut out = [0u8; 3];
        for i in 0..3 {
            out[i] = (px[i] as f32 * a + bg[i] as f32 * (1.0 - a)).round() as u8;
        }
        Rgb(out)
    })
}

/// Encode a buffer as JPEG, compositing transparency over white.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = flatten_over(image, Color::WHITE);
    encode_rgb_jpeg(&rgb, quality)
}

pub fn encode_rgb_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    encoder
        .encode_image(image)
        .map_err(|e| SitemarkError::Export(format!("JPEG encoding failed: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_flatten_transparent_over_white() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 255]));
        image.put_pixel(1, 0, Rgba([10, 20, 30, 0]));
        let flat = flatten_over(&image, Color::WHITE);
        assert_eq!(flat.get_pixel(0, 0), &Rgb([10, 20, 30]));
        assert_eq!(flat.get_pixel(1, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_jpeg_roundtrip_keeps_dimensions() {
        let image = RgbaImage::from_pixel(32, 16, Rgba([200, 100, 50, 255]));
        let bytes = encode_jpeg(&image, ANNOTATED_JPEG_QUALITY).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = decode_image(&bytes, "roundtrip").unwrap();
        assert_eq!(decoded.dimensions(), (32, 16));
    }

    #[test]
    fn test_decode_garbage_is_load_failure() {
        let err = decode_image(b"not an image", "broken.jpg").unwrap_err();
        assert!(err.is_load_failure());
        assert!(err.to_string().contains("broken.jpg"));
    }
}
