// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Font loading for raster text.
//!
//! The proportional font bundled with egui is reused so that text drawn
//! into photos matches the UI and no font file has to ship separately.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use std::sync::OnceLock;

static DEFAULT_FONT: OnceLock<Option<FontArc>> = OnceLock::new();

/// The first proportional font from egui's default definitions.
pub fn default_font() -> Option<FontArc> {
    DEFAULT_FONT
        .get_or_init(|| {
            let definitions = egui::FontDefinitions::default();
            let name = definitions
                .families
                .get(&egui::FontFamily::Proportional)
                .and_then(|names| names.first())?;
            let data = definitions.font_data.get(name)?;
            match FontArc::try_from_vec(data.font.to_vec()) {
                Ok(font) => Some(font),
                Err(e) => {
                    log::warn!("Bundled font {} could not be parsed: {}", name, e);
                    None
                }
            }
        })
        .clone()
}

/// Advance width of `text` at `size` pixels, including kerning.
pub fn text_width(font: &FontArc, text: &str, size: f32) -> f32 {
    let scaled = font.as_scaled(PxScale::from(size));
    let mut width = 0.0;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

/// Rough width used when no font is available.
pub fn estimated_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.55
}
