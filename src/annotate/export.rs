// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Flattening a session into a new photo record.

use super::AnnotationSession;
use crate::error::Result;
use crate::io::media;
use crate::models::photo::{NewPhoto, PhotoRecord};
use crate::surface::RasterSurface;
use chrono::Utc;

/// Suffix appended to the caption of an annotated copy.
pub const ANNOTATED_SUFFIX: &str = "(annotated)";

impl<S: RasterSurface> AnnotationSession<S> {
    /// Flatten the buffer (erased pixels over white) and encode it as JPEG.
    pub fn finalize(&self, quality: u8) -> Result<Vec<u8>> {
        let pixels = self.surface().get_pixels();
        let bytes = media::encode_jpeg(&pixels, quality)?;
        log::info!(
            "Flattened {}x{} annotation into {} bytes",
            pixels.width(),
            pixels.height(),
            bytes.len()
        );
        Ok(bytes)
    }
}

/// Caption for the annotated copy of `original`.
pub fn annotated_caption(original: &PhotoRecord) -> String {
    format!("{} {}", original.display_caption(), ANNOTATED_SUFFIX)
}

/// Build the create request for an annotated sibling of `original`. The
/// original record is never modified.
pub fn annotated_copy(original: &PhotoRecord, image: Vec<u8>) -> NewPhoto {
    NewPhoto {
        project_id: original.project_id.clone(),
        signboard_id: original.signboard_id.clone(),
        caption: Some(annotated_caption(original)),
        category: original.category.clone(),
        image,
        taken_at: Utc::now(),
    }
}
