// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

use crate::error::{Result, SitemarkError};
use crate::io::media;
use crate::models::photo::PhotoRecord;
use crate::store::PhotoStore;
use image::RgbaImage;

/// Supplies the decoded bitmap of a photo to the ledger composer.
pub trait BitmapSource {
    fn load(&self, photo: &PhotoRecord) -> Result<RgbaImage>;
}

impl<F> BitmapSource for F
where
    F: Fn(&PhotoRecord) -> Result<RgbaImage>,
{
    fn load(&self, photo: &PhotoRecord) -> Result<RgbaImage> {
        self(photo)
    }
}

/// Reads and decodes photo blobs from a [`PhotoStore`].
pub struct StoreBitmaps<'a, S: PhotoStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: PhotoStore + ?Sized> StoreBitmaps<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

impl<S: PhotoStore + ?Sized> BitmapSource for StoreBitmaps<'_, S> {
    fn load(&self, photo: &PhotoRecord) -> Result<RgbaImage> {
        let bytes = self
            .store
            .read_blob(photo)
            .map_err(|e| SitemarkError::load(&photo.filename, e))?;
        media::decode_image(&bytes, &photo.filename)
    }
}
