// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Record and blob storage for projects, signboards and photos.

pub mod local;

pub use local::LocalStore;

use crate::error::Result;
use crate::models::photo::{NewPhoto, Page, PhotoCategory, PhotoFilter, PhotoRecord};
use crate::models::project::{Project, Signboard, SignboardContent};

/// The persistence collaborator behind the desktop shell.
///
/// Reads take `&self`; anything that changes records takes `&mut self`.
pub trait PhotoStore {
    fn list_projects(&self) -> Result<Vec<Project>>;
    fn get_project(&self, id: &str) -> Result<Project>;
    fn create_project(&mut self, name: &str, location: &str) -> Result<Project>;

    /// Signboards, optionally restricted to one project.
    fn list_signboards(&self, project_id: Option<&str>) -> Result<Vec<Signboard>>;
    fn get_signboard(&self, id: &str) -> Result<Signboard>;
    fn create_signboard(
        &mut self,
        project_id: &str,
        title: &str,
        content: SignboardContent,
    ) -> Result<Signboard>;

    /// Photos matching `filter`, newest first, as a 1-based page.
    fn list_photos(&self, filter: &PhotoFilter, page: usize, limit: usize)
        -> Result<Page<PhotoRecord>>;
    fn get_photo(&self, id: &str) -> Result<PhotoRecord>;
    fn create_photo(&mut self, photo: NewPhoto) -> Result<PhotoRecord>;
    fn update_caption(&mut self, id: &str, caption: Option<String>) -> Result<PhotoRecord>;

    /// Attach a signboard of the photo's project (or none) and replace the
    /// category.
    fn update_details(
        &mut self,
        id: &str,
        signboard_id: Option<String>,
        category: Option<PhotoCategory>,
    ) -> Result<PhotoRecord>;
    fn delete_photo(&mut self, id: &str) -> Result<()>;

    /// Raw image bytes of a stored photo.
    fn read_blob(&self, photo: &PhotoRecord) -> Result<Vec<u8>>;
}
