// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! A directory-backed [`PhotoStore`].
//!
//! Layout:
//!
//! ```text
//! <root>/index.json          projects, signboards and photo records
//! <root>/uploads/<filename>  image blobs
//! ```

use super::PhotoStore;
use crate::error::{Result, SitemarkError};
use crate::io::serialization::{export_json, import_json, write_atomically};
use crate::models::photo::{NewPhoto, Page, PhotoCategory, PhotoFilter, PhotoRecord};
use crate::models::project::{Project, ProjectStatus, Signboard, SignboardContent};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const INDEX_FILE: &str = "index.json";
const UPLOADS_DIR: &str = "uploads";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct StoreIndex {
    projects: Vec<Project>,
    signboards: Vec<Signboard>,
    photos: Vec<PhotoRecord>,
}

#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    index: StoreIndex,
    last_id: i64,
}

impl LocalStore {
    /// Open the store at `root`, creating the directory layout if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(root.join(UPLOADS_DIR))?;

        let index_path = root.join(INDEX_FILE);
        let index: StoreIndex = if index_path.exists() {
            import_json(&index_path)?
        } else {
            StoreIndex::default()
        };
        let last_id = index
            .projects
            .iter()
            .map(|p| p.id.as_str())
            .chain(index.signboards.iter().map(|s| s.id.as_str()))
            .chain(index.photos.iter().map(|p| p.id.as_str()))
            .filter_map(|id| id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        log::info!(
            "Opened store at {} ({} projects, {} photos)",
            root.display(),
            index.projects.len(),
            index.photos.len()
        );
        Ok(Self {
            root,
            index,
            last_id,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, filename: &str) -> PathBuf {
        self.root.join(UPLOADS_DIR).join(filename)
    }

    /// Millisecond timestamp, bumped past the previous id when the clock
    /// has not moved.
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id + 1);
        self.last_id.to_string()
    }

    /// Apply `change` to a copy of the index and keep it only once the copy
    /// is on disk.
    fn commit<T>(&mut self, change: impl FnOnce(&mut StoreIndex) -> Result<T>) -> Result<T> {
        let mut staged = self.index.clone();
        let value = change(&mut staged)?;
        export_json(&staged, &self.root.join(INDEX_FILE))?;
        self.index = staged;
        Ok(value)
    }

    fn not_found(kind: &str, id: &str) -> SitemarkError {
        SitemarkError::Store(format!("{} {} not found", kind, id))
    }

    fn require_project(&self, id: &str) -> Result<()> {
        if self.index.projects.iter().any(|p| p.id == id) {
            Ok(())
        } else {
            Err(Self::not_found("project", id))
        }
    }

    /// A signboard may only be attached to photos of its own project.
    fn require_signboard(&self, id: &str, project_id: &str) -> Result<()> {
        let signboard = self.get_signboard(id)?;
        if signboard.project_id == project_id {
            Ok(())
        } else {
            Err(SitemarkError::Validation(format!(
                "signboard {} belongs to another project",
                id
            )))
        }
    }
}

fn find_photo_mut<'a>(index: &'a mut StoreIndex, id: &str) -> Result<&'a mut PhotoRecord> {
    index
        .photos
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| LocalStore::not_found("photo", id))
}

impl PhotoStore for LocalStore {
    fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.index.projects.clone())
    }

    fn get_project(&self, id: &str) -> Result<Project> {
        self.index
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("project", id))
    }

    fn create_project(&mut self, name: &str, location: &str) -> Result<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SitemarkError::Validation("project name is required".into()));
        }
        let project = Project {
            id: self.next_id(),
            name: name.to_string(),
            location: location.trim().to_string(),
            status: ProjectStatus::Planned,
        };
        self.commit(|index| {
            index.projects.push(project.clone());
            Ok(())
        })?;
        log::info!("Created project {} ({})", project.name, project.id);
        Ok(project)
    }

    fn list_signboards(&self, project_id: Option<&str>) -> Result<Vec<Signboard>> {
        Ok(self
            .index
            .signboards
            .iter()
            .filter(|s| project_id.map_or(true, |p| s.project_id == p))
            .cloned()
            .collect())
    }

    fn get_signboard(&self, id: &str) -> Result<Signboard> {
        self.index
            .signboards
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("signboard", id))
    }

    fn create_signboard(
        &mut self,
        project_id: &str,
        title: &str,
        content: SignboardContent,
    ) -> Result<Signboard> {
        self.require_project(project_id)?;
        if title.trim().is_empty() {
            return Err(SitemarkError::Validation("signboard title is required".into()));
        }
        let signboard = Signboard {
            id: self.next_id(),
            project_id: project_id.to_string(),
            title: title.trim().to_string(),
            content,
        };
        self.commit(|index| {
            index.signboards.push(signboard.clone());
            Ok(())
        })?;
        log::info!("Created signboard {} ({})", signboard.title, signboard.id);
        Ok(signboard)
    }

    fn list_photos(
        &self,
        filter: &PhotoFilter,
        page: usize,
        limit: usize,
    ) -> Result<Page<PhotoRecord>> {
        let mut matching: Vec<PhotoRecord> = self
            .index
            .photos
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.taken_at.cmp(&a.taken_at).then_with(|| b.id.cmp(&a.id)));
        Ok(Page::slice(&matching, page, limit))
    }

    fn get_photo(&self, id: &str) -> Result<PhotoRecord> {
        self.index
            .photos
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("photo", id))
    }

    fn create_photo(&mut self, photo: NewPhoto) -> Result<PhotoRecord> {
        self.require_project(&photo.project_id)?;
        if let Some(signboard_id) = &photo.signboard_id {
            self.require_signboard(signboard_id, &photo.project_id)?;
        }
        if photo.image.is_empty() {
            return Err(SitemarkError::Validation("photo image is empty".into()));
        }

        let id = self.next_id();
        let filename = format!("{}.jpg", id);
        write_atomically(&self.blob_path(&filename), &photo.image)?;

        let record = PhotoRecord {
            id,
            project_id: photo.project_id,
            signboard_id: photo.signboard_id,
            filename,
            caption: photo.caption,
            category: photo.category.and_then(PhotoCategory::normalized),
            taken_at: photo.taken_at,
            uploaded_at: Utc::now(),
        };
        let committed = self.commit(|index| {
            index.photos.push(record.clone());
            Ok(())
        });
        if let Err(e) = committed {
            let _ = std::fs::remove_file(self.blob_path(&record.filename));
            return Err(e);
        }
        log::info!("Stored photo {} ({} bytes)", record.id, photo.image.len());
        Ok(record)
    }

    fn update_caption(&mut self, id: &str, caption: Option<String>) -> Result<PhotoRecord> {
        self.commit(|index| {
            let photo = find_photo_mut(index, id)?;
            photo.caption = caption.filter(|c| !c.trim().is_empty());
            Ok(photo.clone())
        })
    }

    fn update_details(
        &mut self,
        id: &str,
        signboard_id: Option<String>,
        category: Option<PhotoCategory>,
    ) -> Result<PhotoRecord> {
        let project_id = self.get_photo(id)?.project_id;
        if let Some(signboard_id) = &signboard_id {
            self.require_signboard(signboard_id, &project_id)?;
        }
        let updated = self.commit(|index| {
            let photo = find_photo_mut(index, id)?;
            photo.signboard_id = signboard_id;
            photo.category = category.and_then(PhotoCategory::normalized);
            Ok(photo.clone())
        })?;
        log::info!("Updated details of photo {}", id);
        Ok(updated)
    }

    fn delete_photo(&mut self, id: &str) -> Result<()> {
        let removed = self.commit(|index| {
            let position = index
                .photos
                .iter()
                .position(|p| p.id == id)
                .ok_or_else(|| Self::not_found("photo", id))?;
            Ok(index.photos.remove(position))
        })?;
        if let Err(e) = std::fs::remove_file(self.blob_path(&removed.filename)) {
            log::warn!("Blob for photo {} was not removed: {}", removed.id, e);
        }
        log::info!("Deleted photo {}", removed.id);
        Ok(())
    }

    fn read_blob(&self, photo: &PhotoRecord) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.blob_path(&photo.filename))?)
    }
}
