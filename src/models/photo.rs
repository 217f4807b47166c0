// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo records and category metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification attached to a site photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,
}

impl PhotoCategory {
    pub fn is_empty(&self) -> bool {
        self.process.is_none() && self.location.is_none() && self.work_type.is_none()
    }

    /// Trim every field, dropping blank ones. `None` when nothing is left.
    pub fn normalized(self) -> Option<Self> {
        let clean = |field: Option<String>| {
            field
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let category = Self {
            process: clean(self.process),
            location: clean(self.location),
            work_type: clean(self.work_type),
        };
        (!category.is_empty()).then_some(category)
    }

    /// Display labels in process, location, work type order.
    pub fn labels(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if let Some(process) = &self.process {
            parts.push(process_label(process).to_string());
        }
        if let Some(location) = &self.location {
            parts.push(location.clone());
        }
        if let Some(work_type) = &self.work_type {
            parts.push(work_type_label(work_type).to_string());
        }
        parts
    }
}

/// Known construction process codes.
pub const PROCESS_CODES: [&str; 6] = [
    "foundation",
    "structure",
    "finishing",
    "completion",
    "inspection",
    "other",
];

/// Known work type codes.
pub const WORK_TYPE_CODES: [&str; 6] = [
    "architecture",
    "electrical",
    "plumbing",
    "civil",
    "landscape",
    "other",
];

/// Human label for a construction process code; unknown codes pass through.
pub fn process_label(code: &str) -> &str {
    match code {
        "foundation" => "Foundation",
        "structure" => "Structure",
        "finishing" => "Finishing",
        "completion" => "Completion",
        "inspection" => "Inspection",
        "other" => "Other",
        other => other,
    }
}

/// Human label for a work type code; unknown codes pass through.
pub fn work_type_label(code: &str) -> &str {
    match code {
        "architecture" => "Architecture",
        "electrical" => "Electrical",
        "plumbing" => "Plumbing",
        "civil" => "Civil",
        "landscape" => "Landscape",
        "other" => "Other",
        other => other,
    }
}

/// A stored photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: String,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signboard_id: Option<String>,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<PhotoCategory>,
    pub taken_at: DateTime<Utc>,
    pub uploaded_at: DateTime<Utc>,
}

impl PhotoRecord {
    /// Caption used when the record has none.
    pub fn display_caption(&self) -> &str {
        self.caption.as_deref().filter(|c| !c.is_empty()).unwrap_or("Photo")
    }
}

/// A request to create a photo record together with its image bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPhoto {
    pub project_id: String,
    pub signboard_id: Option<String>,
    pub caption: Option<String>,
    pub category: Option<PhotoCategory>,
    pub image: Vec<u8>,
    pub taken_at: DateTime<Utc>,
}

/// Filter applied when listing photos.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoFilter {
    pub project_id: Option<String>,
    pub signboard_id: Option<String>,
}

impl PhotoFilter {
    pub fn matches(&self, photo: &PhotoRecord) -> bool {
        self.project_id.as_ref().map_or(true, |p| *p == photo.project_id)
            && self
                .signboard_id
                .as_ref()
                .map_or(true, |s| photo.signboard_id.as_ref() == Some(s))
    }
}

/// One page of a paginated listing. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T: Clone> Page<T> {
    /// Slice `all` into the requested page.
    pub fn slice(all: &[T], page: usize, limit: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total = all.len();
        let start = (page - 1).saturating_mul(limit).min(total);
        let end = start.saturating_add(limit).min(total);
        Self {
            items: all[start..end].to_vec(),
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_in_order() {
        let category = PhotoCategory {
            process: Some("foundation".into()),
            location: Some("Gate B".into()),
            work_type: Some("welding".into()),
        };
        assert_eq!(category.labels(), vec!["Foundation", "Gate B", "welding"]);
    }

    #[test]
    fn test_normalized_drops_blank_fields() {
        let category = PhotoCategory {
            process: Some("structure".into()),
            location: Some("  Level 3 ".into()),
            work_type: Some("".into()),
        };
        assert_eq!(
            category.normalized(),
            Some(PhotoCategory {
                process: Some("structure".into()),
                location: Some("Level 3".into()),
                work_type: None,
            })
        );
        let blank = PhotoCategory {
            location: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(blank.normalized(), None);
    }

    #[test]
    fn test_page_slice() {
        let all: Vec<u32> = (1..=7).collect();
        let p = Page::slice(&all, 2, 3);
        assert_eq!(p.items, vec![4, 5, 6]);
        assert_eq!(p.total_pages, 3);

        let past_end = Page::slice(&all, 9, 3);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 7);
    }

    #[test]
    fn test_record_uses_camel_case_keys() {
        let json = r#"{
            "id": "ph1", "projectId": "p1", "filename": "a.jpg",
            "category": {"workType": "civil"},
            "takenAt": "2025-04-01T09:30:00Z", "uploadedAt": "2025-04-01T10:00:00Z"
        }"#;
        let photo: PhotoRecord = serde_json::from_str(json).unwrap();
        assert_eq!(photo.project_id, "p1");
        assert_eq!(photo.category.unwrap().work_type.as_deref(), Some("civil"));
        assert!(photo.caption.is_none());
    }
}
