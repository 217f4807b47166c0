// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo ledger composition.
//!
//! A ledger lays an ordered list of photos out on A4 pages, a fixed number
//! per page, with captions, an optional header and an optional footer.
//! Composition never reorders photos and never fails because a single
//! photo could not be loaded; that cell gets a placeholder instead.

pub mod layout;
pub mod pdf;
pub mod source;

pub use source::BitmapSource;

use crate::models::photo::PhotoRecord;
use chrono::{DateTime, Local};
use image::{imageops::FilterType, RgbaImage};
use layout::{GridGeometry, Rect, CAPTION_CHAR_BUDGET};
use serde::{Deserialize, Serialize};

/// Photos per page and their fixed grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PhotosPerPage {
    One,
    Two,
    #[default]
    Four,
    Six,
}

impl PhotosPerPage {
    pub const ALL: [PhotosPerPage; 4] = [
        PhotosPerPage::One,
        PhotosPerPage::Two,
        PhotosPerPage::Four,
        PhotosPerPage::Six,
    ];

    pub fn count(self) -> usize {
        match self {
            PhotosPerPage::One => 1,
            PhotosPerPage::Two => 2,
            PhotosPerPage::Four => 4,
            PhotosPerPage::Six => 6,
        }
    }

    /// (columns, rows)
    pub fn grid(self) -> (usize, usize) {
        match self {
            PhotosPerPage::One => (1, 1),
            PhotosPerPage::Two => (1, 2),
            PhotosPerPage::Four => (2, 2),
            PhotosPerPage::Six => (2, 3),
        }
    }
}

impl TryFrom<u8> for PhotosPerPage {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PhotosPerPage::One),
            2 => Ok(PhotosPerPage::Two),
            4 => Ok(PhotosPerPage::Four),
            6 => Ok(PhotosPerPage::Six),
            other => Err(format!("unsupported layout {other}: expected 1, 2, 4 or 6")),
        }
    }
}

impl From<PhotosPerPage> for u8 {
    fn from(value: PhotosPerPage) -> Self {
        value.count() as u8
    }
}

/// How a bitmap fills its image area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    /// Largest aspect-preserving size, centered.
    #[default]
    Contain,
    /// Fill the whole area, distorting if needed.
    Stretch,
}

/// Options recognized by the ledger export dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerConfig {
    pub layout: PhotosPerPage,
    pub company_name: String,
    pub project_name: String,
    pub show_date: bool,
    pub show_page_number: bool,
    pub fit: ImageFit,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            layout: PhotosPerPage::Four,
            company_name: String::new(),
            project_name: String::new(),
            show_date: false,
            show_page_number: false,
            fit: ImageFit::Contain,
        }
    }
}

impl LedgerConfig {
    pub fn has_header(&self) -> bool {
        !self.company_name.trim().is_empty() || !self.project_name.trim().is_empty()
    }

    pub fn has_footer(&self) -> bool {
        self.show_date || self.show_page_number
    }

    pub fn page_count(&self, photo_count: usize) -> usize {
        photo_count.div_ceil(self.layout.count())
    }
}

/// Title block drawn at the top of each page.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub company: Option<String>,
    pub project: Option<String>,
}

/// Date and page number line at the bottom of each page.
#[derive(Debug, Clone, PartialEq)]
pub struct Footer {
    pub date: Option<String>,
    pub page_label: Option<String>,
}

/// What occupies the image area of a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotContent {
    Image { bitmap: RgbaImage, placement: Rect },
    Placeholder { area: Rect, message: String },
}

/// One photo's cell on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Position of the photo in the input list.
    pub photo_index: usize,
    pub photo_id: String,
    pub cell: Rect,
    pub caption: String,
    /// Category labels joined by " / ", empty when uncategorized.
    pub category_line: String,
    pub timestamp: String,
    pub content: SlotContent,
}

impl Slot {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.content, SlotContent::Placeholder { .. })
    }

    /// Small print under the caption: categories, then the timestamp.
    /// Only the category part is ever truncated.
    pub fn metadata_line(&self) -> String {
        if self.category_line.is_empty() {
            self.timestamp.clone()
        } else {
            format!("{}  {}", self.category_line, self.timestamp)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerPage {
    /// 1-based page number.
    pub number: usize,
    pub header: Option<Header>,
    pub footer: Option<Footer>,
    pub slots: Vec<Slot>,
}

/// A fully laid-out ledger ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerDocument {
    pub config: LedgerConfig,
    pub pages: Vec<LedgerPage>,
}

impl LedgerDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Photo indices in page order.
    pub fn photo_order(&self) -> Vec<usize> {
        self.pages
            .iter()
            .flat_map(|p| p.slots.iter().map(|s| s.photo_index))
            .collect()
    }

    pub fn placeholder_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| p.slots.iter())
            .filter(|s| s.is_placeholder())
            .count()
    }
}

/// Message shown in cells whose photo could not be loaded.
pub const LOAD_ERROR_LABEL: &str = "Image load error";

const MISSING_CAPTION: &str = "No caption";

/// Lay `photos` out in input order, loading each bitmap from `source`.
pub fn compose(
    photos: &[PhotoRecord],
    source: &dyn BitmapSource,
    config: &LedgerConfig,
    now: DateTime<Local>,
) -> LedgerDocument {
    let grid = GridGeometry::for_config(config);
    let ranges = layout::paginate(photos.len(), config.layout.count());
    let total = ranges.len();

    let header = config.has_header().then(|| Header {
        company: non_empty(&config.company_name),
        project: non_empty(&config.project_name),
    });

    let pages = ranges
        .into_iter()
        .enumerate()
        .map(|(page_index, range)| {
            let number = page_index + 1;
            let slots = range
                .enumerate()
                .map(|(slot, photo_index)| {
                    compose_slot(&photos[photo_index], photo_index, grid.cell(slot), source, config)
                })
                .collect();
            LedgerPage {
                number,
                header: header.clone(),
                footer: config.has_footer().then(|| Footer {
                    date: config.show_date.then(|| now.format("%Y-%m-%d").to_string()),
                    page_label: config
                        .show_page_number
                        .then(|| format!("{} / {}", number, total)),
                }),
                slots,
            }
        })
        .collect::<Vec<_>>();

    let document = LedgerDocument {
        config: config.clone(),
        pages,
    };
    log::info!(
        "Composed ledger: {} photos on {} pages ({} placeholders)",
        photos.len(),
        document.page_count(),
        document.placeholder_count()
    );
    document
}

fn compose_slot(
    photo: &PhotoRecord,
    photo_index: usize,
    cell: Rect,
    source: &dyn BitmapSource,
    config: &LedgerConfig,
) -> Slot {
    let area = layout::image_area(&cell);
    let content = match source.load(photo) {
        Ok(bitmap) => {
            let placement = match config.fit {
                ImageFit::Contain => layout::fit_image(&area, bitmap.width(), bitmap.height()),
                ImageFit::Stretch => area,
            };
            SlotContent::Image {
                bitmap: reduce_for_print(bitmap, &placement),
                placement,
            }
        }
        Err(e) => {
            log::warn!("Photo {} could not be loaded for the ledger: {}", photo.id, e);
            SlotContent::Placeholder {
                area,
                message: LOAD_ERROR_LABEL.to_string(),
            }
        }
    };

    let caption = photo
        .caption
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(MISSING_CAPTION);
    let category_line = photo
        .category
        .as_ref()
        .map(|c| c.labels().join(" / "))
        .unwrap_or_default();

    Slot {
        photo_index,
        photo_id: photo.id.clone(),
        cell,
        caption: layout::truncate(caption, CAPTION_CHAR_BUDGET),
        category_line: layout::truncate(&category_line, CAPTION_CHAR_BUDGET),
        timestamp: photo
            .taken_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        content,
    }
}

/// Shrink `bitmap` to the pixels `placement` needs at print resolution.
/// Smaller bitmaps are kept as they are.
fn reduce_for_print(bitmap: RgbaImage, placement: &Rect) -> RgbaImage {
    let (target_w, target_h) = layout::print_size(placement);
    let (width, height) = bitmap.dimensions();
    if width <= target_w && height <= target_h {
        return bitmap;
    }
    let (target_w, target_h) = (target_w.min(width), target_h.min(height));
    log::debug!(
        "Reducing {}x{} bitmap to {}x{} for print",
        width,
        height,
        target_w,
        target_h
    );
    image::imageops::resize(&bitmap, target_w, target_h, FilterType::Triangle)
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SitemarkError;
    use crate::models::photo::PhotoCategory;
    use chrono::{TimeZone, Utc};
    use image::Rgba;
    use pretty_assertions::assert_eq;

    fn photo(n: usize) -> PhotoRecord {
        PhotoRecord {
            id: format!("ph{}", n),
            project_id: "p1".into(),
            signboard_id: None,
            filename: format!("ph{}.jpg", n),
            caption: Some(format!("Photo {}", n)),
            category: None,
            taken_at: Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap(),
            uploaded_at: Utc.with_ymd_and_hms(2025, 4, 1, 12, 5, 0).unwrap(),
        }
    }

    fn tiny(_: &PhotoRecord) -> crate::error::Result<RgbaImage> {
        Ok(RgbaImage::from_pixel(4, 3, Rgba([10, 10, 10, 255])))
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_page_count_and_order_for_every_layout() {
        for layout in PhotosPerPage::ALL {
            for count in [0, 1, 2, 3, 4, 5, 6, 7, 12, 13] {
                let photos: Vec<_> = (0..count).map(photo).collect();
                let config = LedgerConfig {
                    layout,
                    ..Default::default()
                };
                let doc = compose(&photos, &tiny, &config, now());
                assert_eq!(doc.page_count(), count.div_ceil(layout.count()));
                assert_eq!(doc.photo_order(), (0..count).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_single_load_failure_is_isolated() {
        let photos: Vec<_> = (1..=5).map(photo).collect();
        let failing = |p: &PhotoRecord| {
            if p.id == "ph3" {
                Err(SitemarkError::load(&p.filename, "decode error"))
            } else {
                tiny(p)
            }
        };
        let config = LedgerConfig {
            layout: PhotosPerPage::Four,
            ..Default::default()
        };
        let doc = compose(&photos, &failing, &config, now());

        assert_eq!(doc.page_count(), 2);
        let first: Vec<(&str, bool)> = doc.pages[0]
            .slots
            .iter()
            .map(|s| (s.photo_id.as_str(), s.is_placeholder()))
            .collect();
        assert_eq!(
            first,
            vec![("ph1", false), ("ph2", false), ("ph3", true), ("ph4", false)]
        );
        let second: Vec<&str> = doc.pages[1].slots.iter().map(|s| s.photo_id.as_str()).collect();
        assert_eq!(second, vec!["ph5"]);

        match &doc.pages[0].slots[2].content {
            SlotContent::Placeholder { message, area } => {
                assert_eq!(message, LOAD_ERROR_LABEL);
                assert_eq!(*area, layout::image_area(&doc.pages[0].slots[2].cell));
            }
            other => panic!("expected placeholder, got {:?}", other),
        }
    }

    #[test]
    fn test_header_and_footer_blocks() {
        let photos: Vec<_> = (0..7).map(photo).collect();
        let config = LedgerConfig {
            layout: PhotosPerPage::Six,
            company_name: "Acme Builders".into(),
            project_name: "  ".into(),
            show_date: true,
            show_page_number: true,
            ..Default::default()
        };
        let doc = compose(&photos, &tiny, &config, now());
        assert_eq!(
            doc.pages[0].header,
            Some(Header {
                company: Some("Acme Builders".into()),
                project: None,
            })
        );
        assert_eq!(
            doc.pages[1].footer,
            Some(Footer {
                date: Some("2025-05-20".into()),
                page_label: Some("2 / 2".into()),
            })
        );

        let bare = compose(&photos, &tiny, &LedgerConfig::default(), now());
        assert!(bare.pages.iter().all(|p| p.header.is_none() && p.footer.is_none()));
    }

    #[test]
    fn test_captions_are_truncated_and_categorized() {
        let mut long = photo(1);
        long.caption = Some("Anchor bolt embedment depth check at column base C-7".into());
        long.category = Some(PhotoCategory {
            process: Some("foundation".into()),
            location: Some("Block C".into()),
            work_type: Some("civil".into()),
        });
        let mut bare = photo(2);
        bare.caption = None;

        let doc = compose(&[long, bare], &tiny, &LedgerConfig::default(), now());
        let slots = &doc.pages[0].slots;
        assert_eq!(slots[0].caption, "Anchor bolt embedment depth...");
        assert_eq!(slots[0].category_line, "Foundation / Block C / Civil");
        assert_eq!(slots[1].caption, "No caption");
        assert_eq!(slots[1].category_line, "");
        assert!(slots[0].timestamp.starts_with("2025-04-0"));
        assert_eq!(
            slots[0].metadata_line(),
            format!("Foundation / Block C / Civil  {}", slots[0].timestamp)
        );
        assert_eq!(slots[1].metadata_line(), slots[1].timestamp);
    }

    #[test]
    fn test_long_category_keeps_timestamp() {
        let mut tagged = photo(1);
        tagged.category = Some(PhotoCategory {
            process: Some("inspection".into()),
            location: Some("North wing stair core, level 12".into()),
            work_type: Some("electrical".into()),
        });
        let doc = compose(&[tagged], &tiny, &LedgerConfig::default(), now());
        let slot = &doc.pages[0].slots[0];
        assert_eq!(slot.category_line, "Inspection / North wing sta...");
        let line = slot.metadata_line();
        assert!(line.starts_with("Inspection / North wing sta...  "));
        assert!(line.ends_with(&slot.timestamp));
        assert!(line.contains("2025-04-0"));
    }

    #[test]
    fn test_image_fit_modes() {
        let wide = |_: &PhotoRecord| -> crate::error::Result<RgbaImage> { Ok(RgbaImage::new(400, 100)) };
        let photos = vec![photo(1)];

        let contained = compose(&photos, &wide, &LedgerConfig::default(), now());
        let slot = &contained.pages[0].slots[0];
        let area = layout::image_area(&slot.cell);
        match &slot.content {
            SlotContent::Image { placement, .. } => {
                assert!(area.contains(placement));
                assert!((placement.width / placement.height - 4.0).abs() < 1e-3);
            }
            other => panic!("unexpected {:?}", other),
        }

        let stretched = compose(
            &photos,
            &wide,
            &LedgerConfig {
                fit: ImageFit::Stretch,
                ..Default::default()
            },
            now(),
        );
        match &stretched.pages[0].slots[0].content {
            SlotContent::Image { placement, .. } => assert_eq!(*placement, area),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_large_bitmaps_are_reduced_to_print_size() {
        let camera = |_: &PhotoRecord| -> crate::error::Result<RgbaImage> { Ok(RgbaImage::new(4000, 3000)) };
        let photos = vec![photo(1), photo(2)];
        for fit in [ImageFit::Contain, ImageFit::Stretch] {
            let config = LedgerConfig {
                fit,
                ..Default::default()
            };
            let doc = compose(&photos, &camera, &config, now());
            for slot in &doc.pages[0].slots {
                match &slot.content {
                    SlotContent::Image { bitmap, placement } => {
                        let (max_w, max_h) = layout::print_size(placement);
                        assert!(bitmap.width() <= max_w && bitmap.height() <= max_h);
                        assert!(bitmap.width() < 4000 && bitmap.height() < 3000);
                    }
                    other => panic!("unexpected {:?}", other),
                }
            }
        }

        // Already small enough: kept pixel for pixel.
        let doc = compose(&photos, &tiny, &LedgerConfig::default(), now());
        match &doc.pages[0].slots[0].content {
            SlotContent::Image { bitmap, .. } => assert_eq!(bitmap.dimensions(), (4, 3)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_config_layout_serializes_as_number() {
        let config: LedgerConfig =
            serde_json::from_str(r#"{"layout": 6, "companyName": "Acme", "showDate": true}"#).unwrap();
        assert_eq!(config.layout, PhotosPerPage::Six);
        assert!(config.show_date && !config.show_page_number);
        assert!(serde_json::from_str::<LedgerConfig>(r#"{"layout": 3}"#).is_err());
        assert_eq!(serde_json::to_value(&config).unwrap()["layout"], 6);
    }
}
