// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Page geometry for the photo ledger.
//!
//! All measurements are millimetres on an A4 portrait page with the origin
//! at the top-left corner; the PDF writer flips the y axis.

use super::LedgerConfig;
use crate::util::geometry::fit_within;
use std::ops::Range;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const PAGE_MARGIN: f32 = 10.0;
pub const HEADER_HEIGHT: f32 = 20.0;
pub const FOOTER_HEIGHT: f32 = 10.0;

/// Gap between a cell edge and its image on every side.
pub const IMAGE_INSET: f32 = 2.0;

/// Height reserved at the bottom of each cell for caption text.
pub const CAPTION_STRIP: f32 = 15.0;

/// Maximum characters of caption or category text per cell.
pub const CAPTION_CHAR_BUDGET: usize = 30;

/// Resolution bitmaps are reduced to before they are embedded.
pub const PRINT_DPI: f32 = 300.0;

const MM_PER_INCH: f32 = 25.4;

/// An axis-aligned rectangle in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.x + other.width <= self.x + self.width + EPS
            && other.y + other.height <= self.y + self.height + EPS
    }
}

/// Grid placement of photo cells on every page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub content: Rect,
    pub columns: usize,
    pub rows: usize,
}

impl GridGeometry {
    pub fn for_config(config: &LedgerConfig) -> Self {
        let header = if config.has_header() { HEADER_HEIGHT } else { 0.0 };
        let footer = if config.has_footer() { FOOTER_HEIGHT } else { 0.0 };
        let (columns, rows) = config.layout.grid();
        Self {
            content: Rect::new(
                PAGE_MARGIN,
                PAGE_MARGIN + header,
                PAGE_WIDTH - PAGE_MARGIN * 2.0,
                PAGE_HEIGHT - PAGE_MARGIN * 2.0 - header - footer,
            ),
            columns,
            rows,
        }
    }

    pub fn cell_width(&self) -> f32 {
        self.content.width / self.columns as f32
    }

    pub fn cell_height(&self) -> f32 {
        self.content.height / self.rows as f32
    }

    /// Cell for the `slot`-th photo on a page, filled row by row.
    pub fn cell(&self, slot: usize) -> Rect {
        let column = slot % self.columns;
        let row = slot / self.columns;
        Rect::new(
            self.content.x + column as f32 * self.cell_width(),
            self.content.y + row as f32 * self.cell_height(),
            self.cell_width(),
            self.cell_height(),
        )
    }
}

/// Area of a cell available to the image.
pub fn image_area(cell: &Rect) -> Rect {
    Rect::new(
        cell.x + IMAGE_INSET,
        cell.y + IMAGE_INSET,
        (cell.width - IMAGE_INSET * 2.0).max(0.0),
        (cell.height - IMAGE_INSET * 2.0 - CAPTION_STRIP).max(0.0),
    )
}

/// Placement of a `width` x `height` bitmap inside `area`, centered and
/// aspect-preserving.
pub fn fit_image(area: &Rect, width: u32, height: u32) -> Rect {
    let (w, h) = fit_within(width as f32, height as f32, area.width, area.height);
    Rect::new(
        area.x + (area.width - w) / 2.0,
        area.y + (area.height - h) / 2.0,
        w,
        h,
    )
}

/// Pixel size that prints `rect` at [`PRINT_DPI`], at least 1x1.
pub fn print_size(rect: &Rect) -> (u32, u32) {
    let px = |mm: f32| ((mm / MM_PER_INCH * PRINT_DPI).ceil() as u32).max(1);
    (px(rect.width), px(rect.height))
}

/// Consecutive index ranges of at most `per_page` items.
pub fn paginate(count: usize, per_page: usize) -> Vec<Range<usize>> {
    let per_page = per_page.max(1);
    (0..count.div_ceil(per_page))
        .map(|page| page * per_page..((page + 1) * per_page).min(count))
        .collect()
}

/// Cut `text` to `budget` characters, ending in "..." when shortened.
pub fn truncate(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let keep = budget.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
