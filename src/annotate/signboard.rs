// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Signboard overlay compositing.
//!
//! Draws a signboard's text as a placard along the bottom of a photo, the
//! way boards are photographed on site.

use crate::models::annotation::{Color, Point};
use crate::models::project::Signboard;
use crate::surface::{RasterSurface, Shape, StrokeStyle, TextStyle};

const OVERLAY_PADDING: f32 = 20.0;
const OVERLAY_HEIGHT: f32 = 150.0;
const TEXT_INSET: f32 = 12.0;
const DETAIL_LINE_HEIGHT: f32 = 22.0;

const OVERLAY_BACKGROUND: Color = Color::rgba(255, 248, 225, 242);
const OVERLAY_BORDER: Color = Color::rgb(0xf5, 0x7c, 0x00);
const OVERLAY_TITLE: Color = Color::rgb(0xe6, 0x51, 0x00);

/// Placard rectangle for a surface of the given size, as (top-left, size).
pub fn overlay_rect(width: u32, height: u32) -> (Point, Point) {
    let w = (width as f32 - OVERLAY_PADDING * 2.0).max(0.0);
    let origin = Point::new(OVERLAY_PADDING, height as f32 - OVERLAY_HEIGHT - OVERLAY_PADDING);
    (origin, Point::new(w, OVERLAY_HEIGHT))
}

/// Composite `signboard` onto the bottom of the surface.
pub fn composite_signboard<S: RasterSurface + ?Sized>(surface: &mut S, signboard: &Signboard) {
    let (origin, size) = overlay_rect(surface.width(), surface.height());
    let far = Point::new(origin.x + size.x, origin.y + size.y);

    surface.fill_rect(origin, far, OVERLAY_BACKGROUND);
    surface.draw_shape(&Shape::Rect { a: origin, b: far }, &StrokeStyle::new(OVERLAY_BORDER, 3.0));

    surface.draw_text(
        &format!("[{}]", signboard.heading()),
        Point::new(origin.x + TEXT_INSET, origin.y + 35.0),
        &TextStyle::new(24.0, OVERLAY_TITLE).bold(),
    );
    surface.draw_line(
        Point::new(origin.x + TEXT_INSET, origin.y + 45.0),
        Point::new(far.x - TEXT_INSET, origin.y + 45.0),
        &StrokeStyle::new(OVERLAY_BORDER, 2.0),
    );

    let detail = TextStyle::new(16.0, Color::BLACK);
    let mut y = origin.y + 68.0;
    for line in signboard.detail_lines() {
        surface.draw_text(&line, Point::new(origin.x + TEXT_INSET, y), &detail);
        y += DETAIL_LINE_HEIGHT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::SignboardContent;
    use crate::surface::PixmapSurface;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_overlay_sits_at_bottom_with_padding() {
        let (origin, size) = overlay_rect(800, 600);
        assert_eq!(origin, Point::new(20.0, 430.0));
        assert_eq!(size, Point::new(760.0, 150.0));
    }

    #[test]
    fn test_composite_leaves_top_of_photo_untouched() {
        let photo = RgbaImage::from_pixel(400, 300, Rgba([30, 60, 90, 255]));
        let mut surface = PixmapSurface::from_image(&photo).unwrap().with_font(None);
        let board = Signboard {
            id: "s1".into(),
            project_id: "p1".into(),
            title: "Block C".into(),
            content: SignboardContent {
                contractor: "Acme Builders".into(),
                ..Default::default()
            },
        };
        composite_signboard(&mut surface, &board);

        let image = surface.to_image();
        assert_eq!(image.get_pixel(200, 50), &Rgba([30, 60, 90, 255]));
        // Inside the placard the cream background dominates.
        let px = image.get_pixel(200, 240);
        assert!(px[0] > 240 && px[2] > 200);
    }
}
