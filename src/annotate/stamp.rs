// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Inspection stamps.

use crate::models::annotation::{Point, StampKind};
use crate::surface::{RasterSurface, Shape, StrokeStyle, TextStyle};

/// Half the badge width; the badge is `2 * STAMP_SIZE` by `STAMP_SIZE`.
pub const STAMP_SIZE: f32 = 80.0;

const STAMP_BORDER_WIDTH: f32 = 3.0;

/// Draw a badge for `kind` centered on the surface and return the center.
pub fn draw_stamp<S: RasterSurface + ?Sized>(surface: &mut S, kind: StampKind) -> Point {
    let center = surface.center();
    let (background, foreground) = kind.colors();
    let top_left = Point::new(center.x - STAMP_SIZE, center.y - STAMP_SIZE / 2.0);
    let bottom_right = Point::new(center.x + STAMP_SIZE, center.y + STAMP_SIZE / 2.0);

    surface.fill_rect(top_left, bottom_right, background);
    surface.draw_shape(
        &Shape::Rect {
            a: top_left,
            b: bottom_right,
        },
        &StrokeStyle::new(foreground, STAMP_BORDER_WIDTH),
    );
    surface.draw_text(
        kind.label(),
        center,
        &TextStyle::new(STAMP_SIZE / 2.0, foreground).bold().centered(),
    );
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Color;
    use crate::surface::PixmapSurface;
    use image::{Rgba, RgbaImage};

    fn rgba(c: Color) -> Rgba<u8> {
        Rgba(c.to_array())
    }

    #[test]
    fn test_stamp_centered_for_any_canvas_size() {
        for (w, h) in [(400, 300), (640, 480), (1001, 333)] {
            let mut surface = PixmapSurface::from_image(&RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255])))
                .unwrap()
                .with_font(None);
            let center = draw_stamp(&mut surface, StampKind::Ok);
            assert_eq!(center, Point::new(w as f32 / 2.0, h as f32 / 2.0));

            let (bg, fg) = StampKind::Ok.colors();
            let image = surface.to_image();
            let (cx, cy) = (center.x as u32, center.y as u32);
            // Inside the badge, clear of the border.
            assert_eq!(image.get_pixel(cx - 60, cy - 20), &rgba(bg));
            assert_eq!(image.get_pixel(cx + 60, cy + 20), &rgba(bg));
            // The left border straddles x = cx - 80.
            assert_eq!(image.get_pixel(cx - 80, cy), &rgba(fg));
            // Outside is untouched.
            assert_eq!(image.get_pixel(cx - 90, cy), &Rgba([0, 0, 0, 255]));
            assert_eq!(image.get_pixel(cx, cy - 45), &Rgba([0, 0, 0, 255]));
        }
    }

    #[test]
    fn test_stamp_variants_render_differently() {
        let render = |kind| {
            let mut surface = PixmapSurface::new(300, 200).unwrap().with_font(None);
            draw_stamp(&mut surface, kind);
            surface.into_image()
        };
        let ok = render(StampKind::Ok);
        let ng = render(StampKind::Ng);
        let review = render(StampKind::NeedsReview);
        assert_ne!(ok.get_pixel(100, 90), ng.get_pixel(100, 90));
        assert_ne!(ok.get_pixel(100, 90), review.get_pixel(100, 90));
        assert_ne!(ng.get_pixel(100, 90), review.get_pixel(100, 90));
    }
}
