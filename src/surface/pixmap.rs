// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory raster surface backed by a `tiny_skia::Pixmap`.
//!
//! Strokes and fills go through tiny-skia; glyphs come from `ab_glyph` and
//! are painted through a coverage mask. Pixels cross the [`RasterSurface`]
//! boundary as straight-alpha `RgbaImage`s.

use super::{
    font, BlendMode, Pixels, RasterSurface, Shape, StrokeStyle, TextAlign, TextBaseline, TextStyle,
};
use crate::error::{Result, SitemarkError};
use crate::models::annotation::{Color, Point};
use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use image::{imageops::FilterType, RgbaImage};
use tiny_skia::{
    ColorU8, FillRule, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

/// Premultiplied RGBA buffer with anti-aliased drawing.
#[derive(Clone)]
pub struct PixmapSurface {
    pixmap: Pixmap,
    font: Option<FontArc>,
}

impl PixmapSurface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width.max(1), height.max(1)).ok_or_else(|| {
            SitemarkError::Validation(format!("cannot allocate a {}x{} surface", width, height))
        })?;
        Ok(Self {
            pixmap,
            font: font::default_font(),
        })
    }

    pub fn from_image(image: &RgbaImage) -> Result<Self> {
        let mut surface = Self::new(image.width(), image.height())?;
        surface.put_pixels(image);
        Ok(surface)
    }

    /// Override the font used for text; `None` disables glyph drawing.
    pub fn with_font(mut self, font: Option<FontArc>) -> Self {
        self.font = font;
        self
    }

    /// Straight-alpha copy of the buffer.
    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (out, px) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = px.demultiply();
            out.0 = [c.red(), c.green(), c.blue(), c.alpha()];
        }
        image
    }

    pub fn into_image(self) -> RgbaImage {
        self.to_image()
    }
}

fn paint(color: Color, blend: BlendMode) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint.blend_mode = match blend {
        BlendMode::SourceOver => tiny_skia::BlendMode::SourceOver,
        BlendMode::DestinationOut => tiny_skia::BlendMode::DestinationOut,
    };
    paint
}

/// Canvas-style stroke: round caps and joins for lines, mitred corners for
/// rectangles.
fn stroke(width: f32, cap: LineCap, join: LineJoin) -> Stroke {
    Stroke {
        width: width.max(1.0),
        line_cap: cap,
        line_join: join,
        ..Stroke::default()
    }
}

impl RasterSurface for PixmapSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke_style: &StrokeStyle) {
        let paint = paint(stroke_style.color, stroke_style.blend);
        // A zero-length segment is just its round cap.
        if from == to {
            let radius = stroke_style.width.max(1.0) / 2.0;
            if let Some(dot) = PathBuilder::from_circle(from.x, from.y, radius) {
                self.pixmap
                    .fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
            return;
        }
        let mut builder = PathBuilder::new();
        builder.move_to(from.x, from.y);
        builder.line_to(to.x, to.y);
        let Some(path) = builder.finish() else {
            return;
        };
        self.pixmap.stroke_path(
            &path,
            &paint,
            &stroke(stroke_style.width, LineCap::Round, LineJoin::Round),
            Transform::identity(),
            None,
        );
    }

    fn draw_shape(&mut self, shape: &Shape, stroke_style: &StrokeStyle) {
        let (path, join) = match *shape {
            Shape::Rect { a, b } => {
                let rect = Rect::from_ltrb(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y));
                (rect.map(PathBuilder::from_rect), LineJoin::Miter)
            }
            Shape::Circle { center, radius } => (
                PathBuilder::from_circle(center.x, center.y, radius),
                LineJoin::Round,
            ),
        };
        let Some(path) = path else {
            return;
        };
        self.pixmap.stroke_path(
            &path,
            &paint(stroke_style.color, stroke_style.blend),
            &stroke(stroke_style.width, LineCap::Butt, join),
            Transform::identity(),
            None,
        );
    }

    fn fill_rect(&mut self, a: Point, b: Point, color: Color) {
        let Some(rect) = Rect::from_ltrb(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
        else {
            return;
        };
        self.pixmap.fill_rect(
            rect,
            &paint(color, BlendMode::SourceOver),
            Transform::identity(),
            None,
        );
    }

    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        let Some(font) = self.font.clone() else {
            log::debug!("No font available, skipping text {:?}", text);
            return;
        };
        let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
            return;
        };
        let scale = PxScale::from(style.size);
        let scaled = font.as_scaled(scale);
        let width = font::text_width(&font, text, style.size);

        let mut caret = match style.align {
            TextAlign::Start => at.x,
            TextAlign::Center => at.x - width / 2.0,
        };
        let baseline = match style.baseline {
            TextBaseline::Alphabetic => at.y,
            TextBaseline::Middle => at.y + (scaled.ascent() + scaled.descent()) / 2.0,
        };
        // No bold face ships with the default fonts; overstrike instead.
        let offsets: &[f32] = if style.bold {
            &[0.0, 1.0]
        } else {
            &[0.0]
        };
        let emphasis = (style.size / 24.0).max(1.0);

        let (mask_w, mask_h) = (self.pixmap.width() as i64, self.pixmap.height() as i64);
        let coverage = mask.data_mut();
        let mut previous = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            for offset in offsets {
                let glyph = id.with_scale_and_position(scale, point(caret + offset * emphasis, baseline));
                if let Some(outlined) = font.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    let (left, top) = (bounds.min.x as i64, bounds.min.y as i64);
                    outlined.draw(|gx, gy, value| {
                        let (x, y) = (left + gx as i64, top + gy as i64);
                        if x < 0 || y < 0 || x >= mask_w || y >= mask_h {
                            return;
                        }
                        let cell = &mut coverage[(y * mask_w + x) as usize];
                        *cell = (*cell).max((value.clamp(0.0, 1.0) * 255.0).round() as u8);
                    });
                }
            }
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        let Some(full) = Rect::from_xywh(0.0, 0.0, mask_w as f32, mask_h as f32) else {
            return;
        };
        let mut text_paint = paint(style.color, BlendMode::SourceOver);
        text_paint.anti_alias = false;
        self.pixmap
            .fill_rect(full, &text_paint, Transform::identity(), Some(&mask));
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> f32 {
        match &self.font {
            Some(font) => font::text_width(font, text, style.size),
            None => font::estimated_width(text, style.size),
        }
    }

    fn get_pixels(&self) -> Pixels {
        self.to_image()
    }

    fn put_pixels(&mut self, pixels: &Pixels) {
        if pixels.dimensions() != (self.pixmap.width(), self.pixmap.height()) {
            log::warn!(
                "Ignoring pixel restore of {:?} into {}x{} surface",
                pixels.dimensions(),
                self.pixmap.width(),
                self.pixmap.height()
            );
            return;
        }
        for (out, px) in self.pixmap.pixels_mut().iter_mut().zip(pixels.pixels()) {
            let [r, g, b, a] = px.0;
            *out = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
    }

    fn draw_image(&mut self, image: &RgbaImage) {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        if image.dimensions() == (w, h) {
            self.put_pixels(image);
        } else {
            self.put_pixels(&image::imageops::resize(image, w, h, FilterType::Triangle));
        }
    }
}
