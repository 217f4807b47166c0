// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raster surface abstraction.
//!
//! The annotation state machine only talks to a [`RasterSurface`], so it
//! can run against the in-memory [`PixmapSurface`] in tests exactly as it
//! does behind the egui canvas.

pub mod font;
pub mod pixmap;

pub use pixmap::PixmapSurface;

use crate::models::annotation::{Color, Point};
use image::RgbaImage;

/// A full copy of a surface's pixels.
pub type Pixels = RgbaImage;

/// How stroked pixels combine with the existing buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Paint over the existing pixels.
    #[default]
    SourceOver,
    /// Remove existing alpha where the stroke covers.
    DestinationOut,
}

/// Stroke parameters for lines and shape outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    pub blend: BlendMode,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            blend: BlendMode::SourceOver,
        }
    }

    pub fn erase(width: f32) -> Self {
        Self {
            color: Color::BLACK,
            width,
            blend: BlendMode::DestinationOut,
        }
    }
}

/// Outlined shapes supported by [`RasterSurface::draw_shape`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Rectangle spanned by two opposite corners, in any order.
    Rect { a: Point, b: Point },
    Circle { center: Point, radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Middle,
}

/// Font parameters for [`RasterSurface::draw_text`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color,
    pub bold: bool,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            color,
            bold: false,
            align: TextAlign::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = TextAlign::Center;
        self.baseline = TextBaseline::Middle;
        self
    }
}

/// Minimal drawing interface over a mutable RGBA buffer.
pub trait RasterSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Stroke a straight segment with round caps.
    fn draw_line(&mut self, from: Point, to: Point, stroke: &StrokeStyle);

    /// Stroke the outline of a shape.
    fn draw_shape(&mut self, shape: &Shape, stroke: &StrokeStyle);

    fn fill_rect(&mut self, a: Point, b: Point, color: Color);

    fn draw_text(&mut self, text: &str, at: Point, style: &TextStyle);

    /// Advance width of `text` in buffer pixels.
    fn measure_text(&self, text: &str, style: &TextStyle) -> f32;

    fn get_pixels(&self) -> Pixels;

    /// Replace the whole buffer. `pixels` must match the surface size.
    fn put_pixels(&mut self, pixels: &Pixels);

    /// Replace the buffer with `image` scaled to the surface size.
    fn draw_image(&mut self, image: &RgbaImage);

    fn center(&self) -> Point {
        Point::new(self.width() as f32 / 2.0, self.height() as f32 / 2.0)
    }
}
