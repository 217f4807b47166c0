// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo annotation sessions.
//!
//! An [`AnnotationSession`] owns the raster buffer for one photo and turns
//! pointer gestures into strokes, shapes, text and stamps. All mutation
//! happens synchronously inside the event methods; nothing here blocks or
//! spawns work.

pub mod export;
pub mod shapes;
pub mod signboard;
pub mod stamp;

use crate::error::Result;
use crate::models::annotation::{AnnotationRecord, Color, Point, StampKind, Tool};
use crate::models::project::Signboard;
use crate::surface::{Pixels, PixmapSurface, RasterSurface, StrokeStyle, TextStyle};
use crate::util::geometry::{client_to_buffer, scaled_height, ElementRect};
use image::imageops::FilterType;
use image::RgbaImage;

/// The eraser strokes this many times the configured line width.
pub const ERASER_WIDTH_MULTIPLIER: f32 = 3.0;

/// Text size in pixels per unit of line width.
pub const TEXT_SIZE_PER_LINE_WIDTH: f32 = 8.0;

pub const MIN_LINE_WIDTH: f32 = 1.0;
pub const MAX_LINE_WIDTH: f32 = 20.0;

/// Color and width applied to pen, shape and arrow strokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSettings {
    pub color: Color,
    pub line_width: f32,
}

impl Default for StrokeSettings {
    fn default() -> Self {
        Self {
            color: Color::RED,
            line_width: 3.0,
        }
    }
}

/// A pointer event in client coordinates, together with the rect the
/// canvas element occupied when the event fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client_x: f32,
    pub client_y: f32,
    pub element: ElementRect,
}

impl PointerEvent {
    pub fn new(client_x: f32, client_y: f32, element: ElementRect) -> Self {
        Self {
            client_x,
            client_y,
            element,
        }
    }
}

/// Gesture state of a session.
#[derive(Clone, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// A pen, eraser or shape drag is in progress.
    Drawing {
        start: Point,
        last: Point,
        /// Buffer copy taken at pointer-down, for shape tools only.
        snapshot: Option<Pixels>,
        moved: bool,
    },
    /// The text tool was pressed and is waiting for the typed text.
    AwaitingText { at: Point },
}

impl std::fmt::Debug for GestureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GestureState::Idle => write!(f, "Idle"),
            GestureState::Drawing {
                start,
                last,
                snapshot,
                moved,
            } => f
                .debug_struct("Drawing")
                .field("start", start)
                .field("last", last)
                .field("snapshot", &snapshot.is_some())
                .field("moved", moved)
                .finish(),
            GestureState::AwaitingText { at } => f.debug_struct("AwaitingText").field("at", at).finish(),
        }
    }
}

/// Editing state for one photo.
pub struct AnnotationSession<S: RasterSurface = PixmapSurface> {
    surface: S,
    /// The source photo at buffer resolution, as first drawn.
    base: RgbaImage,
    tool: Tool,
    stroke: StrokeSettings,
    state: GestureState,
    log: Vec<AnnotationRecord>,
}

impl AnnotationSession<PixmapSurface> {
    /// Open a session for a decoded photo displayed `display_width` pixels
    /// wide. The buffer keeps the photo's aspect ratio.
    pub fn open(source: &RgbaImage, display_width: u32) -> Result<Self> {
        let width = display_width.max(1);
        let height = scaled_height(source.width(), source.height(), width);
        let base = image::imageops::resize(source, width, height, FilterType::Triangle);
        log::info!(
            "Opened annotation session {}x{} (source {}x{})",
            width,
            height,
            source.width(),
            source.height()
        );
        let surface = PixmapSurface::from_image(&base)?;
        let base = surface.get_pixels();
        Ok(Self::from_parts(surface, base))
    }
}

impl<S: RasterSurface> AnnotationSession<S> {
    /// Open a session on an existing surface, drawing `source` across it.
    pub fn with_surface(mut surface: S, source: &RgbaImage) -> Self {
        surface.draw_image(source);
        let base = surface.get_pixels();
        Self::from_parts(surface, base)
    }

    fn from_parts(surface: S, base: RgbaImage) -> Self {
        Self {
            surface,
            base,
            tool: Tool::Pen,
            stroke: StrokeSettings::default(),
            state: GestureState::Idle,
            log: Vec::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Select a tool. Any gesture in progress is ended first.
    pub fn set_tool(&mut self, tool: Tool) {
        if !matches!(self.state, GestureState::Idle) {
            self.end_gesture();
        }
        self.tool = tool;
    }

    pub fn stroke(&self) -> StrokeSettings {
        self.stroke
    }

    pub fn set_color(&mut self, color: Color) {
        self.stroke.color = color;
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.stroke.line_width = width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH);
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, GestureState::Drawing { .. })
    }

    /// Where text will be placed if the session is waiting for text input.
    pub fn pending_text_at(&self) -> Option<Point> {
        match self.state {
            GestureState::AwaitingText { at } => Some(at),
            _ => None,
        }
    }

    pub fn log(&self) -> &[AnnotationRecord] {
        &self.log
    }

    /// Map an event into buffer coordinates using the event's own rect.
    pub fn map_event(&self, event: &PointerEvent) -> Point {
        client_to_buffer(
            event.client_x,
            event.client_y,
            &event.element,
            self.surface.width(),
            self.surface.height(),
        )
    }

    fn pen_style(&self) -> StrokeStyle {
        StrokeStyle::new(self.stroke.color, self.stroke.line_width)
    }

    fn eraser_style(&self) -> StrokeStyle {
        StrokeStyle::erase(self.stroke.line_width * ERASER_WIDTH_MULTIPLIER)
    }

    fn text_size(&self) -> f32 {
        self.stroke.line_width * TEXT_SIZE_PER_LINE_WIDTH
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) {
        if !matches!(self.state, GestureState::Idle) {
            return;
        }
        let at = self.map_event(event);
        self.state = match self.tool {
            Tool::Pen | Tool::Eraser => GestureState::Drawing {
                start: at,
                last: at,
                snapshot: None,
                moved: false,
            },
            Tool::Arrow | Tool::Rectangle | Tool::Circle => GestureState::Drawing {
                start: at,
                last: at,
                snapshot: Some(self.surface.get_pixels()),
                moved: false,
            },
            Tool::Text => GestureState::AwaitingText { at },
            Tool::Stamp => {
                log::debug!("Stamp tool ignores pointer input");
                GestureState::Idle
            }
        };
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) {
        let current = self.map_event(event);
        let tool = self.tool;
        let pen = self.pen_style();
        let eraser = self.eraser_style();

        let GestureState::Drawing {
            start,
            last,
            snapshot,
            moved,
        } = &mut self.state
        else {
            return;
        };

        match tool {
            Tool::Pen => self.surface.draw_line(*last, current, &pen),
            Tool::Eraser => self.surface.draw_line(*last, current, &eraser),
            Tool::Arrow | Tool::Rectangle | Tool::Circle => {
                if let Some(snapshot) = snapshot.as_ref() {
                    self.surface.put_pixels(snapshot);
                    shapes::draw_tool_shape(&mut self.surface, tool, *start, current, &pen);
                }
            }
            Tool::Text | Tool::Stamp => {}
        }
        *last = current;
        *moved = true;
    }

    /// Finish a drag. A pending text placement is left for `submit_text`.
    pub fn pointer_up(&mut self) {
        if self.is_drawing() {
            self.end_gesture();
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.is_drawing() {
            self.end_gesture();
        }
    }

    fn end_gesture(&mut self) {
        let (start, last, moved) = match std::mem::take(&mut self.state) {
            GestureState::Drawing {
                start, last, moved, ..
            } => (start, last, moved),
            GestureState::AwaitingText { .. } => {
                log::debug!("Text input abandoned");
                return;
            }
            GestureState::Idle => return,
        };

        let StrokeSettings { color, line_width } = self.stroke;
        let record = match self.tool {
            Tool::Pen => Some(AnnotationRecord::Pen { color, line_width }),
            Tool::Eraser => Some(AnnotationRecord::Eraser {
                line_width: line_width * ERASER_WIDTH_MULTIPLIER,
            }),
            Tool::Arrow if moved => Some(AnnotationRecord::Arrow {
                start,
                end: last,
                color,
                line_width,
            }),
            Tool::Rectangle if moved => Some(AnnotationRecord::Rectangle {
                start,
                end: last,
                color,
                line_width,
            }),
            Tool::Circle if moved => Some(AnnotationRecord::Circle {
                center: start,
                radius: start.distance_to(&last),
                color,
                line_width,
            }),
            _ => None,
        };
        if let Some(record) = record {
            self.log.push(record);
        }
    }

    /// Complete a pending text placement. Empty or cancelled input draws
    /// nothing. Returns whether text was drawn.
    pub fn submit_text(&mut self, text: Option<&str>) -> bool {
        let GestureState::AwaitingText { at } = self.state else {
            return false;
        };
        self.state = GestureState::Idle;

        let Some(text) = text.filter(|t| !t.is_empty()) else {
            log::debug!("Empty text input, nothing drawn");
            return false;
        };
        let size = self.text_size();
        let color = self.stroke.color;
        self.surface
            .draw_text(text, at, &TextStyle::new(size, color).bold());
        self.log.push(AnnotationRecord::Text {
            text: text.to_string(),
            at,
            color,
            size,
        });
        true
    }

    /// Stamp a badge at the buffer center.
    pub fn stamp(&mut self, kind: StampKind) {
        if !matches!(self.state, GestureState::Idle) {
            self.end_gesture();
        }
        let center = stamp::draw_stamp(&mut self.surface, kind);
        self.log.push(AnnotationRecord::Stamp {
            kind,
            center,
            size: stamp::STAMP_SIZE,
        });
    }

    /// Draw a signboard placard along the bottom of the photo.
    pub fn composite_signboard(&mut self, signboard: &Signboard) {
        signboard::composite_signboard(&mut self.surface, signboard);
    }

    /// Restore the original photo, discarding every annotation, if
    /// `confirm` approves. Returns whether the canvas was cleared.
    pub fn clear(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }
        self.state = GestureState::Idle;
        self.surface.put_pixels(&self.base);
        self.log.clear();
        log::info!("Cleared annotations");
        true
    }

    /// Current buffer contents, annotations included.
    pub fn pixels(&self) -> Pixels {
        self.surface.get_pixels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

    fn session(w: u32, h: u32) -> AnnotationSession {
        let source = RgbaImage::from_pixel(w, h, GRAY);
        let surface = PixmapSurface::new(w, h).unwrap().with_font(None);
        AnnotationSession::with_surface(surface, &source)
    }

    fn unscaled(w: u32, h: u32) -> ElementRect {
        ElementRect::new(0.0, 0.0, w as f32, h as f32)
    }

    fn at(x: f32, y: f32, element: ElementRect) -> PointerEvent {
        PointerEvent::new(x, y, element)
    }

    #[test]
    fn test_open_keeps_aspect_ratio() {
        let source = RgbaImage::from_pixel(400, 300, GRAY);
        let session = AnnotationSession::open(&source, 200).unwrap();
        assert_eq!((session.width(), session.height()), (200, 150));
        assert_eq!(session.pixels().get_pixel(100, 75), &GRAY);
    }

    #[test]
    fn test_pen_stroke_lands_at_mapped_position() {
        let mut s = session(200, 100);
        // Element displayed at half size, offset on the page.
        let element = ElementRect::new(50.0, 20.0, 100.0, 50.0);
        s.pointer_down(&at(60.0, 45.0, element));
        s.pointer_move(&at(90.0, 45.0, element));
        s.pointer_up();

        let pixels = s.pixels();
        // (60,45) -> (20,50) and (90,45) -> (80,50) in buffer space.
        assert_eq!(pixels.get_pixel(50, 50), &Rgba([255, 0, 0, 255]));
        assert_eq!(pixels.get_pixel(50, 20), &GRAY);
        assert_eq!(
            s.log(),
            &[AnnotationRecord::Pen {
                color: Color::RED,
                line_width: 3.0
            }]
        );
    }

    #[test]
    fn test_pen_down_without_move_draws_nothing() {
        let mut s = session(50, 50);
        let before = s.pixels();
        s.pointer_down(&at(10.0, 10.0, unscaled(50, 50)));
        s.pointer_up();
        assert_eq!(s.pixels(), before);
    }

    #[test]
    fn test_eraser_clears_with_triple_width() {
        let mut s = session(100, 100);
        s.set_tool(Tool::Eraser);
        s.set_line_width(4.0);
        let element = unscaled(100, 100);
        s.pointer_down(&at(10.0, 50.0, element));
        s.pointer_move(&at(90.0, 50.0, element));
        s.pointer_leave();

        let pixels = s.pixels();
        assert_eq!(pixels.get_pixel(50, 50)[3], 0);
        // Width 12: five pixels off the line is still erased, eight is not.
        assert_eq!(pixels.get_pixel(50, 45)[3], 0);
        assert_eq!(pixels.get_pixel(50, 42)[3], 255);
        assert_eq!(s.log(), &[AnnotationRecord::Eraser { line_width: 12.0 }]);
    }

    #[test]
    fn test_shape_previews_do_not_accumulate() {
        for tool in [Tool::Arrow, Tool::Rectangle, Tool::Circle] {
            let element = ElementRect::new(0.0, 0.0, 150.0, 100.0);
            let mut s = session(300, 200);
            s.set_tool(tool);
            s.pointer_down(&at(10.0, 10.0, element));
            for i in 0..25 {
                s.pointer_move(&at(20.0 + i as f32 * 3.0, 15.0 + i as f32 * 2.0, element));
            }
            s.pointer_up();

            // Reference: the same shape drawn exactly once.
            let mut reference = session(300, 200);
            let stroke = StrokeStyle::new(Color::RED, 3.0);
            let start = Point::new(20.0, 20.0);
            let end = Point::new((20.0 + 24.0 * 3.0) * 2.0, (15.0 + 24.0 * 2.0) * 2.0);
            shapes::draw_tool_shape(&mut reference.surface, tool, start, end, &stroke);

            assert!(s.pixels() == reference.pixels(), "{:?} preview smeared", tool);
            assert!(!s.is_drawing());
            assert_eq!(s.log().len(), 1);
        }
    }

    #[test]
    fn test_shape_click_without_drag_changes_nothing() {
        let mut s = session(80, 80);
        s.set_tool(Tool::Rectangle);
        let before = s.pixels();
        s.pointer_down(&at(10.0, 10.0, unscaled(80, 80)));
        s.pointer_up();
        assert_eq!(s.pixels(), before);
        assert!(s.log().is_empty());
    }

    #[test]
    fn test_text_tool_waits_for_input() {
        let mut s = session(100, 100);
        s.set_tool(Tool::Text);
        s.pointer_down(&at(30.0, 40.0, unscaled(100, 100)));
        assert_eq!(s.pending_text_at(), Some(Point::new(30.0, 40.0)));
        assert!(!s.is_drawing());

        // Cancelled input is a silent no-op.
        assert!(!s.submit_text(None));
        assert!(matches!(s.state(), GestureState::Idle));

        s.pointer_down(&at(30.0, 40.0, unscaled(100, 100)));
        assert!(!s.submit_text(Some("")));
        assert!(s.log().is_empty());

        s.set_line_width(2.0);
        s.pointer_down(&at(30.0, 40.0, unscaled(100, 100)));
        s.pointer_up();
        assert!(s.pending_text_at().is_some());
        assert!(s.submit_text(Some("Crack")));
        assert_eq!(
            s.log(),
            &[AnnotationRecord::Text {
                text: "Crack".into(),
                at: Point::new(30.0, 40.0),
                color: Color::RED,
                size: 16.0,
            }]
        );
    }

    #[test]
    fn test_stamp_ignores_pointer_and_logs_center() {
        let mut s = session(400, 200);
        s.set_tool(Tool::Stamp);
        let before = s.pixels();
        s.pointer_down(&at(5.0, 5.0, unscaled(400, 200)));
        assert!(matches!(s.state(), GestureState::Idle));
        assert_eq!(s.pixels(), before);

        s.stamp(StampKind::NeedsReview);
        assert_eq!(
            s.log(),
            &[AnnotationRecord::Stamp {
                kind: StampKind::NeedsReview,
                center: Point::new(200.0, 100.0),
                size: 80.0,
            }]
        );
    }

    #[test]
    fn test_clear_restores_source_exactly() {
        let source = RgbaImage::from_fn(120, 90, |x, y| Rgba([(x * 2) as u8, (y * 2) as u8, 77, 255]));
        let fresh = AnnotationSession::open(&source, 240).unwrap().pixels();

        let mut s = AnnotationSession::open(&source, 240).unwrap();
        let element = ElementRect::new(0.0, 0.0, 120.0, 90.0);
        s.pointer_down(&at(5.0, 5.0, element));
        s.pointer_move(&at(60.0, 70.0, element));
        s.pointer_up();
        s.set_tool(Tool::Eraser);
        s.pointer_down(&at(100.0, 10.0, element));
        s.pointer_move(&at(10.0, 80.0, element));
        s.pointer_up();
        s.set_tool(Tool::Circle);
        s.pointer_down(&at(60.0, 45.0, element));
        s.pointer_move(&at(80.0, 45.0, element));
        s.pointer_up();
        s.stamp(StampKind::Ng);
        assert_ne!(s.pixels(), fresh);

        assert!(!s.clear(|| false));
        assert_ne!(s.pixels(), fresh);

        assert!(s.clear(|| true));
        assert!(s.pixels() == fresh);
        assert!(s.log().is_empty());
    }

    #[test]
    fn test_no_reentrant_pointer_down() {
        let mut s = session(100, 100);
        s.set_tool(Tool::Rectangle);
        let element = unscaled(100, 100);
        s.pointer_down(&at(10.0, 10.0, element));
        s.pointer_down(&at(50.0, 50.0, element));
        match s.state() {
            GestureState::Drawing { start, .. } => assert_eq!(*start, Point::new(10.0, 10.0)),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_line_width_is_clamped() {
        let mut s = session(10, 10);
        s.set_line_width(0.0);
        assert_eq!(s.stroke().line_width, MIN_LINE_WIDTH);
        s.set_line_width(500.0);
        assert_eq!(s.stroke().line_width, MAX_LINE_WIDTH);
    }
}
