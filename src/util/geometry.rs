// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module maps pointer positions from the displayed element into the
//! backing buffer and fits images into layout boxes.

use crate::models::annotation::Point;

/// On-screen rectangle occupied by the annotation canvas element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ElementRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Convert client coordinates to buffer pixel coordinates.
///
/// Each axis is scaled by `buffer_size / displayed_size` independently,
/// so this must be evaluated against the element rect current at the time
/// of the event.
pub fn client_to_buffer(
    client_x: f32,
    client_y: f32,
    rect: &ElementRect,
    buffer_width: u32,
    buffer_height: u32,
) -> Point {
    let scale_x = if rect.width > 0.0 {
        buffer_width as f32 / rect.width
    } else {
        1.0
    };
    let scale_y = if rect.height > 0.0 {
        buffer_height as f32 / rect.height
    } else {
        1.0
    };
    Point {
        x: (client_x - rect.left) * scale_x,
        y: (client_y - rect.top) * scale_y,
    }
}

/// Buffer height for a source image shown at `display_width`, keeping the
/// source aspect ratio.
pub fn scaled_height(source_width: u32, source_height: u32, display_width: u32) -> u32 {
    if source_width == 0 {
        return display_width.max(1);
    }
    let h = display_width as f64 * source_height as f64 / source_width as f64;
    (h.round() as u32).max(1)
}

/// Largest size with the source aspect ratio that fits inside the box.
pub fn fit_within(source_width: f32, source_height: f32, box_width: f32, box_height: f32) -> (f32, f32) {
    if source_width <= 0.0 || source_height <= 0.0 {
        return (box_width, box_height);
    }
    let scale = (box_width / source_width).min(box_height / source_height);
    (source_width * scale, source_height * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_scales_each_axis() {
        // Displayed at half width and a third of the height of the buffer.
        let rect = ElementRect::new(0.0, 0.0, 500.0, 200.0);
        for &(cx, cy) in &[(0.0, 0.0), (10.0, 20.0), (123.5, 77.25), (500.0, 200.0)] {
            let p = client_to_buffer(cx, cy, &rect, 1000, 600);
            assert!((p.x - cx * 2.0).abs() < 0.001);
            assert!((p.y - cy * 3.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_mapping_subtracts_element_origin() {
        let rect = ElementRect::new(100.0, 50.0, 200.0, 100.0);
        let p = client_to_buffer(100.0, 50.0, &rect, 400, 200);
        assert_eq!(p, Point::new(0.0, 0.0));

        let p = client_to_buffer(300.0, 150.0, &rect, 400, 200);
        assert_eq!(p, Point::new(400.0, 200.0));
    }

    #[test]
    fn test_mapping_follows_resize() {
        let buffer = (800, 400);
        let before = ElementRect::new(0.0, 0.0, 800.0, 400.0);
        let after = ElementRect::new(0.0, 0.0, 400.0, 200.0);
        let a = client_to_buffer(100.0, 100.0, &before, buffer.0, buffer.1);
        let b = client_to_buffer(100.0, 100.0, &after, buffer.0, buffer.1);
        assert_eq!(a, Point::new(100.0, 100.0));
        assert_eq!(b, Point::new(200.0, 200.0));
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        let (w, h) = fit_within(4000.0, 3000.0, 90.0, 90.0);
        assert!((w - 90.0).abs() < 0.001);
        assert!((h - 67.5).abs() < 0.001);

        let (w, h) = fit_within(1000.0, 2000.0, 90.0, 90.0);
        assert!((w - 45.0).abs() < 0.001);
        assert!((h - 90.0).abs() < 0.001);
    }

    #[test]
    fn test_scaled_height() {
        assert_eq!(scaled_height(4000, 3000, 800), 600);
        assert_eq!(scaled_height(0, 10, 800), 800);
    }
}
