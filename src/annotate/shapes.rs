// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometry for the shape tools.

use crate::models::annotation::{Point, Tool};
use crate::surface::{RasterSurface, Shape, StrokeStyle};
use std::f32::consts::PI;

/// Length of each arrowhead stroke in buffer units.
pub const ARROW_HEAD_LENGTH: f32 = 20.0;

/// Angle between each arrowhead stroke and the shaft.
pub const ARROW_HEAD_ANGLE: f32 = PI / 6.0;

/// The two arrowhead strokes, each running from `to` back to a wing tip.
pub fn arrow_head(from: Point, to: Point) -> [(Point, Point); 2] {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    let wing = |offset: f32| {
        Point::new(
            to.x - ARROW_HEAD_LENGTH * (angle + offset).cos(),
            to.y - ARROW_HEAD_LENGTH * (angle + offset).sin(),
        )
    };
    [(to, wing(-ARROW_HEAD_ANGLE)), (to, wing(ARROW_HEAD_ANGLE))]
}

/// Draw a shaft plus a two-stroke V arrowhead.
pub fn draw_arrow<S: RasterSurface + ?Sized>(surface: &mut S, from: Point, to: Point, stroke: &StrokeStyle) {
    surface.draw_line(from, to, stroke);
    for (a, b) in arrow_head(from, to) {
        surface.draw_line(a, b, stroke);
    }
}

/// Draw the shape a shape tool produces for a drag from `start` to `end`.
///
/// Rectangles span the two corners; circles are centered on `start` with
/// the drag distance as radius.
pub fn draw_tool_shape<S: RasterSurface + ?Sized>(
    surface: &mut S,
    tool: Tool,
    start: Point,
    end: Point,
    stroke: &StrokeStyle,
) {
    match tool {
        Tool::Arrow => draw_arrow(surface, start, end, stroke),
        Tool::Rectangle => surface.draw_shape(&Shape::Rect { a: start, b: end }, stroke),
        Tool::Circle => surface.draw_shape(
            &Shape::Circle {
                center: start,
                radius: start.distance_to(&end),
            },
            stroke,
        ),
        other => log::debug!("{:?} is not a shape tool", other),
    }
}
