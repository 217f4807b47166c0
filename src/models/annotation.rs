// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the drawing tools, colors, stamp variants and the
//! records appended to a session's annotation log.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 2D point in buffer (backing-store) pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An 8-bit RGBA color, serialized as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::RED
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("invalid color {s:?}: {e}"))
        };
        match hex.len() {
            6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(format!("invalid color {s:?}: expected #rrggbb")),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Current drawing tool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Pen,
    Eraser,
    Arrow,
    Rectangle,
    Circle,
    Text,
    Stamp,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Pen,
        Tool::Eraser,
        Tool::Arrow,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Text,
        Tool::Stamp,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Pen => "Pen",
            Tool::Eraser => "Eraser",
            Tool::Arrow => "Arrow",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Text => "Text",
            Tool::Stamp => "Stamp",
        }
    }
}

/// Fixed inspection stamp variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StampKind {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NG")]
    Ng,
    NeedsReview,
}

impl StampKind {
    pub const ALL: [StampKind; 3] = [StampKind::Ok, StampKind::Ng, StampKind::NeedsReview];

    pub fn label(self) -> &'static str {
        match self {
            StampKind::Ok => "OK",
            StampKind::Ng => "NG",
            StampKind::NeedsReview => "REVIEW",
        }
    }

    /// Background and text/border colors.
    pub fn colors(self) -> (Color, Color) {
        match self {
            StampKind::Ok => (Color::rgb(0xe8, 0xf5, 0xe9), Color::rgb(0x38, 0x8e, 0x3c)),
            StampKind::Ng => (Color::rgb(0xff, 0xeb, 0xee), Color::rgb(0xd3, 0x2f, 0x2f)),
            StampKind::NeedsReview => (Color::rgb(0xff, 0xf3, 0xe0), Color::rgb(0xf5, 0x7c, 0x00)),
        }
    }
}

/// One entry of a session's append-only annotation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnnotationRecord {
    Pen {
        color: Color,
        line_width: f32,
    },
    Eraser {
        line_width: f32,
    },
    Arrow {
        start: Point,
        end: Point,
        color: Color,
        line_width: f32,
    },
    Rectangle {
        start: Point,
        end: Point,
        color: Color,
        line_width: f32,
    },
    Circle {
        center: Point,
        radius: f32,
        color: Color,
        line_width: f32,
    },
    Text {
        text: String,
        at: Point,
        color: Color,
        size: f32,
    },
    Stamp {
        kind: StampKind,
        center: Point,
        size: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_roundtrip() {
        let c: Color = "#ff8000".parse().unwrap();
        assert_eq!(c, Color::rgb(255, 128, 0));
        assert_eq!(c.to_string(), "#ff8000");

        let translucent: Color = "#fff8e1f2".parse().unwrap();
        assert_eq!(translucent.a, 0xf2);
        assert!("#12".parse::<Color>().is_err());
    }

    #[test]
    fn test_record_serializes_with_type_tag() {
        let record = AnnotationRecord::Stamp {
            kind: StampKind::Ng,
            center: Point::new(10.0, 20.0),
            size: 80.0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "stamp");
        assert_eq!(json["kind"], "NG");
    }

    #[test]
    fn test_stamp_colors_are_distinct() {
        let colors: Vec<_> = StampKind::ALL.iter().map(|k| k.colors()).collect();
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[0], colors[2]);
        assert_ne!(colors[1], colors[2]);
    }
}
