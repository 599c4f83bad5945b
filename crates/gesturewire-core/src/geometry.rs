//! Screen-space points and element sizes.

use serde::{Deserialize, Serialize};

/// An absolute screen coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by an offset.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Geometric center of a box whose top-left corner is `self`.
    pub fn center_of(self, size: Size) -> Self {
        self.offset(size.width / 2.0, size.height / 2.0)
    }

    /// Positional wire arguments `[x, y]`.
    pub fn to_args(self) -> [String; 2] {
        [format_coord(self.x), format_coord(self.y)]
    }
}

/// Element dimensions as reported by the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Format a coordinate the way the agent parses it.
///
/// Whole numbers are written without a fractional part (`60`, not `60.0`).
pub fn format_coord(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
