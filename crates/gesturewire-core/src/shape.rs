//! Gesture sequence classification.
//!
//! The agent only knows four atomic gestures, so a touch-action sequence is
//! matched against a small set of shapes before any round trip is made:
//!
//! | Sequence | Native command |
//! |----------|----------------|
//! | `press, moveTo, release` | `swipe` |
//! | `longPress, moveTo, release` | `longpressswipe` |
//! | `press, release` | `tap` |
//! | `longPress, release` | `longpress` |
//!
//! Everything else is rejected as unsupported.

use crate::error::ApiError;
use crate::gesture::{Action, ElementId, Gesture, GestureOptions};
use crate::geometry::Point;
use crate::protocol::CommandName;

/// A recognized gesture sequence, borrowing the options that drive it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureShape<'a> {
    /// Single-point gesture (`tap` or `longpress`).
    Point {
        command: CommandName,
        target: &'a GestureOptions,
    },
    /// Two-point drag (`swipe` or `longpressswipe`).
    Drag {
        command: CommandName,
        start: &'a GestureOptions,
        end: &'a GestureOptions,
    },
}

impl GestureShape<'_> {
    pub fn command(&self) -> CommandName {
        match self {
            Self::Point { command, .. } | Self::Drag { command, .. } => *command,
        }
    }
}

/// Match a sequence against the recognized shapes.
pub fn classify(gestures: &[Gesture]) -> Result<GestureShape<'_>, ApiError> {
    let actions: Vec<Action> = gestures.iter().map(|g| g.action).collect();

    let shape = match (actions.as_slice(), gestures) {
        ([Action::Press, Action::MoveTo, Action::Release], [start, end, _]) => {
            GestureShape::Drag {
                command: CommandName::Swipe,
                start: &start.options,
                end: &end.options,
            }
        }
        ([Action::LongPress, Action::MoveTo, Action::Release], [start, end, _]) => {
            GestureShape::Drag {
                command: CommandName::LongPressSwipe,
                start: &start.options,
                end: &end.options,
            }
        }
        ([Action::Press, Action::Release], [target, _]) => GestureShape::Point {
            command: CommandName::Tap,
            target: &target.options,
        },
        ([Action::LongPress, Action::Release], [target, _]) => GestureShape::Point {
            command: CommandName::LongPress,
            target: &target.options,
        },
        _ => {
            let names: Vec<&str> = actions.iter().map(Action::as_str).collect();
            return Err(ApiError::unsupported_gesture(&names));
        }
    };

    Ok(shape)
}

/// Where a single-point gesture lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointTarget<'a> {
    /// The agent's default point for the element.
    Element(&'a ElementId),
    /// An offset from the element's top-left corner.
    ElementOffset(&'a ElementId, Point),
    Absolute(Point),
}

impl<'a> PointTarget<'a> {
    pub fn from_options(options: &'a GestureOptions) -> Self {
        match options.element() {
            Some(id) if options.has_offset() => Self::ElementOffset(id, options.point()),
            Some(id) => Self::Element(id),
            None => Self::Absolute(options.point()),
        }
    }
}
