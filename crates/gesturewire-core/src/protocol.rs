//! Wire types for the in-app agent protocol.
//!
//! Requests are `{"name": ..., "args": [...]}` with positional string
//! arguments. Responses are `{"status": <int>, "value": <any>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gesture::ElementId;
use crate::geometry::Point;

/// Raw request that asks the agent for its UI tree. Not JSON encoded.
pub const SOURCE_REQUEST: &str = "GetSRC";

/// Native command names understood by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
    Tap,
    LongPress,
    Swipe,
    LongPressSwipe,
    Click,
    GetLocation,
    GetSize,
}

impl CommandName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tap => "tap",
            Self::LongPress => "longpress",
            Self::Swipe => "swipe",
            Self::LongPressSwipe => "longpressswipe",
            Self::Click => "click",
            Self::GetLocation => "getLocation",
            Self::GetSize => "getSize",
        }
    }
}

/// A request frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCommand {
    pub name: String,
    pub args: Vec<String>,
}

impl NativeCommand {
    pub fn new(name: CommandName, args: Vec<String>) -> Self {
        Self {
            name: name.as_str().to_string(),
            args,
        }
    }

    /// `[elementId]`
    pub fn on_element(name: CommandName, element: &ElementId) -> Self {
        Self::new(name, vec![element.to_string()])
    }

    /// `[x, y]`
    pub fn at_point(name: CommandName, point: Point) -> Self {
        Self::new(name, point.to_args().to_vec())
    }

    /// `[elementId, x, y]`
    pub fn at_element_offset(name: CommandName, element: &ElementId, offset: Point) -> Self {
        let [x, y] = offset.to_args();
        Self::new(name, vec![element.to_string(), x, y])
    }

    /// `[startX, startY, endX, endY]`
    pub fn between(name: CommandName, start: Point, end: Point) -> Self {
        let mut args = start.to_args().to_vec();
        args.extend(end.to_args());
        Self::new(name, args)
    }
}

/// A decoded response frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireResponse {
    pub status: i64,
    #[serde(default)]
    pub value: Value,
}
