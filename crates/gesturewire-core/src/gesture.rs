//! Touch-action steps as submitted by the automation client.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::geometry::Point;

/// W3C WebDriver key for a wrapped element reference.
pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// One touch-action primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Press,
    MoveTo,
    Release,
    LongPress,
    Wait,
    Tap,
    Cancel,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Press => "press",
            Self::MoveTo => "moveTo",
            Self::Release => "release",
            Self::LongPress => "longPress",
            Self::Wait => "wait",
            Self::Tap => "tap",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque element handle issued by the driver base.
///
/// Accepts a bare id (`"12"` or `12`) as well as the JSONWP `{"ELEMENT": id}`
/// and W3C wrapped forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Scalar {
            Text(String),
            Number(serde_json::Number),
        }

        /// Clients that speak both dialects send both keys.
        #[derive(Deserialize)]
        struct Wrapped {
            #[serde(rename = "element-6066-11e4-a52e-4f735466cecf", default)]
            w3c: Option<Scalar>,
            #[serde(rename = "ELEMENT", default)]
            jsonwp: Option<Scalar>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bare(Scalar),
            Wrapped(Wrapped),
        }

        let scalar = match Raw::deserialize(deserializer)? {
            Raw::Bare(s) => s,
            Raw::Wrapped(w) => w.w3c.or(w.jsonwp).ok_or_else(|| {
                D::Error::custom("element reference has neither an ELEMENT nor a W3C key")
            })?,
        };
        Ok(match scalar {
            Scalar::Text(s) => Self(s),
            Scalar::Number(n) => Self(n.to_string()),
        })
    }
}

/// Options attached to a gesture step. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GestureOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Wait duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ms: Option<f64>,
    /// Long-press hold time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl GestureOptions {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn on(element: impl Into<ElementId>) -> Self {
        Self {
            element: Some(element.into()),
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// The element handle, ignoring blank ids.
    pub fn element(&self) -> Option<&ElementId> {
        self.element.as_ref().filter(|id| !id.is_blank())
    }

    /// True when `x` or `y` is present and non-zero.
    pub fn has_offset(&self) -> bool {
        self.x.is_some_and(|x| x != 0.0) || self.y.is_some_and(|y| y != 0.0)
    }

    /// The explicit `x`/`y`, defaulting each to zero.
    pub fn point(&self) -> Point {
        Point::new(self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }

    /// A copy of these options with the element reference removed.
    pub fn without_element(&self) -> Self {
        Self {
            element: None,
            ..self.clone()
        }
    }
}

/// One step of a touch-action sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    pub action: Action,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: GestureOptions,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Gesture {
    pub fn new(action: Action, options: GestureOptions) -> Self {
        Self { action, options }
    }

    pub fn bare(action: Action) -> Self {
        Self::new(action, GestureOptions::default())
    }
}
