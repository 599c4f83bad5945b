//! Gesture sequence compilation.
//!
//! A touch-action sequence is classified first, so unsupported shapes fail
//! before any round trip. Geometry queries for element-anchored steps then
//! run one at a time, and exactly one native command is produced.

use gesturewire_core::error::ApiError;
use gesturewire_core::gesture::{Action, Gesture, GestureOptions};
use gesturewire_core::protocol::{CommandName, NativeCommand};
use gesturewire_core::shape::{classify, GestureShape, PointTarget};
use serde_json::Value;
use tracing::debug;

use crate::agent::connection::AgentTransport;
use crate::agent::resolve::{resolve_point, ElementGeometry};

/// How an element-less `moveTo` step's coordinates are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MoveTo {
    /// `x`/`y` are screen coordinates.
    #[default]
    Absolute,
    /// `x`/`y` are an offset from the resolved start point.
    RelativeToStart,
}

/// Compiles touch-action sequences into native commands.
pub struct GestureCompiler<'a, G: ?Sized> {
    geometry: &'a G,
    move_to: MoveTo,
}

impl<'a, G> GestureCompiler<'a, G>
where
    G: ElementGeometry + ?Sized,
{
    pub fn new(geometry: &'a G) -> Self {
        Self {
            geometry,
            move_to: MoveTo::default(),
        }
    }

    pub fn move_to(mut self, mode: MoveTo) -> Self {
        self.move_to = mode;
        self
    }

    /// Build the single native command for a sequence.
    pub async fn compile(&self, gestures: &[Gesture]) -> Result<NativeCommand, ApiError> {
        let command = match classify(gestures)? {
            GestureShape::Point { command, target } => point_command(command, target),
            GestureShape::Drag {
                command,
                start,
                end,
            } => {
                let from = resolve_point(self.geometry, start).await?;
                let to = match (self.move_to, end.element()) {
                    (MoveTo::RelativeToStart, None) => {
                        let offset = end.point();
                        from.offset(offset.x, offset.y)
                    }
                    _ => resolve_point(self.geometry, end).await?,
                };
                NativeCommand::between(command, from, to)
            }
        };

        debug!("Compiled {} step(s) into {:?}", gestures.len(), command);
        Ok(command)
    }

    /// Compile a sequence, send it, and map the agent's response.
    pub async fn perform<T>(
        &self,
        transport: &T,
        gestures: &[Gesture],
    ) -> Result<Value, ApiError>
    where
        T: AgentTransport + ?Sized,
    {
        let command = self.compile(gestures).await?;
        transport.execute(&command).await
    }
}

/// Build a `tap`/`longpress` command from a single step's options.
///
/// Element offsets are sent as-is; the agent applies them to the element.
pub fn point_command(command: CommandName, options: &GestureOptions) -> NativeCommand {
    match PointTarget::from_options(options) {
        PointTarget::Element(id) => NativeCommand::on_element(command, id),
        PointTarget::ElementOffset(id, offset) => {
            NativeCommand::at_element_offset(command, id, offset)
        }
        PointTarget::Absolute(point) => NativeCommand::at_point(command, point),
    }
}

/// Action names of a sequence, for logging.
pub fn describe(gestures: &[Gesture]) -> String {
    gestures
        .iter()
        .map(|g| g.action.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// True when the sequence ends in a `release` that names an element.
pub fn releases_on_element(gestures: &[Gesture]) -> bool {
    gestures
        .last()
        .is_some_and(|g| g.action == Action::Release && g.options.element().is_some())
}

/// True when the trailing `release` is the only step that names an element,
/// so a stale or missing element can only be that one.
pub fn only_release_names_element(gestures: &[Gesture]) -> bool {
    match gestures.split_last() {
        Some((_, earlier)) if releases_on_element(gestures) => {
            earlier.iter().all(|g| g.options.element().is_none())
        }
        _ => false,
    }
}

/// A copy of the sequence whose trailing `release` has no element.
pub fn strip_release_element(gestures: &[Gesture]) -> Vec<Gesture> {
    let mut copy = gestures.to_vec();
    if let Some(last) = copy.last_mut() {
        if last.action == Action::Release {
            last.options = last.options.without_element();
        }
    }
    copy
}
