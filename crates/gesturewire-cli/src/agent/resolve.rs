//! Coordinate resolution for element-anchored gesture steps.

use async_trait::async_trait;
use gesturewire_core::error::ApiError;
use gesturewire_core::geometry::{Point, Size};
use gesturewire_core::gesture::{ElementId, GestureOptions};
use gesturewire_core::protocol::{CommandName, NativeCommand};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use crate::agent::connection::{AgentConnection, AgentTransport};

/// Element geometry queries supplied by the driver base.
#[async_trait]
pub trait ElementGeometry: Send + Sync {
    /// Top-left corner of the element in screen coordinates.
    async fn location(&self, element: &ElementId) -> Result<Point, ApiError>;

    async fn size(&self, element: &ElementId) -> Result<Size, ApiError>;
}

/// Geometry answered by the agent itself via `getLocation` / `getSize`.
#[async_trait]
impl<S> ElementGeometry for AgentConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn location(&self, element: &ElementId) -> Result<Point, ApiError> {
        query(self, CommandName::GetLocation, element).await
    }

    async fn size(&self, element: &ElementId) -> Result<Size, ApiError> {
        query(self, CommandName::GetSize, element).await
    }
}

async fn query<T: DeserializeOwned>(
    transport: &(impl AgentTransport + ?Sized),
    name: CommandName,
    element: &ElementId,
) -> Result<T, ApiError> {
    let value = transport
        .execute(&NativeCommand::on_element(name, element))
        .await?;
    serde_json::from_value(value).map_err(|e| ApiError::protocol(name.as_str(), e))
}

/// Resolve a step's options to an absolute screen point.
///
/// - no element: `x`/`y` as given, defaulting to `0,0`
/// - element with an offset: origin plus offset
/// - element without an offset: geometric center
///
/// Nothing is cached; each call queries the element afresh.
pub async fn resolve_point<G>(geometry: &G, options: &GestureOptions) -> Result<Point, ApiError>
where
    G: ElementGeometry + ?Sized,
{
    let Some(element) = options.element() else {
        return Ok(options.point());
    };

    let origin = geometry.location(element).await?;
    let point = if options.has_offset() {
        let offset = options.point();
        origin.offset(offset.x, offset.y)
    } else {
        origin.center_of(geometry.size(element).await?)
    };

    debug!("Resolved element {} to ({}, {})", element, point.x, point.y);
    Ok(point)
}
