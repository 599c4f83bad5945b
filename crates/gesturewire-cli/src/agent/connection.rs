//! Persistent connection to the in-app agent.
//!
//! The agent speaks strict half-duplex request/response with no correlation
//! id, so every call holds the stream lock from write until its response has
//! been read.

use async_trait::async_trait;
use gesturewire_core::error::ApiError;
use gesturewire_core::protocol::{NativeCommand, WireResponse};
use gesturewire_core::status;
use serde_json::Value;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::agent::config::AgentAddress;

/// Maximum response size in bytes.
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

const READ_CHUNK: usize = 8 * 1024;

/// Quiet period that ends a raw (unframed) reply once data has arrived.
const RAW_IDLE: Duration = Duration::from_millis(100);

/// Sends native commands and maps their responses.
///
/// This is the seam the driver base plugs its own socket into.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Send one command and return the decoded response frame.
    async fn send(&self, command: &NativeCommand) -> Result<WireResponse, ApiError>;

    /// Send one command and map its status to a value or a typed error.
    async fn execute(&self, command: &NativeCommand) -> Result<Value, ApiError> {
        let response = self.send(command).await?;
        status::interpret(&command.name, response)
    }
}

/// The single connection shared by every command of a session.
pub struct AgentConnection<S = TcpStream> {
    stream: Mutex<S>,
    peer: String,
}

impl AgentConnection<TcpStream> {
    /// Open a TCP connection to the agent.
    pub async fn connect(address: &AgentAddress) -> Result<Self, ApiError> {
        let stream = TcpStream::connect((address.host.as_str(), address.port))
            .await
            .map_err(|e| ApiError::connection_failed("connect", e))?;
        stream
            .set_nodelay(true)
            .map_err(|e| ApiError::connection_failed("connect", e))?;
        info!("Connected to agent at {}", address);
        Ok(Self::new(stream, address.to_string()))
    }
}

impl<S> AgentConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream: Mutex::new(stream),
            peer: peer.into(),
        }
    }

    /// Send a raw, non-JSON request and return the reply verbatim.
    ///
    /// Raw replies carry no framing, so the reply ends once the agent has
    /// been quiet for a short while after its first bytes.
    pub async fn send_raw(&self, request: &str) -> Result<String, ApiError> {
        let mut stream = self.stream.lock().await;
        debug!("COMMAND [{}]: {}", self.peer, request);
        write_frame(&mut *stream, request, request.as_bytes()).await?;

        let text = read_raw(&mut *stream, request, MAX_FRAME_SIZE).await?;
        debug!("RESPONSE: {} bytes", text.len());
        Ok(text)
    }
}

#[async_trait]
impl<S> AgentTransport for AgentConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&self, command: &NativeCommand) -> Result<WireResponse, ApiError> {
        let call = command.name.as_str();
        let frame = serde_json::to_string(command).map_err(|e| ApiError::protocol(call, e))?;

        // Held until the response is consumed; dropped on every return path.
        let mut stream = self.stream.lock().await;
        debug!("COMMAND [{}]: {}", self.peer, frame);
        write_frame(&mut *stream, call, frame.as_bytes()).await?;
        read_response(&mut *stream, call, MAX_FRAME_SIZE).await
    }
}

async fn write_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    call: &str,
    frame: &[u8],
) -> Result<(), ApiError> {
    writer
        .write_all(frame)
        .await
        .map_err(|e| ApiError::connection_failed(call, e))?;
    writer
        .flush()
        .await
        .map_err(|e| ApiError::connection_failed(call, e))
}

/// Read one response frame.
///
/// A frame normally arrives in a single read. Reads continue only while the
/// bytes so far are an incomplete JSON document.
async fn read_response<R: AsyncRead + Unpin>(
    reader: &mut R,
    call: &str,
    limit: usize,
) -> Result<WireResponse, ApiError> {
    let mut bytes = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = reader
            .read(&mut chunk)
            .await
            .map_err(|e| ApiError::connection_failed(call, e))?;

        if n == 0 {
            return Err(if bytes.is_empty() {
                ApiError::connection_failed(call, "agent closed the connection")
            } else {
                ApiError::protocol(call, "connection closed mid-frame")
            });
        }

        if bytes.len() + n > limit {
            return Err(oversize(call, limit));
        }
        bytes.extend_from_slice(&chunk[..n]);

        if let Some(response) = status::decode(call, &bytes)? {
            debug!("RESPONSE: {}", String::from_utf8_lossy(&bytes).trim());
            return Ok(response);
        }
    }
}

/// Read an unframed reply: wait for the first bytes, then keep reading until
/// the agent goes quiet or closes the connection.
async fn read_raw<R: AsyncRead + Unpin>(
    reader: &mut R,
    call: &str,
    limit: usize,
) -> Result<String, ApiError> {
    let mut bytes = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let read = reader.read(&mut chunk);
        let result = if bytes.is_empty() {
            read.await
        } else {
            match tokio::time::timeout(RAW_IDLE, read).await {
                Ok(result) => result,
                Err(_) => break,
            }
        };
        let n = result.map_err(|e| ApiError::connection_failed(call, e))?;

        if n == 0 {
            if bytes.is_empty() {
                return Err(ApiError::connection_failed(
                    call,
                    "agent closed the connection",
                ));
            }
            break;
        }

        if bytes.len() + n > limit {
            return Err(oversize(call, limit));
        }
        bytes.extend_from_slice(&chunk[..n]);
    }

    // Decoded only once complete, so a character split across reads is intact.
    String::from_utf8(bytes).map_err(|e| ApiError::protocol(call, e))
}

fn oversize(call: &str, limit: usize) -> ApiError {
    ApiError::protocol(call, format!("response exceeded {} byte limit", limit))
}
