//! Response status interpretation.
//!
//! Status values follow the JSON wire protocol numbering the agent uses.

use serde_json::Value;

use crate::error::ApiError;
use crate::protocol::WireResponse;

pub const SUCCESS: i64 = 0;
pub const NO_SUCH_ELEMENT: i64 = 7;
pub const UNKNOWN_COMMAND: i64 = 9;
pub const STALE_ELEMENT: i64 = 10;

/// Decode a response frame. `call` names the request for diagnostics.
///
/// Returns `Ok(None)` while `frame` is still an incomplete JSON document.
pub fn decode(call: &str, frame: &[u8]) -> Result<Option<WireResponse>, ApiError> {
    match serde_json::from_slice(frame) {
        Ok(response) => Ok(Some(response)),
        Err(e) if e.is_eof() => Ok(None),
        Err(e) => Err(ApiError::protocol(call, e)),
    }
}

/// Map a decoded response to its value or a typed error.
pub fn interpret(call: &str, response: WireResponse) -> Result<Value, ApiError> {
    match response.status {
        SUCCESS => Ok(response.value),
        STALE_ELEMENT => Err(ApiError::stale_element(call)),
        NO_SUCH_ELEMENT => Err(ApiError::no_such_element(call)),
        UNKNOWN_COMMAND => Err(ApiError::unknown_command(call)),
        other => Err(ApiError::protocol(
            call,
            format!("agent returned status {} ({})", other, response.value),
        )),
    }
}
