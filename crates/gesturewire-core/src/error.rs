//! Typed driver errors with suggestions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes surfaced to the driver dispatch layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    StaleElement,
    NoSuchElement,
    UnknownCommand,
    ProtocolError,
    UnsupportedGesture,
    NotReady,
    ConnectionFailed,
    InvalidInput,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::StaleElement => write!(f, "STALE_ELEMENT"),
            ErrorCode::NoSuchElement => write!(f, "NO_SUCH_ELEMENT"),
            ErrorCode::UnknownCommand => write!(f, "UNKNOWN_COMMAND"),
            ErrorCode::ProtocolError => write!(f, "PROTOCOL_ERROR"),
            ErrorCode::UnsupportedGesture => write!(f, "UNSUPPORTED_GESTURE"),
            ErrorCode::NotReady => write!(f, "NOT_READY"),
            ErrorCode::ConnectionFailed => write!(f, "CONNECTION_FAILED"),
            ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
        }
    }
}

/// An error returned to the caller of a gesture or agent command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    pub suggestion: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (hint: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// True when the error is one the release-step retry may recover from.
    pub fn is_element_race(&self) -> bool {
        matches!(self.code, ErrorCode::StaleElement | ErrorCode::NoSuchElement)
    }

    pub fn stale_element(call: &str) -> Self {
        Self {
            code: ErrorCode::StaleElement,
            message: format!("Element referenced by '{}' is no longer attached to the UI", call),
            suggestion: Some("Find the element again before retrying the command".into()),
        }
    }

    pub fn no_such_element(call: &str) -> Self {
        Self {
            code: ErrorCode::NoSuchElement,
            message: format!("Agent could not locate the element for '{}'", call),
            suggestion: Some("Check that the element id came from a recent find call".into()),
        }
    }

    pub fn unknown_command(call: &str) -> Self {
        Self {
            code: ErrorCode::UnknownCommand,
            message: format!("Agent does not recognize command '{}'", call),
            suggestion: Some(
                "The in-app agent may be older than this driver. Update the agent build".into(),
            ),
        }
    }

    /// Malformed frame, or a failure status the agent contract does not enumerate.
    pub fn protocol(call: &str, detail: impl fmt::Display) -> Self {
        Self {
            code: ErrorCode::ProtocolError,
            message: format!("Bad response from {}: {}", call, detail),
            suggestion: Some("Enable RUST_LOG=debug to see the raw frames".into()),
        }
    }

    pub fn unsupported_gesture(actions: &[&str]) -> Self {
        let shape = if actions.is_empty() {
            "(empty)".to_string()
        } else {
            actions.join(" -> ")
        };
        Self {
            code: ErrorCode::UnsupportedGesture,
            message: format!("Gesture sequence not yet implemented: {}", shape),
            suggestion: Some(
                "Supported sequences: press->release, longPress->release, press->moveTo->release, longPress->moveTo->release"
                    .into(),
            ),
        }
    }

    pub fn not_ready(command: &str) -> Self {
        Self {
            code: ErrorCode::NotReady,
            message: format!("Driver is not ready, cannot execute {}", command),
            suggestion: Some("Wait for the agent connection to be established".into()),
        }
    }

    pub fn connection_failed(call: &str, error: impl fmt::Display) -> Self {
        Self {
            code: ErrorCode::ConnectionFailed,
            message: format!("Connection to agent failed during {}: {}", call, error),
            suggestion: Some(
                "The application may have exited. Restart it and open a new session".into(),
            ),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidInput,
            message: message.into(),
            suggestion: Some("Check the gesture options and try again".into()),
        }
    }
}
