//! Core types and logic for gesturewire.
//!
//! This crate holds the pieces of the gesture driver that do no I/O: the
//! touch-action data model, wire frames, status mapping and sequence
//! classification. The agent connection and the compiler that drives it
//! live in `gesturewire-cli`.
//!
//! # Modules
//!
//! - [`error`]: typed driver errors with suggestions
//! - [`gesture`]: touch-action steps and element handles
//! - [`geometry`]: screen points and element sizes
//! - [`protocol`]: agent request/response frames
//! - [`status`]: response status interpretation
//! - [`shape`]: gesture sequence classification

pub mod error;
pub mod geometry;
pub mod gesture;
pub mod protocol;
pub mod shape;
pub mod status;
