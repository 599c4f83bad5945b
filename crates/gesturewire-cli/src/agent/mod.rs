//! Connection to the in-app agent and the gesture driver built on it.

pub mod compiler;
pub mod config;
pub mod connection;
pub mod driver;
pub mod resolve;

#[cfg(test)]
pub(crate) mod testing;

// Public API - used by main.rs
pub use config::AgentAddress;
pub use connection::AgentConnection;
pub use driver::GestureDriver;
