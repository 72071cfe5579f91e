//! Service Module
//!
//! Business logic layer for the server.
//! Services sit between the HTTP API and the host thread.

pub mod bridge;
pub mod log_store;

// Re-export for convenience
pub use bridge::{CommandBridge, CommandExecutor};
pub use log_store::LogStore;
