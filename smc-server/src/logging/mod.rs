//! Logging Module
//!
//! Feeds the server's own `tracing` events into the in-memory log store.

mod capture;

pub use capture::{CaptureLayer, LogCapture, render_error_chain};
