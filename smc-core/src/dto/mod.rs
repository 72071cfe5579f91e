//! Data Transfer Objects for the HTTP API
//!
//! Request and response envelopes exchanged between the server and its
//! clients. Domain types are embedded as-is.

pub mod command;
pub mod log;
pub mod status;
