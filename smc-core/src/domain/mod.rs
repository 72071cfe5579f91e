//! Core domain types
//!
//! These types are produced by the server (command bridge and log store) and
//! consumed by the client and CLI through the DTO envelopes.

pub mod command;
pub mod log;
