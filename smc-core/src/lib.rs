//! SMC Core
//!
//! Core types shared by the SMC server, client and CLI.
//!
//! This crate contains:
//! - Domain types: log entries, command results, validation outcomes
//! - DTOs: request/response envelopes of the HTTP API
//! - Version: server version parsing and channel detection

pub mod domain;
pub mod dto;
pub mod version;
