//! Harvestly Core - Shared types library.
//!
//! This crate provides common types used across all Harvestly components:
//! - `server` - The RPC backend serving the mobile app
//! - `cli` - Command-line tools for operations and diagnostics
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients. All durable state lives behind the remote data gateway; the
//! types here describe the JSON shapes that cross that boundary.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, domain records, and the wallet display-id utility

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
