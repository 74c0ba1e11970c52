//! Harvestly RPC server library.
//!
//! Exposes the typed procedure layer as a library so integration tests and
//! the CLI can build routers and registries without spawning the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gateway;
pub mod middleware;
pub mod rpc;
pub mod state;
