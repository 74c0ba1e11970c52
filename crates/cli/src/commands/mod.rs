//! CLI command implementations.

pub mod gateway;
pub mod ops;
pub mod wallet_id;
