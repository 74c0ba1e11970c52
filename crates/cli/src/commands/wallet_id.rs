//! Wallet display ID utilities.
//!
//! # Usage
//!
//! ```bash
//! harvestly wallet-id generate --count 5
//! harvestly wallet-id format 123456789012
//! harvestly wallet-id check 123456789012
//! ```

use harvestly_core::display_id;
use thiserror::Error;

/// Errors from display ID validation.
#[derive(Debug, Error)]
pub enum WalletIdError {
    /// The candidate is not a 12-digit display ID.
    #[error("Invalid display ID: {0}")]
    Invalid(String),
}

/// Generate and print fresh display IDs.
pub fn generate(count: u32) {
    for _ in 0..count {
        let id = display_id::generate();
        println!("{}  ({})", id, display_id::format(&id));
    }
}

/// Print the dash-separated form of a display ID.
///
/// Invalid input is printed unchanged, matching how the server renders it.
pub fn format(id: &str) {
    println!("{}", display_id::format(id));
}

/// Validate a candidate display ID, exiting nonzero when invalid.
pub fn check(id: &str) -> Result<(), WalletIdError> {
    if display_id::is_valid(id) {
        println!("valid");
        Ok(())
    } else {
        Err(WalletIdError::Invalid(id.to_string()))
    }
}
