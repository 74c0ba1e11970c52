//! Operation registry inspection.
//!
//! # Usage
//!
//! ```bash
//! harvestly ops list
//! harvestly ops list --json
//! ```

use harvestly_server::rpc::{AuthTier, OpMode, Registry};
use serde_json::json;
use thiserror::Error;

/// Errors that can occur while listing operations.
#[derive(Debug, Error)]
pub enum OpsError {
    /// The listing could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Print every registered operation with its mode and auth tier.
pub fn list(as_json: bool) -> Result<(), OpsError> {
    let registry = Registry::new();

    if as_json {
        let ops: Vec<_> = registry
            .operations()
            .map(|op| json!({ "name": op.name, "mode": op.mode, "tier": op.tier }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&ops)?);
        return Ok(());
    }

    let width = registry
        .operations()
        .map(|op| op.name.len())
        .max()
        .unwrap_or(0);

    for op in registry.operations() {
        let mode = match op.mode {
            OpMode::Query => "query",
            OpMode::Mutation => "mutation",
        };
        let tier = match op.tier {
            AuthTier::Public => "public",
            AuthTier::Protected => "protected",
        };
        println!("{:width$}  {mode:8}  {tier}", op.name);
    }
    println!("\n{} operations", registry.len());

    Ok(())
}
