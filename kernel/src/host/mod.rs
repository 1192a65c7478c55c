//! Host-facing requirements: identifiers, store paths, and the context
//! traits a host ledger implements to run the protocol core.

mod context;
pub mod error;
pub mod identifiers;
pub mod path;
pub mod validate;

pub use context::{ExecutionContext, ValidationContext};
