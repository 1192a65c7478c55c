//! Error type for malformed identifiers.

use displaydoc::Display;

use crate::prelude::*;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum IdentifierError {
    /// identifier `{id}` has invalid length; must be between `{min}` and `{max}` characters
    InvalidLength { id: String, min: u64, max: u64 },
    /// identifier `{id}` must only contain alphanumeric characters or `.`, `_`, `+`, `-`, `#`, `[`, `]`, `<`, `>`
    InvalidCharacter { id: String },
    /// identifier cannot be empty
    Empty,
    /// identifier `{id}` must be in the form `{prefix}-{{counter}}`
    InvalidPrefix { prefix: String, id: String },
    /// string `{value}` cannot be parsed as a sequence number
    InvalidStringAsSequence { value: String },
}

#[cfg(feature = "std")]
impl std::error::Error for IdentifierError {}
