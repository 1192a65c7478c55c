//! Identifier validation per the ICS-24 host requirements.

use crate::host::error::IdentifierError;
use crate::prelude::*;

const VALID_SPECIAL_CHARS: &str = "._+-#[]<>";

/// Checks that the identifier only contains valid characters as specified in
/// the ICS-24 spec.
pub fn validate_identifier_chars(id: &str) -> Result<(), IdentifierError> {
    if id.is_empty() {
        return Err(IdentifierError::Empty);
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || VALID_SPECIAL_CHARS.contains(c))
    {
        return Err(IdentifierError::InvalidCharacter { id: id.into() });
    }

    Ok(())
}

/// Checks that the identifier length is within the allowed bounds, both
/// inclusive.
pub fn validate_identifier_length(id: &str, min: u64, max: u64) -> Result<(), IdentifierError> {
    // Make sure min is at least one so we reject empty identifiers.
    let min = min.max(1);
    let length = id.len() as u64;
    if (min..=max).contains(&length) {
        Ok(())
    } else {
        Err(IdentifierError::InvalidLength {
            id: id.into(),
            min,
            max,
        })
    }
}

/// Checks that the identifier is of the form `{prefix}-{counter}` where the
/// counter parses as a `u64` without leading zeroes.
pub fn validate_prefix_format(prefix: &str, id: &str) -> Result<(), IdentifierError> {
    let mk_err = || IdentifierError::InvalidPrefix {
        prefix: prefix.into(),
        id: id.into(),
    };

    let suffix = id
        .strip_prefix(prefix)
        .and_then(|s| s.strip_prefix('-'))
        .ok_or_else(mk_err)?;

    if suffix != "0" && suffix.starts_with('0') {
        return Err(mk_err());
    }

    suffix.parse::<u64>().map(|_| ()).map_err(|_| mk_err())
}

pub fn validate_client_type(id: &str) -> Result<(), IdentifierError> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 1, 64)
}

pub fn validate_client_identifier(id: &str) -> Result<(), IdentifierError> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 9, 64)
}

pub fn validate_connection_identifier(id: &str) -> Result<(), IdentifierError> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 10, 64)
}

pub fn validate_channel_identifier(id: &str) -> Result<(), IdentifierError> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 8, 64)
}

pub fn validate_port_identifier(id: &str) -> Result<(), IdentifierError> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 2, 128)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("transfer")]
    #[case("ft-transfer")]
    #[case("po.rt_id+#[]<>")]
    fn valid_port_ids(#[case] id: &str) {
        assert!(validate_port_identifier(id).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("p")]
    #[case("id/with/slashes")]
    #[case("id with spaces")]
    fn invalid_port_ids(#[case] id: &str) {
        assert!(validate_port_identifier(id).is_err());
    }

    #[test]
    fn prefix_format() {
        assert!(validate_prefix_format("connection", "connection-0").is_ok());
        assert!(validate_prefix_format("connection", "connection-42").is_ok());
        assert!(validate_prefix_format("connection", "connection-007").is_err());
        assert!(validate_prefix_format("connection", "connection42").is_err());
        assert!(validate_prefix_format("connection", "channel-42").is_err());
    }

    #[test]
    fn length_bounds_are_inclusive() {
        assert!(validate_identifier_length("abcde", 5, 5).is_ok());
        assert!(validate_identifier_length("abcde", 6, 10).is_err());
        // a zero min still rejects the empty identifier
        assert!(validate_identifier_length("", 0, 10).is_err());
    }
}
