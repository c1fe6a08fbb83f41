//! Launch and campaign identifier parsing.
use crate::error::{Error, Result};

/// Parse a launch or campaign identifier.
///
/// Only plain decimal digits are accepted; signs, whitespace and zero are
/// rejected instead of being normalized.
pub fn parse_id(text: &str) -> Result<u64> {
    let invalid = |reason: &str| Error::InvalidFormat {
        what: "ID",
        input: text.to_string(),
        reason: reason.to_string(),
    };
    if text.is_empty() {
        return Err(invalid("empty"));
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("must contain only decimal digits"));
    }
    let id: u64 = text
        .parse()
        .map_err(|_| invalid("out of range for a 64-bit identifier"))?;
    if id == 0 {
        return Err(invalid("ID must be greater than 0"));
    }
    Ok(id)
}
