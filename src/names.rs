//! XML name validation and lexical checks
//!
//! NCName/QName validation used for namespace prefixes, plus the lexical
//! patterns of the few XSD simple types the registry checks itself.

use crate::error::SchemaError;
use once_cell::sync::Lazy;
use regex::Regex;

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\-\.0-9\u{B7}]*$")
        .expect("NCName pattern compiles")
});

// xs:duration, or a plain decimal number of seconds (gml:TimeDurationType)
static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?P(\d+Y)?(\d+M)?(\d+D)?(T(\d+H)?(\d+M)?(\d+(\.\d+)?S)?)?|[+-]?\d+(\.\d+)?)$")
        .expect("duration pattern compiles")
});

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Check if a string is a valid QName (qualified name)
pub fn is_valid_qname(name: &str) -> bool {
    match name.split_once(':') {
        Some((prefix, local)) => is_valid_ncname(prefix) && is_valid_ncname(local),
        None => is_valid_ncname(name),
    }
}

/// Validate an NCName and return an error if invalid
pub fn validate_ncname(name: &str) -> Result<(), SchemaError> {
    if is_valid_ncname(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidName(name.to_string()))
    }
}

/// Validate a prefix for an `xmlns` declaration (empty means the default namespace)
pub fn validate_prefix(prefix: &str) -> Result<(), SchemaError> {
    if prefix.is_empty() {
        return Ok(());
    }
    if prefix.eq_ignore_ascii_case("xmlns") {
        return Err(SchemaError::InvalidName(prefix.to_string()));
    }
    validate_ncname(prefix)
}

/// Check the lexical form of a duration value
pub fn is_valid_duration(text: &str) -> bool {
    // a bare "P" or "PT" matches the pattern but is not a duration
    !matches!(text, "P" | "-P" | "PT" | "-PT") && !text.ends_with('T') && DURATION.is_match(text)
}

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}
