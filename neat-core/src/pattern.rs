//! Regex grammars, length bounds and reserved-word sets for identifier fields

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{NeatError, Result};

/// Maximum length of a prefix/space token
pub const PREFIX_MAX_LENGTH: usize = 43;
/// Maximum length of a version token
pub const VERSION_MAX_LENGTH: usize = 43;
/// Maximum length of a suffix/external-id token
pub const SUFFIX_MAX_LENGTH: usize = 255;

/// Grammar for the prefix (space) component: starts with a letter, then
/// alphanumerics, `_` or `-`, at most 43 characters in total.
pub const PREFIX_PATTERN: &str = r"^[a-zA-Z][a-zA-Z0-9_-]{0,42}$";

/// Grammar for the suffix (external-id) component: non-empty, no whitespace
/// and none of the entity-string metacharacters (`:`, `(`, `)`, `=`, `,`).
pub const SUFFIX_PATTERN: &str = r"^[a-zA-Z0-9._-]{1,255}$";

/// Grammar for the version component: alphanumeric with `.`/`_`/`-`
/// separators, at most 43 characters.
pub const VERSION_PATTERN: &str = r"^[a-zA-Z0-9][a-zA-Z0-9._-]{0,42}$";

static PREFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(PREFIX_PATTERN).expect("prefix pattern is valid"));
static SUFFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(SUFFIX_PATTERN).expect("suffix pattern is valid"));
static VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(VERSION_PATTERN).expect("version pattern is valid"));

/// Space names rejected by the schema store
pub const RESERVED_SPACES: &[&str] = &[
    "space", "cdf", "dms", "pg3", "shared", "system", "node", "edge",
];

/// Property names the schema store claims for itself
pub const RESERVED_PROPERTIES: &[&str] = &[
    "space",
    "externalId",
    "createdTime",
    "lastUpdatedTime",
    "deletedTime",
    "edge_id",
    "node_id",
    "project_id",
    "property_group",
    "seq",
    "tg_table_name",
    "extensions",
];

/// Check whether a space name collides with the reserved set
#[must_use]
pub fn is_reserved_space(space: &str) -> bool {
    RESERVED_SPACES.contains(&space)
}

/// Check whether a property name collides with the reserved set
#[must_use]
pub fn is_reserved_property(property: &str) -> bool {
    RESERVED_PROPERTIES.contains(&property)
}

/// Validate a prefix (space) token against [`PREFIX_PATTERN`]
///
/// # Errors
///
/// Returns [`NeatError::PatternViolation`] naming the field, value and
/// pattern when the token does not match.
pub fn validate_prefix(value: &str) -> Result<()> {
    validate("prefix", value, &PREFIX_REGEX, PREFIX_PATTERN)
}

/// Validate a suffix (external-id) token against [`SUFFIX_PATTERN`]
///
/// # Errors
///
/// Returns [`NeatError::PatternViolation`] when the token does not match.
pub fn validate_suffix(value: &str) -> Result<()> {
    validate("suffix", value, &SUFFIX_REGEX, SUFFIX_PATTERN)
}

/// Validate a version token against [`VERSION_PATTERN`]
///
/// # Errors
///
/// Returns [`NeatError::PatternViolation`] when the token does not match.
pub fn validate_version(value: &str) -> Result<()> {
    validate("version", value, &VERSION_REGEX, VERSION_PATTERN)
}

/// True when the value would pass [`validate_prefix`]
#[must_use]
pub fn matches_prefix(value: &str) -> bool {
    PREFIX_REGEX.is_match(value)
}

/// True when the value would pass [`validate_suffix`]
#[must_use]
pub fn matches_suffix(value: &str) -> bool {
    SUFFIX_REGEX.is_match(value)
}

/// True when the value would pass [`validate_version`]
#[must_use]
pub fn matches_version(value: &str) -> bool {
    VERSION_REGEX.is_match(value)
}

fn validate(
    field: &'static str,
    value: &str,
    regex: &Regex,
    pattern: &'static str,
) -> Result<()> {
    if regex.is_match(value) {
        Ok(())
    } else {
        Err(NeatError::pattern_violation(field, value, pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_grammar() {
        assert!(validate_prefix("asset").is_ok());
        assert!(validate_prefix("cdf_cdm").is_ok());
        assert!(validate_prefix("my-space").is_ok());
        assert!(validate_prefix(&"a".repeat(43)).is_ok());

        // leading digit
        assert!(validate_prefix("1abc").is_err());
        // empty string is not Undefined, and fails the minimum length
        assert!(validate_prefix("").is_err());
        assert!(validate_prefix("has space").is_err());
        assert!(validate_prefix(&"a".repeat(44)).is_err());
    }

    #[test]
    fn test_suffix_grammar() {
        assert!(validate_suffix("MyAsset").is_ok());
        assert!(validate_suffix("1.0").is_ok());
        assert!(validate_suffix("with_underscore-and.dot").is_ok());

        assert!(validate_suffix("").is_err());
        assert!(validate_suffix("has space").is_err());
        assert!(validate_suffix("has(paren").is_err());
        assert!(validate_suffix("has:colon").is_err());
        assert!(validate_suffix(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_version_grammar() {
        assert!(validate_version("v1").is_ok());
        assert!(validate_version("1.0").is_ok());
        assert!(validate_version("3_rev-2").is_ok());

        assert!(validate_version("").is_err());
        assert!(validate_version("-v1").is_err());
        assert!(validate_version(&"1".repeat(44)).is_err());
    }

    #[test]
    fn test_violation_carries_context() {
        let err = validate_prefix("1abc").unwrap_err();
        match err {
            NeatError::PatternViolation {
                field,
                value,
                pattern,
            } => {
                assert_eq!(field, "prefix");
                assert_eq!(value, "1abc");
                assert_eq!(pattern, PREFIX_PATTERN);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reserved_words() {
        assert!(is_reserved_space("cdf"));
        assert!(!is_reserved_space("asset"));
        assert!(is_reserved_property("externalId"));
        assert!(!is_reserved_property("capacity"));
    }
}
