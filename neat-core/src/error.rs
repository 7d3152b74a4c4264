//! Error types for Neat identifier operations

use thiserror::Error;

/// Main error type for identifier construction, parsing and resolution
#[derive(Error, Debug)]
pub enum NeatError {
    /// Malformed entity string
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A field failed its grammar at construction time
    #[error("Value '{value}' for field '{field}' does not match pattern '{pattern}'")]
    PatternViolation {
        /// Field that failed (`prefix`, `suffix`, `version`, ...)
        field: &'static str,
        /// Offending value
        value: String,
        /// The regex that was violated
        pattern: &'static str,
    },

    /// Two identifiers of different concrete kinds were compared
    #[error("Cannot compare a {left} with a {right}: cross-kind entity comparison is undefined")]
    CrossTypeComparison {
        /// Kind name of the left-hand identifier
        left: &'static str,
        /// Kind name of the right-hand identifier
        right: &'static str,
    },

    /// `as_id`-style resolution found no space on the identifier and no default
    #[error("Cannot resolve '{entity}' into a schema reference: no space given and no default space supplied")]
    UnresolvedSpace {
        /// Canonical form of the identifier being resolved
        entity: String,
    },

    /// `as_id`-style resolution found no version on the identifier and no default
    #[error("Cannot resolve '{entity}' into a schema reference: no version given and no default version supplied")]
    UnresolvedVersion {
        /// Canonical form of the identifier being resolved
        entity: String,
    },

    /// A collection contained repeated identical identifiers
    #[error("Duplicate identifiers: {}", identifiers.join(", "))]
    DuplicateIdentifiers {
        /// Every duplicated canonical form, in first-occurrence order
        identifiers: Vec<String>,
    },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for Neat identifier operations
pub type Result<T> = std::result::Result<T, NeatError>;

impl NeatError {
    /// Create a new pattern-violation error
    #[must_use]
    pub fn pattern_violation(
        field: &'static str,
        value: impl Into<String>,
        pattern: &'static str,
    ) -> Self {
        Self::PatternViolation {
            field,
            value: value.into(),
            pattern,
        }
    }

    /// Create a cross-kind comparison error
    #[must_use]
    pub fn cross_type(left: &'static str, right: &'static str) -> Self {
        Self::CrossTypeComparison { left, right }
    }

    /// Create an unresolved-space error
    #[must_use]
    pub fn unresolved_space(entity: impl Into<String>) -> Self {
        Self::UnresolvedSpace {
            entity: entity.into(),
        }
    }

    /// Create an unresolved-version error
    #[must_use]
    pub fn unresolved_version(entity: impl Into<String>) -> Self {
        Self::UnresolvedVersion {
            entity: entity.into(),
        }
    }

    /// Create a duplicate-identifier error from the full duplicate list
    #[must_use]
    pub fn duplicates(identifiers: Vec<String>) -> Self {
        Self::DuplicateIdentifiers { identifiers }
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create a generic error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            source: None,
        }
    }

    /// Create a generic error with source
    #[must_use]
    pub fn other_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Implement conversions for common error types
impl From<serde_json::Error> for NeatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for NeatError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for NeatError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            message: err.to_string(),
            source: None,
        }
    }
}

/// Errors raised by the entity string parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A property clause had no `=` separator
    #[error("Expected '=' in property '{property}' at position {position}")]
    MissingEquals {
        /// The property clause that was missing its separator
        property: String,
        /// Position in the input where the clause started
        position: usize,
    },

    /// A property clause started with `=`
    #[error("Empty property name at position {position}")]
    EmptyKey {
        /// Position in the input where the key was expected
        position: usize,
    },
}
