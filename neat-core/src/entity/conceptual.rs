//! Conceptual (semantic/RDF-side) identifier family
//!
//! Extra fields serialize sorted alphabetically by key. Cross-kind
//! comparison does not exist in this family: each kind is its own type, so
//! `Entity == ConceptEntity` is rejected at compile time rather than at
//! runtime.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use indexmap::IndexMap;
use url::Url;

use crate::error::{NeatError, Result};
use crate::pattern;

use super::{hash_entity, impl_string_serde, split_id, EntityIdent, Space, UNKNOWN_TOKEN};

/// Loosely-typed generic identifier
///
/// Carries an open set of extra attributes and appears outside the strict
/// schema layer, e.g. in raw rule rows before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    space: Space,
    suffix: String,
    extra: IndexMap<String, String>,
}

impl Entity {
    /// Create a prefixed entity, validating both fields
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::PatternViolation`] when the trimmed prefix or
    /// suffix fails its grammar. The empty prefix string is a violation,
    /// not `Undefined`.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Result<Self> {
        Ok(Self {
            space: Space::named(prefix)?,
            suffix: validated_suffix(suffix)?,
            extra: IndexMap::new(),
        })
    }

    /// Create an entity with no prefix
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::PatternViolation`] when the suffix fails its
    /// grammar.
    pub fn unprefixed(suffix: impl Into<String>) -> Result<Self> {
        Ok(Self {
            space: Space::Undefined,
            suffix: validated_suffix(suffix)?,
            extra: IndexMap::new(),
        })
    }

    /// Attach an extra attribute; keys and values are trimmed but not
    /// validated in this loose family
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra
            .insert(key.into().trim().to_string(), value.into().trim().to_string());
        self
    }

    /// Parse from the canonical grammar, combining with `default_prefix`
    /// when the input is a bare suffix
    ///
    /// # Errors
    ///
    /// Returns a parse or pattern-violation error when no resolution rule
    /// matches.
    pub fn from_string(text: &str, default_prefix: Option<&str>) -> Result<Self> {
        let parts = split_id(text, default_prefix)?;
        let mut extra = parts.properties;
        if let Some(version) = parts.version {
            extra.insert("version".to_string(), version);
        }
        Ok(Self {
            space: parts.space,
            suffix: parts.suffix,
            extra,
        })
    }

    /// Namespace component
    #[must_use]
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Local identifier
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Extra attributes in insertion order
    #[must_use]
    pub fn extra(&self) -> &IndexMap<String, String> {
        &self.extra
    }

    /// The `(prefix, suffix)` pair; an undefined space yields an empty
    /// prefix string
    #[must_use]
    pub fn as_tuple(&self) -> (String, String) {
        (
            self.space.as_str().unwrap_or_default().to_string(),
            self.suffix.clone(),
        )
    }
}

impl EntityIdent for Entity {
    const KIND: &'static str = "Entity";

    fn space(&self) -> &Space {
        &self.space
    }

    fn suffix(&self) -> &str {
        &self.suffix
    }

    fn extras(&self) -> Vec<(String, String)> {
        let mut extras: Vec<(String, String)> = self
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        extras.sort();
        extras
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_entity(self, state);
    }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.space, &self.suffix, self.extras()).cmp(&(
            &other.space,
            &other.suffix,
            other.extras(),
        ))
    }
}

impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Entity {
    type Err = NeatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s, None)
    }
}

impl_string_serde!(Entity);

/// Conceptual class/concept identifier, optionally versioned
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConceptEntity {
    space: Space,
    suffix: String,
    version: Option<String>,
}

/// Legacy alias retained from the previous schema generation
pub type ClassEntity = ConceptEntity;

impl ConceptEntity {
    /// Create a prefixed concept
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::PatternViolation`] when a field fails its
    /// grammar.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Result<Self> {
        Ok(Self {
            space: Space::named(prefix)?,
            suffix: validated_suffix(suffix)?,
            version: None,
        })
    }

    /// Create a concept with no prefix
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::PatternViolation`] when the suffix fails its
    /// grammar.
    pub fn unprefixed(suffix: impl Into<String>) -> Result<Self> {
        Ok(Self {
            space: Space::Undefined,
            suffix: validated_suffix(suffix)?,
            version: None,
        })
    }

    /// Attach a version
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::PatternViolation`] when the trimmed version
    /// fails its grammar.
    pub fn with_version(mut self, version: impl Into<String>) -> Result<Self> {
        let version = version.into();
        let trimmed = version.trim();
        pattern::validate_version(trimmed)?;
        self.version = Some(trimmed.to_string());
        Ok(self)
    }

    /// The unresolved-reference sentinel; serializes as `#N/A`
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            space: Space::Undefined,
            suffix: UNKNOWN_TOKEN.to_string(),
            version: None,
        }
    }

    /// True for the unresolved-reference sentinel
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.space.is_undefined() && self.suffix == UNKNOWN_TOKEN
    }

    /// Parse from the canonical grammar
    ///
    /// The Unknown token reconstructs the sentinel by value. Properties
    /// other than `version` have no meaning on a concept and are dropped.
    ///
    /// # Errors
    ///
    /// Returns a parse or pattern-violation error when no resolution rule
    /// matches.
    pub fn from_string(text: &str, default_prefix: Option<&str>) -> Result<Self> {
        if text.trim() == UNKNOWN_TOKEN {
            return Ok(Self::unknown());
        }
        let parts = split_id(text, default_prefix)?;
        if !parts.properties.is_empty() {
            tracing::debug!(
                entity = text,
                "ignoring properties with no meaning on a concept"
            );
        }
        Ok(Self {
            space: parts.space,
            suffix: parts.suffix,
            version: parts.version,
        })
    }

    /// Defensive factory for loose inputs
    ///
    /// Empty input yields an unprefixed concept with an empty suffix; a
    /// string matching the entity grammar goes through
    /// [`Self::from_string`]; anything else is wrapped as a bare suffix
    /// without validation.
    #[must_use]
    pub fn from_raw(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Self {
                space: Space::Undefined,
                suffix: String::new(),
                version: None,
            };
        }
        match Self::from_string(trimmed, None) {
            Ok(concept) => concept,
            Err(err) => {
                tracing::warn!(
                    value = trimmed,
                    error = %err,
                    "treating non-conforming reference as a bare suffix"
                );
                Self {
                    space: Space::Undefined,
                    suffix: trimmed.to_string(),
                    version: None,
                }
            }
        }
    }

    /// Namespace component
    #[must_use]
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Local identifier
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Version when present
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Expand against a prefix→namespace map into a full URI
    ///
    /// Returns `None` for an undefined space, an unknown sentinel, or a
    /// prefix missing from the map.
    #[must_use]
    pub fn uri(&self, namespaces: &IndexMap<String, Url>) -> Option<Url> {
        let prefix = self.space.as_str()?;
        let base = namespaces.get(prefix)?;
        // concatenation, not RFC 3986 join: hash-terminated namespaces must
        // keep their fragment separator
        Url::parse(&format!("{base}{}", self.suffix)).ok()
    }
}

impl EntityIdent for ConceptEntity {
    const KIND: &'static str = "ConceptEntity";

    fn space(&self) -> &Space {
        &self.space
    }

    fn suffix(&self) -> &str {
        &self.suffix
    }

    fn extras(&self) -> Vec<(String, String)> {
        self.version
            .iter()
            .map(|v| ("version".to_string(), v.clone()))
            .collect()
    }
}

impl fmt::Display for ConceptEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl Hash for ConceptEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_entity(self, state);
    }
}

impl FromStr for ConceptEntity {
    type Err = NeatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s, None)
    }
}

impl_string_serde!(ConceptEntity);

/// Unit-of-measure identifier, e.g. `qudt:meter`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitEntity {
    space: Space,
    suffix: String,
}

impl UnitEntity {
    /// Create a prefixed unit
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::PatternViolation`] when a field fails its
    /// grammar.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Result<Self> {
        Ok(Self {
            space: Space::named(prefix)?,
            suffix: validated_suffix(suffix)?,
        })
    }

    /// Create a unit with no prefix
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::PatternViolation`] when the suffix fails its
    /// grammar.
    pub fn unprefixed(suffix: impl Into<String>) -> Result<Self> {
        Ok(Self {
            space: Space::Undefined,
            suffix: validated_suffix(suffix)?,
        })
    }

    /// Parse from the canonical grammar
    ///
    /// # Errors
    ///
    /// Returns a parse or pattern-violation error when no resolution rule
    /// matches.
    pub fn from_string(text: &str, default_prefix: Option<&str>) -> Result<Self> {
        let parts = split_id(text, default_prefix)?;
        Ok(Self {
            space: parts.space,
            suffix: parts.suffix,
        })
    }

    /// Namespace component
    #[must_use]
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Local identifier
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl EntityIdent for UnitEntity {
    const KIND: &'static str = "UnitEntity";

    fn space(&self) -> &Space {
        &self.space
    }

    fn suffix(&self) -> &str {
        &self.suffix
    }

    fn extras(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

impl fmt::Display for UnitEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl Hash for UnitEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_entity(self, state);
    }
}

impl FromStr for UnitEntity {
    type Err = NeatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s, None)
    }
}

impl_string_serde!(UnitEntity);

fn validated_suffix(suffix: impl Into<String>) -> Result<String> {
    let suffix = suffix.into();
    let trimmed = suffix.trim();
    pattern::validate_suffix(trimmed)?;
    Ok(trimmed.to_string())
}
