//! Typed identifier hierarchy
//!
//! Identifiers come in two families. The conceptual family
//! ([`Entity`], [`ConceptEntity`], [`UnitEntity`]) carries semantic/RDF-side
//! references and serializes extra fields sorted alphabetically by key. The
//! physical family ([`ViewEntity`], [`ContainerEntity`], [`DataModelEntity`],
//! [`PropertyEntity`]) carries schema-store references and serializes extra
//! fields in declaration order; its dynamic wrapper [`PhysicalEntity`] treats
//! cross-kind comparison as an error rather than `false`.
//!
//! All identifiers are immutable value objects: identity for equality,
//! ordering and hashing is the field tuple, never object identity.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::error::Result;
use crate::parse::parse_entity;
use crate::pattern;

mod conceptual;
mod physical;

pub use conceptual::{ClassEntity, ConceptEntity, Entity, UnitEntity};
pub use physical::{
    ContainerEntity, ContainerId, DataModelEntity, DataModelId, PhysicalEntity, PropertyEntity,
    ViewEntity, ViewId,
};

/// Fixed serialization token of the Unknown sentinel
pub const UNKNOWN_TOKEN: &str = "#N/A";

/// Namespace component of an identifier
///
/// `Undefined` is the absence of a prefix and is distinct from any named
/// prefix; the empty string is not a valid name and is rejected by the
/// prefix grammar. Equality, hashing and ordering are value-based, and
/// `Undefined` orders before every named space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Space {
    /// No prefix was supplied
    #[default]
    Undefined,
    /// A validated prefix/space name
    Named(String),
}

impl Space {
    /// Create a named space, validating the prefix grammar
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::PatternViolation`] when the trimmed value does
    /// not match the prefix grammar; the empty string fails the minimum
    /// length and is not silently mapped to `Undefined`.
    pub fn named(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        pattern::validate_prefix(trimmed)?;
        Ok(Self::Named(trimmed.to_string()))
    }

    /// True for the absence sentinel
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// The name when present
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Undefined => None,
            Self::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => Ok(()),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// The one overridable hook per identifier kind: the field tuple
///
/// Canonical serialization, lexicographic ordering and the hashing contract
/// are all derived uniformly from `space`, `suffix` and the ordered extra
/// fields. Each family fixes its own extra-field order (sorted for the
/// conceptual family, declaration order for the physical family) and holds
/// it invariant, because callers rely on string equality for deduplication.
pub trait EntityIdent {
    /// Concrete kind name, mixed into every hash so identical field values
    /// under different kinds never collide
    const KIND: &'static str;

    /// Namespace component, or `Space::Undefined`
    fn space(&self) -> &Space;

    /// Required local identifier
    fn suffix(&self) -> &str;

    /// Non-null extra fields in the family's canonical order
    fn extras(&self) -> Vec<(String, String)>;

    /// Canonical string form; identical to `Display`
    fn canonical(&self) -> String {
        canonical_string(self.space(), self.suffix(), &self.extras())
    }
}

/// Render the canonical form: bare `suffix` for an undefined space,
/// `prefix:suffix` otherwise, followed by `(key=value,...)` for extras.
pub(crate) fn canonical_string(space: &Space, suffix: &str, extras: &[(String, String)]) -> String {
    let mut out = String::new();
    if let Space::Named(name) = space {
        out.push_str(name);
        out.push(':');
    }
    out.push_str(suffix);
    if !extras.is_empty() {
        out.push('(');
        for (i, (key, value)) in extras.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out.push(')');
    }
    out
}

/// Feed the kind name and canonical string into a hasher
pub(crate) fn hash_entity<T: EntityIdent, H: Hasher>(entity: &T, state: &mut H) {
    T::KIND.hash(state);
    entity.canonical().hash(state);
}

/// Validated components extracted from an entity string
pub(crate) struct IdParts {
    pub space: Space,
    pub suffix: String,
    pub version: Option<String>,
    pub properties: IndexMap<String, String>,
}

/// Shared `from_string` machinery
///
/// Resolution order: a prefixed form (`prefix:suffix`, optionally with a
/// property block whose `version` key is extracted), then a bare suffix
/// combined with `default_prefix` when both sides match their grammars,
/// then a bare suffix with an undefined space. Every field is trimmed
/// before validation.
pub(crate) fn split_id(text: &str, default_prefix: Option<&str>) -> Result<IdParts> {
    let text = text.trim();
    let parsed = parse_entity(text)?;
    let mut properties = parsed.properties;
    let version = match properties.shift_remove("version") {
        Some(v) => {
            pattern::validate_version(&v)?;
            Some(v)
        }
        None => None,
    };

    let space = if parsed.prefix.is_empty() {
        match default_prefix {
            Some(default)
                if pattern::matches_suffix(&parsed.suffix)
                    && pattern::matches_prefix(default) =>
            {
                Space::Named(default.to_string())
            }
            _ => Space::Undefined,
        }
    } else {
        Space::named(parsed.prefix)?
    };

    pattern::validate_suffix(&parsed.suffix)?;
    Ok(IdParts {
        space,
        suffix: parsed.suffix,
        version,
        properties,
    })
}

/// Serialize as the canonical string, deserialize through `FromStr`
macro_rules! impl_string_serde {
    ($ty:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let text = <String as serde::Deserialize>::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}
pub(crate) use impl_string_serde;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NeatError;

    #[test]
    fn test_space_sentinel() {
        assert_eq!(Space::Undefined, Space::Undefined);
        assert_ne!(Space::Undefined, Space::Named("asset".to_string()));
        assert!(Space::Undefined.is_undefined());
        assert!(Space::Undefined < Space::Named("a".to_string()));
    }

    #[test]
    fn test_empty_prefix_is_not_undefined() {
        // explicit empty string must be evaluated against the grammar
        let err = Space::named("").unwrap_err();
        assert!(matches!(err, NeatError::PatternViolation { field: "prefix", .. }));
    }

    #[test]
    fn test_space_hash_is_stable() {
        use std::collections::hash_map::DefaultHasher;

        let mut first = DefaultHasher::new();
        Space::Undefined.hash(&mut first);
        let mut second = DefaultHasher::new();
        Space::Undefined.hash(&mut second);
        assert_eq!(first.finish(), second.finish());
    }

    #[test]
    fn test_canonical_string_shapes() {
        assert_eq!(
            canonical_string(&Space::Undefined, "MyAsset", &[]),
            "MyAsset"
        );
        assert_eq!(
            canonical_string(&Space::Named("asset".to_string()), "MyAsset", &[]),
            "asset:MyAsset"
        );
        let extras = vec![
            ("version".to_string(), "v1".to_string()),
            ("property".to_string(), "name".to_string()),
        ];
        assert_eq!(
            canonical_string(&Space::Named("s".to_string()), "x", &extras),
            "s:x(version=v1,property=name)"
        );
    }

    #[test]
    fn test_split_id_default_prefix() {
        let parts = split_id("MyAsset", Some("asset")).unwrap();
        assert_eq!(parts.space, Space::Named("asset".to_string()));
        assert_eq!(parts.suffix, "MyAsset");

        // an invalid default prefix leaves the space undefined
        let parts = split_id("MyAsset", Some("1bad")).unwrap();
        assert_eq!(parts.space, Space::Undefined);
    }

    #[test]
    fn test_split_id_extracts_version() {
        let parts = split_id("power:GeneratingUnit(version=0.1.0,foo=bar)", None).unwrap();
        assert_eq!(parts.space, Space::Named("power".to_string()));
        assert_eq!(parts.suffix, "GeneratingUnit");
        assert_eq!(parts.version.as_deref(), Some("0.1.0"));
        assert_eq!(parts.properties.get("foo").map(String::as_str), Some("bar"));
    }
}
