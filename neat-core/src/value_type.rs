//! Typed value resolution
//!
//! Single source of truth mapping a semantic type name to its
//! representations in the native value type, the storage-column type, the
//! query-language scalar and the SQL type name. Two tables exist because the
//! storage layer supports a strict subset of the semantic types; both reuse
//! the same [`TypeMapping`] layout so cross-referencing code stays uniform.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::entity::{impl_string_serde, ConceptEntity, UnitEntity, UNKNOWN_TOKEN};
use crate::error::{NeatError, Result};
use crate::parse::parse_entity;

/// Cross-system representations of one semantic type
///
/// Read-only after module initialization; keyed by the lowercase `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    /// Lowercase semantic type name, the lookup key
    pub name: &'static str,
    /// Serialization token (XSD where one exists)
    pub xsd: &'static str,
    /// Native in-process value type
    pub native: &'static str,
    /// Storage-column type in the schema store
    pub storage: &'static str,
    /// Query-language scalar type
    pub graphql: &'static str,
    /// SQL type name
    pub sql: &'static str,
}

/// The broader semantic type set
pub static SEMANTIC_TYPES: &[TypeMapping] = &[
    TypeMapping {
        name: "boolean",
        xsd: "xsd:boolean",
        native: "bool",
        storage: "boolean",
        graphql: "Boolean",
        sql: "BOOLEAN",
    },
    TypeMapping {
        name: "float",
        xsd: "xsd:float",
        native: "f32",
        storage: "float32",
        graphql: "Float",
        sql: "REAL",
    },
    TypeMapping {
        name: "double",
        xsd: "xsd:double",
        native: "f64",
        storage: "float64",
        graphql: "Float",
        sql: "DOUBLE PRECISION",
    },
    TypeMapping {
        name: "integer",
        xsd: "xsd:integer",
        native: "i32",
        storage: "int32",
        graphql: "Int",
        sql: "INTEGER",
    },
    TypeMapping {
        name: "long",
        xsd: "xsd:long",
        native: "i64",
        storage: "int64",
        graphql: "Int64",
        sql: "BIGINT",
    },
    TypeMapping {
        name: "string",
        xsd: "xsd:string",
        native: "String",
        storage: "text",
        graphql: "String",
        sql: "TEXT",
    },
    TypeMapping {
        name: "datetime",
        xsd: "xsd:dateTime",
        native: "DateTime<Utc>",
        storage: "timestamp",
        graphql: "Timestamp",
        sql: "TIMESTAMP",
    },
    TypeMapping {
        name: "date",
        xsd: "xsd:date",
        native: "NaiveDate",
        storage: "date",
        graphql: "Date",
        sql: "DATE",
    },
    TypeMapping {
        name: "time",
        xsd: "xsd:time",
        native: "NaiveTime",
        storage: "text",
        graphql: "String",
        sql: "TIME",
    },
    TypeMapping {
        name: "langstring",
        xsd: "rdf:langString",
        native: "String",
        storage: "text",
        graphql: "String",
        sql: "TEXT",
    },
    TypeMapping {
        name: "anyuri",
        xsd: "xsd:anyURI",
        native: "Url",
        storage: "text",
        graphql: "String",
        sql: "TEXT",
    },
    TypeMapping {
        name: "json",
        xsd: "json",
        native: "serde_json::Value",
        storage: "json",
        graphql: "JSONObject",
        sql: "JSONB",
    },
    TypeMapping {
        name: "timeseries",
        xsd: "timeseries",
        native: "String",
        storage: "timeseries",
        graphql: "TimeSeries",
        sql: "TEXT",
    },
    TypeMapping {
        name: "file",
        xsd: "file",
        native: "String",
        storage: "file",
        graphql: "File",
        sql: "TEXT",
    },
    TypeMapping {
        name: "sequence",
        xsd: "sequence",
        native: "String",
        storage: "sequence",
        graphql: "Sequence",
        sql: "TEXT",
    },
];

/// The storage-layer subset; `time`, `langstring` and `anyuri` have no
/// column type of their own and are absent here
pub static PHYSICAL_TYPES: &[TypeMapping] = &[
    TypeMapping {
        name: "boolean",
        xsd: "xsd:boolean",
        native: "bool",
        storage: "boolean",
        graphql: "Boolean",
        sql: "BOOLEAN",
    },
    TypeMapping {
        name: "float",
        xsd: "xsd:float",
        native: "f32",
        storage: "float32",
        graphql: "Float",
        sql: "REAL",
    },
    TypeMapping {
        name: "double",
        xsd: "xsd:double",
        native: "f64",
        storage: "float64",
        graphql: "Float",
        sql: "DOUBLE PRECISION",
    },
    TypeMapping {
        name: "integer",
        xsd: "xsd:integer",
        native: "i32",
        storage: "int32",
        graphql: "Int",
        sql: "INTEGER",
    },
    TypeMapping {
        name: "long",
        xsd: "xsd:long",
        native: "i64",
        storage: "int64",
        graphql: "Int64",
        sql: "BIGINT",
    },
    TypeMapping {
        name: "string",
        xsd: "xsd:string",
        native: "String",
        storage: "text",
        graphql: "String",
        sql: "TEXT",
    },
    TypeMapping {
        name: "datetime",
        xsd: "xsd:dateTime",
        native: "DateTime<Utc>",
        storage: "timestamp",
        graphql: "Timestamp",
        sql: "TIMESTAMP",
    },
    TypeMapping {
        name: "date",
        xsd: "xsd:date",
        native: "NaiveDate",
        storage: "date",
        graphql: "Date",
        sql: "DATE",
    },
    TypeMapping {
        name: "json",
        xsd: "json",
        native: "serde_json::Value",
        storage: "json",
        graphql: "JSONObject",
        sql: "JSONB",
    },
    TypeMapping {
        name: "timeseries",
        xsd: "timeseries",
        native: "String",
        storage: "timeseries",
        graphql: "TimeSeries",
        sql: "TEXT",
    },
    TypeMapping {
        name: "file",
        xsd: "file",
        native: "String",
        storage: "file",
        graphql: "File",
        sql: "TEXT",
    },
    TypeMapping {
        name: "sequence",
        xsd: "sequence",
        native: "String",
        storage: "sequence",
        graphql: "Sequence",
        sql: "TEXT",
    },
];

static SEMANTIC_BY_NAME: Lazy<HashMap<&'static str, &'static TypeMapping>> =
    Lazy::new(|| SEMANTIC_TYPES.iter().map(|m| (m.name, m)).collect());

static PHYSICAL_BY_NAME: Lazy<HashMap<&'static str, &'static TypeMapping>> =
    Lazy::new(|| PHYSICAL_TYPES.iter().map(|m| (m.name, m)).collect());

/// Look up a semantic type by name (case-insensitive; keys are lowercase)
///
/// An unknown name is a lookup miss and the caller decides the fallback,
/// typically treat-as-string.
#[must_use]
pub fn semantic_type(name: &str) -> Option<&'static TypeMapping> {
    SEMANTIC_BY_NAME.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Look up a storage-supported type by name (case-insensitive)
#[must_use]
pub fn physical_type(name: &str) -> Option<&'static TypeMapping> {
    PHYSICAL_BY_NAME.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Property value type, wrapping entities for units, enum collections and
/// object references
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Boolean,
    Float {
        unit: Option<UnitEntity>,
    },
    Double {
        unit: Option<UnitEntity>,
    },
    Integer {
        unit: Option<UnitEntity>,
    },
    Long {
        unit: Option<UnitEntity>,
    },
    String,
    DateTime,
    Date,
    Time,
    Json,
    Timeseries,
    File,
    Sequence,
    /// Enumeration over a collection of permitted concepts
    Enum {
        collection: ConceptEntity,
        unknown_value: Option<String>,
    },
    /// Object reference to a concept, the fallback for any non-primitive
    /// value type
    Concept(ConceptEntity),
}

impl ValueType {
    /// Semantic type name for table lookups, when the variant is a
    /// primitive
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Boolean => Some("boolean"),
            Self::Float { .. } => Some("float"),
            Self::Double { .. } => Some("double"),
            Self::Integer { .. } => Some("integer"),
            Self::Long { .. } => Some("long"),
            Self::String => Some("string"),
            Self::DateTime => Some("datetime"),
            Self::Date => Some("date"),
            Self::Time => Some("time"),
            Self::Json => Some("json"),
            Self::Timeseries => Some("timeseries"),
            Self::File => Some("file"),
            Self::Sequence => Some("sequence"),
            Self::Enum { .. } | Self::Concept(_) => None,
        }
    }

    /// Cross-system mapping for primitive variants
    #[must_use]
    pub fn mapping(&self) -> Option<&'static TypeMapping> {
        self.name().and_then(semantic_type)
    }

    /// True for unit-carrying numeric variants
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Float { .. } | Self::Double { .. } | Self::Integer { .. } | Self::Long { .. }
        )
    }

    /// Unit of measure when one is attached
    #[must_use]
    pub fn unit(&self) -> Option<&UnitEntity> {
        match self {
            Self::Float { unit }
            | Self::Double { unit }
            | Self::Integer { unit }
            | Self::Long { unit } => unit.as_ref(),
            _ => None,
        }
    }

    /// Parse from the canonical grammar
    ///
    /// Primitive names win over bare concept suffixes; anything else falls
    /// back to a concept reference, and the Unknown token yields an unknown
    /// concept.
    ///
    /// # Errors
    ///
    /// Returns a parse or pattern-violation error for malformed input, and
    /// a descriptive error when an `enum` has no `collection` attribute.
    pub fn from_string(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed == UNKNOWN_TOKEN {
            return Ok(Self::Concept(ConceptEntity::unknown()));
        }

        let parsed = parse_entity(trimmed)?;
        let primitive = (parsed.prefix.is_empty() || parsed.prefix == "xsd" || parsed.prefix == "rdf")
            .then(|| parsed.suffix.to_ascii_lowercase());

        let unit = match parsed.properties.get("unit") {
            Some(raw) => Some(UnitEntity::from_string(raw, None)?),
            None => None,
        };

        match primitive.as_deref() {
            Some("boolean") => Ok(Self::Boolean),
            Some("float") => Ok(Self::Float { unit }),
            Some("double") => Ok(Self::Double { unit }),
            Some("integer" | "int") => Ok(Self::Integer { unit }),
            Some("long") => Ok(Self::Long { unit }),
            Some("string" | "langstring" | "anyuri") => Ok(Self::String),
            Some("datetime") => Ok(Self::DateTime),
            Some("date") => Ok(Self::Date),
            Some("time") => Ok(Self::Time),
            Some("json") => Ok(Self::Json),
            Some("timeseries") => Ok(Self::Timeseries),
            Some("file") => Ok(Self::File),
            Some("sequence") => Ok(Self::Sequence),
            Some("enum") => {
                let collection = parsed.properties.get("collection").ok_or_else(|| {
                    NeatError::other(format!(
                        "Enum type '{trimmed}' is missing its collection attribute"
                    ))
                })?;
                Ok(Self::Enum {
                    collection: ConceptEntity::from_string(collection, None)?,
                    unknown_value: parsed.properties.get("unknownValue").cloned(),
                })
            }
            _ => Ok(Self::Concept(ConceptEntity::from_string(trimmed, None)?)),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "xsd:boolean"),
            Self::Float { unit } => write_with_unit(f, "xsd:float", unit.as_ref()),
            Self::Double { unit } => write_with_unit(f, "xsd:double", unit.as_ref()),
            Self::Integer { unit } => write_with_unit(f, "xsd:integer", unit.as_ref()),
            Self::Long { unit } => write_with_unit(f, "xsd:long", unit.as_ref()),
            Self::String => write!(f, "xsd:string"),
            Self::DateTime => write!(f, "xsd:dateTime"),
            Self::Date => write!(f, "xsd:date"),
            Self::Time => write!(f, "xsd:time"),
            Self::Json => write!(f, "json"),
            Self::Timeseries => write!(f, "timeseries"),
            Self::File => write!(f, "file"),
            Self::Sequence => write!(f, "sequence"),
            Self::Enum {
                collection,
                unknown_value,
            } => {
                write!(f, "enum(collection={collection}")?;
                if let Some(unknown) = unknown_value {
                    write!(f, ",unknownValue={unknown}")?;
                }
                write!(f, ")")
            }
            Self::Concept(concept) => write!(f, "{concept}"),
        }
    }
}

fn write_with_unit(
    f: &mut fmt::Formatter<'_>,
    token: &str,
    unit: Option<&UnitEntity>,
) -> fmt::Result {
    match unit {
        Some(unit) => write!(f, "{token}(unit={unit})"),
        None => write!(f, "{token}"),
    }
}

impl FromStr for ValueType {
    type Err = NeatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

impl_string_serde!(ValueType);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup_by_lowercase_name() {
        let mapping = semantic_type("dateTime").unwrap();
        assert_eq!(mapping.storage, "timestamp");
        assert_eq!(mapping.sql, "TIMESTAMP");

        assert_eq!(semantic_type("long").unwrap().graphql, "Int64");
        assert!(semantic_type("no_such_type").is_none());
    }

    #[test]
    fn test_physical_is_strict_subset() {
        for mapping in PHYSICAL_TYPES {
            let semantic = semantic_type(mapping.name).expect("physical type in semantic table");
            assert_eq!(semantic, mapping);
        }
        assert!(PHYSICAL_TYPES.len() < SEMANTIC_TYPES.len());
        assert!(physical_type("time").is_none());
        assert!(physical_type("langstring").is_none());
    }

    #[test]
    fn test_long_with_unit_serialization() {
        let value_type = ValueType::Long {
            unit: Some(UnitEntity::new("qudt", "meter").unwrap()),
        };
        assert_eq!(value_type.to_string(), "xsd:long(unit=qudt:meter)");

        let reparsed: ValueType = "xsd:long(unit=qudt:meter)".parse().unwrap();
        assert_eq!(value_type, reparsed);
    }

    #[test]
    fn test_primitive_round_trips() {
        for text in [
            "xsd:boolean",
            "xsd:float",
            "xsd:double",
            "xsd:integer",
            "xsd:long",
            "xsd:string",
            "xsd:dateTime",
            "xsd:date",
            "xsd:time",
            "json",
            "timeseries",
            "file",
            "sequence",
        ] {
            let value_type: ValueType = text.parse().unwrap();
            assert_eq!(value_type.to_string(), text, "round trip of {text}");
        }
    }

    #[test]
    fn test_bare_names_resolve_to_primitives() {
        assert_eq!("boolean".parse::<ValueType>().unwrap(), ValueType::Boolean);
        assert_eq!(
            "long".parse::<ValueType>().unwrap(),
            ValueType::Long { unit: None }
        );
    }

    #[test]
    fn test_enum_requires_collection() {
        let parsed: ValueType = "enum(collection=power:states,unknownValue=other)"
            .parse()
            .unwrap();
        match &parsed {
            ValueType::Enum {
                collection,
                unknown_value,
            } => {
                assert_eq!(collection.to_string(), "power:states");
                assert_eq!(unknown_value.as_deref(), Some("other"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        assert_eq!(
            parsed.to_string(),
            "enum(collection=power:states,unknownValue=other)"
        );

        let err = "enum".parse::<ValueType>().unwrap_err();
        assert!(err.to_string().contains("collection"));
    }

    #[test]
    fn test_concept_fallback() {
        let value_type: ValueType = "power:GeneratingUnit".parse().unwrap();
        match &value_type {
            ValueType::Concept(concept) => {
                assert_eq!(concept.to_string(), "power:GeneratingUnit");
            }
            other => panic!("unexpected variant: {other:?}"),
        }

        let unknown: ValueType = "#N/A".parse().unwrap();
        assert!(matches!(unknown, ValueType::Concept(ref c) if c.is_unknown()));
    }

    #[test]
    fn test_mapping_accessor() {
        let value_type = ValueType::Long { unit: None };
        assert_eq!(value_type.mapping().unwrap().storage, "int64");
        assert!(value_type.is_numeric());
        assert!(ValueType::String.mapping().is_some());
        assert!(ValueType::Concept(ConceptEntity::unknown()).mapping().is_none());
    }
}
