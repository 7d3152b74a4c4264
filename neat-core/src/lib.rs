//! # Neat Core
//!
//! Typed entity identifiers for the Neat data-modeling toolkit.
//!
//! Raw strings from spreadsheet cells, RDF literals or schema-reference keys
//! enter the [`parse`] module, the [`entity`] module turns them into typed,
//! validated, immutable identifier objects, and those objects participate in
//! set/map operations across the rest of the tool before being serialized
//! back to their canonical strings at data-model export time.
//!
//! Everything here is synchronous and side-effect-free: parsing and
//! identifier construction perform no I/O and hold no locks, identifiers are
//! immutable value objects, and the value-type tables are read-only after
//! initialization, so all operations are safe to call from multiple threads
//! without synchronization.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(missing_docs)] // Documentation is covered by module-level docs

/// Core error types for identifier operations
pub mod error;

/// Regex grammars, length bounds and reserved-word sets
pub mod pattern;

/// Entity string parser
pub mod parse;

/// Typed identifier hierarchy
pub mod entity;

/// Cross-system value-type resolution tables
pub mod value_type;

/// Structured validation issues and duplicate detection
pub mod issue;

/// Resolution and elision defaults
pub mod settings;

// Re-export commonly used types
pub use entity::{
    ClassEntity, ConceptEntity, ContainerEntity, ContainerId, DataModelEntity, DataModelId,
    Entity, EntityIdent, PhysicalEntity, PropertyEntity, Space, UnitEntity, ViewEntity, ViewId,
    UNKNOWN_TOKEN,
};
pub use error::{NeatError, ParseError, Result};
pub use issue::{Issue, IssueReport, IssueSeverity};
pub use parse::{parse_entity, ParsedEntity};
pub use settings::{EntityDefaults, ResolutionSettings};
pub use value_type::{semantic_type, physical_type, TypeMapping, ValueType};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::entity::*;
    pub use crate::error::{NeatError, ParseError, Result};
    pub use crate::issue::*;
    pub use crate::parse::{parse_entity, ParsedEntity};
    pub use crate::settings::*;
    pub use crate::value_type::*;
}
