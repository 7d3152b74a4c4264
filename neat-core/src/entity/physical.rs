//! Physical (schema-store-side) identifier family
//!
//! Extra fields serialize in declaration order. The dynamic wrapper
//! [`PhysicalEntity`] treats cross-kind comparison as a contract violation:
//! `try_eq`/`try_cmp` return [`NeatError::CrossTypeComparison`] instead of
//! `false`, and the enum deliberately implements neither `PartialEq` nor
//! `Ord`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NeatError, Result};
use crate::settings::EntityDefaults;

use super::{canonical_string, hash_entity, impl_string_serde, split_id, EntityIdent, Space};

/// Schema-reference triple for a view, as exchanged with the data-modeling
/// service client
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewId {
    pub space: String,
    pub external_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.space, self.external_id)?;
        if let Some(version) = &self.version {
            write!(f, "(version={version})")?;
        }
        Ok(())
    }
}

/// Schema-reference pair for a container
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerId {
    pub space: String,
    pub external_id: String,
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.space, self.external_id)
    }
}

/// Schema-reference triple for a data model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelId {
    pub space: String,
    pub external_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl fmt::Display for DataModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.space, self.external_id)?;
        if let Some(version) = &self.version {
            write!(f, "(version={version})")?;
        }
        Ok(())
    }
}

/// View identifier, optionally versioned
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ViewEntity {
    space: Space,
    external_id: String,
    version: Option<String>,
}

impl ViewEntity {
    /// Create a view identifier, validating every field
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::PatternViolation`] when a field fails its
    /// grammar.
    pub fn new(space: impl Into<String>, external_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            space: Space::named(space)?,
            external_id: validated_external_id(external_id)?,
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
        self.version = Some(validated_version(version)?);
        Ok(self)
    }

    /// Parse from the canonical grammar, combining a bare external id with
    /// `default_space` when both sides match their grammars
    ///
    /// # Errors
    ///
    /// Returns a parse or pattern-violation error when no resolution rule
    /// matches.
    pub fn from_string(text: &str, default_space: Option<&str>) -> Result<Self> {
        let parts = split_id(text, default_space)?;
        Ok(Self {
            space: parts.space,
            external_id: parts.suffix,
            version: parts.version,
        })
    }

    /// Defensive factory for loose inputs
    ///
    /// Empty input yields an undefined-space identifier with an empty
    /// external id; a string matching the entity grammar goes through
    /// [`Self::from_string`]; anything else is wrapped as a bare external
    /// id without validation.
    #[must_use]
    pub fn from_raw(value: &str) -> Self {
        from_raw_impl(value, Self::from_string, |suffix| Self {
            space: Space::Undefined,
            external_id: suffix,
            version: None,
        })
    }

    /// Build from a schema-reference triple; the triple is trusted as
    /// already validated by the service
    #[must_use]
    pub fn from_id(id: ViewId) -> Self {
        Self {
            space: Space::Named(id.space),
            external_id: id.external_id,
            version: id.version,
        }
    }

    /// Resolve into a schema-reference triple
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::UnresolvedSpace`] when the identifier has no
    /// space and no `default_space` is supplied, and
    /// [`NeatError::UnresolvedVersion`] when it has no version and no
    /// `default_version` is supplied. The two conditions are independent.
    pub fn as_id(
        &self,
        default_space: Option<&str>,
        default_version: Option<&str>,
    ) -> Result<ViewId> {
        Ok(ViewId {
            space: resolve_space(&self.space, default_space, || self.to_string())?,
            external_id: self.external_id.clone(),
            version: Some(resolve_version(
                self.version.as_deref(),
                default_version,
                || self.to_string(),
            )?),
        })
    }

    /// Canonical string with all-or-nothing default elision
    ///
    /// Fields covered by `defaults` are omitted only when every such field
    /// matches its default; a partial match prints the full form. An
    /// identifier fully conventional against a well-known base model thus
    /// prints as its bare external id.
    #[must_use]
    pub fn to_string_with_defaults(&self, defaults: &EntityDefaults) -> String {
        elided_string(&self.space, &self.external_id, self.version.as_deref(), defaults)
    }

    /// Namespace component
    #[must_use]
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Local identifier
    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// Version when present
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Unversioned `space:externalId` form
    #[must_use]
    pub fn id(&self) -> String {
        canonical_string(&self.space, &self.external_id, &[])
    }

    /// Canonical string including the version; identical to `Display`
    #[must_use]
    pub fn versioned_id(&self) -> String {
        self.canonical()
    }
}

impl EntityIdent for ViewEntity {
    const KIND: &'static str = "ViewEntity";

    fn space(&self) -> &Space {
        &self.space
    }

    fn suffix(&self) -> &str {
        &self.external_id
    }

    fn extras(&self) -> Vec<(String, String)> {
        self.version
            .iter()
            .map(|v| ("version".to_string(), v.clone()))
            .collect()
    }
}

impl fmt::Display for ViewEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl Hash for ViewEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_entity(self, state);
    }
}

impl FromStr for ViewEntity {
    type Err = NeatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s, None)
    }
}

impl From<ViewId> for ViewEntity {
    fn from(id: ViewId) -> Self {
        Self::from_id(id)
    }
}

impl_string_serde!(ViewEntity);

/// Container identifier; containers are not versioned
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContainerEntity {
    space: Space,
    external_id: String,
}

impl ContainerEntity {
    /// Create a container identifier, validating every field
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::PatternViolation`] when a field fails its
    /// grammar.
    pub fn new(space: impl Into<String>, external_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            space: Space::named(space)?,
            external_id: validated_external_id(external_id)?,
        })
    }

    /// Parse from the canonical grammar
    ///
    /// # Errors
    ///
    /// Returns a parse or pattern-violation error when no resolution rule
    /// matches.
    pub fn from_string(text: &str, default_space: Option<&str>) -> Result<Self> {
        let parts = split_id(text, default_space)?;
        Ok(Self {
            space: parts.space,
            external_id: parts.suffix,
        })
    }

    /// Defensive factory for loose inputs; see [`ViewEntity::from_raw`]
    #[must_use]
    pub fn from_raw(value: &str) -> Self {
        from_raw_impl(value, Self::from_string, |suffix| Self {
            space: Space::Undefined,
            external_id: suffix,
        })
    }

    /// Build from a schema-reference pair
    #[must_use]
    pub fn from_id(id: ContainerId) -> Self {
        Self {
            space: Space::Named(id.space),
            external_id: id.external_id,
        }
    }

    /// Resolve into a schema-reference pair
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::UnresolvedSpace`] when the identifier has no
    /// space and no `default_space` is supplied.
    pub fn as_id(&self, default_space: Option<&str>) -> Result<ContainerId> {
        Ok(ContainerId {
            space: resolve_space(&self.space, default_space, || self.to_string())?,
            external_id: self.external_id.clone(),
        })
    }

    /// Namespace component
    #[must_use]
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Local identifier
    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// `space:externalId` form; identical to `Display`
    #[must_use]
    pub fn id(&self) -> String {
        self.canonical()
    }
}

impl EntityIdent for ContainerEntity {
    const KIND: &'static str = "ContainerEntity";

    fn space(&self) -> &Space {
        &self.space
    }

    fn suffix(&self) -> &str {
        &self.external_id
    }

    fn extras(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

impl fmt::Display for ContainerEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl Hash for ContainerEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_entity(self, state);
    }
}

impl FromStr for ContainerEntity {
    type Err = NeatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s, None)
    }
}

impl From<ContainerId> for ContainerEntity {
    fn from(id: ContainerId) -> Self {
        Self::from_id(id)
    }
}

impl_string_serde!(ContainerEntity);

/// Data model identifier, optionally versioned
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DataModelEntity {
    space: Space,
    external_id: String,
    version: Option<String>,
}

impl DataModelEntity {
    /// Create a data model identifier, validating every field
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::PatternViolation`] when a field fails its
    /// grammar.
    pub fn new(space: impl Into<String>, external_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            space: Space::named(space)?,
            external_id: validated_external_id(external_id)?,
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
        self.version = Some(validated_version(version)?);
        Ok(self)
    }

    /// Parse from the canonical grammar
    ///
    /// # Errors
    ///
    /// Returns a parse or pattern-violation error when no resolution rule
    /// matches.
    pub fn from_string(text: &str, default_space: Option<&str>) -> Result<Self> {
        let parts = split_id(text, default_space)?;
        Ok(Self {
            space: parts.space,
            external_id: parts.suffix,
            version: parts.version,
        })
    }

    /// Defensive factory for loose inputs; see [`ViewEntity::from_raw`]
    #[must_use]
    pub fn from_raw(value: &str) -> Self {
        from_raw_impl(value, Self::from_string, |suffix| Self {
            space: Space::Undefined,
            external_id: suffix,
            version: None,
        })
    }

    /// Build from a schema-reference triple
    #[must_use]
    pub fn from_id(id: DataModelId) -> Self {
        Self {
            space: Space::Named(id.space),
            external_id: id.external_id,
            version: id.version,
        }
    }

    /// Resolve into a schema-reference triple
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::UnresolvedSpace`] or
    /// [`NeatError::UnresolvedVersion`]; the two conditions are
    /// independent.
    pub fn as_id(
        &self,
        default_space: Option<&str>,
        default_version: Option<&str>,
    ) -> Result<DataModelId> {
        Ok(DataModelId {
            space: resolve_space(&self.space, default_space, || self.to_string())?,
            external_id: self.external_id.clone(),
            version: Some(resolve_version(
                self.version.as_deref(),
                default_version,
                || self.to_string(),
            )?),
        })
    }

    /// Canonical string with all-or-nothing default elision; see
    /// [`ViewEntity::to_string_with_defaults`]
    #[must_use]
    pub fn to_string_with_defaults(&self, defaults: &EntityDefaults) -> String {
        elided_string(&self.space, &self.external_id, self.version.as_deref(), defaults)
    }

    /// Namespace component
    #[must_use]
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Local identifier
    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// Version when present
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Unversioned `space:externalId` form
    #[must_use]
    pub fn id(&self) -> String {
        canonical_string(&self.space, &self.external_id, &[])
    }

    /// Canonical string including the version; identical to `Display`
    #[must_use]
    pub fn versioned_id(&self) -> String {
        self.canonical()
    }
}

impl EntityIdent for DataModelEntity {
    const KIND: &'static str = "DataModelEntity";

    fn space(&self) -> &Space {
        &self.space
    }

    fn suffix(&self) -> &str {
        &self.external_id
    }

    fn extras(&self) -> Vec<(String, String)> {
        self.version
            .iter()
            .map(|v| ("version".to_string(), v.clone()))
            .collect()
    }
}

impl fmt::Display for DataModelEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl Hash for DataModelEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_entity(self, state);
    }
}

impl FromStr for DataModelEntity {
    type Err = NeatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s, None)
    }
}

impl From<DataModelId> for DataModelEntity {
    fn from(id: DataModelId) -> Self {
        Self::from_id(id)
    }
}

impl_string_serde!(DataModelEntity);

/// Container property identifier, `space:container(property=name)`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PropertyEntity {
    space: Space,
    external_id: String,
    property: String,
}

impl PropertyEntity {
    /// Create a property identifier, validating every field
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::PatternViolation`] when a field fails its
    /// grammar.
    pub fn new(
        space: impl Into<String>,
        external_id: impl Into<String>,
        property: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            space: Space::named(space)?,
            external_id: validated_external_id(external_id)?,
            property: validated_property(property)?,
        })
    }

    /// Parse from the canonical grammar; the `property` attribute is
    /// required
    ///
    /// # Errors
    ///
    /// Returns a parse or pattern-violation error when no resolution rule
    /// matches, or a descriptive error when the `property` attribute is
    /// absent.
    pub fn from_string(text: &str, default_space: Option<&str>) -> Result<Self> {
        let mut parts = split_id(text, default_space)?;
        let property = parts.properties.shift_remove("property").ok_or_else(|| {
            NeatError::other(format!(
                "Property reference '{text}' is missing its property attribute"
            ))
        })?;
        Ok(Self {
            space: parts.space,
            external_id: parts.suffix,
            property: validated_property(property)?,
        })
    }

    /// Namespace component
    #[must_use]
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Container external id
    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// Property name within the container
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }
}

impl EntityIdent for PropertyEntity {
    const KIND: &'static str = "PropertyEntity";

    fn space(&self) -> &Space {
        &self.space
    }

    fn suffix(&self) -> &str {
        &self.external_id
    }

    fn extras(&self) -> Vec<(String, String)> {
        vec![("property".to_string(), self.property.clone())]
    }
}

impl fmt::Display for PropertyEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl Hash for PropertyEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_entity(self, state);
    }
}

impl FromStr for PropertyEntity {
    type Err = NeatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s, None)
    }
}

impl_string_serde!(PropertyEntity);

/// Dynamically typed physical identifier, as it appears in rule rows before
/// classification
///
/// Comparison across kinds is a programming error in this family, so the
/// enum exposes only fallible comparison and no `PartialEq`.
#[derive(Debug, Clone)]
pub enum PhysicalEntity {
    /// A view reference
    View(ViewEntity),
    /// A container reference
    Container(ContainerEntity),
    /// A data model reference
    DataModel(DataModelEntity),
    /// A container property reference
    Property(PropertyEntity),
}

impl PhysicalEntity {
    /// Concrete kind name
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::View(_) => ViewEntity::KIND,
            Self::Container(_) => ContainerEntity::KIND,
            Self::DataModel(_) => DataModelEntity::KIND,
            Self::Property(_) => PropertyEntity::KIND,
        }
    }

    /// Canonical string of the wrapped identifier
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::View(e) => e.canonical(),
            Self::Container(e) => e.canonical(),
            Self::DataModel(e) => e.canonical(),
            Self::Property(e) => e.canonical(),
        }
    }

    /// Equality restricted to identical kinds
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::CrossTypeComparison`] when the kinds differ.
    pub fn try_eq(&self, other: &Self) -> Result<bool> {
        match (self, other) {
            (Self::View(a), Self::View(b)) => Ok(a == b),
            (Self::Container(a), Self::Container(b)) => Ok(a == b),
            (Self::DataModel(a), Self::DataModel(b)) => Ok(a == b),
            (Self::Property(a), Self::Property(b)) => Ok(a == b),
            _ => Err(NeatError::cross_type(self.kind(), other.kind())),
        }
    }

    /// Ordering restricted to identical kinds
    ///
    /// # Errors
    ///
    /// Returns [`NeatError::CrossTypeComparison`] when the kinds differ.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering> {
        match (self, other) {
            (Self::View(a), Self::View(b)) => Ok(a.cmp(b)),
            (Self::Container(a), Self::Container(b)) => Ok(a.cmp(b)),
            (Self::DataModel(a), Self::DataModel(b)) => Ok(a.cmp(b)),
            (Self::Property(a), Self::Property(b)) => Ok(a.cmp(b)),
            _ => Err(NeatError::cross_type(self.kind(), other.kind())),
        }
    }
}

impl fmt::Display for PhysicalEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl Hash for PhysicalEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.canonical().hash(state);
    }
}

impl From<ViewEntity> for PhysicalEntity {
    fn from(entity: ViewEntity) -> Self {
        Self::View(entity)
    }
}

impl From<ContainerEntity> for PhysicalEntity {
    fn from(entity: ContainerEntity) -> Self {
        Self::Container(entity)
    }
}

impl From<DataModelEntity> for PhysicalEntity {
    fn from(entity: DataModelEntity) -> Self {
        Self::DataModel(entity)
    }
}

impl From<PropertyEntity> for PhysicalEntity {
    fn from(entity: PropertyEntity) -> Self {
        Self::Property(entity)
    }
}

fn validated_external_id(value: impl Into<String>) -> Result<String> {
    let value = value.into();
    let trimmed = value.trim();
    crate::pattern::validate_suffix(trimmed)?;
    Ok(trimmed.to_string())
}

fn validated_version(value: impl Into<String>) -> Result<String> {
    let value = value.into();
    let trimmed = value.trim();
    crate::pattern::validate_version(trimmed)?;
    Ok(trimmed.to_string())
}

fn validated_property(value: impl Into<String>) -> Result<String> {
    let value = value.into();
    let trimmed = value.trim();
    crate::pattern::validate_suffix(trimmed)?;
    Ok(trimmed.to_string())
}

fn from_raw_impl<T>(
    value: &str,
    parse: impl Fn(&str, Option<&str>) -> Result<T>,
    bare: impl FnOnce(String) -> T,
) -> T {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return bare(String::new());
    }
    match parse(trimmed, None) {
        Ok(entity) => entity,
        Err(err) => {
            tracing::warn!(
                value = trimmed,
                error = %err,
                "treating non-conforming reference as a bare external id"
            );
            bare(trimmed.to_string())
        }
    }
}

fn resolve_space(
    space: &Space,
    default_space: Option<&str>,
    entity: impl Fn() -> String,
) -> Result<String> {
    match space {
        Space::Named(name) => Ok(name.clone()),
        Space::Undefined => default_space
            .map(str::to_string)
            .ok_or_else(|| NeatError::unresolved_space(entity())),
    }
}

fn resolve_version(
    version: Option<&str>,
    default_version: Option<&str>,
    entity: impl Fn() -> String,
) -> Result<String> {
    version
        .or(default_version)
        .map(str::to_string)
        .ok_or_else(|| NeatError::unresolved_version(entity()))
}

fn elided_string(
    space: &Space,
    external_id: &str,
    version: Option<&str>,
    defaults: &EntityDefaults,
) -> String {
    let mut elidable = false;
    let mut all_match = true;

    if let Some(default_space) = &defaults.space {
        elidable = true;
        all_match &= space.as_str() == Some(default_space.as_str());
    }
    if let Some(default_version) = &defaults.version {
        elidable = true;
        all_match &= version == Some(default_version.as_str());
    }

    let (space, version) = if elidable && all_match {
        (
            if defaults.space.is_some() {
                &Space::Undefined
            } else {
                space
            },
            if defaults.version.is_some() {
                None
            } else {
                version
            },
        )
    } else {
        (space, version)
    };

    let extras: Vec<(String, String)> = version
        .iter()
        .map(|v| ("version".to_string(), (*v).to_string()))
        .collect();
    canonical_string(space, external_id, &extras)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn view(space: &str, external_id: &str, version: &str) -> ViewEntity {
        ViewEntity::new(space, external_id)
            .unwrap()
            .with_version(version)
            .unwrap()
    }

    #[test]
    fn test_view_canonical_form() {
        let entity = view("cdf_cdm", "CogniteAsset", "v1");
        assert_eq!(entity.to_string(), "cdf_cdm:CogniteAsset(version=v1)");
        assert_eq!(entity.id(), "cdf_cdm:CogniteAsset");
        assert_eq!(entity.versioned_id(), "cdf_cdm:CogniteAsset(version=v1)");
    }

    #[test]
    fn test_view_round_trip() {
        let entity = view("cdf_cdm", "CogniteAsset", "v1");
        let reparsed = ViewEntity::from_string(&entity.to_string(), None).unwrap();
        assert_eq!(entity, reparsed);
    }

    #[test]
    fn test_from_id_as_id() {
        let id = ViewId {
            space: "power".to_string(),
            external_id: "GeneratingUnit".to_string(),
            version: Some("1".to_string()),
        };
        let entity = ViewEntity::from_id(id.clone());
        assert_eq!(entity.as_id(None, None).unwrap(), id);
    }

    #[test]
    fn test_as_id_defaults_are_independent() {
        let entity = ViewEntity::from_string("GeneratingUnit", None).unwrap();

        let err = entity.as_id(None, Some("v1")).unwrap_err();
        assert!(matches!(err, NeatError::UnresolvedSpace { .. }));

        let err = entity.as_id(Some("power"), None).unwrap_err();
        assert!(matches!(err, NeatError::UnresolvedVersion { .. }));

        let id = entity.as_id(Some("power"), Some("v1")).unwrap();
        assert_eq!(id.space, "power");
        assert_eq!(id.version.as_deref(), Some("v1"));
    }

    #[test]
    fn test_from_raw_fallbacks() {
        let entity = ViewEntity::from_raw("");
        assert!(entity.space().is_undefined());
        assert_eq!(entity.external_id(), "");

        let entity = ViewEntity::from_raw("power:GeneratingUnit(version=1)");
        assert_eq!(entity.to_string(), "power:GeneratingUnit(version=1)");

        // a value failing the grammar is kept verbatim as a bare suffix
        let entity = ViewEntity::from_raw("legacy value with spaces");
        assert!(entity.space().is_undefined());
        assert_eq!(entity.external_id(), "legacy value with spaces");
    }

    #[test]
    fn test_elision_all_or_nothing() {
        let defaults = EntityDefaults::cdf_cdm();

        let conventional = view("cdf_cdm", "CogniteAsset", "v1");
        assert_eq!(conventional.to_string_with_defaults(&defaults), "CogniteAsset");

        // partial match: version differs, nothing is elided
        let diverged = view("cdf_cdm", "CogniteAsset", "v2");
        assert_eq!(
            diverged.to_string_with_defaults(&defaults),
            "cdf_cdm:CogniteAsset(version=v2)"
        );

        // partial match: space differs, nothing is elided
        let foreign = view("my_space", "CogniteAsset", "v1");
        assert_eq!(
            foreign.to_string_with_defaults(&defaults),
            "my_space:CogniteAsset(version=v1)"
        );

        // no defaults supplied: full form
        let none = EntityDefaults::default();
        assert_eq!(
            conventional.to_string_with_defaults(&none),
            "cdf_cdm:CogniteAsset(version=v1)"
        );
    }

    #[test]
    fn test_elision_version_only_defaults() {
        let defaults = EntityDefaults {
            space: None,
            version: Some("v1".to_string()),
        };
        let entity = view("my_space", "Thing", "v1");
        assert_eq!(entity.to_string_with_defaults(&defaults), "my_space:Thing");
    }

    #[test]
    fn test_property_entity() {
        let prop = PropertyEntity::new("power", "GeneratingUnit", "capacity").unwrap();
        assert_eq!(prop.to_string(), "power:GeneratingUnit(property=capacity)");

        let reparsed: PropertyEntity = "power:GeneratingUnit(property=capacity)".parse().unwrap();
        assert_eq!(prop, reparsed);

        let err = PropertyEntity::from_string("power:GeneratingUnit", None).unwrap_err();
        assert!(err.to_string().contains("property attribute"));
    }

    #[test]
    fn test_cross_kind_comparison_errors() {
        let a: PhysicalEntity = view("s", "X", "v1").into();
        let b: PhysicalEntity = ContainerEntity::new("s", "X").unwrap().into();

        let err = a.try_eq(&b).unwrap_err();
        assert!(matches!(
            err,
            NeatError::CrossTypeComparison {
                left: "ViewEntity",
                right: "ContainerEntity",
            }
        ));
        assert!(a.try_cmp(&b).is_err());

        let a2: PhysicalEntity = view("s", "X", "v1").into();
        assert!(a.try_eq(&a2).unwrap());
        assert_eq!(a.try_cmp(&a2).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_hash_distinguishes_kinds() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of<T: Hash>(value: &T) -> u64 {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        }

        let view_entity: PhysicalEntity = ViewEntity::new("s", "X").unwrap().into();
        let container: PhysicalEntity = ContainerEntity::new("s", "X").unwrap().into();
        assert_eq!(view_entity.canonical(), container.canonical());
        assert_ne!(hash_of(&view_entity), hash_of(&container));
    }

    #[test]
    fn test_id_serde_shape() {
        let id = ViewId {
            space: "power".to_string(),
            external_id: "GeneratingUnit".to_string(),
            version: Some("1".to_string()),
        };
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(
            json,
            r#"{"space":"power","externalId":"GeneratingUnit","version":"1"}"#
        );
    }
}
