//! Resolution settings
//!
//! Defaults applied when identifiers are resolved into schema references or
//! serialized against a well-known base model. These are already-resolved
//! inputs supplied by the caller; the core never consults global state.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Defaults for resolving and printing identifiers
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolutionSettings {
    /// Space applied when an identifier has an undefined space
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_space: Option<String>,

    /// Version applied when a versioned identifier has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,

    /// Elision defaults of the base model identifiers are imported from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_model: Option<EntityDefaults>,
}

impl ResolutionSettings {
    /// Load from a YAML document
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the document is malformed.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load from a JSON document
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the document is malformed.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The default space as a borrowed argument for `as_id`-style calls
    #[must_use]
    pub fn default_space(&self) -> Option<&str> {
        self.default_space.as_deref()
    }

    /// The default version as a borrowed argument for `as_id`-style calls
    #[must_use]
    pub fn default_version(&self) -> Option<&str> {
        self.default_version.as_deref()
    }
}

/// Field defaults used by the all-or-nothing elision mode
///
/// Identifiers fully conventional against these defaults print tersely;
/// any mismatch prints the full form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityDefaults {
    /// Default space
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,

    /// Default version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl EntityDefaults {
    /// Create defaults from explicit values
    #[must_use]
    pub fn new(space: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            space: Some(space.into()),
            version: Some(version.into()),
        }
    }

    /// Defaults of the well-known `cdf_cdm` base model
    #[must_use]
    pub fn cdf_cdm() -> Self {
        Self::new("cdf_cdm", "v1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_yaml_round_trip() {
        let settings = ResolutionSettings {
            default_space: Some("power".to_string()),
            default_version: Some("0.1.0".to_string()),
            base_model: Some(EntityDefaults::cdf_cdm()),
        };

        let yaml = serde_yaml::to_string(&settings).unwrap();
        let back = ResolutionSettings::from_yaml(&yaml).unwrap();
        assert_eq!(settings, back);
    }

    #[test]
    fn test_partial_document() {
        let settings = ResolutionSettings::from_yaml("default_space: power\n").unwrap();
        assert_eq!(settings.default_space(), Some("power"));
        assert_eq!(settings.default_version(), None);
        assert!(settings.base_model.is_none());
    }

    #[test]
    fn test_omitted_fields_not_serialized() {
        let json = serde_json::to_string(&ResolutionSettings::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_cdf_cdm_defaults() {
        let defaults = EntityDefaults::cdf_cdm();
        assert_eq!(defaults.space.as_deref(), Some("cdf_cdm"));
        assert_eq!(defaults.version.as_deref(), Some("v1"));
    }
}
