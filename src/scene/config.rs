//! Builder configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Scenegraph path written for references that were never given one.
pub const REFERENCE_PLACEHOLDER: &str =
    "Enter in the path of the SCENE.MBIN you want to reference here.";

/// Settings that feed derived attribute values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Appended to a mesh's name to form its MESHLINK
    pub meshlink_suffix: String,
    /// Material name for meshes created without one
    pub default_material: String,
    /// SCENEGRAPH value for references without a path
    pub reference_placeholder: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            meshlink_suffix: "Shape".to_string(),
            default_material: "EMPTY".to_string(),
            reference_placeholder: REFERENCE_PLACEHOLDER.to_string(),
        }
    }
}

impl BuilderConfig {
    /// Reject settings that would produce unusable records.
    pub fn validate(&self) -> Result<()> {
        if self.meshlink_suffix.is_empty() {
            return Err(Error::Config(
                "meshlink_suffix must not be empty".to_string(),
            ));
        }
        if self.reference_placeholder.is_empty() {
            return Err(Error::Config(
                "reference_placeholder must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Save to file as pretty JSON (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file and validate (sync)
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::debug!("loaded builder config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = BuilderConfig::default();
        assert_eq!(config.meshlink_suffix, "Shape");
        assert_eq!(config.default_material, "EMPTY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: BuilderConfig =
            serde_json::from_str(r#"{ "meshlink_suffix": "Mesh" }"#).unwrap();
        assert_eq!(config.meshlink_suffix, "Mesh");
        assert_eq!(config.default_material, "EMPTY");
    }

    #[test]
    fn test_validate_rejects_empty_suffix() {
        let config = BuilderConfig {
            meshlink_suffix: String::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_placeholder() {
        let config = BuilderConfig {
            reference_placeholder: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("nested").join("builder.json");

        let config = BuilderConfig {
            default_material: "MODELS/DEFAULT.MATERIAL.MBIN".to_string(),
            meshlink_suffix: "Geo".to_string(),
            ..Default::default()
        };
        config.save_sync(&path).expect("save failed");

        let loaded = BuilderConfig::load_sync(&path).expect("load failed");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let err = BuilderConfig::load_sync(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
