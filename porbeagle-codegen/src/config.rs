//! Generator configuration.
//!
//! Loaded from an optional `porbeagle.toml`; every field has a default so an
//! empty file (or no file) is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CodegenError;
use crate::model::QualifiedName;

/// Fully qualified names of the well-known types and markers the pass looks for.
///
/// `snowflake` and `embed` may name a crate's own types; generated accessors
/// still return the runtime types and convert members with `Into`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WellKnownNames {
    pub view_marker: QualifiedName,
    pub sticker_marker: QualifiedName,
    pub action_row_marker: QualifiedName,
    pub capability: QualifiedName,
    pub snowflake: QualifiedName,
    pub embed: QualifiedName,
}

impl Default for WellKnownNames {
    fn default() -> Self {
        Self {
            view_marker: QualifiedName::new("porbeagle::DiscordView"),
            sticker_marker: QualifiedName::new("porbeagle::attributes::sticker"),
            action_row_marker: QualifiedName::new("porbeagle::attributes::action_row"),
            capability: QualifiedName::new("porbeagle::MessageView"),
            snowflake: QualifiedName::new("porbeagle::Snowflake"),
            embed: QualifiedName::new("porbeagle::Embed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Root segment of every module path the source frontend produces.
    /// Display only: generated code always refers to the crate as `crate`.
    pub crate_name: String,

    /// Extension of generated artifacts, without the leading dot.
    pub extension: String,

    /// Fail the whole pass when a well-known name cannot be resolved instead
    /// of degrading the rules that depend on it.
    pub strict_registry: bool,

    /// Maximum number of action rows per view; `None` disables the check.
    /// Written as `0` in TOML.
    #[serde(with = "row_limit")]
    pub max_action_rows: Option<usize>,

    pub well_known: WellKnownNames,

    /// Namespace single-segment field helper attributes resolve into.
    pub helper_namespace: String,

    /// Extra definitions to add to the compilation's reference set.
    pub extra_references: Vec<QualifiedName>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            crate_name: "crate".to_string(),
            extension: "rs".to_string(),
            strict_registry: false,
            max_action_rows: Some(DEFAULT_MAX_ACTION_ROWS),
            well_known: WellKnownNames::default(),
            helper_namespace: "porbeagle::attributes".to_string(),
            extra_references: Vec::new(),
        }
    }
}

/// Action rows a single message may carry.
pub const DEFAULT_MAX_ACTION_ROWS: usize = 5;

impl GeneratorConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CodegenError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        let config: Self = toml::from_str(&contents).map_err(|source| CodegenError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration if the file exists, defaults otherwise.
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Result<Self, CodegenError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), CodegenError> {
        let invalid = |reason: &str| {
            Err(CodegenError::InvalidConfig {
                reason: reason.to_string(),
            })
        };

        if self.crate_name.is_empty() {
            return invalid("crate_name cannot be empty");
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return invalid("extension must be non-empty and without a leading dot");
        }
        if self.helper_namespace.is_empty() {
            return invalid("helper_namespace cannot be empty");
        }
        Ok(())
    }
}

mod row_limit {
    use super::*;

    pub fn serialize<S: Serializer>(limit: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(limit.unwrap_or(0) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
        let limit = usize::deserialize(deserializer)?;
        Ok((limit != 0).then_some(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            strict_registry = true

            [well_known]
            embed = "my_bot::RichEmbed"
            "#,
        )
        .unwrap();

        assert!(config.strict_registry);
        assert_eq!(config.extension, "rs");
        assert_eq!(config.max_action_rows, Some(5));
        assert_eq!(config.well_known.embed.as_str(), "my_bot::RichEmbed");
        assert_eq!(config.well_known.snowflake.as_str(), "porbeagle::Snowflake");
    }

    #[test]
    fn test_zero_row_limit_disables_check() {
        let config: GeneratorConfig = toml::from_str("max_action_rows = 0").unwrap();
        assert_eq!(config.max_action_rows, None);
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("porbeagle.toml");
        std::fs::write(&path, "extension = \".rs\"").unwrap();

        assert!(matches!(
            GeneratorConfig::load(&path),
            Err(CodegenError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_load_optional_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::load_optional(dir.path().join("porbeagle.toml")).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_load_reports_path_on_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("porbeagle.toml");
        std::fs::write(&path, "max_action_rows = \"many\"").unwrap();

        let err = GeneratorConfig::load(&path).unwrap_err();
        assert!(matches!(err, CodegenError::Config { .. }));
        assert!(err.to_string().contains("porbeagle.toml"));
    }
}
