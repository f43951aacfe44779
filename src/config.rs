use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, ReferenceError};
use crate::reference::{self, ReferenceData};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// Settings for the command-line shell, read from an optional TOML file
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub reference_path: Option<PathBuf>, // Alternative reference tables; built-in when unset
    pub log_level: String,               // Default filter when RUST_LOG is unset
    pub format: OutputFormat,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        AdvisorConfig {
            reference_path: None,
            log_level: "warn".to_string(),
            format: OutputFormat::Text,
        }
    }
}

impl AdvisorConfig {
    // Defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&toml_str).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    // Reference tables named by the config, if any
    pub fn load_reference(&self) -> Result<Option<ReferenceData>, ReferenceError> {
        self.reference_path
            .as_deref()
            .map(ReferenceData::from_path)
            .transpose()
    }
}

/// Resolves the tables to evaluate against: `loaded` when present, the
/// built-in tables otherwise.
pub fn reference_or_builtin(loaded: Option<&ReferenceData>) -> &ReferenceData {
    loaded.unwrap_or_else(|| reference::builtin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_gives_defaults() {
        let config = AdvisorConfig::load(None).unwrap();
        assert_eq!(config, AdvisorConfig::default());
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.load_reference().unwrap().is_none());
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "format = \"json\"").unwrap();
        let config = AdvisorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.reference_path, None);
    }

    #[test]
    fn unreadable_file_is_reported() {
        let err = AdvisorConfig::load(Some(Path::new("/nonexistent/advisor.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "format = \"yaml\"").unwrap();
        let err = AdvisorConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn reference_path_is_loaded() {
        let config = AdvisorConfig {
            reference_path: Some(PathBuf::from("/nonexistent/reference.toml")),
            ..AdvisorConfig::default()
        };
        assert!(matches!(
            config.load_reference(),
            Err(ReferenceError::Read { .. })
        ));
    }

    #[test]
    fn builtin_is_used_without_override() {
        let reference = reference_or_builtin(None);
        assert!(reference.is_known_crop("rice"));
    }
}
