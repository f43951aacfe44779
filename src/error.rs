use std::path::PathBuf;

use thiserror::Error;

use crate::reference::Nutrient;
use crate::sample::Field;

// Rejected input, reported before any evaluation takes place
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: Field },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: Field, value: f64 },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: Field,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must not be empty")]
    EmptyIdentifier { field: Field },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            Self::NotFinite { field }
            | Self::Negative { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::EmptyIdentifier { field } => *field,
        }
    }
}

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("could not read reference data `{path}`: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse reference data: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{nutrient} bands are not contiguous: {detail}")]
    Bands { nutrient: Nutrient, detail: String },
    #[error("duplicate {kind} identifier `{id}`")]
    DuplicateIdentifier { kind: &'static str, id: String },
    #[error("duplicate compatibility entry for `{crop}` on `{soil}`")]
    DuplicateCompatibility { crop: String, soil: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_field() {
        let err = ValidationError::OutOfRange {
            field: Field::Ph,
            value: 14.5,
            min: 0.0,
            max: 14.0,
        };
        assert_eq!(err.field(), Field::Ph);
        assert_eq!(err.to_string(), "ph must be between 0 and 14, got 14.5");
    }

    #[test]
    fn empty_identifier_message() {
        let err = ValidationError::EmptyIdentifier {
            field: Field::SoilType,
        };
        assert_eq!(err.to_string(), "soilType must not be empty");
    }
}
