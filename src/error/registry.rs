use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read rules file '{path}': {message}")]
    RulesFileReadError { path: PathBuf, message: String },

    #[error("failed to parse rules file '{path}': {message}")]
    RulesParseError { path: PathBuf, message: String },

    #[error("unsupported rules format: {format} (expected json or yaml)")]
    UnsupportedFormat { format: String },

    #[error("construction '{id}' is declared more than once in '{path}'")]
    DuplicateConstruction { id: String, path: PathBuf },

    #[error("invalid schema for construction '{id}': {message}")]
    InvalidSchema { id: String, message: String },
}

impl RegistryError {
    pub fn rules_file_read_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::RulesFileReadError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn rules_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::RulesParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn duplicate_construction(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::DuplicateConstruction {
            id: id.into(),
            path: path.into(),
        }
    }

    pub fn invalid_schema(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            id: id.into(),
            message: message.into(),
        }
    }
}
