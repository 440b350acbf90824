//! Configuration errors.

use kiln_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type.
///
/// Every variant is a fatal bootstrap error: the driver reports it to
/// stderr and exits 1 without attempting command dispatch.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a config file as TOML.
    #[error("failed to parse config file '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The built-in default configuration text is malformed.
    #[error("failed to parse built-in default config: {0}")]
    ParseDefaults(#[source] toml::de::Error),

    /// An explicitly given override file does not exist.
    #[error("config file '{path}' does not exist")]
    MissingFile { path: PathBuf },
}

impl ConfigError {
    /// Creates a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse TOML error.
    pub fn parse_toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ParseToml {
            path: path.into(),
            source,
        }
    }

    /// Creates a missing file error.
    pub fn missing_file(path: impl Into<PathBuf>) -> Self {
        Self::MissingFile { path: path.into() }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::ReadFile { .. } => "CONFIG_READ_FILE",
            Self::ParseToml { .. } => "CONFIG_PARSE_TOML",
            Self::ParseDefaults(_) => "CONFIG_PARSE_DEFAULTS",
            Self::MissingFile { .. } => "CONFIG_MISSING_FILE",
        }
    }

    fn is_recoverable(&self) -> bool {
        // The user can fix the file or the path; a rebuilt default text
        // cannot be fixed at runtime.
        !matches!(self, Self::ParseDefaults(_))
    }
}
