//! Application-level errors.
//!
//! One variant per bootstrap/run phase, so the frontend's stderr output
//! names the phase that failed:
//!
//! | Error | Code | Phase |
//! |-------|------|-------|
//! | [`Config`](AppError::Config) | `APP_CONFIG` | configuration load |
//! | [`CacheDir`](AppError::CacheDir) | `APP_CACHE_DIR` | cache directory |
//! | [`Init`](AppError::Init) | `APP_INIT` | environment assembly |
//! | [`Execution`](AppError::Execution) | `APP_EXECUTION` | dispatch |

use kiln_runtime::{ConfigError, EnvironmentError};
use kiln_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Error from bootstrap or run.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cache directory could not be prepared.
    #[error("failed to prepare cache directory {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dispatch environment could not be assembled.
    #[error("initialization error: {0}")]
    Init(#[source] EnvironmentError),

    /// Command dispatch failed.
    #[error("execution error: {0}")]
    Execution(#[source] EnvironmentError),
}

impl ErrorCode for AppError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "APP_CONFIG",
            Self::CacheDir { .. } => "APP_CACHE_DIR",
            Self::Init(_) => "APP_INIT",
            Self::Execution(_) => "APP_EXECUTION",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) | Self::CacheDir { .. } | Self::Init(_) => false,
            Self::Execution(source) => source.is_recoverable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_types::assert_error_codes;

    #[test]
    fn codes_follow_convention() {
        assert_error_codes(
            &[
                AppError::CacheDir {
                    path: "/tmp/x".into(),
                    source: std::io::Error::other("boom"),
                },
                AppError::Init(EnvironmentError::NoCommandsConfigured),
            ],
            "APP_",
        );
    }

    #[test]
    fn display_names_the_phase() {
        let err = AppError::CacheDir {
            path: "/var/cache/kiln".into(),
            source: std::io::Error::other("permission denied"),
        };
        let text = err.to_string();
        assert!(text.contains("cache directory"));
        assert!(text.contains("/var/cache/kiln"));
    }
}
