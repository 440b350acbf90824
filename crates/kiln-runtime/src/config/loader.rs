//! Configuration loader.
//!
//! Decodes the built-in defaults, overlays the user config file when one
//! exists, and returns the merged [`EffectiveConfig`]. The override
//! semantics differ by how the path was chosen:
//!
//! - **explicit override path**: the file must exist, its absence is an
//!   error (the user asked for it);
//! - **per-user fallback path**: absence is tolerated, the defaults stand
//!   alone.

use super::{default_config_path, ConfigError, EffectiveConfig, DEFAULT_CONFIG_TOML};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```ignore
/// use kiln_runtime::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_override("/etc/kiln/config.toml")
///     .load()?;
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Explicit override file. Must exist when set.
    override_path: Option<PathBuf>,

    /// Fallback file location (defaults to `~/.kiln/config.toml`). May be
    /// absent.
    fallback_path: Option<PathBuf>,

    /// Default configuration text (defaults to [`DEFAULT_CONFIG_TOML`]).
    /// Replaceable for tests.
    defaults: Option<String>,
}

impl ConfigLoader {
    /// Creates a loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            override_path: None,
            fallback_path: None,
            defaults: None,
        }
    }

    /// Sets an explicit override file path. Its absence becomes an error.
    #[must_use]
    pub fn with_override(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    /// Sets a custom fallback path (instead of `~/.kiln/config.toml`).
    #[must_use]
    pub fn with_fallback(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_path = Some(path.into());
        self
    }

    /// Replaces the built-in default configuration text.
    #[must_use]
    pub fn with_defaults(mut self, text: impl Into<String>) -> Self {
        self.defaults = Some(text.into());
        self
    }

    /// Loads and merges configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the defaults or an existing file cannot
    /// be parsed, or if an explicit override path does not exist.
    pub fn load(&self) -> Result<EffectiveConfig, ConfigError> {
        let defaults = self.defaults.as_deref().unwrap_or(DEFAULT_CONFIG_TOML);
        let mut config: EffectiveConfig =
            toml::from_str(defaults).map_err(ConfigError::ParseDefaults)?;

        if let Some(ref path) = self.override_path {
            if !path.exists() {
                return Err(ConfigError::missing_file(path));
            }
            let user = load_file(path)?;
            debug!(path = %path.display(), "loaded config override");
            config.merge(&user);
        } else {
            let fallback = self
                .fallback_path
                .clone()
                .unwrap_or_else(default_config_path);
            if fallback.exists() {
                let user = load_file(&fallback)?;
                debug!(path = %fallback.display(), "loaded user config");
                config.merge(&user);
            } else {
                debug!(path = %fallback.display(), "no user config, defaults only");
            }
        }

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn load_file(path: &Path) -> Result<EffectiveConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    toml::from_str(&content).map_err(|e| ConfigError::parse_toml(path, e))
}
