//! Configuration loading and merging.
//!
//! # Load Order
//!
//! 1. Built-in defaults ([`DEFAULT_CONFIG_TOML`], compile-time)
//! 2. User override file (explicit path, or `~/.kiln/config.toml`)
//!
//! The later layer wins per (kind, name) entry — see
//! [`EffectiveConfig::merge`]. An explicitly given override path must
//! exist; the per-user fallback may be absent.
//!
//! # File Format
//!
//! ```toml
//! [commands]
//! version = { builtin = "version" }
//! build = "kiln-command-build"
//!
//! [builders]
//! null = { builtin = "null" }
//! qemu = { command = "/opt/kiln/kiln-builder-qemu", args = ["--kvm"] }
//!
//! [hooks]
//! noop = { builtin = "noop" }
//!
//! [provisioners]
//! shell = "kiln-provisioner-shell"
//! ```
//!
//! Each entry maps a component name to a launch descriptor: a bare string
//! (plugin executable path), a table with `command`/`args`/`env`, or a
//! `builtin` marker resolved from the compiled-in component table.

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{EffectiveConfig, LaunchParts, LaunchSpec};

/// Built-in default configuration, always the base layer of a load.
///
/// Ships enough components for a usable binary: the `version` command,
/// the `null` builder, and the `noop` hook.
pub const DEFAULT_CONFIG_TOML: &str = r#"
[commands]
version = { builtin = "version" }

[builders]
null = { builtin = "null" }

[hooks]
noop = { builtin = "noop" }
"#;

/// Default per-user kiln directory (`~/.kiln`).
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".kiln")
}

/// Default per-user config file path (`~/.kiln/config.toml`).
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}
