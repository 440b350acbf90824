//! kiln runtime layer.
//!
//! Everything between the plugin SDK and the application: configuration
//! loading and merging, the lazy component registry, the dispatch
//! environment, the artifact cache gate, the signal coordinator, and the
//! compiled-in components.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Plugin SDK Layer                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  kiln-types, kiln-component, kiln-plugin                     │
//! └──────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Runtime Layer                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  kiln-runtime                                     ◄── HERE   │
//! │    config      : EffectiveConfig, ConfigLoader               │
//! │    registry    : ComponentRegistry, ComponentLoader          │
//! │    environment : Environment::dispatch                       │
//! │    cache       : FileCache, resolve_cache                    │
//! │    signal      : SignalCoordinator                           │
//! │    components  : builtin version/null/noop                   │
//! └──────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  Application / Frontend Layer                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  kiln-app, kiln-cli                                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Bootstrap Sequence
//!
//! ```text
//! ConfigLoader::load          merged EffectiveConfig
//!   → resolve_cache           optional FileCache
//!   → PluginManager::new      lifecycle registry
//!   → ComponentRegistry::new  lazy (kind, name) → handle resolution
//!   → Environment::new        command dispatch
//!   → SignalCoordinator       interrupt-safe shutdown
//! ```

pub mod cache;
pub mod components;
pub mod config;
mod environment;
mod registry;
pub mod signal;

pub use cache::{resolve_cache, FileCache};
pub use components::BuiltinSet;
pub use config::{ConfigError, ConfigLoader, EffectiveConfig, LaunchSpec};
pub use environment::{Environment, EnvironmentConfig, EnvironmentError};
pub use registry::{ComponentLoader, ComponentRegistry, RegistryError};
pub use signal::SignalCoordinator;
