//! Component registry with lazy, cached resolution.
//!
//! Given the effective configuration, the registry resolves a component
//! name to a runnable handle on first request and caches it for the
//! lifetime of the process. Plugin-backed components spawn their
//! subprocess during resolution and register the resulting client with
//! the [`PluginManager`] before the handle is handed out, so no exit path
//! can observe a spawned-but-untracked subprocess.
//!
//! # Resolution
//!
//! ```text
//! load_builder("qemu")
//!   → cache hit? return handle
//!   → config lookup: absent → NotFound
//!   → builtin marker → BuiltinSet lookup
//!   → plugin spec   → PluginClient::spawn → manager.register → adapter
//!   → insert into cache, return
//! ```
//!
//! The spawn happens under the per-kind write lock, so two concurrent
//! first requests for the same name cannot double-spawn.

use crate::components::BuiltinSet;
use crate::config::{EffectiveConfig, LaunchParts};
use async_trait::async_trait;
use kiln_component::{Builder, Command, Hook, Provisioner};
use kiln_plugin::{
    PluginBuilder, PluginClient, PluginCommand, PluginError, PluginHook, PluginManager,
    PluginProvisioner,
};
use kiln_types::{ComponentKind, ErrorCode};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// Errors from component resolution.
///
/// `NotFound` and `LoadFailure` are deliberately distinct: the first
/// means the configuration never mentions the name, the second means the
/// configuration does but the component could not be brought up.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No entry for (kind, name) in the effective configuration.
    #[error("{kind} not found: {name}")]
    NotFound { kind: ComponentKind, name: String },

    /// The entry exists but loading it failed (spawn, handshake).
    #[error("failed to load {kind} '{name}': {source}")]
    LoadFailure {
        kind: ComponentKind,
        name: String,
        #[source]
        source: PluginError,
    },

    /// The entry names a builtin that is not compiled in.
    #[error("{kind} '{name}' refers to unknown builtin '{builtin}'")]
    UnknownBuiltin {
        kind: ComponentKind,
        name: String,
        builtin: String,
    },
}

impl RegistryError {
    fn not_found(kind: ComponentKind, name: &str) -> Self {
        Self::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    fn load_failure(kind: ComponentKind, name: &str, source: PluginError) -> Self {
        Self::LoadFailure {
            kind,
            name: name.to_string(),
            source,
        }
    }
}

impl ErrorCode for RegistryError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "REGISTRY_NOT_FOUND",
            Self::LoadFailure { .. } => "REGISTRY_LOAD_FAILURE",
            Self::UnknownBuiltin { .. } => "REGISTRY_UNKNOWN_BUILTIN",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::UnknownBuiltin { .. } => false,
            Self::LoadFailure { source, .. } => source.is_recoverable(),
        }
    }
}

/// The four loader operations behind one seam.
///
/// The [`Environment`](crate::Environment) depends on this trait rather
/// than on [`ComponentRegistry`] so dispatch can be tested with stub
/// loaders.
#[async_trait]
pub trait ComponentLoader: Send + Sync {
    /// Resolves a builder by name.
    async fn load_builder(&self, name: &str) -> Result<Arc<dyn Builder>, RegistryError>;
    /// Resolves a command by name.
    async fn load_command(&self, name: &str) -> Result<Arc<dyn Command>, RegistryError>;
    /// Resolves a hook by name.
    async fn load_hook(&self, name: &str) -> Result<Arc<dyn Hook>, RegistryError>;
    /// Resolves a provisioner by name.
    async fn load_provisioner(&self, name: &str) -> Result<Arc<dyn Provisioner>, RegistryError>;
}

/// Name-keyed component resolution over the effective configuration.
pub struct ComponentRegistry {
    config: EffectiveConfig,
    builtins: BuiltinSet,
    manager: Arc<PluginManager>,
    builders: RwLock<HashMap<String, Arc<dyn Builder>>>,
    commands: RwLock<HashMap<String, Arc<dyn Command>>>,
    hooks: RwLock<HashMap<String, Arc<dyn Hook>>>,
    provisioners: RwLock<HashMap<String, Arc<dyn Provisioner>>>,
}

impl ComponentRegistry {
    /// Creates a registry over the given configuration and builtin table.
    ///
    /// Every plugin client the registry spawns is registered with
    /// `manager` before its handle is returned.
    #[must_use]
    pub fn new(config: EffectiveConfig, builtins: BuiltinSet, manager: Arc<PluginManager>) -> Self {
        Self {
            config,
            builtins,
            manager,
            builders: RwLock::new(HashMap::new()),
            commands: RwLock::new(HashMap::new()),
            hooks: RwLock::new(HashMap::new()),
            provisioners: RwLock::new(HashMap::new()),
        }
    }

    /// The configuration this registry resolves against.
    #[must_use]
    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    /// Looks up the launch descriptor and splits it into the builtin /
    /// plugin cases.
    fn spec_for(
        &self,
        kind: ComponentKind,
        name: &str,
    ) -> Result<Resolution<'_>, RegistryError> {
        let spec = self
            .config
            .get(kind, name)
            .ok_or_else(|| RegistryError::not_found(kind, name))?;

        match spec.builtin_name() {
            Some(builtin) => Ok(Resolution::Builtin(builtin)),
            None => {
                // launch_parts is Some for every non-builtin variant.
                let parts = spec.launch_parts().ok_or_else(|| {
                    RegistryError::not_found(kind, name)
                })?;
                Ok(Resolution::Plugin(parts))
            }
        }
    }

    async fn spawn_client(
        &self,
        kind: ComponentKind,
        name: &str,
        parts: &LaunchParts,
    ) -> Result<Arc<PluginClient>, RegistryError> {
        let client =
            PluginClient::spawn(name, kind, &parts.command, &parts.args, &parts.env)
                .await
                .map_err(|e| RegistryError::load_failure(kind, name, e))?;
        let client = Arc::new(client);
        self.manager.register(client.clone()).await;
        Ok(client)
    }
}

enum Resolution<'a> {
    Builtin(&'a str),
    Plugin(LaunchParts),
}

#[async_trait]
impl ComponentLoader for ComponentRegistry {
    async fn load_builder(&self, name: &str) -> Result<Arc<dyn Builder>, RegistryError> {
        if let Some(handle) = self.builders.read().await.get(name) {
            return Ok(handle.clone());
        }

        let mut cache = self.builders.write().await;
        if let Some(handle) = cache.get(name) {
            return Ok(handle.clone());
        }

        let kind = ComponentKind::Builder;
        let handle: Arc<dyn Builder> = match self.spec_for(kind, name)? {
            Resolution::Builtin(builtin) => {
                self.builtins
                    .builder(builtin)
                    .ok_or_else(|| RegistryError::UnknownBuiltin {
                        kind,
                        name: name.to_string(),
                        builtin: builtin.to_string(),
                    })?
            }
            Resolution::Plugin(parts) => {
                let client = self.spawn_client(kind, name, &parts).await?;
                Arc::new(PluginBuilder::new(client))
            }
        };

        debug!(%kind, name, "component resolved");
        cache.insert(name.to_string(), handle.clone());
        Ok(handle)
    }

    async fn load_command(&self, name: &str) -> Result<Arc<dyn Command>, RegistryError> {
        if let Some(handle) = self.commands.read().await.get(name) {
            return Ok(handle.clone());
        }

        let mut cache = self.commands.write().await;
        if let Some(handle) = cache.get(name) {
            return Ok(handle.clone());
        }

        let kind = ComponentKind::Command;
        let handle: Arc<dyn Command> = match self.spec_for(kind, name)? {
            Resolution::Builtin(builtin) => {
                self.builtins
                    .command(builtin)
                    .ok_or_else(|| RegistryError::UnknownBuiltin {
                        kind,
                        name: name.to_string(),
                        builtin: builtin.to_string(),
                    })?
            }
            Resolution::Plugin(parts) => {
                let client = self.spawn_client(kind, name, &parts).await?;
                Arc::new(PluginCommand::new(client))
            }
        };

        debug!(%kind, name, "component resolved");
        cache.insert(name.to_string(), handle.clone());
        Ok(handle)
    }

    async fn load_hook(&self, name: &str) -> Result<Arc<dyn Hook>, RegistryError> {
        if let Some(handle) = self.hooks.read().await.get(name) {
            return Ok(handle.clone());
        }

        let mut cache = self.hooks.write().await;
        if let Some(handle) = cache.get(name) {
            return Ok(handle.clone());
        }

        let kind = ComponentKind::Hook;
        let handle: Arc<dyn Hook> = match self.spec_for(kind, name)? {
            Resolution::Builtin(builtin) => {
                self.builtins
                    .hook(builtin)
                    .ok_or_else(|| RegistryError::UnknownBuiltin {
                        kind,
                        name: name.to_string(),
                        builtin: builtin.to_string(),
                    })?
            }
            Resolution::Plugin(parts) => {
                let client = self.spawn_client(kind, name, &parts).await?;
                Arc::new(PluginHook::new(client))
            }
        };

        debug!(%kind, name, "component resolved");
        cache.insert(name.to_string(), handle.clone());
        Ok(handle)
    }

    async fn load_provisioner(&self, name: &str) -> Result<Arc<dyn Provisioner>, RegistryError> {
        if let Some(handle) = self.provisioners.read().await.get(name) {
            return Ok(handle.clone());
        }

        let mut cache = self.provisioners.write().await;
        if let Some(handle) = cache.get(name) {
            return Ok(handle.clone());
        }

        let kind = ComponentKind::Provisioner;
        let handle: Arc<dyn Provisioner> = match self.spec_for(kind, name)? {
            Resolution::Builtin(builtin) => self.builtins.provisioner(builtin).ok_or_else(|| {
                RegistryError::UnknownBuiltin {
                    kind,
                    name: name.to_string(),
                    builtin: builtin.to_string(),
                }
            })?,
            Resolution::Plugin(parts) => {
                let client = self.spawn_client(kind, name, &parts).await?;
                Arc::new(PluginProvisioner::new(client))
            }
        };

        debug!(%kind, name, "component resolved");
        cache.insert(name.to_string(), handle.clone());
        Ok(handle)
    }
}
