//! Application bootstrap and run.

use crate::error::AppError;
use kiln_plugin::PluginManager;
use kiln_runtime::{
    resolve_cache, BuiltinSet, ComponentRegistry, ConfigLoader, Environment, EnvironmentConfig,
    SignalCoordinator,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Settings the driver reads once at process start.
///
/// The only place CLI flags and their environment-variable fallbacks are
/// consumed; no other component reads ambient settings. `log` and `jobs`
/// are used by the driver itself (subscriber and runtime construction,
/// both of which happen before bootstrap); the rest feed
/// [`KilnApp::bootstrap`].
#[derive(Debug, Clone, Default)]
pub struct BootstrapConfig {
    /// Emit diagnostics to stderr. Unset means all logging is discarded.
    pub log: bool,
    /// Worker thread count for the runtime. Unset means the processor
    /// count.
    pub jobs: Option<usize>,
    /// Artifact cache directory. Unset disables caching.
    pub cache_dir: Option<PathBuf>,
    /// Explicit configuration file. Unset falls back to the per-user
    /// config, whose absence is tolerated.
    pub config_path: Option<PathBuf>,
}

/// The assembled application.
///
/// Owns the dispatch environment, the plugin lifecycle manager, and the
/// installed signal coordinator. Dropping the app does not terminate
/// plugins; call [`run`](Self::run) (which always cleans up) or
/// [`shutdown`](Self::shutdown).
pub struct KilnApp {
    environment: Environment,
    manager: Arc<PluginManager>,
    signal_task: JoinHandle<()>,
}

impl KilnApp {
    /// Bootstraps the application.
    ///
    /// Sequencing: load and merge configuration, resolve the cache gate,
    /// create the plugin lifecycle manager, build the component registry
    /// over both, assemble the dispatch environment, and install the
    /// signal coordinator. Components are not loaded here — resolution is
    /// lazy, on first dispatch.
    ///
    /// # Errors
    ///
    /// Any phase failure aborts bootstrap with the corresponding
    /// [`AppError`] variant; nothing needs cleanup at that point because
    /// no plugin has been spawned yet.
    pub async fn bootstrap(config: &BootstrapConfig) -> Result<Self, AppError> {
        let mut loader = ConfigLoader::new();
        if let Some(ref path) = config.config_path {
            loader = loader.with_override(path);
        }
        let effective = loader.load()?;
        debug!(
            builders = effective.builders.len(),
            commands = effective.commands.len(),
            hooks = effective.hooks.len(),
            provisioners = effective.provisioners.len(),
            "effective configuration loaded"
        );

        let cache = resolve_cache(config.cache_dir.as_deref()).map_err(|source| {
            AppError::CacheDir {
                // cache_dir is Some whenever resolve_cache touches the fs
                path: config.cache_dir.clone().unwrap_or_default(),
                source,
            }
        })?;

        let manager = Arc::new(PluginManager::new());
        let command_names = effective.command_names();
        let registry =
            ComponentRegistry::new(effective, BuiltinSet::standard(), manager.clone());

        let environment = Environment::new(EnvironmentConfig {
            cache,
            command_names,
            loader: Arc::new(registry),
        })
        .map_err(AppError::Init)?;

        let signal_task = SignalCoordinator::install(manager.clone());
        info!("application bootstrap complete");

        Ok(Self {
            environment,
            manager,
            signal_task,
        })
    }

    /// The dispatch environment.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The plugin lifecycle manager.
    #[must_use]
    pub fn manager(&self) -> &Arc<PluginManager> {
        &self.manager
    }

    /// Dispatches `args` and cleans up.
    ///
    /// Plugin cleanup runs on both the success and the failure path
    /// before the result is returned, so no exit through here leaks a
    /// subprocess. The command's exit code is the `Ok` value; the
    /// caller maps errors to its own exit codes.
    pub async fn run(&self, args: &[String]) -> Result<i32, AppError> {
        let outcome = self.environment.dispatch(args).await;

        let terminated = self.manager.cleanup_all().await;
        debug!(terminated, "plugin cleanup finished");
        self.signal_task.abort();

        outcome.map_err(AppError::Execution)
    }

    /// Terminates all plugins without dispatching.
    ///
    /// Idempotent, like the cleanup it delegates to.
    pub async fn shutdown(&self) {
        let terminated = self.manager.cleanup_all().await;
        debug!(terminated, "shutdown cleanup finished");
        self.signal_task.abort();
    }
}
