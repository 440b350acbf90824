//! Command dispatch environment.
//!
//! The [`Environment`] is what the frontend talks to after bootstrap:
//! it takes the raw argument vector, resolves the first word to a
//! command through a [`ComponentLoader`], and runs it with the rest of
//! the arguments. Unknown and missing commands produce errors that list
//! the recognized command names, so the operator always sees what the
//! merged configuration actually offers.

use crate::cache::FileCache;
use crate::registry::{ComponentLoader, RegistryError};
use kiln_component::ComponentError;
use kiln_types::ErrorCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors from command dispatch.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// The configuration defines no commands at all; dispatch could
    /// never succeed.
    #[error("no commands are configured")]
    NoCommandsConfigured,

    /// Dispatch was invoked with an empty argument vector.
    #[error("no command given; available commands: {}", available.join(", "))]
    NoCommand { available: Vec<String> },

    /// The first argument names no configured command.
    #[error("unknown command '{name}'; available commands: {}", available.join(", "))]
    UnknownCommand {
        name: String,
        available: Vec<String>,
    },

    /// The command is configured but could not be loaded.
    #[error(transparent)]
    Load(#[from] RegistryError),

    /// The command loaded but its execution failed.
    #[error("command '{name}' failed: {source}")]
    Command {
        name: String,
        #[source]
        source: ComponentError,
    },
}

impl ErrorCode for EnvironmentError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoCommandsConfigured => "ENV_NO_COMMANDS_CONFIGURED",
            Self::NoCommand { .. } => "ENV_NO_COMMAND",
            Self::UnknownCommand { .. } => "ENV_UNKNOWN_COMMAND",
            Self::Load(source) => source.code(),
            Self::Command { source, .. } => source.code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::NoCommandsConfigured | Self::NoCommand { .. } | Self::UnknownCommand { .. } => {
                false
            }
            Self::Load(source) => source.is_recoverable(),
            Self::Command { source, .. } => source.is_recoverable(),
        }
    }
}

/// Inputs for [`Environment::new`].
pub struct EnvironmentConfig {
    /// Artifact cache, when a cache directory was resolved.
    pub cache: Option<FileCache>,
    /// Sorted names of the configured commands.
    pub command_names: Vec<String>,
    /// Resolves names to runnable components.
    pub loader: Arc<dyn ComponentLoader>,
}

/// The assembled dispatch environment.
pub struct Environment {
    cache: Option<FileCache>,
    command_names: Vec<String>,
    loader: Arc<dyn ComponentLoader>,
}

impl Environment {
    /// Assembles the environment.
    ///
    /// Rejects an empty command set up front: a binary that can dispatch
    /// nothing is a configuration mistake, and surfacing it at bootstrap
    /// beats failing on every invocation.
    pub fn new(config: EnvironmentConfig) -> Result<Self, EnvironmentError> {
        if config.command_names.is_empty() {
            return Err(EnvironmentError::NoCommandsConfigured);
        }
        Ok(Self {
            cache: config.cache,
            command_names: config.command_names,
            loader: config.loader,
        })
    }

    /// The artifact cache, if one was configured.
    #[must_use]
    pub fn cache(&self) -> Option<&FileCache> {
        self.cache.as_ref()
    }

    /// Names of the commands this environment can dispatch to.
    #[must_use]
    pub fn command_names(&self) -> &[String] {
        &self.command_names
    }

    /// Resolves `args[0]` to a command and runs it with `args[1..]`.
    ///
    /// Returns the command's exit code on success. The command's own
    /// nonzero exit codes are values here, not errors; only dispatch and
    /// execution failures become `Err`.
    pub async fn dispatch(&self, args: &[String]) -> Result<i32, EnvironmentError> {
        let Some(name) = args.first() else {
            return Err(EnvironmentError::NoCommand {
                available: self.command_names.clone(),
            });
        };

        let command = match self.loader.load_command(name).await {
            Ok(command) => command,
            Err(RegistryError::NotFound { .. }) => {
                return Err(EnvironmentError::UnknownCommand {
                    name: name.clone(),
                    available: self.command_names.clone(),
                });
            }
            Err(other) => return Err(EnvironmentError::Load(other)),
        };

        debug!(command = %name, args = args.len() - 1, "dispatching");
        command
            .run(&args[1..])
            .await
            .map_err(|source| EnvironmentError::Command {
                name: name.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kiln_component::{Builder, Command, Hook, Provisioner};
    use kiln_types::{assert_error_code, ComponentKind};

    struct FixedCommand(i32);

    #[async_trait]
    impl Command for FixedCommand {
        async fn run(&self, _args: &[String]) -> Result<i32, ComponentError> {
            Ok(self.0)
        }
    }

    struct EchoArgsCommand;

    #[async_trait]
    impl Command for EchoArgsCommand {
        async fn run(&self, args: &[String]) -> Result<i32, ComponentError> {
            // exit code = argument count, so tests can observe the slice
            Ok(args.len() as i32)
        }
    }

    struct StubLoader {
        name: String,
        command: Arc<dyn Command>,
    }

    #[async_trait]
    impl ComponentLoader for StubLoader {
        async fn load_builder(&self, name: &str) -> Result<Arc<dyn Builder>, RegistryError> {
            Err(RegistryError::NotFound {
                kind: ComponentKind::Builder,
                name: name.to_string(),
            })
        }

        async fn load_command(&self, name: &str) -> Result<Arc<dyn Command>, RegistryError> {
            if name == self.name {
                Ok(self.command.clone())
            } else {
                Err(RegistryError::NotFound {
                    kind: ComponentKind::Command,
                    name: name.to_string(),
                })
            }
        }

        async fn load_hook(&self, name: &str) -> Result<Arc<dyn Hook>, RegistryError> {
            Err(RegistryError::NotFound {
                kind: ComponentKind::Hook,
                name: name.to_string(),
            })
        }

        async fn load_provisioner(
            &self,
            name: &str,
        ) -> Result<Arc<dyn Provisioner>, RegistryError> {
            Err(RegistryError::NotFound {
                kind: ComponentKind::Provisioner,
                name: name.to_string(),
            })
        }
    }

    fn environment(command: Arc<dyn Command>) -> Environment {
        Environment::new(EnvironmentConfig {
            cache: None,
            command_names: vec!["build".to_string()],
            loader: Arc::new(StubLoader {
                name: "build".to_string(),
                command,
            }),
        })
        .expect("should assemble")
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn dispatch_runs_named_command() {
        let env = environment(Arc::new(FixedCommand(0)));
        let code = env.dispatch(&args(&["build"])).await.expect("should run");
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn nonzero_exit_code_is_a_value_not_an_error() {
        let env = environment(Arc::new(FixedCommand(3)));
        let code = env.dispatch(&args(&["build"])).await.expect("should run");
        assert_eq!(code, 3);
    }

    #[tokio::test]
    async fn rest_args_are_forwarded() {
        let env = environment(Arc::new(EchoArgsCommand));
        let code = env
            .dispatch(&args(&["build", "base.toml", "--force"]))
            .await
            .expect("should run");
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn empty_args_lists_available_commands() {
        let env = environment(Arc::new(FixedCommand(0)));
        let err = env.dispatch(&[]).await.expect_err("should fail");
        match &err {
            EnvironmentError::NoCommand { available } => {
                assert_eq!(available, &["build"]);
            }
            other => panic!("expected NoCommand, got: {other:?}"),
        }
        assert!(err.to_string().contains("build"));
    }

    #[tokio::test]
    async fn unknown_command_lists_available_commands() {
        let env = environment(Arc::new(FixedCommand(0)));
        let err = env
            .dispatch(&args(&["deploy"]))
            .await
            .expect_err("should fail");
        match &err {
            EnvironmentError::UnknownCommand { name, available } => {
                assert_eq!(name, "deploy");
                assert_eq!(available, &["build"]);
            }
            other => panic!("expected UnknownCommand, got: {other:?}"),
        }
        assert_error_code(&err, "ENV_");
    }

    #[tokio::test]
    async fn command_failure_names_the_command() {
        struct FailingCommand;

        #[async_trait]
        impl Command for FailingCommand {
            async fn run(&self, _args: &[String]) -> Result<i32, ComponentError> {
                Err(ComponentError::ExecutionFailed("disk full".into()))
            }
        }

        let env = environment(Arc::new(FailingCommand));
        let err = env
            .dispatch(&args(&["build"]))
            .await
            .expect_err("should fail");
        assert!(err.to_string().contains("build"));
        assert!(err.to_string().contains("disk full"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn empty_command_set_is_rejected_at_assembly() {
        let result = Environment::new(EnvironmentConfig {
            cache: None,
            command_names: vec![],
            loader: Arc::new(StubLoader {
                name: "x".to_string(),
                command: Arc::new(FixedCommand(0)),
            }),
        });
        match result {
            Err(err @ EnvironmentError::NoCommandsConfigured) => {
                assert_error_code(&err, "ENV_");
            }
            Ok(_) => panic!("empty command set should be rejected"),
            Err(other) => panic!("expected NoCommandsConfigured, got: {other:?}"),
        }
    }
}
