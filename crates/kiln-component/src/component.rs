//! The four component traits.
//!
//! All traits are async and object-safe; the runtime holds components as
//! `Arc<dyn Builder>` etc. in its per-kind caches.
//!
//! | Trait | Invoked by | Returns |
//! |-------|------------|---------|
//! | [`Command`] | `Environment::dispatch` | process exit code |
//! | [`Builder`] | a build command | artifact description |
//! | [`Hook`] | lifecycle points during a build | nothing |
//! | [`Provisioner`] | a builder, after boot | nothing |

use crate::ComponentError;
use async_trait::async_trait;
use serde_json::Value;

/// A user-invocable subcommand of the `kiln` binary.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use kiln_component::{Command, ComponentError};
///
/// struct HelloCommand;
///
/// #[async_trait]
/// impl Command for HelloCommand {
///     fn synopsis(&self) -> &str {
///         "print a greeting"
///     }
///
///     async fn run(&self, args: &[String]) -> Result<i32, ComponentError> {
///         println!("hello {}", args.join(" "));
///         Ok(0)
///     }
/// }
/// ```
#[async_trait]
pub trait Command: Send + Sync {
    /// One-line description shown in help output.
    fn synopsis(&self) -> &str {
        ""
    }

    /// Runs the command with the arguments following its name.
    ///
    /// The returned exit code is passed through to the process exit code
    /// verbatim; the runtime does not reinterpret it.
    async fn run(&self, args: &[String]) -> Result<i32, ComponentError>;
}

/// Produces a machine image artifact from a build request.
#[async_trait]
pub trait Builder: Send + Sync {
    /// Runs a build and returns a description of the produced artifact.
    async fn build(&self, request: Value) -> Result<Value, ComponentError>;
}

/// Runs at lifecycle points during a build.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Fires the hook with the event payload for the current lifecycle
    /// point.
    async fn fire(&self, event: Value) -> Result<(), ComponentError>;
}

/// Configures a booted machine image.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Applies this provisioner with the given configuration payload.
    async fn provision(&self, request: Value) -> Result<(), ComponentError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    struct FixedCommand(i32);

    #[async_trait]
    impl Command for FixedCommand {
        async fn run(&self, _args: &[String]) -> Result<i32, ComponentError> {
            Ok(self.0)
        }
    }

    struct EchoBuilder;

    #[async_trait]
    impl Builder for EchoBuilder {
        async fn build(&self, request: Value) -> Result<Value, ComponentError> {
            Ok(request)
        }
    }

    #[tokio::test]
    async fn command_reports_exit_code_verbatim() {
        let cmd: Arc<dyn Command> = Arc::new(FixedCommand(3));
        let code = cmd.run(&[]).await.expect("should run");
        assert_eq!(code, 3);
    }

    #[tokio::test]
    async fn traits_are_object_safe() {
        let builder: Arc<dyn Builder> = Arc::new(EchoBuilder);
        let out = builder
            .build(json!({"iso": "debian.iso"}))
            .await
            .expect("should build");
        assert_eq!(out["iso"], "debian.iso");
    }

    #[test]
    fn default_synopsis_is_empty() {
        let cmd = FixedCommand(0);
        assert_eq!(cmd.synopsis(), "");
    }
}
