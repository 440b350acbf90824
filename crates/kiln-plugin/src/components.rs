//! Component trait adapters over the plugin channel.
//!
//! Each adapter wraps an `Arc<PluginClient>` and implements one of the
//! four component traits by forwarding to [`PluginClient::call`]. The
//! runtime hands these out as ordinary component handles; callers cannot
//! tell a plugin-backed component from a builtin.

use crate::client::PluginClient;
use crate::error::PluginError;
use async_trait::async_trait;
use kiln_component::{Builder, Command, ComponentError, Hook, Provisioner};
use serde_json::{json, Value};
use std::sync::Arc;

fn to_component_error(err: PluginError) -> ComponentError {
    match err {
        PluginError::ChannelClosed { name } => {
            ComponentError::Unavailable(format!("plugin '{name}' channel closed"))
        }
        PluginError::Remote { message, .. } => ComponentError::ExecutionFailed(message),
        other => ComponentError::ExecutionFailed(other.to_string()),
    }
}

/// Command backed by a plugin subprocess.
pub struct PluginCommand {
    client: Arc<PluginClient>,
}

impl PluginCommand {
    /// Wraps a handshaken client announcing the `command` kind.
    #[must_use]
    pub fn new(client: Arc<PluginClient>) -> Self {
        Self { client }
    }

    /// The underlying client handle.
    #[must_use]
    pub fn client(&self) -> &Arc<PluginClient> {
        &self.client
    }
}

#[async_trait]
impl Command for PluginCommand {
    async fn run(&self, args: &[String]) -> Result<i32, ComponentError> {
        let value = self
            .client
            .call("run", json!({ "args": args }))
            .await
            .map_err(to_component_error)?;

        // The plugin reports its exit code as the response value. A value
        // outside i32 is a protocol violation, not a code to truncate.
        value
            .as_i64()
            .and_then(|code| i32::try_from(code).ok())
            .ok_or_else(|| {
                ComponentError::InvalidPayload(format!("expected i32 exit code, got: {value}"))
            })
    }
}

/// Builder backed by a plugin subprocess.
pub struct PluginBuilder {
    client: Arc<PluginClient>,
}

impl PluginBuilder {
    /// Wraps a handshaken client announcing the `builder` kind.
    #[must_use]
    pub fn new(client: Arc<PluginClient>) -> Self {
        Self { client }
    }

    /// The underlying client handle.
    #[must_use]
    pub fn client(&self) -> &Arc<PluginClient> {
        &self.client
    }
}

#[async_trait]
impl Builder for PluginBuilder {
    async fn build(&self, request: Value) -> Result<Value, ComponentError> {
        self.client
            .call("build", request)
            .await
            .map_err(to_component_error)
    }
}

/// Hook backed by a plugin subprocess.
pub struct PluginHook {
    client: Arc<PluginClient>,
}

impl PluginHook {
    /// Wraps a handshaken client announcing the `hook` kind.
    #[must_use]
    pub fn new(client: Arc<PluginClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Hook for PluginHook {
    async fn fire(&self, event: Value) -> Result<(), ComponentError> {
        self.client
            .call("fire", event)
            .await
            .map(|_| ())
            .map_err(to_component_error)
    }
}

/// Provisioner backed by a plugin subprocess.
pub struct PluginProvisioner {
    client: Arc<PluginClient>,
}

impl PluginProvisioner {
    /// Wraps a handshaken client announcing the `provisioner` kind.
    #[must_use]
    pub fn new(client: Arc<PluginClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provisioner for PluginProvisioner {
    async fn provision(&self, request: Value) -> Result<(), ComponentError> {
        self.client
            .call("provision", request)
            .await
            .map(|_| ())
            .map_err(to_component_error)
    }
}
