//! Compiled-in components.
//!
//! [`BuiltinSet`] is the table behind `{ builtin = "..." }` launch
//! descriptors: four name-keyed maps of ready component handles. The
//! [`standard`](BuiltinSet::standard) set ships enough for a usable
//! binary — and for exercising name resolution without spawning a single
//! subprocess:
//!
//! | Name | Kind | Behavior |
//! |------|------|----------|
//! | `version` | command | prints the tool version, exit 0 |
//! | `null` | builder | produces no artifact |
//! | `noop` | hook | does nothing |

mod noop_hook;
mod null_builder;
mod version;

pub use noop_hook::NoopHook;
pub use null_builder::NullBuilder;
pub use version::VersionCommand;

use kiln_component::{Builder, Command, Hook, Provisioner};
use std::collections::HashMap;
use std::sync::Arc;

/// The compiled-in component table.
///
/// Built once at bootstrap and handed to the component registry. Tests
/// inject custom sets via the builder-style `with_*` methods.
#[derive(Default)]
pub struct BuiltinSet {
    builders: HashMap<String, Arc<dyn Builder>>,
    commands: HashMap<String, Arc<dyn Command>>,
    hooks: HashMap<String, Arc<dyn Hook>>,
    provisioners: HashMap<String, Arc<dyn Provisioner>>,
}

impl BuiltinSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard set shipped with the binary.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_command("version", Arc::new(VersionCommand))
            .with_builder("null", Arc::new(NullBuilder))
            .with_hook("noop", Arc::new(NoopHook))
    }

    /// Registers a builtin builder.
    #[must_use]
    pub fn with_builder(mut self, name: impl Into<String>, handle: Arc<dyn Builder>) -> Self {
        self.builders.insert(name.into(), handle);
        self
    }

    /// Registers a builtin command.
    #[must_use]
    pub fn with_command(mut self, name: impl Into<String>, handle: Arc<dyn Command>) -> Self {
        self.commands.insert(name.into(), handle);
        self
    }

    /// Registers a builtin hook.
    #[must_use]
    pub fn with_hook(mut self, name: impl Into<String>, handle: Arc<dyn Hook>) -> Self {
        self.hooks.insert(name.into(), handle);
        self
    }

    /// Registers a builtin provisioner.
    #[must_use]
    pub fn with_provisioner(
        mut self,
        name: impl Into<String>,
        handle: Arc<dyn Provisioner>,
    ) -> Self {
        self.provisioners.insert(name.into(), handle);
        self
    }

    /// Looks up a builtin builder.
    #[must_use]
    pub fn builder(&self, name: &str) -> Option<Arc<dyn Builder>> {
        self.builders.get(name).cloned()
    }

    /// Looks up a builtin command.
    #[must_use]
    pub fn command(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    /// Looks up a builtin hook.
    #[must_use]
    pub fn hook(&self, name: &str) -> Option<Arc<dyn Hook>> {
        self.hooks.get(name).cloned()
    }

    /// Looks up a builtin provisioner.
    #[must_use]
    pub fn provisioner(&self, name: &str) -> Option<Arc<dyn Provisioner>> {
        self.provisioners.get(name).cloned()
    }
}
