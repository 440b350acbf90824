//! Effective configuration types.

use kiln_types::ComponentKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Launch descriptor for one named component.
///
/// Three TOML forms, tried in order:
///
/// | Form | Example | Meaning |
/// |------|---------|---------|
/// | builtin marker | `{ builtin = "version" }` | compiled-in component |
/// | plugin table | `{ command = "/opt/x", args = ["--kvm"] }` | plugin with args/env |
/// | bare string | `"kiln-command-build"` | plugin executable path |
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LaunchSpec {
    /// Resolved from the compiled-in component table.
    Builtin {
        /// Name in the [`BuiltinSet`](crate::BuiltinSet).
        builtin: String,
    },
    /// External plugin with explicit arguments and environment.
    Plugin {
        /// Executable to spawn.
        command: String,
        /// Arguments passed to the executable.
        #[serde(default)]
        args: Vec<String>,
        /// Environment variables set for the subprocess.
        #[serde(default)]
        env: BTreeMap<String, String>,
    },
    /// External plugin given as a bare executable path.
    Path(String),
}

/// Extracted spawn parameters for a plugin-backed launch descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchParts {
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

impl LaunchSpec {
    /// Returns the builtin name if this descriptor denotes a built-in.
    #[must_use]
    pub fn builtin_name(&self) -> Option<&str> {
        match self {
            Self::Builtin { builtin } => Some(builtin),
            _ => None,
        }
    }

    /// Returns spawn parameters if this descriptor denotes a plugin.
    #[must_use]
    pub fn launch_parts(&self) -> Option<LaunchParts> {
        match self {
            Self::Builtin { .. } => None,
            Self::Plugin { command, args, env } => Some(LaunchParts {
                command: command.clone(),
                args: args.clone(),
                env: env.clone(),
            }),
            Self::Path(command) => Some(LaunchParts {
                command: command.clone(),
                args: Vec::new(),
                env: BTreeMap::new(),
            }),
        }
    }
}

/// The merged result of default and user-supplied configuration.
///
/// One name-keyed map per component kind. Names are unique within a kind
/// by construction (map keys); `BTreeMap` keeps iteration deterministic,
/// which makes [`command_names`](Self::command_names) the sorted list of
/// recognized commands.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EffectiveConfig {
    /// Named builders.
    pub builders: BTreeMap<String, LaunchSpec>,
    /// Named commands.
    pub commands: BTreeMap<String, LaunchSpec>,
    /// Named hooks.
    pub hooks: BTreeMap<String, LaunchSpec>,
    /// Named provisioners.
    pub provisioners: BTreeMap<String, LaunchSpec>,
}

impl EffectiveConfig {
    /// Merges another config into this one, last-write-wins per
    /// (kind, name) entry.
    pub fn merge(&mut self, other: &Self) {
        for (name, spec) in &other.builders {
            self.builders.insert(name.clone(), spec.clone());
        }
        for (name, spec) in &other.commands {
            self.commands.insert(name.clone(), spec.clone());
        }
        for (name, spec) in &other.hooks {
            self.hooks.insert(name.clone(), spec.clone());
        }
        for (name, spec) in &other.provisioners {
            self.provisioners.insert(name.clone(), spec.clone());
        }
    }

    /// Looks up the launch descriptor for a (kind, name) pair.
    #[must_use]
    pub fn get(&self, kind: ComponentKind, name: &str) -> Option<&LaunchSpec> {
        self.section(kind).get(name)
    }

    /// The name-keyed map for one component kind.
    #[must_use]
    pub fn section(&self, kind: ComponentKind) -> &BTreeMap<String, LaunchSpec> {
        match kind {
            ComponentKind::Builder => &self.builders,
            ComponentKind::Command => &self.commands,
            ComponentKind::Hook => &self.hooks,
            ComponentKind::Provisioner => &self.provisioners,
        }
    }

    /// The sorted list of recognized command names.
    #[must_use]
    pub fn command_names(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }
}
