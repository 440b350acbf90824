//! Component kind enumeration.
//!
//! Every behavioral piece of kiln is one of four kinds, resolved by
//! (kind, name) pairs throughout configuration and the component registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four component kinds kiln resolves by name.
///
/// | Kind | Role |
/// |------|------|
/// | `Builder` | Produces a machine image artifact |
/// | `Command` | A user-invocable subcommand of the `kiln` binary |
/// | `Hook` | Runs at lifecycle points during a build |
/// | `Provisioner` | Configures a booted image |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Builder,
    Command,
    Hook,
    Provisioner,
}

impl ComponentKind {
    /// All kinds, in configuration-section order.
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Builder,
        ComponentKind::Command,
        ComponentKind::Hook,
        ComponentKind::Provisioner,
    ];

    /// Returns the lowercase name used in configuration and error messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Builder => "builder",
            Self::Command => "command",
            Self::Hook => "hook",
            Self::Provisioner => "provisioner",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
