//! Plugin subprocess integration for kiln.
//!
//! Components configured with an executable path run out of process. This
//! crate owns everything about that split: spawning the subprocess,
//! completing the handshake, routing calls over the wire channel, and the
//! process-wide lifecycle registry that guarantees no plugin subprocess
//! outlives the host.
//!
//! # Architecture
//!
//! ```text
//! config.toml [builders.qemu]
//!   → LaunchSpec (command, args, env)
//!   → PluginClient::spawn (piped stdio child, handshake)
//!   → PluginManager::register (lifecycle tracking)
//!   → PluginBuilder / PluginCommand / ... (trait adapters)
//!   → PluginManager::cleanup_all (idempotent terminate-all)
//! ```
//!
//! # Wire Channel
//!
//! Newline-delimited JSON over the child's stdin/stdout; stderr is
//! inherited so plugin diagnostics reach the operator. This is an internal
//! contract between kiln and its plugins, not a stable public RPC. See
//! [`proto`] for the message shapes.

mod client;
mod components;
mod error;
mod manager;
pub mod proto;
#[cfg(unix)]
pub mod testing;

pub use client::PluginClient;
pub use components::{PluginBuilder, PluginCommand, PluginHook, PluginProvisioner};
pub use error::PluginError;
pub use manager::PluginManager;
