//! Plugin channel error types.

use kiln_types::{ComponentKind, ErrorCode};
use thiserror::Error;

/// Errors from plugin subprocess operations.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Failed to spawn the plugin executable.
    #[error("failed to spawn plugin '{name}': {source}")]
    SpawnFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The plugin did not complete the handshake (missing, late, or
    /// malformed handshake line).
    #[error("plugin '{name}' handshake failed: {message}")]
    HandshakeFailed { name: String, message: String },

    /// The plugin speaks a different protocol version.
    #[error("plugin '{name}' speaks protocol {actual}, host requires {expected}")]
    ProtocolMismatch {
        name: String,
        expected: u32,
        actual: u32,
    },

    /// The plugin announced a different component kind than configured.
    #[error("plugin '{name}' announced kind '{actual}', expected '{expected}'")]
    KindMismatch {
        name: String,
        expected: ComponentKind,
        actual: ComponentKind,
    },

    /// The channel to the plugin is closed (terminated or exited).
    #[error("plugin '{name}' channel closed")]
    ChannelClosed { name: String },

    /// Reading or writing the channel failed.
    #[error("plugin '{name}' channel error: {source}")]
    ChannelFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The plugin reported an operation failure.
    #[error("plugin '{name}' returned error: {message}")]
    Remote { name: String, message: String },

    /// Killing the plugin subprocess failed.
    #[error("failed to terminate plugin '{name}': {source}")]
    TerminateFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl ErrorCode for PluginError {
    fn code(&self) -> &'static str {
        match self {
            Self::SpawnFailed { .. } => "PLUGIN_SPAWN_FAILED",
            Self::HandshakeFailed { .. } => "PLUGIN_HANDSHAKE_FAILED",
            Self::ProtocolMismatch { .. } => "PLUGIN_PROTOCOL_MISMATCH",
            Self::KindMismatch { .. } => "PLUGIN_KIND_MISMATCH",
            Self::ChannelClosed { .. } => "PLUGIN_CHANNEL_CLOSED",
            Self::ChannelFailed { .. } => "PLUGIN_CHANNEL_FAILED",
            Self::Remote { .. } => "PLUGIN_REMOTE_ERROR",
            Self::TerminateFailed { .. } => "PLUGIN_TERMINATE_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Transient or environment-dependent.
            Self::SpawnFailed { .. } | Self::ChannelFailed { .. } | Self::Remote { .. } => true,
            // A misbehaving plugin binary will not fix itself on retry.
            Self::HandshakeFailed { .. }
            | Self::ProtocolMismatch { .. }
            | Self::KindMismatch { .. }
            | Self::ChannelClosed { .. }
            | Self::TerminateFailed { .. } => false,
        }
    }
}
