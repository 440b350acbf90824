//! Component layer errors.
//!
//! # Error Code Convention
//!
//! All component errors use the `COMPONENT_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`NotSupported`](ComponentError::NotSupported) | `COMPONENT_NOT_SUPPORTED` | No |
//! | [`ExecutionFailed`](ComponentError::ExecutionFailed) | `COMPONENT_EXECUTION_FAILED` | Yes |
//! | [`InvalidPayload`](ComponentError::InvalidPayload) | `COMPONENT_INVALID_PAYLOAD` | No |
//! | [`Unavailable`](ComponentError::Unavailable) | `COMPONENT_UNAVAILABLE` | Yes |

use kiln_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error reported by a component operation.
///
/// Serializable so plugin subprocesses can report the same taxonomy over
/// the wire.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum ComponentError {
    /// The operation is not recognized by this component.
    #[error("operation not supported: {0}")]
    NotSupported(String),

    /// The operation was recognized but failed during execution.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The request payload does not match the expected shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The component's backing channel is gone (plugin exited or was
    /// terminated).
    #[error("component unavailable: {0}")]
    Unavailable(String),
}

impl ErrorCode for ComponentError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotSupported(_) => "COMPONENT_NOT_SUPPORTED",
            Self::ExecutionFailed(_) => "COMPONENT_EXECUTION_FAILED",
            Self::InvalidPayload(_) => "COMPONENT_INVALID_PAYLOAD",
            Self::Unavailable(_) => "COMPONENT_UNAVAILABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::ExecutionFailed(_) | Self::Unavailable(_))
    }
}
