//! Wire message shapes for the plugin channel.
//!
//! One JSON document per line. On spawn the plugin writes a single
//! [`Handshake`] line; after that the host writes one [`Request`] line per
//! operation and reads one [`Response`] line back.
//!
//! ```text
//! plugin → host   {"protocol": 1, "kind": "builder"}
//! host   → plugin {"op": "build", "payload": {"iso": "debian.iso"}}
//! plugin → host   {"ok": true, "value": {"artifact": "out.qcow2"}}
//! ```

use kiln_types::ComponentKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version the host speaks. A plugin announcing any other version
/// is rejected during the handshake.
pub const PROTOCOL_VERSION: u32 = 1;

/// First line a plugin must write after spawn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Handshake {
    /// Wire protocol version, must equal [`PROTOCOL_VERSION`].
    pub protocol: u32,
    /// Component kind the plugin implements.
    pub kind: ComponentKind,
}

/// One operation request from host to plugin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    /// Operation name (`"run"`, `"build"`, `"fire"`, `"provision"`).
    pub op: String,
    /// Operation payload; shape is per-operation.
    #[serde(default)]
    pub payload: Value,
}

impl Request {
    /// Creates a request for `op` with the given payload.
    pub fn new(op: impl Into<String>, payload: Value) -> Self {
        Self {
            op: op.into(),
            payload,
        }
    }
}

/// One operation response from plugin to host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Result value on success.
    #[serde(default)]
    pub value: Value,
    /// Error message on failure.
    #[serde(default)]
    pub error: Option<String>,
}
