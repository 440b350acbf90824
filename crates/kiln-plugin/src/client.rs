//! Plugin subprocess client.
//!
//! [`PluginClient`] owns one spawned plugin subprocess and its wire
//! channel. The channel pipes and the child handle live behind separate
//! locks so that [`terminate`](PluginClient::terminate) can kill the
//! subprocess while a call is still blocked on a response — the interrupt
//! path must never wait behind an in-flight operation.

use crate::error::PluginError;
use crate::proto::{Handshake, Request, Response, PROTOCOL_VERSION};
use kiln_types::ComponentKind;
use serde_json::Value;
use std::collections::BTreeMap;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Bound on the handshake read so a wedged plugin cannot stall component
/// resolution. Per-request reads are unbounded — commands may legitimately
/// run long.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

struct ChannelIo {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// A spawned plugin subprocess and its communication channel.
///
/// Created by [`spawn`](PluginClient::spawn) and owned by the
/// [`PluginManager`](crate::PluginManager) from registration until
/// termination. `kill_on_drop` is set on the child as a backstop for
/// abnormal teardown paths; the normal path is an explicit
/// [`terminate`](PluginClient::terminate) from the manager.
pub struct PluginClient {
    name: String,
    kind: ComponentKind,
    pid: Option<u32>,
    io: Mutex<Option<ChannelIo>>,
    child: Mutex<Option<Child>>,
}

impl PluginClient {
    /// Spawns the plugin executable and completes the handshake.
    ///
    /// The child runs with piped stdin/stdout and inherited stderr. The
    /// plugin must write its handshake line within [`HANDSHAKE_TIMEOUT`];
    /// a missing, malformed, version-mismatched, or kind-mismatched
    /// handshake is an error, and the misbehaving subprocess is killed
    /// before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::SpawnFailed`] if the executable cannot be
    /// started, and a handshake-class error otherwise.
    pub async fn spawn(
        name: &str,
        kind: ComponentKind,
        command: &str,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> Result<Self, PluginError> {
        info!(plugin = name, %kind, command, "spawning plugin process");

        let mut child = Command::new(command)
            .args(args)
            .envs(env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PluginError::SpawnFailed {
                name: name.to_string(),
                source: e,
            })?;

        // Pipes are always present with Stdio::piped.
        let stdin = child.stdin.take().ok_or_else(|| PluginError::SpawnFailed {
            name: name.to_string(),
            source: std::io::Error::other("child stdin not captured"),
        })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PluginError::SpawnFailed {
                name: name.to_string(),
                source: std::io::Error::other("child stdout not captured"),
            })?;
        let mut stdout = BufReader::new(stdout);

        match Self::read_handshake(name, kind, &mut stdout).await {
            Ok(()) => {}
            Err(e) => {
                // Do not leave a misbehaving subprocess behind.
                if let Err(kill_err) = child.kill().await {
                    warn!(plugin = name, error = %kill_err, "failed to kill plugin after handshake failure");
                }
                let _ = child.wait().await;
                return Err(e);
            }
        }

        debug!(plugin = name, %kind, "plugin handshake complete");

        Ok(Self {
            name: name.to_string(),
            kind,
            pid: child.id(),
            io: Mutex::new(Some(ChannelIo { stdin, stdout })),
            child: Mutex::new(Some(child)),
        })
    }

    async fn read_handshake(
        name: &str,
        expected_kind: ComponentKind,
        stdout: &mut BufReader<ChildStdout>,
    ) -> Result<(), PluginError> {
        let mut line = String::new();
        let read = tokio::time::timeout(HANDSHAKE_TIMEOUT, stdout.read_line(&mut line))
            .await
            .map_err(|_| PluginError::HandshakeFailed {
                name: name.to_string(),
                message: format!("no handshake within {}s", HANDSHAKE_TIMEOUT.as_secs()),
            })?
            .map_err(|e| PluginError::HandshakeFailed {
                name: name.to_string(),
                message: format!("read failed: {e}"),
            })?;

        if read == 0 {
            return Err(PluginError::HandshakeFailed {
                name: name.to_string(),
                message: "plugin exited before handshake".into(),
            });
        }

        let handshake: Handshake =
            serde_json::from_str(line.trim()).map_err(|e| PluginError::HandshakeFailed {
                name: name.to_string(),
                message: format!("malformed handshake: {e}"),
            })?;

        if handshake.protocol != PROTOCOL_VERSION {
            return Err(PluginError::ProtocolMismatch {
                name: name.to_string(),
                expected: PROTOCOL_VERSION,
                actual: handshake.protocol,
            });
        }
        if handshake.kind != expected_kind {
            return Err(PluginError::KindMismatch {
                name: name.to_string(),
                expected: expected_kind,
                actual: handshake.kind,
            });
        }

        Ok(())
    }

    /// Sends one request and reads one response.
    ///
    /// Calls are serialized per client — the channel carries one request
    /// and one response line at a time.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::ChannelClosed`] once the client has been
    /// terminated or the plugin has exited, and
    /// [`PluginError::Remote`] when the plugin reports a failure.
    pub async fn call(&self, op: &str, payload: Value) -> Result<Value, PluginError> {
        let mut guard = self.io.lock().await;
        let io = guard.as_mut().ok_or_else(|| PluginError::ChannelClosed {
            name: self.name.clone(),
        })?;

        let request = Request::new(op, payload);
        let mut line = serde_json::to_string(&request).map_err(|e| PluginError::ChannelFailed {
            name: self.name.clone(),
            source: std::io::Error::other(e),
        })?;
        line.push('\n');

        io.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| self.channel_error(e))?;
        io.stdin.flush().await.map_err(|e| self.channel_error(e))?;

        let mut response_line = String::new();
        let read = io
            .stdout
            .read_line(&mut response_line)
            .await
            .map_err(|e| self.channel_error(e))?;
        if read == 0 {
            return Err(PluginError::ChannelClosed {
                name: self.name.clone(),
            });
        }

        let response: Response =
            serde_json::from_str(response_line.trim()).map_err(|e| PluginError::ChannelFailed {
                name: self.name.clone(),
                source: std::io::Error::other(format!("malformed response: {e}")),
            })?;

        if response.ok {
            Ok(response.value)
        } else {
            Err(PluginError::Remote {
                name: self.name.clone(),
                message: response.error.unwrap_or_else(|| "unspecified".into()),
            })
        }
    }

    /// Kills the plugin subprocess and reaps it.
    ///
    /// Idempotent: terminating an already-terminated client is a no-op
    /// returning `Ok`. Does not wait for in-flight calls — they fail with
    /// [`PluginError::ChannelClosed`] once the pipes break.
    pub async fn terminate(&self) -> Result<(), PluginError> {
        let mut guard = self.child.lock().await;
        let Some(mut child) = guard.take() else {
            return Ok(());
        };

        debug!(plugin = %self.name, pid = ?self.pid, "terminating plugin process");

        child.kill().await.map_err(|e| PluginError::TerminateFailed {
            name: self.name.clone(),
            source: e,
        })?;
        let _ = child.wait().await;

        Ok(())
    }

    /// Returns `true` once the subprocess has been terminated.
    pub async fn is_terminated(&self) -> bool {
        self.child.lock().await.is_none()
    }

    /// Component name this client was resolved for.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Component kind the plugin implements.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// OS process id of the subprocess, if it was still running at spawn.
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn channel_error(&self, source: std::io::Error) -> PluginError {
        if source.kind() == std::io::ErrorKind::BrokenPipe {
            PluginError::ChannelClosed {
                name: self.name.clone(),
            }
        } else {
            PluginError::ChannelFailed {
                name: self.name.clone(),
                source,
            }
        }
    }
}

impl std::fmt::Debug for PluginClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginClient")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}
