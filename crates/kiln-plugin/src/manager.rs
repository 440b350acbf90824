//! Plugin lifecycle manager.
//!
//! Process-wide registry of every spawned [`PluginClient`]. Exactly two
//! operations: [`register`](PluginManager::register) and the idempotent
//! [`cleanup_all`](PluginManager::cleanup_all). The core correctness
//! property of this module is the cleanup guarantee: after `cleanup_all`
//! returns, no registered client's subprocess remains running.
//!
//! # Concurrency
//!
//! The registry is reached from two contexts — the primary execution path
//! and the signal coordinator — so all state lives behind one async mutex.
//! The `cleaned` flag is a one-shot latch tested and set under the lock,
//! and the termination loop runs under the same lock: a concurrent second
//! caller blocks until the loop finishes and then observes the latch, so
//! every caller returns only after all subprocesses are down.

use crate::client::PluginClient;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

struct ManagerState {
    clients: Vec<Arc<PluginClient>>,
    cleaned: bool,
}

/// Tracks every spawned plugin client and terminates them exactly once.
///
/// Shared as `Arc<PluginManager>` between the component registry (which
/// registers) and the shutdown paths (which clean up).
pub struct PluginManager {
    state: Mutex<ManagerState>,
}

impl PluginManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ManagerState {
                clients: Vec::new(),
                cleaned: false,
            }),
        }
    }

    /// Registers a client for lifecycle tracking.
    ///
    /// A client registered after [`cleanup_all`](Self::cleanup_all) has
    /// already run is terminated immediately rather than leaked — the
    /// cleanup guarantee covers it either way.
    pub async fn register(&self, client: Arc<PluginClient>) {
        let mut state = self.state.lock().await;

        if state.cleaned {
            warn!(
                plugin = %client.name(),
                "client registered after cleanup, terminating immediately"
            );
            if let Err(e) = client.terminate().await {
                warn!(plugin = %client.name(), error = %e, "failed to terminate late-registered plugin");
            }
            return;
        }

        debug!(plugin = %client.name(), kind = %client.kind(), "registered plugin client");
        state.clients.push(client);
    }

    /// Terminates every registered plugin subprocess.
    ///
    /// - **Idempotent**: only the first call runs the termination loop;
    ///   later calls return `0` without error.
    /// - **Concurrency-safe**: concurrent callers serialize on the
    ///   registry lock and all return only after the subprocesses are
    ///   down.
    /// - **Best-effort per client**: a single client's termination failure
    ///   is logged and does not stop the loop.
    ///
    /// Returns the number of clients terminated by this call.
    pub async fn cleanup_all(&self) -> usize {
        let mut state = self.state.lock().await;

        if state.cleaned {
            return 0;
        }
        state.cleaned = true;

        if state.clients.is_empty() {
            debug!("plugin cleanup: no clients registered");
            return 0;
        }

        info!(count = state.clients.len(), "terminating plugin processes");

        let mut terminated = 0;
        for client in &state.clients {
            match client.terminate().await {
                Ok(()) => {
                    debug!(plugin = %client.name(), "plugin process terminated");
                    terminated += 1;
                }
                Err(e) => {
                    // Never fatal: log and keep terminating the rest.
                    warn!(plugin = %client.name(), error = %e, "failed to terminate plugin process");
                }
            }
        }

        terminated
    }

    /// Number of clients currently tracked.
    pub async fn client_count(&self) -> usize {
        self.state.lock().await.clients.len()
    }

    /// Whether cleanup has already run.
    pub async fn is_cleaned(&self) -> bool {
        self.state.lock().await.cleaned
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_manager_is_empty() {
        let manager = PluginManager::new();
        assert_eq!(manager.client_count().await, 0);
        assert!(!manager.is_cleaned().await);
    }

    #[tokio::test]
    async fn cleanup_without_clients_is_ok() {
        let manager = PluginManager::new();
        assert_eq!(manager.cleanup_all().await, 0);
        assert!(manager.is_cleaned().await);
        // Second call is a no-op.
        assert_eq!(manager.cleanup_all().await, 0);
    }

    #[cfg(unix)]
    mod with_processes {
        use super::*;
        use crate::testing::{script_plugin, ECHO_COMMAND_PLUGIN};
        use kiln_types::ComponentKind;
        use std::collections::BTreeMap;

        async fn spawn_echo(name: &str) -> Arc<PluginClient> {
            let (script, dir) = script_plugin(ECHO_COMMAND_PLUGIN);
            let client = PluginClient::spawn(
                name,
                ComponentKind::Command,
                script.to_str().expect("valid utf8 path"),
                &[],
                &BTreeMap::new(),
            )
            .await
            .expect("should spawn echo plugin");
            // The script file may be unlinked once the process is running.
            drop(dir);
            Arc::new(client)
        }

        #[tokio::test]
        async fn cleanup_is_idempotent() {
            let manager = PluginManager::new();
            for i in 0..3 {
                manager.register(spawn_echo(&format!("echo-{i}")).await).await;
            }
            assert_eq!(manager.client_count().await, 3);

            // Exactly 3 termination attempts in total, not 6.
            assert_eq!(manager.cleanup_all().await, 3);
            assert_eq!(manager.cleanup_all().await, 0);
        }

        #[tokio::test]
        async fn cleanup_terminates_every_subprocess() {
            let manager = PluginManager::new();
            let a = spawn_echo("a").await;
            let b = spawn_echo("b").await;
            manager.register(a.clone()).await;
            manager.register(b.clone()).await;

            manager.cleanup_all().await;

            assert!(a.is_terminated().await);
            assert!(b.is_terminated().await);
        }

        #[tokio::test]
        async fn concurrent_cleanup_terminates_once() {
            let manager = Arc::new(PluginManager::new());
            manager.register(spawn_echo("solo").await).await;

            let m1 = manager.clone();
            let m2 = manager.clone();
            let (t1, t2) = tokio::join!(
                tokio::spawn(async move { m1.cleanup_all().await }),
                tokio::spawn(async move { m2.cleanup_all().await }),
            );
            let total = t1.expect("task should not panic") + t2.expect("task should not panic");

            // One of the callers ran the loop; both returned after the
            // subprocess was down.
            assert_eq!(total, 1);
        }

        #[tokio::test]
        async fn register_after_cleanup_terminates_immediately() {
            let manager = PluginManager::new();
            manager.cleanup_all().await;

            let late = spawn_echo("late").await;
            manager.register(late.clone()).await;

            assert!(late.is_terminated().await, "late client must not be leaked");
            assert_eq!(manager.client_count().await, 0);
        }
    }
}
