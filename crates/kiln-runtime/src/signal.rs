//! Interrupt-safe shutdown.
//!
//! One background task waits for SIGINT/SIGTERM. On the first signal it
//! runs plugin cleanup and exits 1; a second signal during cleanup exits
//! 130 immediately, so an operator can always get out of a wedged
//! shutdown. The plugin client kills subprocesses on drop as a last
//! resort, but the coordinator is what makes `^C` orderly.

use kiln_plugin::PluginManager;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Exit code for an interrupted run that cleaned up.
pub const EXIT_INTERRUPTED: i32 = 1;

/// Exit code when a second signal aborts cleanup (128 + SIGINT).
pub const EXIT_FORCED: i32 = 130;

/// Resolves when the process receives an interrupt.
///
/// On unix this is SIGINT or SIGTERM, whichever comes first; elsewhere
/// only ctrl-c. SIGQUIT is left at its default disposition so a core
/// dump remains available.
pub async fn wait_for_interrupt() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        // An installation failure must not kill the detached watcher
        // task; wait on whatever handler did install.
        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {}
                    _ = sigterm.recv() => {}
                }
            }
            (Ok(mut sigint), Err(e)) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                let _ = sigint.recv().await;
            }
            (Err(e), Ok(mut sigterm)) => {
                warn!(error = %e, "failed to install SIGINT handler");
                let _ = sigterm.recv().await;
            }
            (Err(int_err), Err(term_err)) => {
                warn!(
                    sigint_error = %int_err,
                    sigterm_error = %term_err,
                    "failed to install signal handlers, falling back to ctrl_c"
                );
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Background watcher that turns interrupts into orderly shutdown.
pub struct SignalCoordinator;

impl SignalCoordinator {
    /// Spawns the watcher task.
    ///
    /// First signal: log, terminate all registered plugins, exit
    /// [`EXIT_INTERRUPTED`]. Second signal while cleanup runs: exit
    /// [`EXIT_FORCED`] without waiting. Cleanup here races the normal
    /// exit path; [`PluginManager::cleanup_all`] is idempotent, so
    /// whichever side runs first wins and the other is a no-op.
    pub fn install(manager: Arc<PluginManager>) -> JoinHandle<()> {
        tokio::spawn(async move {
            wait_for_interrupt().await;
            warn!("interrupt received, terminating plugins");

            tokio::spawn(async {
                wait_for_interrupt().await;
                warn!("second interrupt, exiting without cleanup");
                std::process::exit(EXIT_FORCED);
            });

            let terminated = manager.cleanup_all().await;
            info!(terminated, "interrupt cleanup finished");
            std::process::exit(EXIT_INTERRUPTED);
        })
    }
}
