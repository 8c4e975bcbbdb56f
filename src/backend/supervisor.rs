//! Backend Supervisor
//!
//! Owns the single backend process handle for the application run. The
//! window never waits on the backend: launch failures degrade to log
//! entries and the poller reports disconnection until the backend appears.

use std::process::Child;

use tokio::sync::Mutex;

use super::config::LaunchConfig;
use super::process::{forward_output, spawn_backend};

/// Lifecycle of the supervised backend.
///
/// `Stopped` is terminal: there is no respawn path. A failed launch lands
/// there too, so teardown stays a no-op.
#[derive(Debug)]
enum Phase {
    NotStarted,
    Running(Child),
    Stopped,
}

/// Supervises the backend child process.
///
/// At most one live handle exists per application run; termination is
/// attempted at most once and never raises, even if the process already
/// exited on its own.
pub struct BackendSupervisor {
    phase: Mutex<Phase>,
}

impl BackendSupervisor {
    pub fn new() -> Self {
        Self {
            phase: Mutex::new(Phase::NotStarted),
        }
    }

    /// Launch the backend. Only the first call spawns; later calls are
    /// ignored so at most one live handle exists.
    ///
    /// A spawn failure (missing executable, bad working directory) is
    /// logged and swallowed — the window must still open.
    pub async fn start(&self, config: LaunchConfig) {
        let mut phase = self.phase.lock().await;
        if !matches!(*phase, Phase::NotStarted) {
            log::warn!("[Backend] start() called more than once, ignoring");
            return;
        }

        match spawn_backend(&config) {
            Ok(mut child) => {
                forward_output(&mut child);
                log::info!("[Backend] Started (PID: {})", child.id());
                *phase = Phase::Running(child);
            }
            Err(e) => {
                log::error!("[Backend] Failed to start: {}", e);
                *phase = Phase::Stopped;
            }
        }
    }

    /// Whether the supervisor currently holds a live handle.
    pub async fn is_running(&self) -> bool {
        matches!(*self.phase.lock().await, Phase::Running(_))
    }

    /// Terminate the backend if a live handle exists.
    ///
    /// Idempotent. Kill errors from an already-exited process are swallowed;
    /// the termination attempt happens on the first call only.
    pub async fn stop(&self) {
        let mut phase = self.phase.lock().await;
        match std::mem::replace(&mut *phase, Phase::Stopped) {
            Phase::Running(mut child) => {
                log::info!("[Backend] Stopping (PID: {})", child.id());
                if let Err(e) = child.kill() {
                    log::warn!("[Backend] Kill failed (already exited?): {}", e);
                }
                // Reap so the child doesn't linger as a zombie
                let _ = child.wait();
                log::info!("[Backend] Stopped");
            }
            Phase::NotStarted => log::info!("[Backend] Never started, nothing to stop"),
            Phase::Stopped => log::info!("[Backend] Already stopped"),
        }
    }
}

impl Default for BackendSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackendSupervisor {
    fn drop(&mut self) {
        // Last-resort cleanup if teardown never ran
        if let Ok(mut phase) = self.phase.try_lock() {
            if let Phase::Running(ref mut child) = *phase {
                let _ = child.kill();
                let _ = child.wait();
                *phase = Phase::Stopped;
            }
        }
    }
}
