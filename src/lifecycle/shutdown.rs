//! Shutdown coordination for the gateway.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::storage::Persistence;

/// Process lifecycle. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    Draining,
    Closed,
}

/// Result of a shutdown trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// This trigger ran the drain and closed the server.
    Completed,
    /// Another trigger got there first; nothing was done.
    AlreadyInProgress,
}

/// Coordinator for graceful shutdown.
///
/// Owns the lifecycle state. [`ShutdownCoordinator::shutdown`] is the only
/// mutator, and every signal goes through it. Waiters subscribe through
/// [`ShutdownCoordinator::closed`].
pub struct ShutdownCoordinator {
    state: watch::Sender<LifecycleState>,
    persistence: Arc<dyn Persistence>,
    drain_timeout: Duration,
}

impl ShutdownCoordinator {
    /// Create a coordinator in the `Running` state.
    pub fn new(persistence: Arc<dyn Persistence>, drain_timeout: Duration) -> Self {
        let (state, _) = watch::channel(LifecycleState::Running);
        Self {
            state,
            persistence,
            drain_timeout,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Drain the log store, then release the server.
    ///
    /// Drain failures and timeouts are logged and do not stop the transition
    /// to `Closed`. A trigger that arrives after the first one returns
    /// `AlreadyInProgress` without touching anything.
    pub async fn shutdown(&self, trigger: &str) -> ShutdownOutcome {
        let started = self.state.send_if_modified(|state| {
            if *state == LifecycleState::Running {
                *state = LifecycleState::Draining;
                true
            } else {
                false
            }
        });

        if !started {
            tracing::info!(
                trigger,
                state = ?self.state(),
                "Shutdown already in progress, ignoring signal"
            );
            return ShutdownOutcome::AlreadyInProgress;
        }

        tracing::info!(trigger, "{} received, shutting down gracefully", trigger);

        match tokio::time::timeout(self.drain_timeout, self.persistence.close()).await {
            Ok(Ok(())) => tracing::info!("Database connections closed"),
            Ok(Err(e)) => tracing::error!(error = %e, "Error closing database connections"),
            Err(_) => tracing::warn!(
                timeout_secs = self.drain_timeout.as_secs_f64(),
                "Database drain timed out"
            ),
        }

        self.state.send_replace(LifecycleState::Closed);
        tracing::info!("Lifecycle closed, stopping listener");

        ShutdownOutcome::Completed
    }

    /// Resolve once the coordinator reaches `Closed`.
    pub async fn closed(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this only ends at `Closed`.
        let _ = rx.wait_for(|state| *state == LifecycleState::Closed).await;
    }
}
