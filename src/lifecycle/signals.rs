//! OS signal handling.
//!
//! SIGINT and SIGTERM both funnel into [`ShutdownCoordinator::shutdown`].
//! Each signal is handled on its own task so a second signal still reaches
//! the coordinator while the first drain is running.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::ShutdownCoordinator;

/// Termination signals the gateway responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Terminate,
}

impl Signal {
    pub fn name(&self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
        }
    }
}

/// Wait for the next termination signal.
pub async fn wait_for_signal() -> std::io::Result<Signal> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res.map(|_| Signal::Interrupt),
            _ = terminate.recv() => Ok(Signal::Terminate),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(Signal::Interrupt)
    }
}

/// Forward every termination signal to `coordinator` until the process exits.
pub fn spawn_signal_listener(coordinator: Arc<ShutdownCoordinator>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let signal = match wait_for_signal().await {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install signal handler");
                    return;
                }
            };

            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator.shutdown(signal.name()).await;
            });
        }
    })
}
