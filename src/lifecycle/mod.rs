//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Metrics exporter → Log store → OCR engine → Router → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Running → Draining (log store close, bounded) → Closed (listener stops)
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → ShutdownCoordinator::shutdown (repeat triggers are no-ops)
//! ```
//!
//! # Design Decisions
//! - One coordinator owns the lifecycle state; signals never touch the server
//! - Drain failures are logged, never fatal
//! - Shutdown has a timeout: the drain is abandoned after `drain_timeout_secs`

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{LifecycleState, ShutdownCoordinator, ShutdownOutcome};
pub use signals::{spawn_signal_listener, wait_for_signal, Signal};
pub use startup::{build_persistence, initialize_persistence, run, StartupError};
