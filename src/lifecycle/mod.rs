//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Storage init → Load routes → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal or fault → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then storage, then listener
//! - A fault-triggered shutdown exits non-zero so a supervisor restarts us

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
