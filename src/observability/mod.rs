//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Session, provider and ledger produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (operation and error counters)
//! ```
//!
//! # Design Decisions
//! - Structured logging to stderr so command output stays clean on stdout
//! - Metrics go through the `metrics` facade; no recorder is installed by
//!   default, so counters cost nothing unless an embedder installs one

pub mod logging;
pub mod metrics;
