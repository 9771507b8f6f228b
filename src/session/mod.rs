//! Wallet session subsystem.
//!
//! # Data Flow
//! ```text
//! user action (connect / edit / submit)
//!     → controller.rs (sequencing, one operation at a time via guard.rs)
//!     → WalletProvider + Ledger (remote calls)
//!     → state.rs (SessionState published on a watch channel)
//!     → notice.rs (timed dismissal of transient errors)
//!     → ui::render (reads snapshots)
//! ```
//!
//! # Design Decisions
//! - Collaborators are injected at construction, never looked up globally
//! - Errors are structured values; display text is derived, not identity
//! - A newer transient error restarts the dismissal window
//! - Confirmation waits are bounded; an elapsed wait is its own outcome

pub mod controller;
pub mod error;
mod guard;
mod notice;
pub mod state;

pub use controller::SessionController;
pub use error::{ErrorKind, SessionError, SessionResult};
pub use state::{NetworkStatus, Notice, SessionPhase, SessionState};
