//! Published session state.

use alloy::primitives::{Address, TxHash};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::ledger::Entry;
use crate::session::error::{ErrorKind, SessionError};

/// Result of the last network check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkStatus {
    /// No check has completed yet.
    #[default]
    Unchecked,
    /// The wallet is on the deployment's chain.
    Ok,
    /// The wallet is elsewhere. Writes stay disabled for the session.
    Wrong,
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Disconnected,
    Connecting,
    Connected(NetworkStatus),
    Submitting,
}

/// A structured, user-facing error record.
///
/// Identity is the `id`; two notices with the same text are still distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: Uuid,
    pub kind: ErrorKind,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
    pub visible: bool,
}

impl Notice {
    pub fn new(error: &SessionError) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: error.kind(),
            message: error.to_string(),
            occurred_at: Utc::now(),
            visible: true,
        }
    }
}

/// Snapshot of everything the presentation layer reads.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// First authorized address. Never cleared once set.
    pub account: Option<Address>,
    /// Entries in presentation order.
    pub entries: Vec<Entry>,
    /// True only while a submission is in flight.
    pub loading: bool,
    /// Owner side of the bounded input.
    pub draft: String,
    /// Transient error banner.
    pub notice: Option<Notice>,
    /// Sticky wrong-network banner.
    pub network_error: Option<Notice>,
    /// Blocking prompt (no wallet).
    pub prompt: Option<String>,
    /// Submission whose confirmation wait elapsed.
    pub pending_tx: Option<TxHash>,
}

impl SessionState {
    /// The transient notice, if it has not been dismissed yet.
    pub fn visible_notice(&self) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| n.visible)
    }

    /// Whether the submit action should be enabled.
    pub fn can_submit(&self) -> bool {
        self.account.is_some()
            && self.phase == SessionPhase::Connected(NetworkStatus::Ok)
            && self.network_error.is_none()
            && !self.loading
    }

    /// Whether the draft input refuses edits.
    pub fn input_disabled(&self) -> bool {
        self.loading || self.network_error.is_some()
    }

    pub fn network(&self) -> NetworkStatus {
        match self.phase {
            SessionPhase::Connected(status) => status,
            _ if self.network_error.is_some() => NetworkStatus::Wrong,
            _ => NetworkStatus::Unchecked,
        }
    }
}
