//! Session error taxonomy.
//!
//! Every failure inside a session operation is converted to a
//! [`SessionError`] at the operation boundary. The kind decides how it is
//! presented: a blocking prompt, a sticky network banner, or a transient
//! notice.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::ledger::LedgerError;

/// Errors surfaced by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No wallet provider was injected.
    #[error("No Ethereum wallet found. Install or enable a wallet, then connect again.")]
    NoProvider,

    /// The wallet refused to authorize an account.
    #[error("Wallet authorization denied: {0}")]
    AuthorizationDenied(String),

    /// The wallet is on a chain other than the deployment's.
    #[error("Wrong network: switch your wallet to chain {expected} (currently {actual}) and reload")]
    WrongNetwork { expected: u64, actual: u64 },

    /// Local input check failed; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// A read or write against the provider or contract failed.
    #[error("{0}")]
    RemoteCall(String),

    /// The confirmation wait elapsed; the transaction may still land.
    #[error("Transaction {tx_hash} is still pending; its outcome is unknown")]
    ConfirmationPending { tx_hash: TxHash },

    /// Another session operation is in flight.
    #[error("Another operation is already in progress")]
    Busy,
}

/// Discriminant of a [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoProvider,
    AuthorizationDenied,
    WrongNetwork,
    Validation,
    RemoteCall,
    ConfirmationPending,
    Busy,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NoProvider => "no_provider",
            ErrorKind::AuthorizationDenied => "authorization_denied",
            ErrorKind::WrongNetwork => "wrong_network",
            ErrorKind::Validation => "validation",
            ErrorKind::RemoteCall => "remote_call",
            ErrorKind::ConfirmationPending => "confirmation_pending",
            ErrorKind::Busy => "busy",
        }
    }
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::NoProvider => ErrorKind::NoProvider,
            SessionError::AuthorizationDenied(_) => ErrorKind::AuthorizationDenied,
            SessionError::WrongNetwork { .. } => ErrorKind::WrongNetwork,
            SessionError::Validation(_) => ErrorKind::Validation,
            SessionError::RemoteCall(_) => ErrorKind::RemoteCall,
            SessionError::ConfirmationPending { .. } => ErrorKind::ConfirmationPending,
            SessionError::Busy => ErrorKind::Busy,
        }
    }

    /// Convert an account request failure. Explicit refusals are
    /// authorization errors; transport problems are remote call errors.
    pub(crate) fn from_authorization(err: BlockchainError) -> Self {
        match err {
            BlockchainError::Rejected(reason) => SessionError::AuthorizationDenied(reason),
            other => SessionError::RemoteCall(other.to_string()),
        }
    }
}

impl From<BlockchainError> for SessionError {
    fn from(err: BlockchainError) -> Self {
        SessionError::RemoteCall(err.to_string())
    }
}

impl From<LedgerError> for SessionError {
    fn from(err: LedgerError) -> Self {
        SessionError::RemoteCall(err.to_string())
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_maps_to_authorization_denied() {
        let err = SessionError::from_authorization(BlockchainError::Rejected("user said no".into()));
        assert_eq!(err.kind(), ErrorKind::AuthorizationDenied);
        assert!(err.to_string().contains("user said no"));

        let err = SessionError::from_authorization(BlockchainError::Timeout(10));
        assert_eq!(err.kind(), ErrorKind::RemoteCall);
    }

    #[test]
    fn test_ledger_errors_are_remote_calls() {
        let err: SessionError =
            LedgerError::Chain(BlockchainError::Rpc("eth_call failed: out of gas".into())).into();
        assert_eq!(
            err,
            SessionError::RemoteCall("RPC error: eth_call failed: out of gas".into())
        );
    }

    #[test]
    fn test_wrong_network_message() {
        let err = SessionError::WrongNetwork {
            expected: 4,
            actual: 1,
        };
        assert_eq!(err.kind().as_str(), "wrong_network");
        assert!(err.to_string().contains("chain 4 (currently 1)"));
    }
}
