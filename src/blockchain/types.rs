//! Chain-specific types and error definitions.

use std::fmt;

use thiserror::Error;

pub use crate::config::schema::ChainConfig;

/// EIP-155 chain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failures talking to the node or the signer.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The account holder refused, or no account is available to authorize.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// No provider could be built for the configured endpoint.
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Outcome of waiting for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Still unconfirmed when the wait ended; the outcome is unknown.
    Pending,
    /// Mined with the configured number of confirmations.
    Confirmed { block_number: u64 },
    /// Mined, but execution reverted.
    Failed(String),
}
