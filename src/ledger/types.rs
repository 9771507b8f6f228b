//! Ledger entry and error types.

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::BlockchainError;

/// A proverb as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Address that posted the proverb.
    pub author: Address,
    /// Block time of the post.
    pub timestamp: DateTime<Utc>,
    /// The proverb itself.
    pub message: String,
}

/// Errors raised by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The interface descriptor is unusable.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Call data could not be encoded.
    #[error("Encode error: {0}")]
    Encode(String),

    /// Return data did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The underlying provider call failed.
    #[error(transparent)]
    Chain(#[from] BlockchainError),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
