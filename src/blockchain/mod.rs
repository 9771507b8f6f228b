//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key), ChainConfig (RPC URL)
//!     → wallet.rs (key loading)
//!     → client.rs (RPC connection with timeouts)
//!     → transaction.rs (build calls, confirm)
//!     → provider.rs (WalletProvider seam used by the session)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod provider;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::RpcClient;
pub use provider::{RpcWalletProvider, WalletProvider};
pub use types::{BlockchainError, BlockchainResult, ChainId, ConfirmationStatus};
pub use wallet::Wallet;
