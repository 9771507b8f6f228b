//! Proverb storage on a deployed contract.
//!
//! # Data Flow
//! ```text
//! LedgerConfig (address, ABI path, function names)
//!     → abi.rs (JSON ABI → call data, return data → Entry)
//!     → contract.rs (Ledger over a WalletProvider)
//! ```

pub mod abi;
pub mod contract;
pub mod types;

pub use abi::LedgerAbi;
pub use contract::{ContractLedger, Ledger};
pub use types::{Entry, LedgerError, LedgerResult};
