//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the board.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a proverb board deployment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Chain and RPC settings.
    pub chain: ChainConfig,

    /// Contract holding the proverbs.
    pub ledger: LedgerConfig,

    /// Session behaviour (input limit, banner timing).
    pub session: SessionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// The single chain this deployment accepts (e.g., 4 for Rinkeby, 31337 for Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required before a submission counts as mined.
    pub confirmation_blocks: u32,

    /// Maximum time to wait for a submission to confirm.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Block explorer base URL used for address links.
    pub explorer_url: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 2000,
            explorer_url: "https://etherscan.io".to_string(),
        }
    }
}

/// Order in which fetched entries are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrder {
    /// Most recent entry first.
    #[default]
    NewestFirst,
    /// Contract order, oldest first.
    Chronological,
}

/// Ledger contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Address of the deployed proverb contract.
    pub contract_address: String,

    /// Path to the contract ABI (Hardhat artifact or bare ABI array).
    /// The bundled ABI is used when unset.
    pub abi_path: Option<String>,

    /// View function returning every entry.
    pub read_function: String,

    /// Function appending a new entry.
    pub write_function: String,

    /// Gas limit attached to append transactions.
    pub gas_limit: u64,

    /// Presentation order of entries.
    pub order: EntryOrder,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            contract_address: String::new(),
            abi_path: None,
            read_function: "getAllProverbs".to_string(),
            write_function: "proverb".to_string(),
            gas_limit: 300_000,
            order: EntryOrder::NewestFirst,
        }
    }
}

/// Session behaviour configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of characters in a message.
    pub message_limit: usize,

    /// How long a transient error banner stays visible, in milliseconds.
    pub error_display_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            message_limit: 220,
            error_display_ms: 3000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
