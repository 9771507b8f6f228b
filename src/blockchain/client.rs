//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint, signing locally when a wallet is loaded
//! - Query chain state (chain id, accounts, block number, receipts)
//! - Execute read-only calls and broadcast transactions
//! - Handle timeouts and network errors gracefully

use std::fmt::Display;
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainConfig, ChainId};
use crate::blockchain::wallet::Wallet;

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct RpcClient {
    provider: Arc<dyn Provider + Send + Sync>,
    config: ChainConfig,
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a new client for the configured endpoint.
    ///
    /// No request is made here; an unreachable node surfaces on first use.
    pub fn new(config: ChainConfig, wallet: Option<&Wallet>) -> BlockchainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::NotAvailable(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let provider: Arc<dyn Provider + Send + Sync> = match wallet {
            Some(wallet) => Arc::new(
                ProviderBuilder::new()
                    .wallet(wallet.network_wallet())
                    .connect_http(url),
            ),
            None => Arc::new(ProviderBuilder::new().connect_http(url)),
        };

        tracing::info!(
            rpc_url = %config.rpc_url,
            chain_id = config.chain_id,
            local_signer = wallet.is_some(),
            "Blockchain client initialized"
        );

        Ok(Self::from_provider(provider, config))
    }

    /// Wrap an already-built provider.
    pub fn from_provider(provider: Arc<dyn Provider + Send + Sync>, config: ChainConfig) -> Self {
        Self {
            provider,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            config,
        }
    }

    async fn bounded<T, E, F>(&self, op: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(op, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{} failed: {}", op, e)))
            }
            Err(_) => {
                tracing::warn!(op, "RPC timeout");
                Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.bounded("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Accounts the node manages on our behalf (`eth_accounts`).
    pub async fn get_accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.bounded("eth_accounts", self.provider.get_accounts()).await
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.bounded("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.bounded(
            "eth_getTransactionReceipt",
            self.provider.get_transaction_receipt(tx_hash),
        )
        .await
    }

    /// Execute a read-only call and return the raw return data.
    pub async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        self.bounded("eth_call", self.provider.call(tx).into_future())
            .await
    }

    /// Fill, sign (if a wallet is loaded) and broadcast a transaction.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let pending = self
            .bounded("eth_sendTransaction", self.provider.send_transaction(tx))
            .await?;
        Ok(*pending.tx_hash())
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
