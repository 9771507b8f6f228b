//! The wallet provider seam.
//!
//! The session never talks to a node directly. Everything it needs from a
//! wallet (accounts, current chain, sending and confirming transactions) goes
//! through [`WalletProvider`], injected at construction.

use std::future::Future;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash};

use crate::blockchain::client::RpcClient;
use crate::blockchain::transaction::{build_call, wait_for_confirmation};
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainConfig, ChainId, ConfirmationStatus};
use crate::blockchain::wallet::Wallet;

/// Capabilities a wallet must expose to the session.
pub trait WalletProvider: Send + Sync {
    /// Accounts already authorized for this client. Never prompts.
    fn list_authorized_accounts(&self) -> impl Future<Output = BlockchainResult<Vec<Address>>> + Send;

    /// Ask for account authorization. May prompt and may be refused.
    fn request_accounts(&self) -> impl Future<Output = BlockchainResult<Vec<Address>>> + Send;

    /// The chain the wallet is currently pointed at.
    fn current_chain(&self) -> impl Future<Output = BlockchainResult<ChainId>> + Send;

    /// Read-only contract call.
    fn call(
        &self,
        contract: Address,
        calldata: Bytes,
    ) -> impl Future<Output = BlockchainResult<Bytes>> + Send;

    /// Sign and broadcast a contract call, returning its hash.
    fn sign_and_send(
        &self,
        contract: Address,
        calldata: Bytes,
        gas_limit: u64,
    ) -> impl Future<Output = BlockchainResult<TxHash>> + Send;

    /// Wait up to `max_wait` for the transaction to confirm.
    fn await_confirmation(
        &self,
        tx_hash: TxHash,
        max_wait: Duration,
    ) -> impl Future<Output = BlockchainResult<ConfirmationStatus>> + Send;
}

/// Wallet provider backed by a JSON-RPC node.
///
/// With a local key loaded the key's address is the only authorized account
/// and transactions are signed in-process. Without one, the node's own
/// unlocked accounts (`eth_accounts`) are used, as with Anvil or Hardhat.
#[derive(Debug, Clone)]
pub struct RpcWalletProvider {
    client: RpcClient,
    wallet: Option<Wallet>,
}

impl RpcWalletProvider {
    /// Create a provider for the configured endpoint.
    pub fn new(config: ChainConfig, wallet: Option<Wallet>) -> BlockchainResult<Self> {
        let client = RpcClient::new(config, wallet.as_ref())?;
        Ok(Self { client, wallet })
    }

    /// Build a provider using the key from `PROVERBS_PRIVATE_KEY`, if any.
    pub fn from_env(config: ChainConfig) -> BlockchainResult<Self> {
        Self::new(config, Wallet::from_env()?)
    }

    async fn sender(&self) -> BlockchainResult<Address> {
        self.request_accounts()
            .await?
            .first()
            .copied()
            .ok_or_else(|| BlockchainError::Rejected("no account available to sign".to_string()))
    }
}

impl WalletProvider for RpcWalletProvider {
    async fn list_authorized_accounts(&self) -> BlockchainResult<Vec<Address>> {
        match &self.wallet {
            Some(wallet) => Ok(vec![wallet.address()]),
            None => self.client.get_accounts().await,
        }
    }

    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        let accounts = self.list_authorized_accounts().await?;
        if accounts.is_empty() {
            return Err(BlockchainError::Rejected(
                "node exposes no accounts and no private key is loaded".to_string(),
            ));
        }
        Ok(accounts)
    }

    async fn current_chain(&self) -> BlockchainResult<ChainId> {
        self.client.get_chain_id().await
    }

    async fn call(&self, contract: Address, calldata: Bytes) -> BlockchainResult<Bytes> {
        self.client.call(build_call(None, contract, calldata, None)).await
    }

    async fn sign_and_send(
        &self,
        contract: Address,
        calldata: Bytes,
        gas_limit: u64,
    ) -> BlockchainResult<TxHash> {
        let from = self.sender().await?;
        let tx = build_call(Some(from), contract, calldata, Some(gas_limit));
        let tx_hash = self.client.send_transaction(tx).await?;
        tracing::info!(tx_hash = %tx_hash, from = %from, to = %contract, "Transaction broadcast");
        Ok(tx_hash)
    }

    async fn await_confirmation(
        &self,
        tx_hash: TxHash,
        max_wait: Duration,
    ) -> BlockchainResult<ConfirmationStatus> {
        wait_for_confirmation(&self.client, tx_hash, max_wait).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn offline_config() -> ChainConfig {
        ChainConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            rpc_timeout_secs: 2,
            ..ChainConfig::default()
        }
    }

    #[tokio::test]
    async fn test_local_key_is_the_authorized_account() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let expected = wallet.address();
        let provider = RpcWalletProvider::new(offline_config(), Some(wallet)).unwrap();

        // Answered locally, no node required.
        let accounts = provider.list_authorized_accounts().await.unwrap();
        assert_eq!(accounts, vec![expected]);
        assert_eq!(provider.request_accounts().await.unwrap(), vec![expected]);
    }

    #[tokio::test]
    async fn test_without_key_asks_the_node() {
        let provider = RpcWalletProvider::new(offline_config(), None).unwrap();
        assert!(provider.list_authorized_accounts().await.is_err());
    }
}
