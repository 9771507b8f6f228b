//! Remote ledger backed by a deployed contract.

use std::future::Future;
use std::sync::Arc;

use alloy::primitives::{Address, TxHash};

use crate::blockchain::{BlockchainError, WalletProvider};
use crate::config::LedgerConfig;
use crate::ledger::abi::LedgerAbi;
use crate::ledger::types::{Entry, LedgerError, LedgerResult};

/// Logical operations of the proverb store.
pub trait Ledger: Send + Sync {
    /// Every entry, in ledger order (oldest first).
    fn read_all(&self) -> impl Future<Output = LedgerResult<Vec<Entry>>> + Send;

    /// Submit a new entry. Resolves once the transaction is broadcast.
    fn append(&self, text: &str) -> impl Future<Output = LedgerResult<TxHash>> + Send;
}

/// [`Ledger`] that reads and writes a contract through a wallet provider.
pub struct ContractLedger<W> {
    provider: Option<Arc<W>>,
    contract: Address,
    abi: LedgerAbi,
    gas_limit: u64,
}

impl<W: WalletProvider> ContractLedger<W> {
    /// Bind to the contract described by `config`.
    pub fn new(provider: Arc<W>, config: &LedgerConfig) -> LedgerResult<Self> {
        Self::bind(Some(provider), config)
    }

    /// A ledger with no wallet behind it. Every call fails with
    /// `NotAvailable`; used when no provider could be built.
    pub fn unbound(config: &LedgerConfig) -> LedgerResult<Self> {
        Self::bind(None, config)
    }

    fn bind(provider: Option<Arc<W>>, config: &LedgerConfig) -> LedgerResult<Self> {
        let contract: Address = config.contract_address.parse().map_err(|e| {
            LedgerError::Abi(format!(
                "invalid contract address '{}': {}",
                config.contract_address, e
            ))
        })?;
        let abi = LedgerAbi::from_config(config)?;

        Ok(Self {
            provider,
            contract,
            abi,
            gas_limit: config.gas_limit,
        })
    }

    fn provider(&self) -> LedgerResult<&W> {
        self.provider.as_deref().ok_or_else(|| {
            LedgerError::Chain(BlockchainError::NotAvailable("no wallet provider".to_string()))
        })
    }
}

impl<W: WalletProvider> Ledger for ContractLedger<W> {
    async fn read_all(&self) -> LedgerResult<Vec<Entry>> {
        let calldata = self.abi.encode_read()?;
        let data = self.provider()?.call(self.contract, calldata).await?;
        let entries = self.abi.decode_entries(&data)?;
        tracing::debug!(contract = %self.contract, count = entries.len(), "Entries fetched");
        Ok(entries)
    }

    async fn append(&self, text: &str) -> LedgerResult<TxHash> {
        let calldata = self.abi.encode_write(text)?;
        let tx_hash = self
            .provider()?
            .sign_and_send(self.contract, calldata, self.gas_limit)
            .await?;
        Ok(tx_hash)
    }
}

impl<W> std::fmt::Debug for ContractLedger<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractLedger")
            .field("contract", &self.contract)
            .field("gas_limit", &self.gas_limit)
            .finish()
    }
}
