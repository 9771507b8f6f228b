//! Shared fakes for session integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash};
use chrono::{DateTime, Utc};

use proverb_board::blockchain::{BlockchainError, BlockchainResult, ChainId, ConfirmationStatus, WalletProvider};
use proverb_board::config::AppConfig;
use proverb_board::ledger::{Entry, Ledger, LedgerError, LedgerResult};
use proverb_board::session::SessionController;

pub const CHAIN_ID: u64 = 4;

/// Ordered record of remote calls across wallet and ledger.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

pub fn account(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn entry(author: u8, seconds: i64, message: &str) -> Entry {
    Entry {
        author: account(author),
        timestamp: DateTime::<Utc>::from_timestamp(seconds, 0).unwrap(),
        message: message.to_string(),
    }
}

/// Scriptable wallet.
pub struct MockWallet {
    log: CallLog,
    pub authorized: Mutex<Vec<Address>>,
    pub reject_requests: AtomicBool,
    pub fail_chain_queries: AtomicBool,
    pub chain: AtomicU64,
    pub confirmation: Mutex<ConfirmationStatus>,
}

impl MockWallet {
    pub fn new(log: CallLog, accounts: Vec<Address>) -> Self {
        Self {
            log,
            authorized: Mutex::new(accounts),
            reject_requests: AtomicBool::new(false),
            fail_chain_queries: AtomicBool::new(false),
            chain: AtomicU64::new(CHAIN_ID),
            confirmation: Mutex::new(ConfirmationStatus::Confirmed { block_number: 7 }),
        }
    }

    pub fn set_chain(&self, chain: u64) {
        self.chain.store(chain, Ordering::SeqCst);
    }

    pub fn set_confirmation(&self, status: ConfirmationStatus) {
        *self.confirmation.lock().unwrap() = status;
    }
}

impl WalletProvider for MockWallet {
    async fn list_authorized_accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.log.push("list_authorized_accounts");
        Ok(self.authorized.lock().unwrap().clone())
    }

    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.log.push("request_accounts");
        if self.reject_requests.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rejected("User rejected the request.".to_string()));
        }
        Ok(self.authorized.lock().unwrap().clone())
    }

    async fn current_chain(&self) -> BlockchainResult<ChainId> {
        self.log.push("current_chain");
        if self.fail_chain_queries.load(Ordering::SeqCst) {
            return Err(BlockchainError::Timeout(10));
        }
        Ok(ChainId(self.chain.load(Ordering::SeqCst)))
    }

    async fn call(&self, _contract: Address, _calldata: Bytes) -> BlockchainResult<Bytes> {
        self.log.push("call");
        Ok(Bytes::new())
    }

    async fn sign_and_send(
        &self,
        _contract: Address,
        _calldata: Bytes,
        _gas_limit: u64,
    ) -> BlockchainResult<TxHash> {
        self.log.push("sign_and_send");
        Ok(TxHash::repeat_byte(0x01))
    }

    async fn await_confirmation(
        &self,
        _tx_hash: TxHash,
        _max_wait: Duration,
    ) -> BlockchainResult<ConfirmationStatus> {
        self.log.push("await_confirmation");
        Ok(self.confirmation.lock().unwrap().clone())
    }
}

struct LedgerInner {
    log: CallLog,
    entries: Mutex<Vec<Entry>>,
    fail_reads: AtomicBool,
    fail_appends: AtomicBool,
    append_delay: Mutex<Duration>,
    next_timestamp: AtomicU64,
}

/// In-memory ledger; clones share state.
#[derive(Clone)]
pub struct MockLedger(Arc<LedgerInner>);

impl MockLedger {
    pub fn new(log: CallLog, entries: Vec<Entry>) -> Self {
        Self(Arc::new(LedgerInner {
            log,
            entries: Mutex::new(entries),
            fail_reads: AtomicBool::new(false),
            fail_appends: AtomicBool::new(false),
            append_delay: Mutex::new(Duration::ZERO),
            next_timestamp: AtomicU64::new(1_700_000_000),
        }))
    }

    pub fn fail_reads(&self, fail: bool) {
        self.0.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_appends(&self, fail: bool) {
        self.0.fail_appends.store(fail, Ordering::SeqCst);
    }

    pub fn set_append_delay(&self, delay: Duration) {
        *self.0.append_delay.lock().unwrap() = delay;
    }

    pub fn stored(&self) -> Vec<Entry> {
        self.0.entries.lock().unwrap().clone()
    }
}

impl Ledger for MockLedger {
    async fn read_all(&self) -> LedgerResult<Vec<Entry>> {
        self.0.log.push("read_all");
        if self.0.fail_reads.load(Ordering::SeqCst) {
            return Err(LedgerError::Chain(BlockchainError::Rpc(
                "eth_call failed: connection refused".to_string(),
            )));
        }
        Ok(self.0.entries.lock().unwrap().clone())
    }

    async fn append(&self, text: &str) -> LedgerResult<TxHash> {
        self.0.log.push(format!("append:{}", text));
        let delay = *self.0.append_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.0.fail_appends.load(Ordering::SeqCst) {
            return Err(LedgerError::Chain(BlockchainError::Rejected(
                "User denied transaction signature.".to_string(),
            )));
        }
        let seconds = self.0.next_timestamp.fetch_add(60, Ordering::SeqCst) as i64;
        self.0.entries.lock().unwrap().push(entry(0xaa, seconds, text));
        Ok(TxHash::repeat_byte(0x02))
    }
}

pub type TestController = SessionController<MockWallet, MockLedger>;

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.chain.chain_id = CHAIN_ID;
    config.ledger.contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string();
    config
}

/// A wired session with one authorized account and two stored entries.
pub struct Harness {
    pub log: CallLog,
    pub wallet: Arc<MockWallet>,
    pub ledger: MockLedger,
    pub controller: Arc<TestController>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let log = CallLog::default();
        let wallet = Arc::new(MockWallet::new(log.clone(), vec![account(0x11)]));
        let ledger = MockLedger::new(
            log.clone(),
            vec![
                entry(0x21, 1_600_000_000, "A stitch in time saves nine."),
                entry(0x22, 1_600_000_600, "Still waters run deep."),
            ],
        );
        let controller = Arc::new(SessionController::new(
            Some(wallet.clone()),
            ledger.clone(),
            &config,
        ));

        Self {
            log,
            wallet,
            ledger,
            controller,
        }
    }
}
