//! Session controller.
//!
//! # Responsibilities
//! - Wallet connection lifecycle (silent reconnect and explicit connect)
//! - Network validation against the deployment's chain
//! - Entry refresh and submission sequencing
//! - Converting every failure into a presented error
//!
//! # State Machine
//! ```text
//! Disconnected → Connecting → Connected{Unchecked|Ok|Wrong} → Submitting → Connected{..}
//! ```
//! `Connected{Wrong}` is terminal for writes: the sticky network error is
//! never cleared, and recovering requires a new session.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use alloy::primitives::Address;
use tokio::sync::watch;

use crate::blockchain::{ChainId, ConfirmationStatus, WalletProvider};
use crate::config::{AppConfig, EntryOrder};
use crate::ledger::Ledger;
use crate::observability::metrics;
use crate::session::error::{SessionError, SessionResult};
use crate::session::guard::OperationGuard;
use crate::session::notice::NoticeBoard;
use crate::session::state::{NetworkStatus, Notice, SessionPhase, SessionState};
use crate::ui::BoundedInput;

/// Owns the session state and orchestrates wallet and ledger calls.
///
/// Operations never panic on collaborator failures. Each one records its
/// error in the published state and also returns it for the caller's
/// convenience.
pub struct SessionController<W, L> {
    provider: Option<Arc<W>>,
    ledger: L,
    chain_id: ChainId,
    order: EntryOrder,
    confirmation_timeout: Duration,
    input: BoundedInput,
    state: Arc<watch::Sender<SessionState>>,
    notices: NoticeBoard,
    busy: AtomicBool,
    wrong_network: OnceLock<SessionError>,
}

impl<W, L> SessionController<W, L>
where
    W: WalletProvider,
    L: Ledger,
{
    /// Create a controller. `provider` is `None` when no wallet is available.
    pub fn new(provider: Option<Arc<W>>, ledger: L, config: &AppConfig) -> Self {
        let (tx, _) = watch::channel(SessionState::default());
        let state = Arc::new(tx);
        let notices = NoticeBoard::new(
            state.clone(),
            Duration::from_millis(config.session.error_display_ms),
        );

        Self {
            provider,
            ledger,
            chain_id: ChainId(config.chain.chain_id),
            order: config.ledger.order,
            confirmation_timeout: Duration::from_secs(config.chain.confirmation_timeout_secs),
            input: BoundedInput::new(config.session.message_limit),
            state,
            notices,
            busy: AtomicBool::new(false),
            wrong_network: OnceLock::new(),
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// The input widget backing the draft.
    pub fn input(&self) -> &BoundedInput {
        &self.input
    }

    /// Feed an edit through the bounded input into the draft.
    ///
    /// Returns `false`, leaving the draft untouched, while a submission is in
    /// flight or the network is wrong.
    pub fn edit_draft(&self, raw: &str) -> bool {
        let mut accepted = false;
        self.state.send_if_modified(|s| {
            let input = self.input.with_disabled(s.input_disabled());
            accepted = input.on_change(raw, |clamped| s.draft = clamped);
            accepted
        });
        if !accepted {
            tracing::debug!("Draft edit refused: input disabled");
        }
        accepted
    }

    /// Pick up an already-authorized account without prompting.
    ///
    /// With no provider or no authorized account this is a silent no-op.
    pub async fn check_existing_connection(&self) -> SessionResult<()> {
        let _guard = self.acquire("check_existing_connection")?;
        let result = self.check_existing_sequence().await;
        self.finish("check_existing_connection", result)
    }

    /// Ask the wallet for an account, then validate the network and load entries.
    pub async fn connect(&self) -> SessionResult<()> {
        let _guard = self.acquire("connect")?;
        let result = self.connect_sequence().await;
        self.finish("connect", result)
    }

    /// Check the wallet's chain against the deployment's.
    pub async fn network_check(&self) -> SessionResult<()> {
        let _guard = self.acquire("network_check")?;
        let result = self.check_network().await;
        self.finish("network_check", result)
    }

    /// Reload every entry from the ledger.
    pub async fn refresh(&self) -> SessionResult<()> {
        let _guard = self.acquire("refresh")?;
        let result = self.reload_entries().await;
        self.finish("refresh", result)
    }

    /// Submit the current draft.
    pub async fn submit(&self) -> SessionResult<()> {
        let _guard = self.acquire("submit")?;
        let result = self.submit_sequence().await;
        self.finish("submit", result)
    }

    /// Replace the draft with `message` (clamped) and submit it.
    pub async fn submit_message(&self, message: &str) -> SessionResult<()> {
        let _guard = self.acquire("submit")?;
        let result = if self.edit_draft(message) {
            self.submit_sequence().await
        } else {
            // Loading only happens under the guard, so a refused edit here
            // means the network is wrong.
            Err(self.sticky_network_error().unwrap_or(SessionError::Busy))
        };
        self.finish("submit", result)
    }

    fn acquire(&self, operation: &'static str) -> SessionResult<OperationGuard<'_>> {
        OperationGuard::try_acquire(&self.busy).ok_or_else(|| {
            tracing::warn!(operation, "Rejected: another operation is in flight");
            let err = SessionError::Busy;
            self.present(&err);
            err
        })
    }

    fn finish(&self, operation: &'static str, result: SessionResult<()>) -> SessionResult<()> {
        metrics::record_operation(operation, result.is_ok());
        match &result {
            Ok(()) => tracing::debug!(operation, "Operation complete"),
            Err(e) => {
                tracing::warn!(operation, kind = e.kind().as_str(), error = %e, "Operation failed");
                self.present(e);
            }
        }
        result
    }

    /// Route an error to its presentation surface.
    fn present(&self, err: &SessionError) {
        metrics::record_error(err.kind().as_str());
        match err {
            SessionError::NoProvider => {
                let prompt = err.to_string();
                self.state.send_modify(|s| s.prompt = Some(prompt));
            }
            SessionError::WrongNetwork { .. } => {
                self.state.send_if_modified(|s| {
                    if s.network_error.is_some() {
                        return false;
                    }
                    s.network_error = Some(Notice::new(err));
                    true
                });
            }
            _ => {
                self.notices.raise(err);
            }
        }
    }

    fn provider(&self) -> SessionResult<&Arc<W>> {
        self.provider.as_ref().ok_or(SessionError::NoProvider)
    }

    fn sticky_network_error(&self) -> Option<SessionError> {
        self.wrong_network.get().cloned()
    }

    async fn check_existing_sequence(&self) -> SessionResult<()> {
        let Some(provider) = self.provider.as_ref() else {
            tracing::info!("No wallet provider; skipping reconnect check");
            return Ok(());
        };

        let accounts = provider.list_authorized_accounts().await?;
        let Some(account) = accounts.first().copied() else {
            tracing::info!("No authorized account found");
            return Ok(());
        };

        self.adopt_account(account);
        self.check_network().await?;
        self.reload_entries().await
    }

    async fn connect_sequence(&self) -> SessionResult<()> {
        let provider = self.provider()?;

        let previous = self.state.borrow().phase;
        self.set_phase(SessionPhase::Connecting);

        let account = match provider.request_accounts().await {
            Ok(accounts) => accounts.first().copied(),
            Err(e) => {
                self.set_phase(previous);
                return Err(SessionError::from_authorization(e));
            }
        };
        let Some(account) = account else {
            self.set_phase(previous);
            return Err(SessionError::AuthorizationDenied(
                "wallet returned no accounts".to_string(),
            ));
        };

        self.adopt_account(account);
        self.check_network().await?;
        self.reload_entries().await
    }

    fn adopt_account(&self, account: Address) {
        tracing::info!(account = %account, "Account connected");
        self.state.send_modify(|s| {
            s.account = Some(account);
            let network = s.network();
            s.phase = SessionPhase::Connected(network);
        });
    }

    async fn check_network(&self) -> SessionResult<()> {
        if let Some(err) = self.sticky_network_error() {
            return Err(err);
        }

        let provider = self.provider()?;
        let actual = provider.current_chain().await?;

        if actual != self.chain_id {
            tracing::warn!(expected = %self.chain_id, actual = %actual, "Wallet is on the wrong network");
            let err = SessionError::WrongNetwork {
                expected: self.chain_id.0,
                actual: actual.0,
            };
            let _ = self.wrong_network.set(err.clone());
            self.set_network(NetworkStatus::Wrong);
            return Err(err);
        }

        self.set_network(NetworkStatus::Ok);
        Ok(())
    }

    fn set_phase(&self, phase: SessionPhase) {
        self.state.send_if_modified(|s| {
            let changed = s.phase != phase;
            s.phase = phase;
            changed
        });
    }

    fn set_network(&self, status: NetworkStatus) {
        self.state.send_if_modified(|s| match s.phase {
            SessionPhase::Connected(current) if current != status => {
                s.phase = SessionPhase::Connected(status);
                true
            }
            _ => false,
        });
    }

    async fn reload_entries(&self) -> SessionResult<()> {
        let mut entries = self.ledger.read_all().await?;
        if self.order == EntryOrder::NewestFirst {
            entries.reverse();
        }

        let count = entries.len();
        self.state.send_modify(|s| s.entries = entries);
        metrics::record_entries(count);
        tracing::info!(count, "Entries refreshed");
        Ok(())
    }

    async fn submit_sequence(&self) -> SessionResult<()> {
        let message = self.state.borrow().draft.clone();
        if message.trim().is_empty() {
            return Err(SessionError::Validation(
                "Write a proverb before submitting".to_string(),
            ));
        }
        if let Some(err) = self.sticky_network_error() {
            return Err(err);
        }
        let provider = self.provider()?.clone();

        let (connected, previous) = {
            let state = self.state.borrow();
            (state.account.is_some(), state.phase)
        };
        if !connected || previous != SessionPhase::Connected(NetworkStatus::Ok) {
            return Err(SessionError::Validation(
                "Connect a wallet on the right network before submitting".to_string(),
            ));
        }

        self.state.send_modify(|s| {
            s.loading = true;
            s.pending_tx = None;
            s.phase = SessionPhase::Submitting;
        });

        let result = self.send_and_confirm(&provider, &message).await;
        if result.is_ok() {
            self.state.send_modify(|s| s.draft.clear());
            // The write landed; a failed reload is reported on its own.
            if let Err(e) = self.reload_entries().await {
                tracing::warn!(error = %e, "Reload after submission failed");
                self.present(&e);
            }
        }

        self.state.send_modify(|s| {
            s.loading = false;
            s.phase = previous;
        });
        result
    }

    async fn send_and_confirm(&self, provider: &W, message: &str) -> SessionResult<()> {
        let tx_hash = self.ledger.append(message).await?;
        tracing::info!(tx_hash = %tx_hash, "Proverb submitted, awaiting confirmation");

        match provider
            .await_confirmation(tx_hash, self.confirmation_timeout)
            .await?
        {
            ConfirmationStatus::Confirmed { block_number } => {
                tracing::info!(tx_hash = %tx_hash, block_number, "Proverb confirmed");
                Ok(())
            }
            ConfirmationStatus::Failed(reason) => Err(SessionError::RemoteCall(format!(
                "Transaction {} failed: {}",
                tx_hash, reason
            ))),
            ConfirmationStatus::Pending => {
                self.state.send_modify(|s| s.pending_tx = Some(tx_hash));
                Err(SessionError::ConfirmationPending { tx_hash })
            }
        }
    }
}
