//! Transaction building and confirmation monitoring.
//!
//! # Responsibilities
//! - Build contract call requests
//! - Monitor confirmations with a bounded wait

use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use tokio::time::{interval, timeout};

use crate::blockchain::client::RpcClient;
use crate::blockchain::types::{BlockchainResult, ConfirmationStatus};

/// Build a contract call request.
///
/// `from` and `gas_limit` are left unset when `None`; the provider's fillers
/// complete nonce, fees and chain id.
pub fn build_call(
    from: Option<Address>,
    to: Address,
    data: Bytes,
    gas_limit: Option<u64>,
) -> TransactionRequest {
    let mut tx = TransactionRequest::default().with_to(to).with_input(data);
    if let Some(from) = from {
        tx = tx.with_from(from);
    }
    if let Some(gas_limit) = gas_limit {
        tx = tx.with_gas_limit(gas_limit);
    }
    tx
}

/// Wait for a transaction to be confirmed.
///
/// Returns [`ConfirmationStatus::Pending`] when `max_wait` elapses first.
/// Failed polls are retried on the next tick; only the deadline ends the wait.
pub async fn wait_for_confirmation(
    client: &RpcClient,
    tx_hash: TxHash,
    max_wait: Duration,
) -> BlockchainResult<ConfirmationStatus> {
    let required_confirmations = client.config().confirmation_blocks.max(1);
    let poll_interval = Duration::from_millis(client.config().poll_interval_ms);

    let result = timeout(max_wait, async {
        let mut ticker = interval(poll_interval);

        loop {
            ticker.tick().await;

            let receipt = match client.get_transaction_receipt(tx_hash).await {
                Ok(Some(r)) => r,
                Ok(None) => {
                    tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt poll failed, retrying");
                    continue;
                }
            };

            if !receipt.status() {
                return ConfirmationStatus::Failed("Transaction reverted".to_string());
            }

            let current_block = match client.get_block_number().await {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(tx_hash = %tx_hash, error = %e, "Block number poll failed, retrying");
                    continue;
                }
            };
            let tx_block = receipt.block_number.unwrap_or(current_block);
            // The inclusion block counts as the first confirmation.
            let confirmations = current_block.saturating_sub(tx_block) as u32 + 1;

            if confirmations >= required_confirmations {
                return ConfirmationStatus::Confirmed {
                    block_number: tx_block,
                };
            }

            tracing::debug!(
                tx_hash = %tx_hash,
                confirmations = confirmations,
                required = required_confirmations,
                "Waiting for confirmations"
            );
        }
    })
    .await;

    match result {
        Ok(status) => Ok(status),
        Err(_) => {
            tracing::warn!(tx_hash = %tx_hash, wait_secs = max_wait.as_secs(), "Confirmation wait elapsed");
            Ok(ConfirmationStatus::Pending)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_call_sets_fields() {
        let to = Address::repeat_byte(0x11);
        let from = Address::repeat_byte(0x22);
        let tx = build_call(Some(from), to, Bytes::from_static(&[1, 2, 3]), Some(300_000));

        assert_eq!(tx.from, Some(from));
        assert_eq!(tx.gas, Some(300_000));
        assert_eq!(tx.input.input().map(|b| b.len()), Some(3));
    }

    #[test]
    fn test_build_read_call_leaves_gas_unset() {
        let tx = build_call(None, Address::ZERO, Bytes::new(), None);
        assert_eq!(tx.from, None);
        assert_eq!(tx.gas, None);
    }

    mod confirmation {
        use std::sync::Arc;

        use alloy::providers::ProviderBuilder;
        use alloy::transports::mock::Asserter;
        use serde_json::json;

        use super::*;
        use crate::config::ChainConfig;

        fn mocked_client(asserter: &Asserter) -> RpcClient {
            let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
            RpcClient::from_provider(Arc::new(provider), ChainConfig::default())
        }

        fn receipt(tx_hash: TxHash, status: &str, block: u64) -> serde_json::Value {
            json!({
                "type": "0x2",
                "status": status,
                "cumulativeGasUsed": "0x5208",
                "logs": [],
                "logsBloom": format!("0x{}", "00".repeat(256)),
                "transactionHash": tx_hash,
                "transactionIndex": "0x0",
                "blockHash": TxHash::repeat_byte(0xbb),
                "blockNumber": format!("{:#x}", block),
                "gasUsed": "0x5208",
                "effectiveGasPrice": "0x3b9aca00",
                "from": Address::repeat_byte(0x11),
                "to": Address::repeat_byte(0x22),
                "contractAddress": null
            })
        }

        #[tokio::test(start_paused = true)]
        async fn test_unmined_transaction_is_pending_after_max_wait() {
            let asserter = Asserter::new();
            for _ in 0..10 {
                asserter.push_success(&serde_json::Value::Null);
            }
            let client = mocked_client(&asserter);

            let status =
                wait_for_confirmation(&client, TxHash::repeat_byte(0x01), Duration::from_secs(10))
                    .await
                    .unwrap();
            assert_eq!(status, ConfirmationStatus::Pending);
        }

        #[tokio::test(start_paused = true)]
        async fn test_reverted_receipt_is_failed() {
            let tx_hash = TxHash::repeat_byte(0x01);
            let asserter = Asserter::new();
            asserter.push_success(&receipt(tx_hash, "0x0", 7));
            let client = mocked_client(&asserter);

            let status = wait_for_confirmation(&client, tx_hash, Duration::from_secs(10))
                .await
                .unwrap();
            assert!(matches!(status, ConfirmationStatus::Failed(_)));
        }

        #[tokio::test(start_paused = true)]
        async fn test_mined_receipt_is_confirmed() {
            let tx_hash = TxHash::repeat_byte(0x01);
            let asserter = Asserter::new();
            asserter.push_success(&serde_json::Value::Null);
            asserter.push_success(&receipt(tx_hash, "0x1", 7));
            asserter.push_success(&"0x7");
            let client = mocked_client(&asserter);

            let status = wait_for_confirmation(&client, tx_hash, Duration::from_secs(10))
                .await
                .unwrap();
            assert_eq!(status, ConfirmationStatus::Confirmed { block_number: 7 });
        }

        #[tokio::test(start_paused = true)]
        async fn test_failed_poll_does_not_end_the_wait() {
            let tx_hash = TxHash::repeat_byte(0x01);
            let asserter = Asserter::new();
            asserter.push_failure_msg("connection reset");
            asserter.push_success(&receipt(tx_hash, "0x1", 7));
            asserter.push_success(&"0x8");
            let client = mocked_client(&asserter);

            let status = wait_for_confirmation(&client, tx_hash, Duration::from_secs(10))
                .await
                .unwrap();
            assert_eq!(status, ConfirmationStatus::Confirmed { block_number: 7 });
        }
    }
}
