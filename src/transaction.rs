// src/transaction.rs
use crate::error::{Result, StakingError};
use crate::rpc::{parse_quantity, EthRpcClient};
use crate::wallet::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(hash: &str) -> Self {
        TxHash(hash.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameters for `eth_sendTransaction`; the wallet fills in nonce, fees and signature
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub gas_used: Option<String>,
}

impl TransactionReceipt {
    /// Receipts without a status field predate EIP-658 and count as success
    pub fn is_success(&self) -> bool {
        match &self.status {
            Some(status) => parse_quantity(status).map(|s| s == 1).unwrap_or(false),
            None => true,
        }
    }
}

/// Anything that can report a transaction receipt
#[async_trait]
pub trait ReceiptSource: Send + Sync {
    async fn receipt(&self, hash: &TxHash) -> Result<Option<TransactionReceipt>>;
}

#[async_trait]
impl ReceiptSource for EthRpcClient {
    async fn receipt(&self, hash: &TxHash) -> Result<Option<TransactionReceipt>> {
        self.get_transaction_receipt(hash).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    /// `None` waits until the transaction is mined
    pub timeout: Option<Duration>,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            timeout: None,
        }
    }
}

/// Poll until the transaction is mined; a reverted receipt is an error
pub async fn wait_for_confirmation(
    source: &dyn ReceiptSource,
    hash: &TxHash,
    policy: &ConfirmationPolicy,
) -> Result<TransactionReceipt> {
    let started = tokio::time::Instant::now();
    loop {
        if let Some(receipt) = source.receipt(hash).await? {
            if receipt.is_success() {
                log::info!(
                    "Transaction {} confirmed in block {}",
                    hash,
                    receipt.block_number.as_deref().unwrap_or("?")
                );
                return Ok(receipt);
            }
            log::error!("Transaction {} reverted", hash);
            return Err(StakingError::Reverted(hash.to_string()));
        }

        if let Some(timeout) = policy.timeout {
            if started.elapsed() >= timeout {
                return Err(StakingError::Timeout(hash.to_string()));
            }
        }

        tokio::time::sleep(policy.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reports "pending" for the first `pending_polls` calls
    struct DelayedReceipts {
        pending_polls: usize,
        calls: AtomicUsize,
        status: &'static str,
    }

    #[async_trait]
    impl ReceiptSource for DelayedReceipts {
        async fn receipt(&self, hash: &TxHash) -> Result<Option<TransactionReceipt>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.pending_polls {
                return Ok(None);
            }
            Ok(Some(TransactionReceipt {
                transaction_hash: hash.clone(),
                status: Some(self.status.to_string()),
                block_number: Some("0x10".to_string()),
                gas_used: None,
            }))
        }
    }

    fn fast_policy() -> ConfirmationPolicy {
        ConfirmationPolicy {
            poll_interval: Duration::from_millis(1),
            timeout: None,
        }
    }

    #[tokio::test]
    async fn test_waits_until_mined() {
        let source = DelayedReceipts { pending_polls: 3, calls: AtomicUsize::new(0), status: "0x1" };
        let hash = TxHash::new("0xABC");
        let receipt = wait_for_confirmation(&source, &hash, &fast_policy()).await.unwrap();
        assert_eq!(receipt.transaction_hash.as_str(), "0xabc");
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_error() {
        let source = DelayedReceipts { pending_polls: 0, calls: AtomicUsize::new(0), status: "0x0" };
        let hash = TxHash::new("0xdead");
        let err = wait_for_confirmation(&source, &hash, &fast_policy()).await.unwrap_err();
        assert_eq!(err, StakingError::Reverted("0xdead".to_string()));
    }

    #[tokio::test]
    async fn test_timeout() {
        let source = DelayedReceipts { pending_polls: usize::MAX, calls: AtomicUsize::new(0), status: "0x1" };
        let policy = ConfirmationPolicy {
            poll_interval: Duration::from_millis(1),
            timeout: Some(Duration::from_millis(5)),
        };
        let err = wait_for_confirmation(&source, &TxHash::new("0x1"), &policy).await.unwrap_err();
        assert!(matches!(err, StakingError::Timeout(_)));
    }

    #[test]
    fn test_request_serialization_omits_empty_fields() {
        let address: Address = "0x5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap();
        let tx = TransactionRequest {
            from: address,
            to: address,
            data: "0x".to_string(),
            value: None,
            gas: Some("0x493e0".to_string()),
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(
            value,
            json!({
                "from": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
                "to": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
                "data": "0x",
                "gas": "0x493e0"
            })
        );
    }

    #[test]
    fn test_receipt_deserialization() {
        let receipt: TransactionReceipt = serde_json::from_value(json!({
            "transactionHash": "0xabc",
            "status": "0x1",
            "blockNumber": "0x2a",
            "gasUsed": "0x5208",
            "logs": []
        }))
        .unwrap();
        assert!(receipt.is_success());
        assert_eq!(receipt.block_number.as_deref(), Some("0x2a"));
    }
}
